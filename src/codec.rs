//! Token codec
//!
//! Issuance always signs with HS256. Decoding accepts any member of the HMAC
//! family and runs its checks in a fixed order:
//!
//! 1. Structure and size limits
//! 2. Algorithm family
//! 3. Temporal claims (`exp`, then `nbf` and `iat` when present)
//! 4. Signature
//!
//! The key always comes from [`Config`], never from the token.

use crate::algorithm::AlgorithmType;
use crate::claims::{Claims, IssuedClaims, current_timestamp, validate_temporal};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::header::TokenHeader;
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_SIGNATURE_B64_SIZE,
    MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;
use crate::utils::bounds::validate_field_size;
use miniserde::Serialize;
use miniserde::json::Object;

/// Algorithm used on issuance
const ISSUANCE_ALGORITHM: AlgorithmType = AlgorithmType::HS256;

/// Issue a signed token carrying `identity` under the configured identity
/// claim and an `exp` of now plus the configured time to live
///
/// # Example
///
/// ```
/// use jwtgate::{Config, decode, encode};
///
/// let config = Config::new(b"my-secret").unwrap();
/// let token = encode(&"user-42".to_string(), &config).unwrap();
///
/// let claims = decode(&token, &config).unwrap();
/// assert!(claims.get("id").is_some());
/// ```
pub fn encode<I: Serialize>(identity: &I, config: &Config) -> Result<String> {
    encode_at(identity, config, current_timestamp())
}

/// Decode and verify a token, returning every claim it carries
///
/// # Errors
/// * malformed input: `TokenTooLarge`, `FormatInvalid`, `FormatInvalidBase64`,
///   `FormatInvalidJson`, `HeaderFieldTooLong`
/// * `AlgorithmUnexpected` when the header declares anything outside the HMAC
///   family
/// * `TokenExpired`, `TokenNotYetValid`, `TokenIssuedInFuture`,
///   `TokenMissingClaim("exp")`, `TokenInvalidClaim` for temporal claims
/// * `SignatureInvalid` when the MAC does not match
pub fn decode(token: &str, config: &Config) -> Result<Claims> {
    decode_at(token, config, current_timestamp())
}

pub(crate) fn encode_at<I: Serialize>(identity: &I, config: &Config, now: i64) -> Result<String> {
    let ttl =
        i64::try_from(config.time_to_live().as_secs()).map_err(|_| Error::TimestampOverflow)?;
    let expiration = now.checked_add(ttl).ok_or(Error::TimestampOverflow)?;

    let header = TokenHeader::for_algorithm(ISSUANCE_ALGORITHM);
    let claims = IssuedClaims {
        identity_claim: config.identity_claim(),
        identity,
        expiration,
    };

    let header_b64 = base64url::encode_bytes(miniserde::json::to_string(&header).as_bytes());
    let payload_b64 = base64url::encode_bytes(miniserde::json::to_string(&claims).as_bytes());
    let signing_input = format!("{header_b64}.{payload_b64}");

    let signature = ISSUANCE_ALGORITHM.sign(&signing_input, config.signing_key())?;

    Ok(format!(
        "{signing_input}.{}",
        base64url::encode_bytes(&signature)
    ))
}

pub(crate) fn decode_at(token: &str, config: &Config, now: i64) -> Result<Claims> {
    // 1. Parse structure
    let parts = TokenParts::parse(token)?;

    // 2. Check algorithm family before anything touches the key
    let algorithm = AlgorithmType::from_str(&parts.header.algorithm)?;

    // 3. Temporal claims
    validate_temporal(&parts.claims, config.leeway(), now)?;

    // 4. Verify signature
    algorithm.verify_signature(parts.signing_input, parts.signature_b64, config.signing_key())?;

    Ok(parts.claims)
}

/// Read the `exp` claim of a token without verifying it
pub(crate) fn peek_expiration(token: &str) -> Result<i64> {
    TokenParts::parse(token)?
        .claims
        .numeric_date("exp")?
        .ok_or_else(|| Error::TokenMissingClaim("exp".into()))
}

/// Token split into its segments, header and payload decoded but not trusted
struct TokenParts<'a> {
    signing_input: &'a str,
    signature_b64: &'a str,
    header: TokenHeader,
    claims: Claims,
}

impl<'a> TokenParts<'a> {
    fn parse(token: &'a str) -> Result<Self> {
        // Validate token string length
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        // Check token format (header, payload, signature)
        let (signing_input, signature_b64) = token.rsplit_once('.').ok_or(Error::FormatInvalid)?;
        let (header_b64, payload_b64) =
            signing_input.split_once('.').ok_or(Error::FormatInvalid)?;
        if payload_b64.contains('.') {
            return Err(Error::FormatInvalid);
        }

        // Validate signature Base64URL size before decoding
        if signature_b64.len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::FormatInvalidBase64(format!(
                "signature too large: {} bytes (maximum: {} bytes)",
                signature_b64.len(),
                MAX_SIGNATURE_B64_SIZE
            )));
        }

        // Decode header with size limit
        let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)?;
        let header: TokenHeader = miniserde::json::from_str(&header_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))?;
        validate_field_size("alg", &header.algorithm, MAX_ALG_LENGTH)?;

        // Decode payload with size limit
        let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
        let payload: Object = miniserde::json::from_str(&payload_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse payload: {e}")))?;

        Ok(Self {
            signing_input,
            signature_b64,
            header,
            claims: Claims::from(payload),
        })
    }
}
