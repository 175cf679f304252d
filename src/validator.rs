//! Token validation
//!
//! Composes revocation lookup, decoding and identity extraction:
//!
//! 1. Ask the revocation store about the raw token (before any crypto)
//! 2. Decode and verify the token
//! 3. Return the value of the configured identity claim
//!
//! Rejections are logged at debug level with the error attached. The token
//! itself never appears in logs.

use crate::claims::{Claims, current_timestamp};
use crate::codec::decode_at;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::{extract_from_headers, extract_token};
use crate::revocation::RevocationStore;
use http::HeaderMap;
use miniserde::Deserialize;
use miniserde::json::Value;

/// Validate a token and return its identity
///
/// # Example
///
/// ```
/// use jwtgate::{Config, Result, encode, validate_token};
///
/// let config = Config::new(b"my-secret").unwrap();
/// let token = encode(&"user-42".to_string(), &config).unwrap();
///
/// let not_revoked = |_: &str| -> Result<bool> { Ok(false) };
/// let identity = validate_token(&token, &config, &not_revoked).unwrap();
/// assert_eq!(miniserde::json::to_string(&identity), r#""user-42""#);
/// ```
///
/// # Errors
/// * `TokenRevoked` when the store reports the token as revoked
/// * whatever the store returns when the lookup itself fails
/// * every error of [`decode`](crate::decode)
/// * `TokenMissingClaim` when the identity claim is absent or null and
///   [`Config::require_identity`] is set
pub fn validate_token<R>(token: &str, config: &Config, revocation: &R) -> Result<Value>
where
    R: RevocationStore + ?Sized,
{
    validate_token_at(token, config, revocation, current_timestamp())
}

/// Validate a token and deserialize its identity into `I`
///
/// An identity that does not fit `I` fails with `Error::TokenInvalidClaim`.
pub fn validate_token_as<I, R>(token: &str, config: &Config, revocation: &R) -> Result<I>
where
    I: Deserialize,
    R: RevocationStore + ?Sized,
{
    let identity = validate_token(token, config, revocation)?;
    identity_as(identity, config).inspect_err(log_rejection)
}

/// Extract the token from a raw header value, then validate it
pub fn validate_from_header_value<R>(
    header_value: &str,
    config: &Config,
    revocation: &R,
) -> Result<Value>
where
    R: RevocationStore + ?Sized,
{
    let token = extract_token(header_value, config).inspect_err(log_rejection)?;
    validate_token(token, config, revocation)
}

/// Extract the token from the configured request header, then validate it
pub fn validate_from_headers<R>(
    headers: &HeaderMap,
    config: &Config,
    revocation: &R,
) -> Result<Value>
where
    R: RevocationStore + ?Sized,
{
    let token = extract_from_headers(headers, config).inspect_err(log_rejection)?;
    validate_token(token, config, revocation)
}

pub(crate) fn validate_token_at<R>(
    token: &str,
    config: &Config,
    revocation: &R,
    now: i64,
) -> Result<Value>
where
    R: RevocationStore + ?Sized,
{
    check_then_decode(token, config, revocation, now)
        .and_then(|claims| take_identity(claims, config))
        .inspect_err(log_rejection)
}

pub(crate) fn identity_as<I: Deserialize>(identity: Value, config: &Config) -> Result<I> {
    miniserde::json::from_str(&miniserde::json::to_string(&identity)).map_err(|_| {
        Error::TokenInvalidClaim(format!(
            "'{}' does not match the expected identity type",
            config.identity_claim()
        ))
    })
}

fn check_then_decode<R>(token: &str, config: &Config, revocation: &R, now: i64) -> Result<Claims>
where
    R: RevocationStore + ?Sized,
{
    if revocation.is_revoked(token)? {
        return Err(Error::TokenRevoked);
    }

    decode_at(token, config, now)
}

fn take_identity(mut claims: Claims, config: &Config) -> Result<Value> {
    match claims.take(config.identity_claim()) {
        Some(Value::Null) | None if config.require_identity() => Err(Error::TokenMissingClaim(
            config.identity_claim().to_string(),
        )),
        Some(identity) => Ok(identity),
        None => Ok(Value::Null),
    }
}

fn log_rejection(error: &Error) {
    tracing::debug!(%error, malformed = error.is_malformed(), "token rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmType;
    use crate::codec::{encode, encode_at};
    use crate::utils::base64url;
    use http::HeaderValue;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    const NOW: i64 = 1_700_000_000;

    fn config() -> Config {
        Config::new(b"validator-key").unwrap()
    }

    fn not_revoked(_: &str) -> Result<bool> {
        Ok(false)
    }

    fn sign(payload: &str, key: &[u8]) -> String {
        let signing_input = format!(
            "{}.{}",
            base64url::encode_bytes(br#"{"alg":"HS256","typ":"JWT"}"#),
            base64url::encode_bytes(payload.as_bytes())
        );
        let mac = AlgorithmType::HS256.sign(&signing_input, key).unwrap();
        format!("{signing_input}.{}", base64url::encode_bytes(&mac))
    }

    #[test]
    fn test_returns_identity() {
        let config = config();
        let token = encode_at(&"alice".to_string(), &config, NOW).unwrap();

        let identity = validate_token_at(&token, &config, &not_revoked, NOW).unwrap();
        assert!(matches!(identity, Value::String(s) if s == "alice"));
    }

    #[test]
    fn test_revoked_before_decode() {
        let config = config();
        let calls = Cell::new(0);
        let revoke_all = |_: &str| -> Result<bool> {
            calls.set(calls.get() + 1);
            Ok(true)
        };

        // Even garbage is reported as revoked: the store is asked first
        assert_eq!(
            validate_token_at("garbage", &config, &revoke_all, NOW).unwrap_err(),
            Error::TokenRevoked
        );

        let token = encode_at(&1u64, &config, NOW).unwrap();
        assert_eq!(
            validate_token_at(&token, &config, &revoke_all, NOW).unwrap_err(),
            Error::TokenRevoked
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_store_receives_raw_token() {
        let config = config();
        let token = encode_at(&1u64, &config, NOW).unwrap();
        let seen = std::cell::RefCell::new(String::new());
        let store = |t: &str| -> Result<bool> {
            seen.replace(t.to_string());
            Ok(false)
        };

        validate_token_at(&token, &config, &store, NOW).unwrap();
        assert_eq!(*seen.borrow(), token);
    }

    #[test]
    fn test_store_failure_fails_closed() {
        let config = config();
        let token = encode_at(&1u64, &config, NOW).unwrap();
        let broken =
            |_: &str| -> Result<bool> { Err(Error::RevocationStoreFailed("unreachable".into())) };

        assert_eq!(
            validate_token_at(&token, &config, &broken, NOW).unwrap_err(),
            Error::RevocationStoreFailed("unreachable".into())
        );
    }

    #[test]
    fn test_missing_identity_rejected() {
        let config = config();
        let token = sign(&format!(r#"{{"exp":{}}}"#, NOW + 60), config.signing_key());
        assert_eq!(
            validate_token_at(&token, &config, &not_revoked, NOW).unwrap_err(),
            Error::TokenMissingClaim("id".into())
        );

        let token = sign(
            &format!(r#"{{"id":null,"exp":{}}}"#, NOW + 60),
            config.signing_key(),
        );
        assert_eq!(
            validate_token_at(&token, &config, &not_revoked, NOW).unwrap_err(),
            Error::TokenMissingClaim("id".into())
        );
    }

    #[test]
    fn test_missing_identity_tolerated() {
        let config = Config::builder(b"validator-key")
            .require_identity(false)
            .build()
            .unwrap();
        let token = sign(&format!(r#"{{"exp":{}}}"#, NOW + 60), config.signing_key());

        let identity = validate_token_at(&token, &config, &not_revoked, NOW).unwrap();
        assert!(matches!(identity, Value::Null));
    }

    #[test]
    fn test_identity_as() {
        #[derive(miniserde::Deserialize, Debug, PartialEq)]
        struct User {
            name: String,
            admin: bool,
        }

        let config = config();
        let identity: Value = miniserde::json::from_str(r#"{"name":"bob","admin":true}"#).unwrap();
        let user: User = identity_as(identity, &config).unwrap();
        assert_eq!(
            user,
            User {
                name: "bob".into(),
                admin: true
            }
        );

        let result = identity_as::<User>(Value::String("bob".into()), &config);
        assert!(matches!(result, Err(Error::TokenInvalidClaim(_))));
    }

    #[test]
    fn test_validate_from_header_value() {
        let config = config();
        let token = encode(&"carol".to_string(), &config).unwrap();

        let identity =
            validate_from_header_value(&format!("Bearer {token}"), &config, &not_revoked).unwrap();
        assert!(matches!(identity, Value::String(s) if s == "carol"));

        assert_eq!(
            validate_from_header_value(&token, &config, &not_revoked).unwrap_err(),
            Error::TokenNotFound
        );
    }

    #[test]
    fn test_validate_from_headers() {
        let config = config();
        let token = encode(&42u64, &config).unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(
            validate_from_headers(&headers, &config, &not_revoked).unwrap_err(),
            Error::TokenNotFound
        );

        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        let identity: u64 = validate_token_as(
            extract_from_headers(&headers, &config).unwrap(),
            &config,
            &not_revoked,
        )
        .unwrap();
        assert_eq!(identity, 42);
        assert!(validate_from_headers(&headers, &config, &not_revoked).is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_identity_type_mismatch_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        let config = config();
        let token = encode(&"not-a-number".to_string(), &config).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            let result = validate_token_as::<u64, _>(&token, &config, &not_revoked);
            assert!(matches!(result, Err(Error::TokenInvalidClaim(_))));
        });

        let output = logs.contents();
        assert!(output.contains("token rejected"));
        assert!(output.contains("does not match the expected identity type"));
        assert!(!output.contains(&token));
    }
}
