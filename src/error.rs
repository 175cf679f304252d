//! Errors for jwtgate

use thiserror::Error;

/// JWTGate Errors
///
/// Messages describe which check failed but never contain the token itself.
/// Hosting layers should still map every variant to a generic unauthorized
/// response instead of forwarding the text to untrusted clients.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    // ============================================================================
    // Issuance Errors
    // ============================================================================
    #[error("Error signing token: {0}")]
    Signing(String),

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid JWT format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Unexpected signing method: '{0}' (only HMAC algorithms are accepted)")]
    AlgorithmUnexpected(String),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    TokenIssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Required token claim '{0}' is missing")]
    TokenMissingClaim(String),

    #[error("Token claim validation failed: {0}")]
    TokenInvalidClaim(String),

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Token not found in request headers")]
    TokenNotFound,

    #[error("Integer overflow in timestamp arithmetic")]
    TimestampOverflow,

    // ============================================================================
    // Revocation Store Errors
    // ============================================================================
    #[error("Revocation store failed: {0}")]
    RevocationStoreFailed(String),
}

impl Error {
    /// Whether the token string itself could not be parsed
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::TokenTooLarge { .. }
                | Error::FormatInvalid
                | Error::FormatInvalidBase64(_)
                | Error::FormatInvalidJson(_)
                | Error::HeaderFieldTooLong { .. }
        )
    }
}

/// Result type alias for JWTGate operations
pub type Result<T> = std::result::Result<T, Error>;
