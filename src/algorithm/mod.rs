//! Algorithm support for signing and verifying tokens
//!
//! Only the HMAC family is accepted. Anything else a header declares, `none`
//! and every asymmetric algorithm included, fails with
//! `Error::AlgorithmUnexpected` before the key is ever touched.

mod hmac;

use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::utils::base64url;

/// Algorithm identifier from JWT header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmType {
    /// HMAC with SHA-256 (used for issuance)
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
}

impl AlgorithmType {
    /// Parse the `alg` header value, whose length the codec has already bounded
    pub(crate) fn from_str(s: &str) -> Result<Self> {
        match s {
            "HS256" => Ok(AlgorithmType::HS256),
            "HS384" => Ok(AlgorithmType::HS384),
            "HS512" => Ok(AlgorithmType::HS512),
            _ => Err(Error::AlgorithmUnexpected(s.into())),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::HS256 => "HS256",
            AlgorithmType::HS384 => "HS384",
            AlgorithmType::HS512 => "HS512",
        }
    }

    /// Sign the signing input (header.payload) and return the raw MAC
    pub(crate) fn sign(&self, signing_input: &str, key: &[u8]) -> Result<Vec<u8>> {
        hmac::compute(*self, key, signing_input.as_bytes())
            .map_err(|e| Error::Signing(format!("{}: {e}", self.as_str())))
    }

    /// Verify a signature using the algorithm
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The Base64URL-encoded signature
    /// * `key` - The shared HMAC secret
    pub(crate) fn verify_signature(
        &self,
        signing_input: &str,
        signature: &str,
        key: &[u8],
    ) -> Result<()> {
        let provided = base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| Error::SignatureInvalid)?;
        hmac::verify(*self, key, signing_input.as_bytes(), &provided)
    }
}

impl std::fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for AlgorithmType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
