//! Shared issuing and validating handle

use crate::claims::Claims;
use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::revocation::{MemoryRevocationList, RevocationStore};
use crate::validator;
use http::HeaderMap;
use miniserde::json::Value;
use miniserde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration and revocation store bundled for sharing across handlers
///
/// Cloning is cheap and every clone sees the same revocations.
///
/// # Example
///
/// ```
/// use jwtgate::{Authenticator, Config, Error};
///
/// let auth = Authenticator::new(Config::new(b"my-secret").unwrap());
/// let token = auth.issue(&"user-42".to_string()).unwrap();
///
/// let header = format!("Bearer {token}");
/// let user: String = auth.validate_as(&token).unwrap();
/// assert_eq!(user, "user-42");
/// assert!(auth.validate_header_value(&header).is_ok());
///
/// auth.revoke(&token).unwrap();
/// assert_eq!(auth.validate(&token).unwrap_err(), Error::TokenRevoked);
/// ```
pub struct Authenticator<R = MemoryRevocationList> {
    config: Arc<Config>,
    revocation: Arc<R>,
}

impl Authenticator<MemoryRevocationList> {
    /// Create an authenticator backed by an in-memory revocation list
    pub fn new(config: Config) -> Self {
        let revocation = MemoryRevocationList::new(&config);
        Self::with_revocation_store(config, revocation)
    }

    /// Revoke `token` for the rest of its lifetime
    ///
    /// Fails when the revocation could not be recorded, see
    /// [`MemoryRevocationList::revoke`].
    pub fn revoke(&self, token: &str) -> Result<()> {
        self.revocation.revoke(token)
    }
}

impl<R: RevocationStore> Authenticator<R> {
    /// Create an authenticator consulting `revocation` on every validation
    pub fn with_revocation_store(config: Config, revocation: R) -> Self {
        Self {
            config: Arc::new(config),
            revocation: Arc::new(revocation),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Revocation store in use
    pub fn revocation_store(&self) -> &R {
        &self.revocation
    }

    /// Issue a token for `identity`
    pub fn issue<I: Serialize>(&self, identity: &I) -> Result<String> {
        codec::encode(identity, &self.config)
    }

    /// Decode and verify a token without consulting the revocation store
    pub fn decode(&self, token: &str) -> Result<Claims> {
        codec::decode(token, &self.config)
    }

    /// Validate a token and return its identity
    pub fn validate(&self, token: &str) -> Result<Value> {
        validator::validate_token(token, &self.config, self.revocation.as_ref())
    }

    /// Validate a token and deserialize its identity
    pub fn validate_as<I: Deserialize>(&self, token: &str) -> Result<I> {
        validator::validate_token_as(token, &self.config, self.revocation.as_ref())
    }

    /// Validate the token carried in a raw header value
    pub fn validate_header_value(&self, header_value: &str) -> Result<Value> {
        validator::validate_from_header_value(header_value, &self.config, self.revocation.as_ref())
    }

    /// Validate the token carried in the configured request header
    pub fn validate_headers(&self, headers: &HeaderMap) -> Result<Value> {
        validator::validate_from_headers(headers, &self.config, self.revocation.as_ref())
    }
}

impl<R> Clone for Authenticator<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            revocation: Arc::clone(&self.revocation),
        }
    }
}

impl<R> std::fmt::Debug for Authenticator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
