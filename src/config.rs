//! Token configuration
//!
//! A [`Config`] is built once at startup and then shared read-only by every
//! issuance and validation call. [`ConfigBuilder::build`] validates all
//! bounds, so holding a `Config` means holding a usable one.

use crate::error::{Error, Result};
use crate::limits::{MAX_LEEWAY_SECONDS, MAX_TIME_TO_LIVE};
use std::sync::Arc;
use std::time::Duration;

/// Default token lifetime (72 hours)
pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(72 * 60 * 60);

/// Default name of the claim carrying the identity
pub const DEFAULT_IDENTITY_CLAIM: &str = "id";

/// Default request header carrying the token
pub const DEFAULT_HEADER: &str = "Authorization";

/// Default prefix in front of the token inside the header value
pub const DEFAULT_HEADER_PREFIX: &str = "Bearer ";

/// Claims managed by the codec that cannot double as the identity claim
const RESERVED_CLAIMS: [&str; 3] = ["exp", "nbf", "iat"];

/// Configuration for issuing and validating tokens
///
/// Cloning is cheap: the signing key sits behind an `Arc`.
#[derive(Clone)]
pub struct Config {
    signing_key: Arc<[u8]>,
    time_to_live: Duration,
    identity_claim: String,
    header: String,
    header_prefix: String,
    leeway_seconds: u64,
    require_identity: bool,
}

impl Config {
    /// Create a configuration with the given HMAC signing key and defaults
    /// for everything else
    pub fn new(signing_key: impl AsRef<[u8]>) -> Result<Self> {
        Self::builder(signing_key).build()
    }

    /// Start building a configuration around the given HMAC signing key
    pub fn builder(signing_key: impl AsRef<[u8]>) -> ConfigBuilder {
        ConfigBuilder {
            config: Self {
                signing_key: signing_key.as_ref().into(),
                time_to_live: DEFAULT_TIME_TO_LIVE,
                identity_claim: DEFAULT_IDENTITY_CLAIM.to_string(),
                header: DEFAULT_HEADER.to_string(),
                header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
                leeway_seconds: 0,
                require_identity: true,
            },
        }
    }

    /// Secret used to compute and verify HMAC signatures
    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Lifetime of issued tokens
    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Claim name carrying the identity
    pub fn identity_claim(&self) -> &str {
        &self.identity_claim
    }

    /// Request header carrying the token
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Prefix stripped from the header value
    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    /// Leeway in seconds applied to `exp`, `nbf` and `iat`
    pub fn leeway(&self) -> u64 {
        self.leeway_seconds
    }

    /// Whether validation rejects tokens without a non-null identity
    pub fn require_identity(&self) -> bool {
        self.require_identity
    }

    fn check(&self) -> Result<()> {
        if self.signing_key.is_empty() {
            return Err(invalid("signing key must not be empty"));
        }

        if self.time_to_live.as_secs() == 0 {
            return Err(invalid("time to live must be at least one second"));
        }
        if self.time_to_live > MAX_TIME_TO_LIVE {
            return Err(invalid(format!(
                "time to live too large: {}s (maximum: {}s)",
                self.time_to_live.as_secs(),
                MAX_TIME_TO_LIVE.as_secs()
            )));
        }

        if self.identity_claim.is_empty() {
            return Err(invalid("identity claim must not be empty"));
        }
        if RESERVED_CLAIMS.contains(&self.identity_claim.as_str()) {
            return Err(invalid(format!(
                "identity claim '{}' collides with a reserved claim",
                self.identity_claim
            )));
        }

        http::HeaderName::from_bytes(self.header.as_bytes())
            .map_err(|_| invalid(format!("'{}' is not a valid header name", self.header)))?;

        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(invalid(format!(
                "leeway too large: {}s (maximum: {}s)",
                self.leeway_seconds, MAX_LEEWAY_SECONDS
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("signing_key", &"<redacted>")
            .field("time_to_live", &self.time_to_live)
            .field("identity_claim", &self.identity_claim)
            .field("header", &self.header)
            .field("header_prefix", &self.header_prefix)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("require_identity", &self.require_identity)
            .finish()
    }
}

/// Builder for [`Config`]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set how long issued tokens stay valid
    ///
    /// # Security
    /// Must be between one second and one year.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.config.time_to_live = ttl;
        self
    }

    /// Set the claim name carrying the identity
    pub fn identity_claim(mut self, claim: impl Into<String>) -> Self {
        self.config.identity_claim = claim.into();
        self
    }

    /// Set the request header carrying the token
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.config.header = header.into();
        self
    }

    /// Set the prefix stripped from the header value
    pub fn header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.header_prefix = prefix.into();
        self
    }

    /// Set leeway tolerance for `exp`, `nbf` and `iat`
    ///
    /// # Security
    /// Leeway is limited to prevent effectively disabling expiration checks.
    /// Maximum allowed value is 300 seconds (5 minutes).
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.config.leeway_seconds = seconds;
        self
    }

    /// Whether a validated token must carry a non-null identity
    ///
    /// Enabled by default. When disabled, a token without the identity claim
    /// validates and yields `Value::Null`.
    pub fn require_identity(mut self, required: bool) -> Self {
        self.config.require_identity = required;
        self
    }

    /// Validate bounds and produce the configuration
    ///
    /// # Errors
    /// Returns `Error::ConfigurationInvalid` for an empty signing key, a time
    /// to live outside one second to one year, an empty or reserved identity
    /// claim, an invalid header name, or leeway above 300 seconds.
    pub fn build(self) -> Result<Config> {
        self.config.check()?;
        Ok(self.config)
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::ConfigurationInvalid(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(b"secret").unwrap();
        assert_eq!(config.signing_key(), b"secret");
        assert_eq!(config.time_to_live(), Duration::from_secs(259_200));
        assert_eq!(config.identity_claim(), "id");
        assert_eq!(config.header(), "Authorization");
        assert_eq!(config.header_prefix(), "Bearer ");
        assert_eq!(config.leeway(), 0);
        assert!(config.require_identity());
    }

    #[test]
    fn test_builder() {
        let config = Config::builder("secret")
            .time_to_live(Duration::from_secs(60))
            .identity_claim("user")
            .header("X-Auth-Token")
            .header_prefix("Token ")
            .leeway(30)
            .require_identity(false)
            .build()
            .unwrap();

        assert_eq!(config.time_to_live(), Duration::from_secs(60));
        assert_eq!(config.identity_claim(), "user");
        assert_eq!(config.header(), "X-Auth-Token");
        assert_eq!(config.header_prefix(), "Token ");
        assert_eq!(config.leeway(), 30);
        assert!(!config.require_identity());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            Config::new(b""),
            Err(Error::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_ttl_bounds() {
        let result = Config::builder("secret")
            .time_to_live(Duration::from_millis(500))
            .build();
        assert!(matches!(result, Err(Error::ConfigurationInvalid(_))));

        let result = Config::builder("secret")
            .time_to_live(Duration::from_secs(86400 * 366))
            .build();
        assert!(matches!(result, Err(Error::ConfigurationInvalid(_))));

        let result = Config::builder("secret")
            .time_to_live(MAX_TIME_TO_LIVE)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_identity_claim_rejected() {
        for claim in ["", "exp", "nbf", "iat"] {
            let result = Config::builder("secret").identity_claim(claim).build();
            assert!(
                matches!(result, Err(Error::ConfigurationInvalid(_))),
                "identity claim {claim:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_header_name() {
        let result = Config::builder("secret").header("Bad Header").build();
        assert!(matches!(result, Err(Error::ConfigurationInvalid(_))));

        let result = Config::builder("secret").header("").build();
        assert!(matches!(result, Err(Error::ConfigurationInvalid(_))));
    }

    #[test]
    fn test_leeway_bound() {
        assert!(Config::builder("secret").leeway(300).build().is_ok());
        assert!(matches!(
            Config::builder("secret").leeway(301).build(),
            Err(Error::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", Config::new("super-secret-key").unwrap());
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
