//! # jwtgate - HMAC identity tokens for HTTP authentication
//!
//! **jwtgate** issues compact signed tokens that carry one application-defined
//! identity value and an expiration time, and validates them again when they
//! come back in a request header.
//!
//! ## Overview
//!
//! A token is a standard JWS compact string (`header.payload.signature`),
//! signed with HMAC-SHA256 under a shared key. The payload holds two claims:
//! the configured identity claim (default `"id"`) and `exp`. Tokens are
//! interoperable with any JWT library holding the same key.
//!
//! Validation runs in a fixed order:
//!
//! ```text
//! header value
//!     │ extract_token        strip the configured prefix ("Bearer ")
//!     ▼
//! raw token
//!     │ RevocationStore      revoked tokens stop here, before any crypto
//!     ▼
//! decode
//!     │ structure            size limits, three base64url segments, JSON
//!     │ algorithm            HS256, HS384 or HS512 only
//!     │ temporal claims      exp (required), nbf and iat (when present)
//!     │ signature            constant-time HMAC comparison
//!     ▼
//! identity (miniserde::json::Value or any miniserde::Deserialize)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use jwtgate::{Authenticator, Config};
//! use std::time::Duration;
//!
//! let config = Config::builder(b"your-256-bit-secret")
//!     .time_to_live(Duration::from_secs(3600))
//!     .build()
//!     .unwrap();
//! let auth = Authenticator::new(config);
//!
//! let token = auth.issue(&"user-42".to_string()).unwrap();
//! let header = format!("Bearer {token}");
//!
//! let identity = auth.validate_header_value(&header).unwrap();
//! assert_eq!(miniserde::json::to_string(&identity), r#""user-42""#);
//! ```
//!
//! The free functions [`encode`], [`decode`], [`extract_token`] and
//! [`validate_token`] take the configuration and revocation store explicitly
//! for callers that do not want the [`Authenticator`] handle.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! The declared algorithm must belong to the HMAC family and never selects
//! the key. `none`, its case variants and every asymmetric algorithm are
//! rejected with [`Error::AlgorithmUnexpected`].
//!
//! ### Fail-Closed Revocation
//!
//! A revocation store that cannot answer makes validation fail. Its error is
//! returned as-is and never read as "not revoked".
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate, preventing timing-based key recovery attacks.
//!
//! ### Error Messages
//!
//! Errors describe which check failed but never contain the token. Map them
//! to a generic unauthorized response at the HTTP boundary.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725): JSON Web Signature Best Practices

mod error;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod authenticator;
pub(crate) mod claims;
pub(crate) mod codec;
pub(crate) mod config;
pub(crate) mod extractor;
pub(crate) mod header;
pub(crate) mod limits;
pub(crate) mod revocation;
pub(crate) mod utils;
pub(crate) mod validator;

// Public Interface
pub use authenticator::Authenticator;
pub use claims::Claims;
pub use codec::{decode, encode};
pub use config::{
    Config, ConfigBuilder, DEFAULT_HEADER, DEFAULT_HEADER_PREFIX, DEFAULT_IDENTITY_CLAIM,
    DEFAULT_TIME_TO_LIVE,
};
pub use error::{Error, Result};
pub use extractor::{extract_from_headers, extract_token};
pub use revocation::{MemoryRevocationList, RevocationStore};
pub use validator::{
    validate_from_header_value, validate_from_headers, validate_token, validate_token_as,
};

pub use miniserde::json::Value;
