//! Revocation lookups
//!
//! Validation asks a [`RevocationStore`] about the raw token string before
//! any cryptographic work. Store failures are errors, never "not revoked".

use crate::claims::current_timestamp;
use crate::codec::peek_expiration;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::limits::{MAX_REVOCATION_ENTRIES, MAX_REVOCATION_RETENTION};
use moka::Expiry;
use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Answers whether a raw token string has been revoked
///
/// Implementations backed by external storage report failures as
/// `Error::RevocationStoreFailed`. Any closure `Fn(&str) -> Result<bool>`
/// is a store.
///
/// # Example
///
/// ```
/// use jwtgate::RevocationStore;
///
/// let store = |token: &str| -> jwtgate::Result<bool> { Ok(token.ends_with(".revoked")) };
/// assert_eq!(store.is_revoked("a.b.revoked"), Ok(true));
/// ```
pub trait RevocationStore {
    /// Whether `token` is revoked
    fn is_revoked(&self, token: &str) -> Result<bool>;
}

impl<F> RevocationStore for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn is_revoked(&self, token: &str) -> Result<bool> {
        self(token)
    }
}

/// In-memory revocation list
///
/// Entries are keyed by the SHA-256 digest of the token, so the list never
/// holds usable credentials. Each entry lives until its own token's `exp`
/// plus the configured leeway and is never evicted before then. When the
/// list is full, [`revoke`](Self::revoke) fails instead of dropping entries.
/// Cloning shares the underlying list.
#[derive(Clone)]
pub struct MemoryRevocationList {
    entries: Cache<[u8; 32], Duration>,
    leeway: u64,
    max_entries: u64,
}

/// Expires each entry after the retention stored alongside it
struct UntilTokenExpiry;

impl Expiry<[u8; 32], Duration> for UntilTokenExpiry {
    fn expire_after_create(
        &self,
        _key: &[u8; 32],
        retention: &Duration,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(*retention)
    }
}

impl MemoryRevocationList {
    /// Create a list using the leeway of `config`
    pub fn new(config: &Config) -> Self {
        Self::with_capacity(config, MAX_REVOCATION_ENTRIES)
    }

    /// Create a list holding at most `max_entries` live revocations
    pub fn with_capacity(config: &Config, max_entries: u64) -> Self {
        let entries = Cache::builder().expire_after(UntilTokenExpiry).build();

        Self {
            entries,
            leeway: config.leeway(),
            max_entries,
        }
    }

    /// Revoke `token` until it would have expired anyway
    ///
    /// Tokens already past `exp` plus leeway are accepted and not stored.
    ///
    /// # Errors
    /// * the decoding error when `token` is malformed or carries no usable `exp`
    /// * `RevocationStoreFailed` when the list is full or the token expires
    ///   further out than any revocation can be held
    pub fn revoke(&self, token: &str) -> Result<()> {
        self.revoke_at(token, current_timestamp())
    }

    pub(crate) fn revoke_at(&self, token: &str, now: i64) -> Result<()> {
        let expires_at = peek_expiration(token)?.saturating_add_unsigned(self.leeway);
        let Ok(remaining) = u64::try_from(expires_at.saturating_sub(now)) else {
            return Ok(());
        };
        if remaining == 0 {
            return Ok(());
        }

        let retention = Duration::from_secs(remaining);
        if retention > MAX_REVOCATION_RETENTION {
            return Err(Error::RevocationStoreFailed(format!(
                "token outlives the revocation list: expires in {remaining}s (maximum: {}s)",
                MAX_REVOCATION_RETENTION.as_secs()
            )));
        }

        let key = fingerprint(token);
        if self.entries.contains_key(&key) {
            return Ok(());
        }

        // Settle pending expirations so the count is current
        self.entries.run_pending_tasks();
        if self.entries.entry_count() >= self.max_entries {
            return Err(Error::RevocationStoreFailed(format!(
                "revocation list is full ({} entries)",
                self.max_entries
            )));
        }

        self.entries.insert(key, retention);
        Ok(())
    }
}

impl RevocationStore for MemoryRevocationList {
    fn is_revoked(&self, token: &str) -> Result<bool> {
        Ok(self.entries.contains_key(&fingerprint(token)))
    }
}

impl std::fmt::Debug for MemoryRevocationList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRevocationList")
            .field("entries", &self.entries.entry_count())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

fn fingerprint(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}
