//! Size limit constants for input validation

use std::time::Duration;

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded JWT header JSON (8KB)
/// Headers are typically small (< 1KB), but we allow reasonable margin
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes
/// HS512 produces the largest MAC at 64 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 64;

/// Maximum size for Base64URL-encoded signature string (1.5KB)
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1536;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for algorithm (alg) field in JWT header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

// ============================================================================
// Configuration bounds
// ============================================================================

/// Maximum leeway applied to temporal claims (300 seconds = 5 minutes)
/// Prevents leeway from effectively disabling expiration checks
pub(crate) const MAX_LEEWAY_SECONDS: u64 = 300;

/// Maximum token lifetime (1 year)
pub(crate) const MAX_TIME_TO_LIVE: Duration = Duration::from_secs(86400 * 365);

/// Upper bound on entries held by the in-memory revocation list
pub(crate) const MAX_REVOCATION_ENTRIES: u64 = 100_000;

/// Longest a revocation can be held: the longest lifetime plus the widest leeway
pub(crate) const MAX_REVOCATION_RETENTION: Duration =
    Duration::from_secs(MAX_TIME_TO_LIVE.as_secs() + MAX_LEEWAY_SECONDS);
