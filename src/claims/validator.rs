use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::utils::bounds::apply_leeway;
use std::time::{SystemTime, UNIX_EPOCH};

/// Validate temporal claims at `now`
///
/// `exp` is mandatory. `nbf` and `iat` are checked only when present.
pub(crate) fn validate_temporal(claims: &Claims, leeway: u64, now: i64) -> Result<()> {
    // Validate expiration with checked arithmetic
    let exp = claims
        .numeric_date("exp")?
        .ok_or_else(|| Error::TokenMissingClaim("exp".into()))?;
    let exp_with_leeway = apply_leeway(exp, leeway, true)?;
    if now >= exp_with_leeway {
        return Err(Error::TokenExpired {
            expired_at: exp,
            now,
            leeway,
        });
    }

    // Validate not-before with checked arithmetic
    if let Some(nbf) = claims.numeric_date("nbf")? {
        let nbf_with_leeway = apply_leeway(nbf, leeway, false)?;
        if now < nbf_with_leeway {
            return Err(Error::TokenNotYetValid {
                not_before: nbf,
                now,
                leeway,
            });
        }
    }

    // Validate issued-at with checked arithmetic
    if let Some(iat) = claims.numeric_date("iat")? {
        let now_with_leeway = apply_leeway(now, leeway, true)?;
        if iat > now_with_leeway {
            return Err(Error::TokenIssuedInFuture {
                issued_at: iat,
                now,
                leeway,
            });
        }
    }

    Ok(())
}

/// Get current Unix timestamp
pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_secs() as i64
}
