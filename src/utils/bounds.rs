//! Bounds validation utilities
//!
//! Overflow-checked timestamp arithmetic and header field size checks.

use crate::error::{Error, Result};

/// Apply leeway to a timestamp with overflow protection
pub(crate) fn apply_leeway(timestamp: i64, leeway_seconds: u64, add: bool) -> Result<i64> {
    let leeway = i64::try_from(leeway_seconds).map_err(|_| Error::TimestampOverflow)?;
    if add {
        timestamp.checked_add(leeway)
    } else {
        timestamp.checked_sub(leeway)
    }
    .ok_or(Error::TimestampOverflow)
}

/// Validate string field size
pub(crate) fn validate_field_size(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::HeaderFieldTooLong {
            field: field.into(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_leeway() {
        assert_eq!(apply_leeway(100, 10, true).unwrap(), 110);
        assert_eq!(apply_leeway(100, 10, false).unwrap(), 90);
        assert_eq!(apply_leeway(100, 0, true).unwrap(), 100);
    }

    #[test]
    fn test_apply_leeway_overflow() {
        assert_eq!(apply_leeway(i64::MAX, 1, true), Err(Error::TimestampOverflow));
        assert_eq!(apply_leeway(i64::MIN, 1, false), Err(Error::TimestampOverflow));
        assert_eq!(apply_leeway(0, u64::MAX, true), Err(Error::TimestampOverflow));
    }

    #[test]
    fn test_validate_field_size() {
        assert!(validate_field_size("alg", "HS256", 16).is_ok());
        assert!(matches!(
            validate_field_size("alg", &"A".repeat(17), 16),
            Err(Error::HeaderFieldTooLong { length: 17, .. })
        ));
    }
}
