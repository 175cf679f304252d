//! Claims carried by a token
//!
//! Issuance writes exactly two claims, the configured identity claim and
//! `exp`. Decoding keeps every claim the payload carries so applications can
//! read extra ones written by other issuers sharing the key.

mod validator;

pub(crate) use validator::{current_timestamp, validate_temporal};

use crate::error::{Error, Result};
use miniserde::json::{Number, Object, Value};
use miniserde::ser::{Fragment, Map, Serialize};
use std::borrow::Cow;

/// Claims decoded from a verified token
///
/// An ordered mapping from claim names to JSON values.
#[derive(Debug, Clone)]
pub struct Claims {
    inner: Object,
}

impl Claims {
    /// Get a claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    /// Expiration Time (exp) as Unix timestamp
    pub fn expiration(&self) -> Option<i64> {
        self.numeric_date("exp").ok().flatten()
    }

    /// Not Before (nbf) as Unix timestamp
    pub fn not_before(&self) -> Option<i64> {
        self.numeric_date("nbf").ok().flatten()
    }

    /// Issued At (iat) as Unix timestamp
    pub fn issued_at(&self) -> Option<i64> {
        self.numeric_date("iat").ok().flatten()
    }

    /// Iterate over all claims in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.inner.iter()
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the payload carried no claims at all
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Consume into the underlying JSON object
    pub fn into_object(self) -> Object {
        self.inner
    }

    /// Remove a claim, returning its value
    pub(crate) fn take(&mut self, name: &str) -> Option<Value> {
        self.inner.remove(name)
    }

    /// Read a NumericDate claim (RFC 7519 Section 2)
    ///
    /// Fractional values are truncated toward zero.
    pub(crate) fn numeric_date(&self, name: &str) -> Result<Option<i64>> {
        let Some(value) = self.inner.get(name) else {
            return Ok(None);
        };

        let invalid = || Error::TokenInvalidClaim(format!("'{name}' must be a numeric date"));
        let timestamp = match value {
            Value::Number(Number::I64(n)) => *n,
            Value::Number(Number::U64(n)) => i64::try_from(*n).map_err(|_| invalid())?,
            Value::Number(Number::F64(f)) => {
                if !f.is_finite() || *f < i64::MIN as f64 || *f >= i64::MAX as f64 {
                    return Err(invalid());
                }
                f.trunc() as i64
            }
            _ => return Err(invalid()),
        };

        Ok(Some(timestamp))
    }
}

impl From<Object> for Claims {
    fn from(inner: Object) -> Self {
        Self { inner }
    }
}

/// Claims written on issuance
///
/// Serialized as `{"<identity_claim>": identity, "exp": expiration}`
/// without first converting the identity into a `Value`.
pub(crate) struct IssuedClaims<'a> {
    pub identity_claim: &'a str,
    pub identity: &'a dyn Serialize,
    pub expiration: i64,
}

impl Serialize for IssuedClaims<'_> {
    fn begin(&self) -> Fragment<'_> {
        Fragment::Map(Box::new(IssuedClaimsStream {
            claims: self,
            state: 0,
        }))
    }
}

struct IssuedClaimsStream<'a> {
    claims: &'a IssuedClaims<'a>,
    state: u8,
}

impl Map for IssuedClaimsStream<'_> {
    fn next(&mut self) -> Option<(Cow<'_, str>, &dyn Serialize)> {
        let claims = self.claims;
        let entry: (Cow<'_, str>, &dyn Serialize) = match self.state {
            0 => (Cow::Borrowed(claims.identity_claim), claims.identity),
            1 => (Cow::Borrowed("exp"), &claims.expiration),
            _ => return None,
        };
        self.state += 1;
        Some(entry)
    }
}
