//! Bearer token extraction from request headers

use crate::config::Config;
use crate::error::{Error, Result};
use http::HeaderMap;

/// Strip the configured prefix from a raw header value
///
/// The remainder is returned unchanged, without trimming or any check of its
/// content.
///
/// # Example
///
/// ```
/// use jwtgate::{Config, extract_token};
///
/// let config = Config::new(b"secret").unwrap();
/// assert_eq!(extract_token("Bearer abc.def.ghi", &config).unwrap(), "abc.def.ghi");
/// assert!(extract_token("abc.def.ghi", &config).is_err());
/// ```
pub fn extract_token<'a>(header_value: &'a str, config: &Config) -> Result<&'a str> {
    header_value
        .strip_prefix(config.header_prefix())
        .ok_or(Error::TokenNotFound)
}

/// Find the configured header in `headers` and extract the token from it
///
/// A missing header, or one whose value is not visible ASCII, yields
/// `Error::TokenNotFound`. Only the first value is considered when the header
/// repeats.
pub fn extract_from_headers<'a>(headers: &'a HeaderMap, config: &Config) -> Result<&'a str> {
    let value = headers
        .get(config.header())
        .ok_or(Error::TokenNotFound)?
        .to_str()
        .map_err(|_| Error::TokenNotFound)?;

    extract_token(value, config)
}
