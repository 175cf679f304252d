//! Unpadded Base64URL (RFC 4648 Section 5) for token segments
//!
//! Decoding takes a limit on the decoded size and checks it against the
//! encoded length first, so oversized segments are refused without
//! allocating.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to an unpadded Base64URL string
pub(crate) fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decoded length of `encoded_len` unpadded Base64URL characters
const fn decoded_len(encoded_len: usize) -> usize {
    encoded_len / 4 * 3 + encoded_len % 4 * 3 / 4
}

/// Decode a segment holding at most `max_size` bytes
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let size = decoded_len(input.len());
    if size > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "segment decodes to {size} bytes (maximum: {max_size} bytes)"
        )));
    }

    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(e.to_string()))
}

/// Decode a segment holding at most `max_size` bytes of UTF-8
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String> {
    let bytes = decode_bytes(input, max_size)?;
    String::from_utf8(bytes).map_err(|e| Error::FormatInvalidBase64(format!("invalid UTF-8: {e}")))
}
