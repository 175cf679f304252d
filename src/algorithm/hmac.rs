use super::AlgorithmType;
use crate::error::{Error, Result};

use constant_time_eq::constant_time_eq;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// Compute the raw MAC over `message`
pub(super) fn compute(
    algorithm: AlgorithmType,
    secret: &[u8],
    message: &[u8],
) -> std::result::Result<Vec<u8>, InvalidLength> {
    let mac = match algorithm {
        AlgorithmType::HS256 => mac_with::<Hmac<Sha256>>(secret, message)?,
        AlgorithmType::HS384 => mac_with::<Hmac<Sha384>>(secret, message)?,
        AlgorithmType::HS512 => mac_with::<Hmac<Sha512>>(secret, message)?,
    };
    Ok(mac)
}

/// Verify `provided` against the MAC over `message` with constant-time comparison
pub(super) fn verify(
    algorithm: AlgorithmType,
    secret: &[u8],
    message: &[u8],
    provided: &[u8],
) -> Result<()> {
    let expected = compute(algorithm, secret, message).map_err(|_| Error::SignatureInvalid)?;

    if provided.len() != expected.len() {
        return Err(Error::SignatureInvalid);
    }

    if constant_time_eq(provided, &expected) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid)
    }
}

fn mac_with<M: Mac + hmac::digest::KeyInit>(
    secret: &[u8],
    message: &[u8],
) -> std::result::Result<Vec<u8>, InvalidLength> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(secret)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
