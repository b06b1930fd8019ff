//! Password-sealed blob framing
//!
//! Blob layout, with no version field:
//! [16 bytes: salt][12 bytes: nonce][N bytes: ciphertext][16 bytes: tag]
//!
//! Every seal draws a new salt, so every blob is encrypted under its own
//! key and a nonce is never reused for a key.

use rand::rngs::OsRng;
use rand::RngCore;

use super::{aes, kdf, SecureBytes, NONCE_LEN, SALT_LEN};
use crate::error::{BackupError, Result};

/// Salt and nonce prefix; anything shorter cannot be a blob
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Encrypt `plaintext` under `password` into a self-describing blob
pub fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let derived = kdf::derive_key(password.as_bytes(), &salt);
    let (nonce, ciphertext) = aes::encrypt(&derived.key, plaintext)?;

    let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`]
///
/// Blobs shorter than [`HEADER_LEN`] are rejected before any key
/// derivation. A truncated tag, a wrong password and corrupted bytes all
/// surface as `AuthenticationFailed`.
pub fn open(blob: &[u8], password: &str) -> Result<SecureBytes> {
    let (salt, nonce, ciphertext) = split(blob)?;
    let derived = kdf::derive_key(password.as_bytes(), salt);
    aes::decrypt(&derived.key, nonce, ciphertext)
}

fn split(blob: &[u8]) -> Result<(&[u8; SALT_LEN], &[u8; NONCE_LEN], &[u8])> {
    if blob.len() < HEADER_LEN {
        return Err(BackupError::MalformedBlob {
            len: blob.len(),
            min: HEADER_LEN,
        });
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    // Lengths were checked above, so the conversions cannot fail.
    let salt = salt.try_into().map_err(|_| BackupError::MalformedBlob {
        len: blob.len(),
        min: HEADER_LEN,
    })?;
    let nonce = nonce.try_into().map_err(|_| BackupError::MalformedBlob {
        len: blob.len(),
        min: HEADER_LEN,
    })?;

    Ok((salt, nonce, ciphertext))
}
