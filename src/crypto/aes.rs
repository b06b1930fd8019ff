//! AES-256-GCM authenticated encryption
//!
//! No associated data is used. The 16-byte tag is appended to the
//! ciphertext by the AEAD construction.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use super::SecureBytes;
use crate::error::{BackupError, Result};

/// Nonce length for AES-GCM (96 bits)
pub const NONCE_LEN: usize = 12;

/// Authentication tag length (128 bits)
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under a 32-byte key with a fresh random nonce
///
/// Returns `(nonce, ciphertext)`; the ciphertext carries the tag.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| BackupError::EncryptionFailed(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| BackupError::EncryptionFailed(e.to_string()))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and verify `ciphertext`
///
/// Any verification failure is reported as `AuthenticationFailed`; no
/// plaintext is released unless the tag checks out.
pub fn decrypt(key: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<SecureBytes> {
    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| BackupError::AuthenticationFailed)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| BackupError::AuthenticationFailed)?;

    Ok(SecureBytes::new(plaintext))
}
