//! PBKDF2-HMAC-SHA256 key derivation
//!
//! Turns the backup password and a per-backup salt into an AES-256 key.
//! The parameters are part of the on-disk format: changing them makes
//! existing backups undecryptable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::SecureBytes;

/// Salt length in bytes (128 bits)
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (256 bits for AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const ITERATIONS: u32 = 100_000;

/// A key derived from a password, zeroed when dropped
pub struct DerivedKey {
    pub key: SecureBytes,
}

/// Derive an encryption key from `password` and `salt`
///
/// Pure and deterministic: the same inputs always give the same key.
/// The salt length is enforced by its type.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key_bytes = vec![0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, ITERATIONS, &mut key_bytes);

    DerivedKey {
        key: SecureBytes::locked(key_bytes),
    }
}
