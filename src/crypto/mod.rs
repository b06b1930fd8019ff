//! Cryptographic primitives for bica-backup
//!
//! - PBKDF2-HMAC-SHA256 for password-based key derivation
//! - AES-256-GCM for authenticated encryption
//! - salt‖nonce‖ciphertext framing of sealed backups
//! - Secure memory handling with automatic zeroing

mod aes;
mod envelope;
mod kdf;
mod secure_bytes;

pub use aes::{decrypt, encrypt, NONCE_LEN, TAG_LEN};
pub use envelope::{open, seal, HEADER_LEN};
pub use kdf::{derive_key, DerivedKey, ITERATIONS, KEY_LEN, SALT_LEN};
pub use secure_bytes::SecureBytes;
