//! bica-backup - encrypted, retention-managed PostgreSQL backups
//!
//! Each backup is a `pg_dump` export sealed with AES-256-GCM under a key
//! derived from a password (PBKDF2-HMAC-SHA256), stored as the single entry
//! of a `bica-backup-YYYY-MM-DD_HHMM.tar.gz` archive. Old archives are
//! pruned by the date in their name.

pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod restore;

pub use error::{BackupError, Result};
