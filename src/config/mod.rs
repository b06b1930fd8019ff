//! Configuration management for bica-backup
//!
//! Settings are read from the environment once, in `main`, and passed
//! down by reference.

mod settings;

pub use settings::{Config, DatabaseConfig, DEFAULT_BACKUP_DIR, MAX_RETENTION_DAYS};
