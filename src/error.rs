use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pg_dump failed ({status}): {stderr}")]
    DumpFailed { status: String, stderr: String },

    #[error("Encrypted blob is malformed: {len} bytes, at least {min} required")]
    MalformedBlob { len: usize, min: usize },

    #[error("Decryption failed: wrong password or corrupted backup")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid backup container: {0}")]
    InvalidContainer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
