//! Environment-sourced settings, validated once at startup

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::{BackupError, Result};

/// Backup directory used when `BACKUP_DIR` is unset
pub const DEFAULT_BACKUP_DIR: &str = "/mnt/backups";

/// Upper bound for `RETENTION_DAYS` (100 years)
pub const MAX_RETENTION_DAYS: u32 = 36_500;

const REQUIRED_VARS: [&str; 7] = [
    "DB_HOST",
    "DB_PORT",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "RETENTION_DAYS",
    "ENCRYPTION_PASSWORD",
];

/// Connection settings handed to pg_dump
#[derive(Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
}

/// Process-wide settings for backup and cleanup runs
#[derive(Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub backup_dir: PathBuf,
    pub retention_days: u32,
    pub encryption_password: SecretString,
}

impl Config {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(BackupError::MissingConfig(missing));
        }

        let require =
            |key: &'static str| get(key).ok_or_else(|| BackupError::MissingConfig(vec![key]));

        let port = require("DB_PORT")?;
        let port: u16 = port.trim().parse().map_err(|_| {
            BackupError::InvalidConfig(format!("DB_PORT must be a port number, got '{}'", port))
        })?;

        let retention = require("RETENTION_DAYS")?;
        let retention_days: u32 = retention.trim().parse().map_err(|_| {
            BackupError::InvalidConfig(format!(
                "RETENTION_DAYS must be a non-negative whole number of days, got '{}'",
                retention
            ))
        })?;
        if retention_days > MAX_RETENTION_DAYS {
            return Err(BackupError::InvalidConfig(format!(
                "RETENTION_DAYS must be at most {}, got {}",
                MAX_RETENTION_DAYS, retention_days
            )));
        }

        let backup_dir = get("BACKUP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_DIR));

        Ok(Self {
            database: DatabaseConfig {
                host: require("DB_HOST")?,
                port,
                user: require("DB_USER")?,
                password: SecretString::new(require("DB_PASSWORD")?),
                name: require("DB_NAME")?,
            },
            backup_dir,
            retention_days,
            encryption_password: SecretString::new(require("ENCRYPTION_PASSWORD")?),
        })
    }

    /// Fail before any dump is taken if the backup directory is unusable
    pub fn ensure_backup_dir(&self) -> Result<()> {
        if self.backup_dir.is_dir() {
            Ok(())
        } else {
            Err(BackupError::InvalidConfig(format!(
                "backup directory '{}' does not exist",
                self.backup_dir.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        [
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "5432"),
            ("DB_USER", "bica"),
            ("DB_PASSWORD", "db-secret"),
            ("DB_NAME", "bica_prod"),
            ("RETENTION_DAYS", "7"),
            ("ENCRYPTION_PASSWORD", "correct-horse"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_loads_complete_environment() {
        let config = load(&full_env()).unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.password.expose_secret(), "db-secret");
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.backup_dir, PathBuf::from(DEFAULT_BACKUP_DIR));
        assert_eq!(config.encryption_password.expose_secret(), "correct-horse");
    }

    #[test]
    fn test_backup_dir_override() {
        let mut env = full_env();
        env.insert("BACKUP_DIR", "/srv/backups".to_string());

        let config = load(&env).unwrap();
        assert_eq!(config.backup_dir, PathBuf::from("/srv/backups"));
    }

    #[test]
    fn test_reports_every_missing_variable() {
        let mut env = full_env();
        env.remove("DB_HOST");
        env.insert("ENCRYPTION_PASSWORD", "  ".to_string());

        match load(&env) {
            Err(BackupError::MissingConfig(missing)) => {
                assert_eq!(missing, vec!["DB_HOST", "ENCRYPTION_PASSWORD"]);
            }
            other => panic!("expected MissingConfig, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let mut env = full_env();
        env.insert("RETENTION_DAYS", "-3".to_string());
        assert!(matches!(load(&env), Err(BackupError::InvalidConfig(_))));

        let mut env = full_env();
        env.insert("DB_PORT", "postgres".to_string());
        assert!(matches!(load(&env), Err(BackupError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_out_of_range_retention() {
        let mut env = full_env();
        env.insert("RETENTION_DAYS", "100000000".to_string());
        assert!(matches!(load(&env), Err(BackupError::InvalidConfig(_))));

        let mut env = full_env();
        env.insert("RETENTION_DAYS", MAX_RETENTION_DAYS.to_string());
        assert_eq!(load(&env).unwrap().retention_days, MAX_RETENTION_DAYS);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = load(&full_env()).unwrap();
        let printed = format!("{:?}", config);

        assert!(!printed.contains("db-secret"));
        assert!(!printed.contains("correct-horse"));
    }

    #[test]
    fn test_missing_backup_dir_is_rejected() {
        let mut env = full_env();
        env.insert("BACKUP_DIR", "/nonexistent/bica/backups".to_string());

        let config = load(&env).unwrap();
        assert!(matches!(
            config.ensure_backup_dir(),
            Err(BackupError::InvalidConfig(_))
        ));
    }
}
