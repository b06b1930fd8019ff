//! Database export collaborator

use std::ffi::OsString;
use std::process::{Command, Stdio};

use secrecy::ExposeSecret;

use crate::config::DatabaseConfig;
use crate::crypto::SecureBytes;
use crate::error::{BackupError, Result};

/// Something that can produce a plaintext database export
pub trait DumpSource {
    fn produce_dump(&self) -> Result<SecureBytes>;
}

/// Runs `pg_dump` as a blocking child process and captures its stdout
pub struct PgDump<'a> {
    database: &'a DatabaseConfig,
    program: OsString,
}

impl<'a> PgDump<'a> {
    pub fn new(database: &'a DatabaseConfig) -> Self {
        Self {
            database,
            program: OsString::from("pg_dump"),
        }
    }

    #[cfg(test)]
    fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> Command {
        let db = self.database;
        let mut cmd = Command::new(&self.program);
        cmd.arg("-h")
            .arg(&db.host)
            .arg("-p")
            .arg(db.port.to_string())
            .arg("-U")
            .arg(&db.user)
            .arg("-d")
            .arg(&db.name)
            .args(["--column-inserts", "--no-owner", "--no-privileges"])
            .env("PGPASSWORD", db.password.expose_secret())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl DumpSource for PgDump<'_> {
    fn produce_dump(&self) -> Result<SecureBytes> {
        tracing::debug!(
            host = %self.database.host,
            port = self.database.port,
            database = %self.database.name,
            "running pg_dump"
        );

        let output = self.command().output()?;

        if !output.status.success() {
            return Err(BackupError::DumpFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(bytes = output.stdout.len(), "pg_dump finished");
        Ok(SecureBytes::new(output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::ffi::OsStr;

    fn database() -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "bica".to_string(),
            password: SecretString::new("db-secret".to_string()),
            name: "bica_prod".to_string(),
        }
    }

    #[test]
    fn test_command_line() {
        let db = database();
        let cmd = PgDump::new(&db).command();

        assert_eq!(cmd.get_program(), "pg_dump");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(
            args,
            [
                "-h",
                "db.internal",
                "-p",
                "6543",
                "-U",
                "bica",
                "-d",
                "bica_prod",
                "--column-inserts",
                "--no-owner",
                "--no-privileges"
            ]
        );
    }

    #[test]
    fn test_password_only_in_child_environment() {
        let db = database();
        let cmd = PgDump::new(&db).command();

        let env: Vec<_> = cmd.get_envs().collect();
        assert_eq!(
            env,
            [(OsStr::new("PGPASSWORD"), Some(OsStr::new("db-secret")))]
        );
        assert!(!cmd.get_args().any(|arg| arg == "db-secret"));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let db = database();
        let result = PgDump::new(&db)
            .with_program("/nonexistent/pg_dump")
            .produce_dump();

        assert!(matches!(result, Err(BackupError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_dump_failure() {
        let db = database();
        let result = PgDump::new(&db).with_program("false").produce_dump();

        assert!(matches!(result, Err(BackupError::DumpFailed { .. })));
    }
}
