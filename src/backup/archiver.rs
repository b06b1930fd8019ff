//! Dump, seal and package one backup
//!
//! The archive is assembled in a hidden scratch file inside the backup
//! directory and renamed into place once complete. The scratch file is
//! deleted on drop, so an error at any step leaves nothing behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use secrecy::{ExposeSecret, SecretString};

use super::dump::DumpSource;
use super::naming;
use crate::crypto;
use crate::error::Result;

/// Scratch files start with a dot so retention never matches them
const SCRATCH_PREFIX: &str = ".bica-backup-";
const SCRATCH_SUFFIX: &str = ".partial";

pub struct Archiver<'a, D> {
    backup_dir: &'a Path,
    password: &'a SecretString,
    dump: D,
}

impl<'a, D: DumpSource> Archiver<'a, D> {
    pub fn new(backup_dir: &'a Path, password: &'a SecretString, dump: D) -> Self {
        Self {
            backup_dir,
            password,
            dump,
        }
    }

    /// Take a backup stamped with the current UTC time
    pub fn run_backup(&self) -> Result<PathBuf> {
        self.run_backup_at(Utc::now())
    }

    /// Take a backup stamped with `at`
    ///
    /// Returns the path of the new container. If the dump fails nothing is
    /// written.
    pub fn run_backup_at(&self, at: DateTime<Utc>) -> Result<PathBuf> {
        let base = naming::base_name(at);

        let plaintext = self.dump.produce_dump()?;
        let blob = crypto::seal(&plaintext, self.password.expose_secret())?;
        drop(plaintext);

        let path = write_container(self.backup_dir, &base, &blob, at)?;
        tracing::info!(path = %path.display(), bytes = blob.len(), "encrypted backup saved");
        Ok(path)
    }
}

/// Write `blob` as the single entry `<base>.sql` of `<dir>/<base>.tar.gz`
pub fn write_container(
    dir: &Path,
    base: &str,
    blob: &[u8],
    at: DateTime<Utc>,
) -> Result<PathBuf> {
    // tempfile creates the scratch file with mode 0600 on Unix.
    let mut scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(SCRATCH_SUFFIX)
        .tempfile_in(dir)?;

    {
        let encoder = GzEncoder::new(scratch.as_file_mut(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(blob.len() as u64);
        header.set_mode(0o600);
        header.set_mtime(at.timestamp().max(0) as u64);
        builder.append_data(&mut header, naming::entry_name(base), blob)?;

        builder.into_inner()?.finish()?;
    }
    scratch.as_file().sync_all()?;

    let path = dir.join(naming::container_name(base));
    scratch.persist(&path).map_err(|e| e.error)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecureBytes;
    use crate::error::BackupError;
    use crate::restore;
    use chrono::TimeZone;
    use std::fs;

    struct FakeDump(&'static [u8]);

    impl DumpSource for FakeDump {
        fn produce_dump(&self) -> Result<SecureBytes> {
            Ok(SecureBytes::new(self.0.to_vec()))
        }
    }

    struct FailingDump;

    impl DumpSource for FailingDump {
        fn produce_dump(&self) -> Result<SecureBytes> {
            Err(BackupError::DumpFailed {
                status: "exit status: 1".to_string(),
                stderr: "connection refused".to_string(),
            })
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 19, 3, 30, 12).unwrap()
    }

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_backup_creates_single_named_container() {
        let dir = tempfile::tempdir().unwrap();
        let password = SecretString::new("correct-horse".to_string());

        let path = Archiver::new(dir.path(), &password, FakeDump(b"SELECT 1;"))
            .run_backup_at(at())
            .unwrap();

        assert_eq!(path, dir.path().join("bica-backup-2024-01-19_0330.tar.gz"));
        assert_eq!(dir_names(dir.path()), ["bica-backup-2024-01-19_0330.tar.gz"]);

        let (entry, blob) = restore::read_container(&path).unwrap();
        assert_eq!(entry, "bica-backup-2024-01-19_0330.sql");
        assert_ne!(&blob[crypto::HEADER_LEN..], b"SELECT 1;");
        assert_eq!(&*crypto::open(&blob, "correct-horse").unwrap(), b"SELECT 1;");
    }

    #[test]
    fn test_failed_dump_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let password = SecretString::new("correct-horse".to_string());

        let result = Archiver::new(dir.path(), &password, FailingDump).run_backup_at(at());

        match result {
            Err(BackupError::DumpFailed { stderr, .. }) => assert_eq!(stderr, "connection refused"),
            other => panic!("expected DumpFailed, got {:?}", other),
        }
        assert!(dir_names(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_archive_removes_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let password = SecretString::new("correct-horse".to_string());
        // A directory squatting on the target name makes the final rename fail.
        fs::create_dir(dir.path().join("bica-backup-2024-01-19_0330.tar.gz")).unwrap();

        let result = Archiver::new(dir.path(), &password, FakeDump(b"SELECT 1;"))
            .run_backup_at(at());

        assert!(matches!(result, Err(BackupError::Io(_))));
        assert_eq!(dir_names(dir.path()), ["bica-backup-2024-01-19_0330.tar.gz"]);
    }
}
