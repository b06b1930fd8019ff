//! Decrypting a backup container back to SQL

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::backup::naming;
use crate::crypto;
use crate::error::{BackupError, Result};

/// Decrypt `container` with `password` into `<base>_decrypted.sql`
///
/// The output is written next to the container and only appears once the
/// blob has been fully authenticated and written.
pub fn restore(container: &Path, password: &str) -> Result<PathBuf> {
    let output = decrypted_path(container)?;

    let (entry, blob) = read_container(container)?;
    let plaintext = crypto::open(&blob, password)?;
    tracing::debug!(entry = %entry, bytes = plaintext.len(), "backup decrypted");

    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let mut scratch = tempfile::Builder::new()
        .prefix(".bica-restore-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    scratch.write_all(&plaintext)?;
    scratch.as_file().sync_all()?;
    scratch.persist(&output).map_err(|e| e.error)?;

    tracing::info!(path = %output.display(), "decrypted backup saved");
    Ok(output)
}

/// Where [`restore`] writes the plaintext for `container`
pub fn decrypted_path(container: &Path) -> Result<PathBuf> {
    let file_name = container
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            BackupError::InvalidContainer(format!(
                "'{}' is not a backup file name",
                container.display()
            ))
        })?;

    let dir = match container.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(dir.join(naming::decrypted_name(file_name)))
}

/// Read the single entry of a container, returning its name and bytes
///
/// Archives with no entries or with more than one entry are rejected. An
/// entry named other than `<base>.sql` is accepted with a warning.
pub fn read_container(container: &Path) -> Result<(String, Vec<u8>)> {
    let file = File::open(container)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let invalid = |e: std::io::Error| BackupError::InvalidContainer(e.to_string());

    let mut found: Option<(String, Vec<u8>)> = None;
    let mut count = 0usize;

    for entry in archive.entries().map_err(invalid)? {
        let mut entry = entry.map_err(invalid)?;
        count += 1;
        if found.is_some() {
            continue;
        }

        let name = entry.path().map_err(invalid)?.to_string_lossy().into_owned();
        // The header size is untrusted; let the buffer grow with the bytes actually read.
        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(invalid)?;
        found = Some((name, data));
    }

    let (name, data) = match (found, count) {
        (Some(found), 1) => found,
        (None, _) => {
            return Err(BackupError::InvalidContainer(
                "archive contains no entries".to_string(),
            ))
        }
        (Some(_), n) => {
            return Err(BackupError::InvalidContainer(format!(
                "expected exactly one entry, found {}",
                n
            )))
        }
    };

    if let Some(file_name) = container.file_name().and_then(|n| n.to_str()) {
        let expected = naming::entry_name(naming::base_of(file_name));
        if name != expected {
            tracing::warn!(entry = %name, expected = %expected, "unexpected entry name in backup");
        }
    }

    Ok((name, data))
}
