//! Age-based pruning of backup containers

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use super::naming;
use crate::error::{BackupError, Result};

/// Delete containers in `dir` stamped strictly before `now - retention_days`
///
/// Only names of the form `bica-backup-<timestamp>.tar.gz` are considered.
/// Names whose timestamp does not parse are never deleted. A failure to
/// delete one file is logged and does not stop the rest; files that vanish
/// mid-scan (e.g. a concurrent backup run) are skipped. Returns the removed
/// names, sorted.
pub fn prune_expired(dir: &Path, retention_days: u32, now: DateTime<Utc>) -> Result<Vec<String>> {
    let cutoff = now
        .checked_sub_signed(Duration::days(i64::from(retention_days)))
        .ok_or_else(|| {
            BackupError::InvalidConfig(format!(
                "retention of {} days reaches before the earliest representable date",
                retention_days
            ))
        })?;
    let mut removed = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        let stamp = match naming::parse_container_name(name) {
            None => continue,
            Some(Ok(stamp)) => stamp,
            Some(Err(e)) => {
                tracing::warn!(file = name, error = %e, "cannot read date from backup name, keeping it");
                continue;
            }
        };

        if stamp >= cutoff {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::info!(file = name, "old backup removed");
                removed.push(name.to_string());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(file = name, "backup vanished before removal");
            }
            Err(e) => {
                tracing::warn!(file = name, error = %e, "failed to remove old backup");
            }
        }
    }

    removed.sort();
    Ok(removed)
}
