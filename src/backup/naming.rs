//! Container naming convention
//!
//! Retention reads a backup's age from its file name alone, so the format
//! below is load-bearing: `bica-backup-YYYY-MM-DD_HHMM.tar.gz`, holding a
//! single entry `bica-backup-YYYY-MM-DD_HHMM.sql`. Timestamps are UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

pub const PREFIX: &str = "bica-backup-";
pub const CONTAINER_EXT: &str = ".tar.gz";
pub const ENTRY_EXT: &str = ".sql";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M";

const DECRYPTED_SUFFIX: &str = "_decrypted.sql";

/// `bica-backup-<YYYY-MM-DD_HHMM>` for `at`, truncated to the minute
pub fn base_name(at: DateTime<Utc>) -> String {
    format!("{}{}", PREFIX, at.format(TIMESTAMP_FORMAT))
}

pub fn container_name(base: &str) -> String {
    format!("{}{}", base, CONTAINER_EXT)
}

pub fn entry_name(base: &str) -> String {
    format!("{}{}", base, ENTRY_EXT)
}

/// Strip `.tar.gz` (or, failing that, the last extension) from a file name
pub fn base_of(file_name: &str) -> &str {
    if let Some(base) = file_name.strip_suffix(CONTAINER_EXT) {
        return base;
    }
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

/// Name of the plaintext written next to a restored container
pub fn decrypted_name(container_file_name: &str) -> String {
    format!("{}{}", base_of(container_file_name), DECRYPTED_SUFFIX)
}

/// Read the timestamp embedded in a container file name
///
/// Returns `None` for names outside the `bica-backup-*.tar.gz` pattern and
/// `Some(Err(_))` for names inside it whose timestamp does not parse.
pub fn parse_container_name(
    file_name: &str,
) -> Option<std::result::Result<DateTime<Utc>, chrono::ParseError>> {
    let stamp = file_name
        .strip_prefix(PREFIX)?
        .strip_suffix(CONTAINER_EXT)?;

    Some(
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive)),
    )
}
