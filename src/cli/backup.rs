//! Take one encrypted backup

use std::path::PathBuf;

use colored::Colorize;

use crate::backup::{Archiver, PgDump};
use crate::config::Config;
use crate::error::Result;

use super::{step, step_done};

pub fn run(config: &Config) -> Result<PathBuf> {
    step("Dumping and encrypting database... ")?;

    let dump = PgDump::new(&config.database);
    let archiver = Archiver::new(&config.backup_dir, &config.encryption_password, dump);
    let path = step_done(archiver.run_backup())?;

    println!(
        "{} {}",
        "Encrypted backup saved in:".green().bold(),
        path.display()
    );
    Ok(path)
}
