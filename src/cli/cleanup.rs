//! Take a backup, then prune expired ones

use chrono::Utc;
use colored::Colorize;

use crate::backup;
use crate::config::Config;
use crate::error::Result;

pub fn run(config: &Config) -> Result<()> {
    super::backup::run(config)?;

    let removed = backup::prune_expired(&config.backup_dir, config.retention_days, Utc::now())?;

    if removed.is_empty() {
        println!(
            "No backups older than {} days.",
            config.retention_days.to_string().cyan()
        );
    }
    for name in &removed {
        println!("{} {}", "Old backup removed:".yellow(), name);
    }

    Ok(())
}
