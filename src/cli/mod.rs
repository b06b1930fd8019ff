//! CLI command implementations

pub mod backup;
pub mod cleanup;
pub mod decrypt;

use std::io::{self, Write};

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;

/// Load and validate configuration for the backup modes
pub fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.ensure_backup_dir()?;
    tracing::debug!(
        backup_dir = %config.backup_dir.display(),
        retention_days = config.retention_days,
        "configuration loaded"
    );
    Ok(config)
}

/// Print a progress label without a newline
fn step(label: &str) -> Result<()> {
    print!("{}", label.cyan());
    io::stdout().flush()?;
    Ok(())
}

/// Finish a progress line started with [`step`]
fn step_done<T>(result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => println!("{}", "done".green()),
        Err(_) => println!("{}", "failed".red()),
    }
    result
}
