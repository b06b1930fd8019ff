//! Decrypt a backup container

use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::restore;

use super::{step, step_done};

pub fn run(container: &Path, password: &str) -> Result<()> {
    step("Decrypting backup... ")?;
    let output = step_done(restore::restore(container, password))?;

    println!(
        "{} {}",
        "Decrypted backup saved to:".green().bold(),
        output.display()
    );
    Ok(())
}
