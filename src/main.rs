use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use bica_backup::cli;
use bica_backup::error::Result;

#[derive(Parser)]
#[command(name = "bica-backup")]
#[command(version)]
#[command(about = "Encrypted, retention-managed PostgreSQL backups", long_about = None)]
#[command(override_usage = "bica-backup [OPTIONS]
       bica-backup [OPTIONS] cleanup
       bica-backup [OPTIONS] decrypt <CONTAINER> <PASSWORD>")]
#[command(after_help = "With no command, takes one encrypted backup.\n\
Settings come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME, RETENTION_DAYS, \
ENCRYPTION_PASSWORD and optionally BACKUP_DIR.")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a backup, then delete backups older than RETENTION_DAYS
    Cleanup,

    /// Decrypt a backup into <name>_decrypted.sql next to it
    Decrypt {
        /// Path to a bica-backup-*.tar.gz container
        container: PathBuf,
        /// Password the backup was encrypted with
        password: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => {
            let config = cli::load_config()?;
            cli::backup::run(&config).map(|_| ())
        }
        Some(Commands::Cleanup) => {
            let config = cli::load_config()?;
            cli::cleanup::run(&config)
        }
        Some(Commands::Decrypt {
            container,
            password,
        }) => cli::decrypt::run(&container, &password),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
