//! Backup lifecycle: naming, dumping, archiving and retention

mod archiver;
mod dump;
pub mod naming;
mod retention;

pub use archiver::{write_container, Archiver};
pub use dump::{DumpSource, PgDump};
pub use retention::prune_expired;
