//! Log setup.
//!
//! The TUI draws on stderr, so log records go to a file instead
//! (`.polish/polish.log`, appended). `RUST_LOG` overrides the default `info`
//! filter.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Installs the global logger writing to `path`.
///
/// # Errors
///
/// Returns `Err` if the log file cannot be opened for appending.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .init();
    Ok(())
}
