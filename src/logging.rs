use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `VOKAB_LOG=debug`
pub const LOG_ENV: &str = "VOKAB_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send log events to a file so they never draw over the terminal UI.
///
/// Appends to `path`, creating its directory. Fails if a global subscriber
/// is already installed or the file cannot be opened.
pub fn init_file<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()?;

    Ok(())
}

/// Log to stderr, for the non-interactive commands
pub fn init_stderr() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init()?;
    Ok(())
}
