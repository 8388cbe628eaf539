//! Tracing subscriber setup.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count (`-v` flags).
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise the verbosity default.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Logs to stderr. Used by the one-shot CLI commands.
///
/// A subscriber that is already installed stays in place.
pub fn init_stderr(verbosity: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        tracing::debug!(error = %e, "keeping existing tracing subscriber");
    }
}

/// Logs to a file so output does not corrupt the TUI's alternate screen.
///
/// # Errors
///
/// Returns an error if the log file cannot be created. A subscriber that is
/// already installed stays in place.
pub fn init_file(verbosity: u8, path: &Path) -> Result<()> {
    crate::utils::ensure_parent_directory(path)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    if let Err(e) = installed {
        tracing::debug!(error = %e, "keeping existing tracing subscriber");
    }
    Ok(())
}
