//! Shared filesystem helpers used by the CLI and TUI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform data directory for minirag.
///
/// Returns `{data_dir}/minirag` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_data_directory() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("minirag"))
}

/// Path of the log file written while the TUI owns the terminal.
pub fn get_log_path() -> Result<PathBuf> {
    Ok(get_data_directory()?.join("minirag.log"))
}

/// Ensures the parent directory of `path` exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Reads context text from a file, or from stdin when `path` is `-`.
pub fn read_text_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut text)
            .context("Failed to read from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
