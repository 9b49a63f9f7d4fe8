//! Cross-Platform Path Utilities
//!
//! Resolves the application directory (~/.agentic-studio/) and files in it.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application directory (~/.agentic-studio/)
pub fn studio_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".agentic-studio"))
}

/// Get the config file path (~/.agentic-studio/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(studio_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of a file path exists
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
