//! Unified path management for opsdesk files.
//!
//! All opsdesk configuration, secrets, and the persisted session snapshot
//! live under one config directory, resolved the same way on every platform.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for opsdesk.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/opsdesk/           # Config directory
/// ├── chat_store.json          # Persisted session snapshot
/// └── secret.json              # API keys and endpoint configuration
/// ```
pub struct OpsdeskPaths;

impl OpsdeskPaths {
    /// Returns the opsdesk configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/opsdesk/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("opsdesk"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the persisted session snapshot.
    pub fn store_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("chat_store.json"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_file_under_config_dir() {
        let config_dir = OpsdeskPaths::config_dir().unwrap();
        let store_file = OpsdeskPaths::store_file().unwrap();
        assert!(store_file.starts_with(&config_dir));
        assert_eq!(store_file.file_name().unwrap(), "chat_store.json");
    }
}
