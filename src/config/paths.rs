//! Path resolution for timetrack configuration and data files.
//!
//! All timetrack data is stored in `~/.timetrack/`:
//! - `config.yaml` - Optional settings
//! - `sessions.json` - Session log and active timer pointer
//! - `categories.json` - Category and subcategory configuration
//! - `.lock` - Advisory lock held while the session log is open
//!
//! Set `TIMETRACK_HOME` to use a different directory.

use std::path::PathBuf;

use crate::error::TimetrackError;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "TIMETRACK_HOME";

/// Paths to timetrack configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.timetrack/`
    pub root: PathBuf,
    /// Config file: `~/.timetrack/config.yaml`
    pub config_file: PathBuf,
    /// Session log: `~/.timetrack/sessions.json`
    pub sessions: PathBuf,
    /// Category configuration: `~/.timetrack/categories.json`
    pub categories: PathBuf,
    /// Lock file: `~/.timetrack/.lock`
    pub lock: PathBuf,
}

impl Paths {
    /// Resolve paths from `TIMETRACK_HOME`, falling back to `$HOME/.timetrack`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, TimetrackError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            TimetrackError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".timetrack")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            sessions: root.join("sessions.json"),
            categories: root.join("categories.json"),
            lock: root.join(".lock"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TimetrackError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)
                .map_err(|e| TimetrackError::write(&self.root, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-timetrack");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.sessions, root.join("sessions.json"));
        assert_eq!(paths.categories, root.join("categories.json"));
        assert_eq!(paths.lock, root.join(".lock"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested").join(".timetrack"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
