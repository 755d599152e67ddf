//! Advisory lock serializing timetrack invocations.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::TimetrackError;

/// Exclusive lock on the data directory, released on drop.
#[derive(Debug)]
pub struct DataLock {
    file: File,
    path: PathBuf,
}

impl DataLock {
    /// Block until the lock at `path` is acquired, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the lock file cannot be opened or locked.
    pub fn acquire(path: &Path) -> Result<Self, TimetrackError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TimetrackError::write(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| TimetrackError::write(path, e))?;

        file.lock_exclusive()
            .map_err(|e| TimetrackError::write(path, format!("failed to acquire lock: {e}")))?;

        tracing::debug!(path = %path.display(), "acquired data lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release data lock");
        }
    }
}
