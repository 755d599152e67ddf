//! Error types for timetrack.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tracking::SessionId;

/// Errors surfaced by the session store, the category configuration,
/// and the command layer.
#[derive(Debug, Error)]
pub enum TimetrackError {
    /// A session is already active.
    #[error("A timer is already running: session {id} ({label}). Stop it first with 'timetrack stop'.")]
    AlreadyRunning {
        /// ID of the active session.
        id: SessionId,
        /// "Category - Subcategory" of the active session.
        label: String,
    },

    /// No session is active.
    #[error("No active timer")]
    NoActiveSession,

    /// The active session is already paused.
    #[error("Timer for session {0} is already paused")]
    AlreadyPaused(SessionId),

    /// The active session is running, not paused.
    #[error("Timer for session {0} is not paused")]
    NotPaused(SessionId),

    /// Unknown category or subcategory.
    #[error("{0}")]
    InvalidCategory(String),

    /// A time range violates the session invariants.
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    /// No session with this ID.
    #[error("No session found with id {0}")]
    NotFound(SessionId),

    /// A data file exists but could not be read or parsed.
    #[error("Failed to read {}: {message}", path.display())]
    StorageRead {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A data file could not be written.
    #[error("Failed to write {}: {message}", path.display())]
    StorageWrite {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable user input (dates, durations).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TimetrackError {
    /// Build a [`TimetrackError::StorageRead`] for `path`.
    pub fn read(path: &Path, message: impl ToString) -> Self {
        Self::StorageRead {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Build a [`TimetrackError::StorageWrite`] for `path`.
    pub fn write(path: &Path, message: impl ToString) -> Self {
        Self::StorageWrite {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_name_the_file() {
        let err = TimetrackError::read(Path::new("/tmp/x/sessions.json"), "expected value");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x/sessions.json"));
        assert!(msg.contains("expected value"));

        let err = TimetrackError::write(Path::new("/tmp/x/categories.json"), "permission denied");
        assert!(err.to_string().contains("categories.json"));
    }

    #[test]
    fn test_already_running_message() {
        let err = TimetrackError::AlreadyRunning {
            id: 3,
            label: "Sales - CRM work".to_string(),
        };
        assert!(err.to_string().contains("session 3"));
        assert!(err.to_string().contains("Sales - CRM work"));
    }
}
