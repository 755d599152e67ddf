//! JSON file persistence.
//!
//! Documents are read whole and written whole. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! crash mid-write leaves the previous version in place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TimetrackError;

/// Read and parse a JSON document.
///
/// Returns `Ok(None)` if the file does not exist or is empty.
///
/// # Errors
///
/// Returns `StorageRead` naming the file if it cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, TimetrackError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data file absent");
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| TimetrackError::read(path, e))?;

    if contents.trim().is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(&contents).map_err(|e| TimetrackError::read(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "loaded data file");
    Ok(Some(value))
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// # Errors
///
/// Returns `StorageWrite` naming the file if any step fails.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), TimetrackError> {
    let mut contents =
        serde_json::to_string_pretty(value).map_err(|e| TimetrackError::write(path, e))?;
    contents.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TimetrackError::write(parent, e))?;
    }

    let tmp = temp_path(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(TimetrackError::write(path, e));
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "saved data file");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let value: Option<BTreeMap<String, u32>> =
            read_json(&temp_dir.path().join("missing.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_empty_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "  \n").unwrap();
        let value: Option<BTreeMap<String, u32>> = read_json(&path).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");

        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1u32);
        write_json_atomic(&path, &value).unwrap();

        let loaded: BTreeMap<String, u32> = read_json(&path).unwrap().unwrap();
        assert_eq!(loaded, value);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_read_corrupt_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sessions.json");
        fs::write(&path, "{\"sessions\": [").unwrap();

        let err = read_json::<BTreeMap<String, u32>>(&path).unwrap_err();
        assert!(matches!(err, TimetrackError::StorageRead { .. }));
        assert!(err.to_string().contains("sessions.json"));
    }

    #[test]
    fn test_write_into_missing_readonly_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        // A regular file cannot be used as a directory
        let err = write_json_atomic(&blocker.join("data.json"), &1u32).unwrap_err();
        assert!(matches!(err, TimetrackError::StorageWrite { .. }));
    }
}
