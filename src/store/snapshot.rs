//! JSON snapshot file handling.
//!
//! This module loads the tracker snapshot from disk and writes it back in
//! full. Writes go through a temporary file in the target directory that is
//! renamed over the snapshot, so an interrupted save leaves the previous
//! file intact.

use crate::models::Snapshot;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while reading or writing the snapshot.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write snapshot {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    default_workouts: Vec<String>,
}

impl SnapshotStore {
    /// Create a store for the given file.
    ///
    /// `default_workouts` seeds the workout registry when the file does not
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>, default_workouts: Vec<String>) -> Self {
        Self {
            path: path.into(),
            default_workouts,
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot.
    ///
    /// A missing file yields a fresh snapshot. A file that exists but cannot
    /// be read or parsed is an error, never silently replaced.
    pub fn load(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            info!(
                "No snapshot at {}, starting with defaults",
                self.path.display()
            );
            return Ok(Snapshot::with_workouts(self.default_workouts.iter().cloned()));
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Loaded snapshot: {} members, {} workouts, {} days",
            snapshot.members.len(),
            snapshot.workouts.len(),
            snapshot.daily_entries.len()
        );

        Ok(snapshot)
    }

    /// Write the full snapshot, replacing the file atomically.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn defaults() -> Vec<String> {
        vec!["Push-ups".to_string(), "Pull-ups".to_string(), "Squats".to_string()]
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("data.json"), defaults());

        let snapshot = store.load().unwrap();
        assert!(snapshot.members.is_empty());
        assert_eq!(snapshot.workouts, defaults());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("nested/data.json"), defaults());

        let mut snapshot = store.load().unwrap();
        snapshot.members.push("A".to_string());
        snapshot
            .daily_entries
            .entry(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .or_default()
            .entry("A".to_string())
            .or_default()
            .insert("Squats".to_string(), 25);
        store.save(&snapshot).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn test_corrupt_file_fails_loudly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SnapshotStore::new(&path, defaults());
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));

        // The broken file is left as it was
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_save_overwrites_whole_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("data.json"), defaults());

        let mut snapshot = store.load().unwrap();
        snapshot.members = vec!["A".to_string(), "B".to_string()];
        store.save(&snapshot).unwrap();

        snapshot.members = vec!["B".to_string()];
        store.save(&snapshot).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.members, vec!["B"]);
    }
}
