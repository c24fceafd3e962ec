//! Persistent set of paper identifiers already surfaced to the user.
//!
//! The history file is a pretty-printed JSON array of identifier strings.
//! A missing or corrupted file is treated as empty history; only saving can
//! fail.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::utils::persist::write_atomic;

/// Default history file name, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "papers_history.json";

/// Identifiers seen in previous runs.
///
/// Ordered so the serialized form is deterministic.
pub type HistorySet = BTreeSet<String>;

/// Errors raised while persisting history
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed history store
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// History file path
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the history set.
    ///
    /// Returns an empty set when the file is missing, unreadable or not a
    /// JSON array of strings.
    pub fn load(&self) -> HistorySet {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No history at {}, starting fresh", self.path.display());
                return HistorySet::new();
            }
            Err(e) => {
                tracing::warn!("Cannot read history {}: {}", self.path.display(), e);
                return HistorySet::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(ids) => {
                let set: HistorySet = ids.into_iter().collect();
                tracing::debug!("Loaded {} ids from {}", set.len(), self.path.display());
                set
            }
            Err(e) => {
                tracing::warn!(
                    "History {} is corrupted ({}), treating as empty",
                    self.path.display(),
                    e
                );
                HistorySet::new()
            }
        }
    }

    /// Overwrite the history file with the full set, atomically.
    pub fn save(&self, history: &HistorySet) -> Result<(), HistoryError> {
        let mut json = serde_json::to_string_pretty(history)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!("Saved {} ids to {}", history.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn set(ids: &[&str]) -> HistorySet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("missing.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();

        assert!(HistoryStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{"ids": ["a"]}"#).unwrap();

        assert!(HistoryStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        for ids in [
            set(&[]),
            set(&["2301.00001v1"]),
            set(&["2301.00001v1", "2301.00002v3", "math.GT/0104020v1", "ünïcode"]),
        ] {
            store.save(&ids).unwrap();
            assert_eq!(store.load(), ids);
        }
    }

    #[test]
    fn test_saved_format_is_sorted_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::new(&path);

        store.save(&set(&["b", "a"])).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[\n  \"a\",\n  \"b\"\n]\n");
    }

    #[test]
    fn test_reads_history_written_by_other_tools() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"["2402.1v1", "2401.9v2", "2402.1v1"]"#).unwrap();

        assert_eq!(HistoryStore::new(&path).load(), set(&["2401.9v2", "2402.1v1"]));
    }
}
