use super::files::atomic_write;
use crate::engine::FocusState;
use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

/// Why an import was rejected. The current in-memory state is never touched
/// when any of these occur.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read backup file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Backup file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Backup file is missing the top-level \"tasks\" and \"logs\" keys")]
    MissingKeys,
    #[error("Backup file entries are malformed: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Load the persisted document. An absent or corrupt file starts the app
/// from an empty state; the problem is logged, never surfaced as a failure.
pub fn load_state<P: AsRef<Path>>(path: P) -> FocusState {
    let path = path.as_ref();
    if !path.exists() {
        return FocusState::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!("could not read {}: {err}", path.display());
            return FocusState::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("corrupt state document {}: {err}", path.display());
            FocusState::new()
        }
    }
}

/// Persist the whole document atomically
pub fn save_state<P: AsRef<Path>>(path: P, state: &FocusState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
    atomic_write(path, &json)
}

/// Export the document to a backup file
pub fn export_state<P: AsRef<Path>>(path: P, state: &FocusState) -> Result<()> {
    save_state(path, state)
}

/// Read a backup file for wholesale state replacement.
///
/// The file must parse as JSON and carry both the `tasks` and `logs`
/// top-level keys; anything else is rejected without side effects.
pub fn import_state<P: AsRef<Path>>(path: P) -> Result<FocusState, ImportError> {
    let content = std::fs::read_to_string(path).map_err(ImportError::Read)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(ImportError::Parse)?;

    let has_keys = value
        .as_object()
        .map(|obj| obj.contains_key("tasks") && obj.contains_key("logs"))
        .unwrap_or(false);
    if !has_keys {
        return Err(ImportError::MissingKeys);
    }

    serde_json::from_value(value).map_err(ImportError::Shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Urgency;
    use pretty_assertions::assert_eq;

    fn sample_state() -> FocusState {
        let mut state = FocusState::new();
        let id = state
            .create_task("Ship the release", 8.0, 1.0, None, Urgency::High, 0)
            .unwrap();
        state.add_subtask(id, "Write changelog", 1.0, 0);
        state.toggle_task(id, 1_000);
        state.toggle_task(id, 2_000);
        state
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(dir.path().join("state.json"));
        assert!(state.tasks.is_empty());
        assert!(state.ledger.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = load_state(&path);
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = sample_state();

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path);
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FocusFlow_Backup_2026-08-07.json");
        let state = sample_state();

        export_state(&path, &state).unwrap();
        let imported = import_state(&path).unwrap();
        assert_eq!(imported, state);
    }

    #[test]
    fn test_import_rejects_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, r#"{"tasks": []}"#).unwrap();

        match import_state(&path) {
            Err(ImportError::MissingKeys) => {}
            other => panic!("expected MissingKeys, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, "not json at all").unwrap();

        assert!(matches!(import_state(&path), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_import_rejects_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, r#"{"tasks": [{"id": 12}], "logs": []}"#).unwrap();

        assert!(matches!(import_state(&path), Err(ImportError::Shape(_))));
    }

    #[test]
    fn test_import_rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(import_state(&path), Err(ImportError::MissingKeys)));
    }
}
