use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::store::schema::SessionSnapshot;

const SESSION_FILE: &str = "session.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the saved session. A missing, unreadable, corrupt or
    /// stale-schema file all mean "no prior session".
    pub fn load_snapshot(&self) -> SessionSnapshot {
        let path = self.file_path(SESSION_FILE);
        if !path.exists() {
            return SessionSnapshot::default();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return SessionSnapshot::default();
            }
        };

        match serde_json::from_str::<SessionSnapshot>(&content) {
            Ok(snapshot) if !snapshot.needs_reset() => snapshot,
            Ok(snapshot) => {
                log::warn!(
                    "ignoring session file with schema version {}",
                    snapshot.schema_version
                );
                SessionSnapshot::default()
            }
            Err(e) => {
                log::warn!("ignoring corrupt session file {}: {e}", path.display());
                SessionSnapshot::default()
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let mut stamped = snapshot.clone();
        stamped.saved_at = Some(Utc::now());
        self.save(SESSION_FILE, &stamped)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speedmath")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_restores_empty() {
        let (_dir, store) = make_test_store();
        assert!(!store.file_path(SESSION_FILE).exists());
        let snapshot = store.load_snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.correct_answer.is_none());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = make_test_store();
        let snapshot = SessionSnapshot {
            current_question: Some("What is 17% of 240?".to_string()),
            current_options: Some("A) 40 B) 40.8 C) 42".to_string()),
            correct_answer: Some("B".to_string()),
            ..SessionSnapshot::default()
        };
        store.save_snapshot(&snapshot).unwrap();

        let loaded = store.load_snapshot();
        assert_eq!(loaded.current_question, snapshot.current_question);
        assert_eq!(loaded.current_options, snapshot.current_options);
        assert_eq!(loaded.correct_answer, snapshot.correct_answer);
        assert!(loaded.saved_at.is_some());
    }

    #[test]
    fn test_corrupt_file_restores_empty() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SESSION_FILE), "{ not json").unwrap();
        assert!(store.load_snapshot().is_empty());
    }

    #[test]
    fn test_stale_schema_restores_empty() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(SESSION_FILE),
            r#"{"schema_version": 99, "current_question": "old"}"#,
        )
        .unwrap();
        assert!(store.load_snapshot().is_empty());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_snapshot(&SessionSnapshot::default()).unwrap();

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert!(store.file_path(SESSION_FILE).exists());
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let (dir, _store) = make_test_store();
        let bad_store = JsonStore {
            base_dir: dir.path().join("nonexistent_subdir"),
        };
        assert!(bad_store.save_snapshot(&SessionSnapshot::default()).is_err());
        assert!(bad_store.load_snapshot().is_empty());
    }
}
