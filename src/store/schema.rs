use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// On-disk mirror of the pending question.
///
/// Field names match the flat `session.json` written by earlier releases, so
/// those files load as-is (the missing version defaults to current).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub current_question: Option<String>,
    #[serde(default)]
    pub current_options: Option<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            current_question: None,
            current_options: None,
            correct_answer: None,
            saved_at: None,
        }
    }
}

impl SessionSnapshot {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn is_empty(&self) -> bool {
        self.current_question.is_none() && self.current_options.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_legacy_flat_document() {
        let json = r#"{"current_question": "What is 2+2?", "current_options": "A) 3 B) 4", "correct_answer": null}"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.current_question.as_deref(), Some("What is 2+2?"));
        assert_eq!(snapshot.current_options.as_deref(), Some("A) 3 B) 4"));
        assert!(snapshot.correct_answer.is_none());
        assert!(!snapshot.needs_reset());
    }

    #[test]
    fn test_all_null_document_is_empty() {
        let json = r#"{"current_question": null, "current_options": null, "correct_answer": null}"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_future_version_needs_reset() {
        let snapshot: SessionSnapshot = serde_json::from_str(r#"{"schema_version": 9}"#).unwrap();
        assert!(snapshot.needs_reset());
    }
}
