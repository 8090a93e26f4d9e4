use crate::session::extract::{MarkdownExtractor, QuestionRecord, ReplyExtractor};
use crate::session::prompt;
use crate::store::schema::SessionSnapshot;

/// The pending question and what is known about it.
pub struct SessionState {
    record: Option<QuestionRecord>,
    correct_answer: Option<String>,
    extractor: Box<dyn ReplyExtractor>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_extractor(Box::new(MarkdownExtractor::new()))
    }

    pub fn with_extractor(extractor: Box<dyn ReplyExtractor>) -> Self {
        Self {
            record: None,
            correct_answer: None,
            extractor,
        }
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.record.as_ref()
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    /// Parse a question reply and make it the pending record.
    pub fn record_question(&mut self, raw_reply: &str) -> &QuestionRecord {
        self.correct_answer = None;
        self.record.insert(self.extractor.extract(raw_reply))
    }

    /// Keep whatever correct answer the verification reply names, if any.
    pub fn record_verification(&mut self, raw_reply: &str) {
        if let Some(answer) = self.extractor.correct_answer(raw_reply) {
            self.correct_answer = Some(answer);
        }
    }

    /// Request text asking the service to judge `answer` against the pending
    /// question, or `None` when there is no pending question.
    pub fn check_answer(&self, answer: &str) -> Option<String> {
        self.record
            .as_ref()
            .map(|record| prompt::verification_request(record, answer))
    }

    pub fn clear_record(&mut self) {
        self.record = None;
        self.correct_answer = None;
    }

    pub fn reset(&mut self) {
        self.clear_record();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_question: self.record.as_ref().map(|r| r.question_text.clone()),
            current_options: self.record.as_ref().map(|r| r.options_text.clone()),
            correct_answer: self.correct_answer.clone(),
            ..SessionSnapshot::default()
        }
    }

    /// Replace the in-memory state with `snapshot`. A snapshot carrying only
    /// one of question/options restores the other as the sentinel.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.record = match (&snapshot.current_question, &snapshot.current_options) {
            (None, None) => None,
            (question, options) => {
                let mut record = QuestionRecord::unavailable();
                if let Some(q) = question {
                    record.question_text = q.clone();
                }
                if let Some(o) = options {
                    record.options_text = o.clone();
                }
                Some(record)
            }
        };
        self.correct_answer = snapshot.correct_answer.clone();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::extract::SENTINEL;

    const REPLY: &str = "**Question 1:** What is 17% of 240? **Options:** A) 40 B) 40.8 C) 42 **Note:** wait for answer";

    #[test]
    fn test_new_session_has_no_question() {
        let session = SessionState::new();
        assert!(session.current().is_none());
        assert!(session.check_answer("B").is_none());
    }

    #[test]
    fn test_record_then_check_answer() {
        let mut session = SessionState::new();
        let record = session.record_question(REPLY).clone();
        assert_eq!(record.question_text, "What is 17% of 240?");
        assert_eq!(record.options_text, "A) 40 B) 40.8 C) 42");

        let request = session.check_answer("B").unwrap();
        assert!(request.contains("What is 17% of 240?"));
        assert!(request.contains("A) 40 B) 40.8 C) 42"));
        assert!(request.contains("B"));
    }

    #[test]
    fn test_record_overwrites_previous_question() {
        let mut session = SessionState::new();
        session.record_question(REPLY);
        session.record_verification("**Correct Answer:** B");
        assert_eq!(session.correct_answer(), Some("B"));

        session.record_question("no markers at all");
        assert_eq!(session.current(), Some(&QuestionRecord::unavailable()));
        assert_eq!(session.correct_answer(), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut session = SessionState::new();
        session.record_question(REPLY);
        session.record_verification("**Correct Answer:** B) 40.8");
        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_question.as_deref(), Some("What is 17% of 240?"));

        let mut restored = SessionState::new();
        restored.restore(&snapshot);
        assert_eq!(restored.current(), session.current());
        assert_eq!(restored.correct_answer(), Some("B) 40.8"));
    }

    #[test]
    fn test_restore_empty_snapshot_clears() {
        let mut session = SessionState::new();
        session.record_question(REPLY);
        session.restore(&SessionSnapshot::default());
        assert!(session.current().is_none());
        assert!(session.correct_answer().is_none());
    }

    #[test]
    fn test_restore_partial_snapshot_fills_sentinel() {
        let snapshot = SessionSnapshot {
            current_question: Some("2 + 2".to_string()),
            ..SessionSnapshot::default()
        };
        let mut session = SessionState::new();
        session.restore(&snapshot);
        let record = session.current().unwrap();
        assert_eq!(record.question_text, "2 + 2");
        assert_eq!(record.options_text, SENTINEL);
    }

    #[test]
    fn test_reset() {
        let mut session = SessionState::new();
        session.record_question(REPLY);
        session.reset();
        assert!(session.current().is_none());
        assert!(session.snapshot().current_question.is_none());
    }

    struct FixedExtractor;

    impl ReplyExtractor for FixedExtractor {
        fn extract(&self, _reply: &str) -> QuestionRecord {
            QuestionRecord::new("fixed", "A) 1")
        }
    }

    #[test]
    fn test_custom_extractor_is_used() {
        let mut session = SessionState::with_extractor(Box::new(FixedExtractor));
        assert_eq!(session.record_question("anything").question_text, "fixed");
        session.record_verification("**Correct Answer:** A");
        assert_eq!(session.correct_answer(), None);
    }
}
