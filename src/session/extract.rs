use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder for any field that could not be located in a reply.
pub const SENTINEL: &str = "N/A";

pub const DEFAULT_QUESTION_PATTERN: &str = r"(?s)\*\*Question[^*\n]*:\*\*(.+?)\*\*Options";
pub const DEFAULT_OPTIONS_PATTERN: &str = r"(?s)\*\*Options:\*\*(.+?)\*\*Note";
const CORRECT_ANSWER_PATTERN: &str = r"(?i)\*\*Correct Answer:?\*\*:?[ \t]*([^\n]+)";

static DEFAULT_QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_QUESTION_PATTERN).expect("valid question pattern"));
static DEFAULT_OPTIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_OPTIONS_PATTERN).expect("valid options pattern"));
static CORRECT_ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CORRECT_ANSWER_PATTERN).expect("valid answer pattern"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_text: String,
    pub options_text: String,
}

impl QuestionRecord {
    pub fn new(question_text: impl Into<String>, options_text: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            options_text: options_text.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(SENTINEL, SENTINEL)
    }

    /// True when neither field fell back to the sentinel.
    pub fn is_complete(&self) -> bool {
        self.question_text != SENTINEL && self.options_text != SENTINEL
    }
}

/// Turns a free-form service reply into structured question data.
///
/// Implementations never fail: anything they cannot find is reported as
/// [`SENTINEL`].
pub trait ReplyExtractor: Send {
    fn extract(&self, reply: &str) -> QuestionRecord;

    fn correct_answer(&self, _reply: &str) -> Option<String> {
        None
    }
}

/// Extracts the bold `**Question:** / **Options:** / **Note:**` markers the
/// question prompt asks the service to emit.
pub struct MarkdownExtractor {
    question: Regex,
    options: Regex,
}

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self {
            question: DEFAULT_QUESTION_RE.clone(),
            options: DEFAULT_OPTIONS_RE.clone(),
        }
    }

    /// Build an extractor from custom patterns. Each pattern must expose the
    /// wanted text as capture group 1.
    pub fn with_patterns(question: &str, options: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            question: Regex::new(question)?,
            options: Regex::new(options)?,
        })
    }

    /// Like [`with_patterns`](Self::with_patterns) but falls back to the
    /// built-in pattern for whichever one fails to compile.
    pub fn from_patterns_or_default(question: &str, options: &str) -> Self {
        let question = Regex::new(question).unwrap_or_else(|e| {
            log::warn!("invalid question pattern, using default: {e}");
            DEFAULT_QUESTION_RE.clone()
        });
        let options = Regex::new(options).unwrap_or_else(|e| {
            log::warn!("invalid options pattern, using default: {e}");
            DEFAULT_OPTIONS_RE.clone()
        });
        Self { question, options }
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyExtractor for MarkdownExtractor {
    fn extract(&self, reply: &str) -> QuestionRecord {
        let record = QuestionRecord {
            question_text: capture_or_sentinel(&self.question, reply),
            options_text: capture_or_sentinel(&self.options, reply),
        };
        if !record.is_complete() {
            log::debug!("reply did not contain all expected markers");
        }
        record
    }

    fn correct_answer(&self, reply: &str) -> Option<String> {
        capture_trimmed(&CORRECT_ANSWER_RE, reply)
    }
}

fn capture_trimmed(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn capture_or_sentinel(re: &Regex, text: &str) -> String {
    capture_trimmed(re, text).unwrap_or_else(|| SENTINEL.to_string())
}
