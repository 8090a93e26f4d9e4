use serde::{Deserialize, Serialize};
use thiserror::Error;

const CHOICES: [&str; 4] = ["A", "B", "C", "D"];

/// How the answer box interprets what the user types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Any non-empty text.
    #[default]
    Free,
    /// One of the option letters A-D.
    Choice,
    /// Digits and punctuation only.
    Numeric,
}

impl AnswerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerMode::Free => "free",
            AnswerMode::Choice => "choice",
            AnswerMode::Numeric => "numeric",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            AnswerMode::Free => "type your answer",
            AnswerMode::Choice => "A, B, C or D",
            AnswerMode::Numeric => "digits and symbols only",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter your answer.")]
    Empty,
    #[error("Please enter a valid option (A, B, C, D).")]
    NotAChoice,
    #[error("Invalid input. Only numeric and special characters are allowed.")]
    NotNumeric,
}

/// Validate raw input for `mode`, returning the normalized answer.
pub fn validate(mode: AnswerMode, raw: &str) -> Result<String, InputError> {
    let answer = raw.trim();
    if answer.is_empty() {
        return Err(InputError::Empty);
    }

    match mode {
        AnswerMode::Free => Ok(answer.to_string()),
        AnswerMode::Choice => {
            let upper = answer.to_ascii_uppercase();
            if CHOICES.contains(&upper.as_str()) {
                Ok(upper)
            } else {
                Err(InputError::NotAChoice)
            }
        }
        AnswerMode::Numeric => {
            if answer
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_punctuation())
            {
                Ok(answer.to_string())
            } else {
                Err(InputError::NotNumeric)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected_in_every_mode() {
        for mode in [AnswerMode::Free, AnswerMode::Choice, AnswerMode::Numeric] {
            assert_eq!(validate(mode, ""), Err(InputError::Empty));
            assert_eq!(validate(mode, "   "), Err(InputError::Empty));
        }
    }

    #[test]
    fn test_free_mode_trims() {
        assert_eq!(validate(AnswerMode::Free, "  40.8 maybe "), Ok("40.8 maybe".to_string()));
    }

    #[test]
    fn test_choice_mode_normalizes_case() {
        assert_eq!(validate(AnswerMode::Choice, "b"), Ok("B".to_string()));
        assert_eq!(validate(AnswerMode::Choice, " D "), Ok("D".to_string()));
    }

    #[test]
    fn test_choice_mode_rejects_other_letters() {
        assert_eq!(validate(AnswerMode::Choice, "E"), Err(InputError::NotAChoice));
        assert_eq!(validate(AnswerMode::Choice, "AB"), Err(InputError::NotAChoice));
        assert_eq!(validate(AnswerMode::Choice, "1"), Err(InputError::NotAChoice));
    }

    #[test]
    fn test_numeric_mode() {
        assert_eq!(validate(AnswerMode::Numeric, "1"), Ok("1".to_string()));
        assert_eq!(validate(AnswerMode::Numeric, "-40.8%"), Ok("-40.8%".to_string()));
        assert_eq!(validate(AnswerMode::Numeric, "4O"), Err(InputError::NotNumeric));
        assert_eq!(validate(AnswerMode::Numeric, "4 0"), Err(InputError::NotNumeric));
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: AnswerMode = serde_json::from_str("\"choice\"").unwrap();
        assert_eq!(mode, AnswerMode::Choice);
        assert_eq!(serde_json::to_string(&AnswerMode::Numeric).unwrap(), "\"numeric\"");
    }
}
