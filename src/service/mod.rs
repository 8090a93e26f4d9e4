pub mod gemini;

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("could not decode reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("service returned no text")]
    EmptyReply,
    #[error("built without network support")]
    NetworkDisabled,
}

/// An opaque text-in, text-out generation service.
pub trait TextService: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Run `prompt` through `service`, turning any failure into the text shown
/// in place of the reply.
pub fn generate_or_failure(service: &dyn TextService, prompt: &str) -> Result<String, String> {
    service.generate(prompt).map_err(|e| {
        log::error!("error during interaction with the text service: {e}");
        failure_text(&e)
    })
}

pub fn failure_text(err: &ServiceError) -> String {
    format!("Failed to get response: {err}")
}

/// Load `.env` files (working directory first, then `~/Desktop/.env` and
/// `~/.env`) and read `var` from the process environment. Variables already
/// set are never overwritten.
pub fn api_key_from_env(var: &str) -> Option<String> {
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("no .env in working directory: {e}");
    }
    for path in home_env_files() {
        if path.exists() && let Err(e) = dotenvy::from_path(&path) {
            log::warn!("could not load {}: {e}", path.display());
        }
    }

    match env::var(var) {
        Ok(key) if !key.trim().is_empty() => Some(key.trim().to_string()),
        _ => {
            log::warn!("${var} is not set; requests will fail until it is");
            None
        }
    }
}

fn home_env_files() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| vec![home.join("Desktop").join(".env"), home.join(".env")])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl TextService for Failing {
        fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
            Err(ServiceError::Status {
                code: 429,
                message: "quota exhausted".to_string(),
            })
        }
    }

    struct Echo;

    impl TextService for Echo {
        fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
            Ok(prompt.to_uppercase())
        }
    }

    #[test]
    fn test_failure_becomes_literal_text() {
        let text = generate_or_failure(&Failing, "hi").unwrap_err();
        assert_eq!(text, "Failed to get response: service returned 429: quota exhausted");
    }

    #[test]
    fn test_success_passes_through() {
        assert_eq!(generate_or_failure(&Echo, "hi"), Ok("HI".to_string()));
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        let err = ServiceError::MissingApiKey("GEMINI_API_KEY".to_string());
        assert_eq!(err.to_string(), "API key not set (expected in $GEMINI_API_KEY)");
    }
}
