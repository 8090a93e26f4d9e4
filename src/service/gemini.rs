use std::time::Duration;

#[cfg(feature = "network")]
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::service::{ServiceError, TextService};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Single-turn client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
    #[cfg(feature = "network")]
    api_key_env: String,
}

impl GeminiClient {
    /// Fails only when the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        api_key_env: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        #[cfg(not(feature = "network"))]
        let _ = (api_key_env, timeout);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            #[cfg(feature = "network")]
            client: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .context("building HTTP client")?,
            #[cfg(feature = "network")]
            api_key_env: api_key_env.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl TextService for GeminiClient {
    #[cfg(feature = "network")]
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::MissingApiKey(self.api_key_env.clone()))?;

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        log::debug!("POST {} ({} prompt chars)", self.endpoint(), prompt.len());
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                code: status.as_u16(),
                message: error_message(&text),
            });
        }
        parse_reply(&text)
    }

    #[cfg(not(feature = "network"))]
    fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::NetworkDisabled)
    }
}

/// Join the text parts of the first candidate with single spaces.
fn parse_reply(body: &str) -> Result<String, ServiceError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let texts: Vec<String> = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(ServiceError::EmptyReply);
    }
    Ok(texts.join(" "))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|env| env.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_joins_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "**Question 1:** 2+2?"}, {"text": "**Options:** A) 4"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(
            parse_reply(body).unwrap(),
            "**Question 1:** 2+2? **Options:** A) 4"
        );
    }

    #[test]
    fn test_parse_reply_skips_empty_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": ""}, {}, {"text": "hello"}]}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "hello");
    }

    #[test]
    fn test_parse_reply_without_candidates_is_empty() {
        assert!(matches!(parse_reply("{}"), Err(ServiceError::EmptyReply)));
        let blocked = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(parse_reply(blocked), Err(ServiceError::EmptyReply)));
    }

    #[test]
    fn test_parse_reply_rejects_garbage() {
        assert!(matches!(parse_reply("<html>"), Err(ServiceError::Decode(_))));
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_new_builds_client_with_timeouts() {
        assert!(
            GeminiClient::new(
                "https://example.test/v1beta",
                "gemini-test",
                Some("k".to_string()),
                "GEMINI_API_KEY",
                Duration::from_secs(30),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            "https://example.test/v1beta/",
            "gemini-test",
            None,
            "GEMINI_API_KEY",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_missing_key_fails_without_request() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            "gemini-test",
            None,
            "GEMINI_API_KEY",
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.generate("hi").unwrap_err();
        #[cfg(feature = "network")]
        assert!(matches!(err, ServiceError::MissingApiKey(ref v) if v == "GEMINI_API_KEY"));
        #[cfg(not(feature = "network"))]
        assert!(matches!(err, ServiceError::NetworkDisabled));
    }
}
