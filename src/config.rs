use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::answer::AnswerMode;
use crate::session::extract::{DEFAULT_OPTIONS_PATTERN, DEFAULT_QUESTION_PATTERN};
use crate::session::prompt::DEFAULT_QUESTION_PROMPT;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub answer_mode: AnswerMode,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub persist_session: bool,
    #[serde(default = "default_true")]
    pub resume_session: bool,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_question_prompt")]
    pub question_prompt: String,
    #[serde(default = "default_question_pattern")]
    pub question_pattern: String,
    #[serde(default = "default_options_pattern")]
    pub options_pattern: String,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_true() -> bool {
    true
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_question_prompt() -> String {
    DEFAULT_QUESTION_PROMPT.to_string()
}
fn default_question_pattern() -> String {
    DEFAULT_QUESTION_PATTERN.to_string()
}
fn default_options_pattern() -> String {
    DEFAULT_OPTIONS_PATTERN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
            answer_mode: AnswerMode::default(),
            theme: default_theme(),
            persist_session: default_true(),
            resume_session: default_true(),
            tick_ms: default_tick_ms(),
            question_prompt: default_question_prompt(),
            question_pattern: default_question_pattern(),
            options_pattern: default_options_pattern(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Clamp numeric fields and replace blank or unknown values with defaults.
    pub fn validate(&mut self, valid_themes: &[String]) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 600);
        self.tick_ms = self.tick_ms.clamp(100, 5000);
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.api_key_env.trim().is_empty() {
            self.api_key_env = default_api_key_env();
        }
        if self.question_prompt.trim().is_empty() {
            self.question_prompt = default_question_prompt();
        }
        if !valid_themes.iter().any(|t| *t == self.theme) {
            self.theme = default_theme();
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speedmath")
}
