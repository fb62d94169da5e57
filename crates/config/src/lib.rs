//! Configuration loading, validation, and management for StudyMate.
//!
//! Loads configuration from `~/.studymate/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use studymate_core::selection::{Selection, Style, Subject};

/// The root configuration structure.
///
/// Maps directly to `~/.studymate/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name (selects the default base URL)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model used for answers
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature used for answers
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Chat defaults
    #[serde(default)]
    pub chat: ChatConfig,

    /// Conversation summarization settings
    #[serde(default)]
    pub summary: SummaryConfig,
}

fn default_provider() -> String {
    "deepseek".into()
}
fn default_model() -> String {
    "deepseek-chat".into()
}
fn default_temperature() -> f32 {
    0.7
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("chat", &self.chat)
            .field("summary", &self.summary)
            .finish()
    }
}

/// Defaults for the chat surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Initial subject label (文学 / 数学 / 计算机)
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Initial explanation style label (简洁 / 详细)
    #[serde(default = "default_style")]
    pub style: String,

    /// Display-only opening message
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_subject() -> String {
    Subject::Literature.label().into()
}
fn default_style() -> String {
    Style::Concise.label().into()
}
fn default_greeting() -> String {
    "你好，我是你的学习助手！".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            style: default_style(),
            greeting: default_greeting(),
        }
    }
}

/// Settings for the auxiliary summarization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Model for summarization; falls back to the answer model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_summary_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_summary_temperature() -> f32 {
    0.0
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: default_summary_temperature(),
            max_tokens: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.studymate/config.toml).
    ///
    /// Also checks environment variables:
    /// - `STUDYMATE_API_KEY` (highest priority), `DEEPSEEK_API_KEY`, `OPENAI_API_KEY`
    /// - `STUDYMATE_MODEL`
    /// - `STUDYMATE_BASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("STUDYMATE_API_KEY")
                .ok()
                .or_else(|| std::env::var("DEEPSEEK_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("STUDYMATE_MODEL") {
            config.model = model;
        }

        if let Ok(base_url) = std::env::var("STUDYMATE_BASE_URL") {
            config.base_url = Some(base_url);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".studymate")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.summary.temperature) {
            return Err(ConfigError::ValidationError(
                "summary.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.chat.greeting.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "chat.greeting must not be empty".into(),
            ));
        }

        self.selection()?;
        Ok(())
    }

    /// The initial selection from `[chat]`.
    pub fn selection(&self) -> Result<Selection, ConfigError> {
        Selection::from_labels(&self.chat.subject, &self.chat.style)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// The model used for summarization.
    pub fn summary_model(&self) -> &str {
        self.summary.model.as_deref().unwrap_or(&self.model)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            chat: ChatConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.model, "deepseek-chat");
        assert!(config.validate().is_ok());
        assert_eq!(config.selection().unwrap(), Selection::default());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.chat.greeting, config.chat.greeting);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_subject_rejected() {
        let mut config = AppConfig::default();
        config.chat.subject = "化学".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("化学"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "deepseek");
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
model = "gpt-4o-mini"

[chat]
subject = "math"
style = "详细"

[summary]
model = "gpt-4o-mini"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.provider, "deepseek");
        assert_eq!(
            config.selection().unwrap(),
            Selection::new(Subject::Math, Style::Detailed)
        );
        assert_eq!(config.chat.greeting, "你好，我是你的学习助手！");
        assert_eq!(config.summary_model(), "gpt-4o-mini");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = [").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn summary_model_falls_back_to_answer_model() {
        let config = AppConfig::default();
        assert_eq!(config.summary_model(), "deepseek-chat");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret-value".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("deepseek-chat"));
        assert!(toml_str.contains("[chat]"));
    }
}
