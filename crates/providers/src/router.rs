//! Provider construction from configuration.

use std::sync::Arc;
use studymate_config::AppConfig;
use studymate_core::error::CompletionError;
use studymate_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured completion provider.
///
/// The API key is handed to the provider untouched. A missing key is a
/// `NotConfigured` error rather than an empty bearer token.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, CompletionError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        CompletionError::NotConfigured(format!(
            "no API key for provider '{}' (set STUDYMATE_API_KEY or DEEPSEEK_API_KEY)",
            config.provider
        ))
    })?;

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    tracing::debug!(provider = %config.provider, base_url = %base_url, "Building provider");

    Ok(Arc::new(OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
    )))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("deepseek").contains("api.deepseek.com"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_requires_api_key() {
        let config = AppConfig::default();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, CompletionError::NotConfigured(_)));
    }

    #[test]
    fn build_uses_configured_provider_name() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            provider: "openai".into(),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
