pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod init;

use studymate_agent::{Orchestrator, Session};
use studymate_config::AppConfig;
use studymate_core::selection::Selection;
use studymate_memory::{SummaryMemory, SummaryOptions};

/// Everything one conversation needs, built from config.
pub struct Runtime {
    pub orchestrator: Orchestrator,
    pub session: Session,
    pub selection: Selection,
}

/// Load config and make sure a key is available before any request.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    STUDYMATE_API_KEY   (generic)");
        eprintln!("    DEEPSEEK_API_KEY    (DeepSeek)");
        eprintln!("    OPENAI_API_KEY      (OpenAI)");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    Ok(config)
}

/// Start from the configured selection and apply any command-line labels.
pub fn resolve_selection(
    config: &AppConfig,
    subject: Option<&str>,
    style: Option<&str>,
) -> Result<Selection, Box<dyn std::error::Error>> {
    let mut selection = config.selection()?;
    if let Some(label) = subject {
        selection.subject = label.parse()?;
    }
    if let Some(label) = style {
        selection.style = label.parse()?;
    }
    Ok(selection)
}

pub fn build_runtime(
    config: &AppConfig,
    selection: Selection,
) -> Result<Runtime, Box<dyn std::error::Error>> {
    let provider = studymate_providers::build_from_config(config)?;
    let memory = SummaryMemory::new(provider.clone(), SummaryOptions::from_config(config));
    let orchestrator = Orchestrator::from_config(provider, config);
    let session = Session::new(Box::new(memory), config.chat.greeting.clone());

    Ok(Runtime {
        orchestrator,
        session,
        selection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use studymate_core::selection::{Style, Subject};

    #[test]
    fn flags_override_config_selection() {
        let config = AppConfig::default();
        let selection = resolve_selection(&config, Some("数学"), None).unwrap();
        assert_eq!(selection, Selection::new(Subject::Math, Style::Concise));

        let selection = resolve_selection(&config, None, Some("详细")).unwrap();
        assert_eq!(selection.style, Style::Detailed);
    }

    #[test]
    fn unknown_flag_label_is_an_error() {
        let config = AppConfig::default();
        assert!(resolve_selection(&config, Some("化学"), None).is_err());
    }
}
