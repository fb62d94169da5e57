//! `studymate config` — Configuration management commands.

use studymate_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() {
                warnings.push("No API key set (set STUDYMATE_API_KEY or DEEPSEEK_API_KEY env var)");
            }
            if config.base_url.as_deref().is_some_and(|u| !u.starts_with("http")) {
                warnings.push("base_url does not look like an http(s) URL");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            let selection = config.selection()?;
            println!();
            println!("   Provider:  {}", config.provider);
            println!("   Model:     {}", config.model);
            println!("   Summary:   {}", config.summary_model());
            println!("   Subject:   {}", selection.subject.label());
            println!("   Style:     {}", selection.style.label());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
