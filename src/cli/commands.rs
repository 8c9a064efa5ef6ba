//! CLI commands
//!
//! Commands that inspect configuration or the extraction setup without
//! running the workflow. Each returns the text to print.

use crate::core::{Config, Result};
use crate::extract::RecordSchema;
use crate::llm::models::{find_preset, get_model_presets};
use crate::llm::{create_provider, ModelId};

/// Subcommands of `pagescout config`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
    /// Print the configuration file path
    Path,
}

/// JSON schema sent to the model
pub fn schema_text() -> Result<String> {
    let schema = RecordSchema::interactive_elements().to_json_schema();
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Models offered by the configured provider, plus the known presets
pub async fn models_text(config: &Config) -> Result<String> {
    let current = ModelId::parse(&config.model.name)?;
    let (provider, _) = create_provider(config)?;
    let models = provider.list_models().await?;

    let mut output = format!("Available models ({}):\n", provider.name());
    for model in &models {
        output.push_str(&format!("  - {}\n", model));
    }

    output.push_str("\nPresets:\n");
    for preset in get_model_presets() {
        output.push_str(&format!(
            "  - {:<40} {} - {}\n",
            preset.id, preset.display_name, preset.description
        ));
    }

    let label = find_preset(&current.to_string())
        .map(|p| p.display_name)
        .unwrap_or_else(|| "custom".to_string());
    output.push_str(&format!("\nCurrent: {} ({})", current, label));
    Ok(output)
}

/// Run a `config` subcommand
pub fn config_command(action: ConfigAction, config: &Config) -> Result<String> {
    match action {
        ConfigAction::Show => Ok(format!(
            "# {}\n{}",
            Config::config_file().display(),
            config.to_toml()?
        )),
        ConfigAction::Init => {
            if Config::config_file().exists() {
                return Ok(format!(
                    "Config already exists at {}",
                    Config::config_file().display()
                ));
            }
            let path = Config::default().save()?;
            Ok(format!("Wrote default config to {}", path.display()))
        }
        ConfigAction::Path => Ok(Config::config_file().display().to_string()),
    }
}
