//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let updated = set_value(&settings, key, value)?;
            updated.save_to(&config_path)?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            if !config_path.exists() {
                settings.save_to(&config_path)?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Return a copy of `settings` with the dotted `key` set to `value`.
///
/// The value is parsed as a TOML scalar of the same type as the current one,
/// and the result must still be a valid configuration.
fn set_value(settings: &Settings, key: &str, value: &str) -> Result<Settings> {
    let mut root = toml::Value::try_from(settings)?;

    let (sections, field) = match key.rsplit_once('.') {
        Some((sections, field)) => (Some(sections), field),
        None => (None, key),
    };

    let mut table = root
        .as_table_mut()
        .ok_or_else(|| anyhow!("Configuration is not a table"))?;
    for section in sections.into_iter().flat_map(|s| s.split('.')) {
        table = table
            .get_mut(section)
            .and_then(|v| v.as_table_mut())
            .ok_or_else(|| anyhow!("Unknown configuration section '{}'", section))?;
    }

    let existing = table
        .get(field)
        .ok_or_else(|| anyhow!("Unknown configuration key '{}'", key))?;
    let parsed = parse_like(existing, value)?;
    table.insert(field.to_string(), parsed);

    let updated: Settings = root.try_into()?;
    updated.validate()?;
    Ok(updated)
}

/// Parse `raw` into the same TOML type as `existing`.
fn parse_like(existing: &toml::Value, raw: &str) -> Result<toml::Value> {
    let value = match existing {
        toml::Value::Integer(_) => toml::Value::Integer(raw.parse()?),
        toml::Value::Float(_) => toml::Value::Float(raw.parse()?),
        toml::Value::Boolean(_) => toml::Value::Boolean(raw.parse()?),
        toml::Value::String(_) => toml::Value::String(raw.to_string()),
        other => bail!(
            "Cannot set a {} value from the command line; use 'tubeqa config edit'",
            other.type_str()
        ),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_types() {
        let settings = Settings::default();

        let updated = set_value(&settings, "answer.model", "gpt-4o").unwrap();
        assert_eq!(updated.answer.model, "gpt-4o");

        let updated = set_value(&settings, "retrieval.k", "6").unwrap();
        assert_eq!(updated.retrieval.k, 6);

        let updated = set_value(&settings, "answer.temperature", "0.2").unwrap();
        assert!((updated.answer.temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let settings = Settings::default();
        assert!(set_value(&settings, "retrieval.k", "many").is_err());
        assert!(set_value(&settings, "nosuch.key", "1").is_err());
        assert!(set_value(&settings, "answer.nosuch", "1").is_err());
        assert!(set_value(&settings, "chunking.chunk_overlap", "500").is_err());
        assert!(set_value(&settings, "chunking.separators", "x").is_err());
    }
}
