//! Doctor command - verify configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Outcome of one diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pass,
    Warn,
    Fail,
}

/// One line of the doctor report.
#[derive(Debug)]
pub struct Check {
    pub level: Level,
    pub name: &'static str,
    pub detail: String,
    pub fix: Option<&'static str>,
}

impl Check {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            level: Level::Pass,
            name,
            detail: detail.into(),
            fix: None,
        }
    }

    fn warn(name: &'static str, detail: impl Into<String>, fix: &'static str) -> Self {
        Self {
            level: Level::Warn,
            name,
            detail: detail.into(),
            fix: Some(fix),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, fix: &'static str) -> Self {
        Self {
            level: Level::Fail,
            name,
            detail: detail.into(),
            fix: Some(fix),
        }
    }

    fn print(&self) {
        let icon = match self.level {
            Level::Pass => style("✓").green(),
            Level::Warn => style("!").yellow(),
            Level::Fail => style("✗").red(),
        };
        println!("  {} {} - {}", icon, style(self.name).bold(), self.detail);
        if let Some(fix) = self.fix {
            println!("    {} {}", style("→").dim(), style(fix).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("tubeqa Doctor");
    println!();
    println!("Checking configuration...\n");

    let sections = [
        (
            "API Configuration",
            vec![check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref())],
        ),
        (
            "Configuration",
            vec![check_config_file(config_path), check_settings(settings)],
        ),
    ];

    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
        }
        println!();
    }

    Output::kv("Transcript language", &settings.transcript.language);
    Output::kv(
        "Chunking",
        &format!(
            "{} chars, {} overlap",
            settings.chunking.chunk_size, settings.chunking.chunk_overlap
        ),
    );
    Output::kv("Embedding model", &settings.embedding.model);
    Output::kv("Answer model", &settings.answer.model);
    Output::kv("Retrieved chunks", &settings.retrieval.k.to_string());
    println!();

    let count = |level: Level| {
        sections
            .iter()
            .flat_map(|(_, checks)| checks)
            .filter(|c| c.level == level)
            .count()
    };
    let errors = count(Level::Fail);
    let warnings = count(Level::Warn);

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using tubeqa.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! tubeqa is ready to use.");
    }

    Ok(())
}

/// Check the OpenAI API key without printing it.
fn check_openai_api_key(key: Option<&str>) -> Check {
    const NAME: &str = "OPENAI_API_KEY";
    const SET_IT: &str = "Set with: export OPENAI_API_KEY='sk-...'";

    match key.map(str::trim) {
        None => Check::fail(NAME, "not set", SET_IT),
        Some("") => Check::fail(NAME, "empty", SET_IT),
        Some(key) if key.starts_with("sk-") && key.len() > 20 => Check::pass(
            NAME,
            format!("configured ({}...{})", &key[..7], &key[key.len() - 4..]),
        ),
        Some(_) => Check::warn(
            NAME,
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
    }
}

fn check_config_file(config_path: &Path) -> Check {
    if config_path.exists() {
        Check::pass("Config file", config_path.display().to_string())
    } else {
        Check::warn(
            "Config file",
            format!("{} not found, using defaults", config_path.display()),
            "Create with: tubeqa config edit",
        )
    }
}

fn check_settings(settings: &Settings) -> Check {
    match settings.validate() {
        Ok(()) => Check::pass("Settings", "valid"),
        Err(e) => Check::fail("Settings", e.to_string(), "Fix with: tubeqa config edit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_checks() {
        let result = check_openai_api_key(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(result.level, Level::Pass);
        assert!(result.detail.contains("sk-abcd...wxyz"));
        assert!(result.fix.is_none());

        assert_eq!(check_openai_api_key(Some(" ")).level, Level::Fail);
        assert_eq!(check_openai_api_key(Some("abc")).level, Level::Warn);
        assert_eq!(check_openai_api_key(None).level, Level::Fail);
    }

    #[test]
    fn test_missing_config_file_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_config_file(&dir.path().join("config.toml"));
        assert_eq!(check.level, Level::Warn);
        assert_eq!(check_config_file(dir.path()).level, Level::Pass);
    }

    #[test]
    fn test_invalid_settings_reported() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert_eq!(check_settings(&settings).level, Level::Fail);
        assert_eq!(check_settings(&Settings::default()).level, Level::Pass);
    }
}
