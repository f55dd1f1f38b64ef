//! Application settings loading from config.toml
//!
//! This module loads the optional TOML configuration file. Every section has
//! defaults, so a missing file or a file that only sets a few keys is fine.
//! The file location is taken from `HABIT_BUDDY_CONFIG`, falling back to
//! `./config.toml`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "HABIT_BUDDY_CONFIG";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shared store settings
    pub store: StoreConfig,
    /// Widget dashboard settings
    pub widget: WidgetConfig,
    /// Onboarding habit suggestions; the built-in list is used when empty
    pub suggestions: Vec<SuggestionConfig>,
}

/// `[store]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the `SQLite` file shared by every reader and writer
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/habit_buddy.sqlite"),
        }
    }
}

/// `[widget]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Fallback re-render period when no refresh signal arrives
    pub refresh_interval_minutes: u64,
    /// Maximum number of habits shown on the dashboard, clamped to 1-25 when rendering
    pub max_habits: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: 5,
            max_habits: 6,
        }
    }
}

/// A single `[[suggestions]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SuggestionConfig {
    /// Habit name
    pub name: String,
    /// Icon key
    pub icon: String,
    /// Color key
    pub color: String,
    /// Category label
    pub category: String,
    /// Daily target count
    #[serde(default = "default_target_count")]
    pub target_count: i32,
}

const fn default_target_count() -> i32 {
    1
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration from `HABIT_BUDDY_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: the defaults are used instead. A file that
/// exists but cannot be parsed is reported.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if !path.exists() {
        tracing::info!(
            "No configuration file at {}, using defaults.",
            path.display()
        );
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)
        .inspect_err(|e| tracing::error!("Critical error loading configuration: {}", e))?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [store]
            path = "/tmp/shared/HabitTracker.sqlite"

            [widget]
            refresh_interval_minutes = 10
            max_habits = 4

            [[suggestions]]
            name = "Stretch"
            icon = "figure.walk"
            color = "mint"
            category = "Fitness"

            [[suggestions]]
            name = "Drink water"
            icon = "drop"
            color = "teal"
            category = "Health"
            target_count = 8
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.store.path,
            PathBuf::from("/tmp/shared/HabitTracker.sqlite")
        );
        assert_eq!(config.widget.refresh_interval_minutes, 10);
        assert_eq!(config.widget.max_habits, 4);
        assert_eq!(config.suggestions.len(), 2);
        assert_eq!(config.suggestions[0].target_count, 1);
        assert_eq!(config.suggestions[1].target_count, 8);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.path, PathBuf::from("data/habit_buddy.sqlite"));
        assert_eq!(config.widget.refresh_interval_minutes, 5);
        assert_eq!(config.widget.max_habits, 6);
        assert!(config.suggestions.is_empty());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str("[widget]\nmax_habits = 3\n").unwrap();
        assert_eq!(config.widget.max_habits, 3);
        assert_eq!(config.widget.refresh_interval_minutes, 5);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
