//! Runtime settings for the output sink.
//!
//! Defaults, then an optional TOML file (`CMDBASE_CONFIG`, else
//! `cmdbase.toml` in the working directory), then the environment
//! (`NO_COLOR`, `CMDBASE_COLOR`, `CMDBASE_SHOW_LEVEL`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{ColorMode, Level};

pub const ENV_COLOR: &str = "CMDBASE_COLOR";
pub const ENV_SHOW_LEVEL: &str = "CMDBASE_SHOW_LEVEL";
pub const ENV_CONFIG: &str = "CMDBASE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cmdbase.toml";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When to emit ANSI colors.
    pub color: ColorMode,
    /// Initial minimum level shown; `/v` and `/q` override it per run.
    pub show_level: Level,
}

impl Settings {
    /// Settings file (if any) with environment overrides applied.
    pub fn load() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_CONFIG)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut settings = Self::load_from_path(&path);
        settings.apply_env_with(&lookup);
        settings
    }

    /// Load settings from a TOML file.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse settings");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read settings");
                Self::default()
            }
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, a stand-in for the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_COLOR) {
            match value.parse() {
                Ok(mode) => self.color = mode,
                Err(e) => tracing::warn!(variable = ENV_COLOR, error = %e, "ignoring invalid value"),
            }
        }
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            self.color = ColorMode::Never;
        }
        if let Some(value) = lookup(ENV_SHOW_LEVEL) {
            match value.parse() {
                Ok(level) => self.show_level = level,
                Err(e) => {
                    tracing::warn!(variable = ENV_SHOW_LEVEL, error = %e, "ignoring invalid value")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.color, ColorMode::Auto);
        assert_eq!(settings.show_level, Level::Normal);
    }

    #[test]
    fn test_load_from_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cmdbase.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "color = \"never\"\nshow_level = \"warning\"").unwrap();

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.show_level, Level::Warning);
    }

    #[test]
    fn test_missing_or_invalid_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let missing = Settings::load_from_path(&temp.path().join("nope.toml"));
        assert_eq!(missing.color, ColorMode::Auto);

        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "color = [").unwrap();
        let invalid = Settings::load_from_path(&path);
        assert_eq!(invalid.show_level, Level::Normal);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env_with(env(&[(ENV_COLOR, "always"), (ENV_SHOW_LEVEL, "verbose")]));
        assert_eq!(settings.color, ColorMode::Always);
        assert_eq!(settings.show_level, Level::Verbose);
    }

    #[test]
    fn test_no_color_wins() {
        let mut settings = Settings::default();
        settings.apply_env_with(env(&[(ENV_COLOR, "always"), ("NO_COLOR", "1")]));
        assert_eq!(settings.color, ColorMode::Never);
    }

    #[test]
    fn test_environment_beats_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "color = \"always\"\nshow_level = \"warning\"\n").unwrap();
        let config = path.to_str().unwrap();

        let from_file = Settings::load_with(env(&[(ENV_CONFIG, config)]));
        assert_eq!(from_file.color, ColorMode::Always);
        assert_eq!(from_file.show_level, Level::Warning);

        let overridden =
            Settings::load_with(env(&[(ENV_CONFIG, config), (ENV_SHOW_LEVEL, "verbose")]));
        assert_eq!(overridden.color, ColorMode::Always);
        assert_eq!(overridden.show_level, Level::Verbose);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_env_with(env(&[(ENV_COLOR, "purple"), (ENV_SHOW_LEVEL, "loud")]));
        assert_eq!(settings.color, ColorMode::Auto);
        assert_eq!(settings.show_level, Level::Normal);
    }
}
