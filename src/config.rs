//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.repboard.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::models::DEFAULT_WORKOUTS;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".repboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Tracker settings.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Snapshot file holding all tracker data.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            verbose: false,
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("workout_data.json")
}

/// Tracker behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Workouts registered when no snapshot exists yet.
    #[serde(default = "default_workouts")]
    pub default_workouts: Vec<String>,

    /// Days covered by `progress` when no range is given.
    #[serde(default = "default_progress_window")]
    pub progress_window_days: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_workouts: default_workouts(),
            progress_window_days: default_progress_window(),
        }
    }
}

fn default_workouts() -> Vec<String> {
    DEFAULT_WORKOUTS.iter().map(|w| w.to_string()).collect()
}

fn default_progress_window() -> u32 {
    30
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,

    /// Prefix leaderboard lines with medals.
    #[serde(default = "default_true")]
    pub show_medals: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_medals: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.general.data_file = data.clone();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.data_file, PathBuf::from("workout_data.json"));
        assert_eq!(config.tracker.progress_window_days, 30);
        assert_eq!(
            config.tracker.default_workouts,
            vec!["Push-ups", "Pull-ups", "Squats"]
        );
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.report.show_medals);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
data_file = "club/reps.json"
verbose = true

[tracker]
default_workouts = ["Burpees"]
progress_window_days = 7

[report]
format = "json"
show_medals = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.data_file, PathBuf::from("club/reps.json"));
        assert!(config.general.verbose);
        assert_eq!(config.tracker.default_workouts, vec!["Burpees"]);
        assert_eq!(config.tracker.progress_window_days, 7);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(!config.report.show_medals);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[tracker]\nprogress_window_days = 14\n").unwrap();
        assert_eq!(config.tracker.progress_window_days, 14);
        assert_eq!(config.tracker.default_workouts.len(), 3);
        assert_eq!(config.general.data_file, PathBuf::from("workout_data.json"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[tracker]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tracker.default_workouts.len(), 3);
    }
}
