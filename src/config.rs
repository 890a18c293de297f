//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wwparse.toml` files. Everything here is optional: the CLI alone is a
//! complete surface, and CLI arguments always take precedence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::LogFormat;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Aggregator settings.
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Aggregator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Default scan log format to parse.
    #[serde(default)]
    pub log_format: LogFormat,
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
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".wwparse.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; optional arguments only override when
    /// explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.log_format {
            self.aggregator.log_format = format;
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
        assert_eq!(config.aggregator.log_format, LogFormat::Json);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[aggregator]
log_format = "json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.aggregator.log_format, LogFormat::Json);
    }

    #[test]
    fn test_cli_format_overrides_config() {
        let mut config = Config::default();
        config.aggregator.log_format = LogFormat::Xml;

        let mut args = crate::cli::Args::for_tests();
        args.log_format = Some(LogFormat::Json);
        config.merge_with_args(&args);

        assert_eq!(config.aggregator.log_format, LogFormat::Json);
    }

    #[test]
    fn test_config_format_kept_when_cli_silent() {
        let mut config = Config::default();
        config.aggregator.log_format = LogFormat::Xml;

        let args = crate::cli::Args::for_tests();
        config.merge_with_args(&args);

        assert_eq!(config.aggregator.log_format, LogFormat::Xml);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[aggregator]"));
    }
}
