//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::models::LogFormat;

/// wwparse - WhatWeb log aggregator
///
/// Take a folder of per-target WhatWeb JSON logs and consolidate selected
/// plugin fields into a single CSV report, one row per scanned target.
///
/// Examples:
///   wwparse -i ./whatweb-logs -p HTTPServer,IP,X-Powered-By -o report.csv
///   wwparse -i ./whatweb-logs -p HTTPServer -o report.csv --targets urls.txt
///   wwparse -i ./whatweb-logs -p HTTPServer -o report.csv --dry-run
///   wwparse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Folder containing WhatWeb log output
    #[arg(
        short = 'i',
        long,
        value_name = "DIR",
        required_unless_present = "init_config"
    )]
    pub input_folder: Option<PathBuf>,

    /// WhatWeb plugin fields to extract into CSV columns (comma-separated)
    ///
    /// The order given here is the column order of the report
    /// (e.g. -p HTTPServer,IP,X-Powered-By).
    #[arg(
        short = 'p',
        long,
        value_name = "FIELDS",
        value_delimiter = ',',
        required_unless_present = "init_config"
    )]
    pub plugin_fields: Vec<String>,

    /// Where the CSV report should be saved
    ///
    /// An existing file at this path is overwritten.
    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub output_file: Option<PathBuf>,

    /// WhatWeb log format to parse (JSON is default, XML not supported in v0.1)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Original target list fed to the scan driver
    ///
    /// Log file names are targets with non-alphanumerics stripped, which is
    /// lossy. When this list is given, colliding targets and orphan log
    /// files are reported before aggregation.
    #[arg(long, value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// List matching log files without parsing or writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wwparse.toml in the current directory
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generate a default .wwparse.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref targets) = self.targets {
            if !targets.is_file() {
                return Err(format!(
                    "Targets file does not exist: {}",
                    targets.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
impl Args {
    /// A fully-populated baseline for unit tests across modules.
    pub(crate) fn for_tests() -> Self {
        Args {
            input_folder: Some(PathBuf::from("logs")),
            plugin_fields: vec!["HTTPServer".to_string(), "IP".to_string()],
            output_file: Some(PathBuf::from("report.csv")),
            log_format: None,
            targets: None,
            dry_run: false,
            config: None,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }
}
