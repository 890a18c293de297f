//! wwparse - WhatWeb Log Aggregator
//!
//! A CLI tool that consolidates per-target WhatWeb JSON scan logs into a
//! single CSV report of selected plugin fields, one row per target.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input folder, malformed log, write failure)
//!   2 - CLI usage error (missing/invalid options)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;
mod targets;

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use analysis::AggregateOptions;
use cli::Args;
use config::Config;
use models::{FieldSelection, LogFormat};
use scanner::LogScanner;
use targets::TargetIndex;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("wwparse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the aggregation
    if let Err(e) = run(args) {
        error!("Aggregation failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .wwparse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".wwparse.toml");

    if path.exists() {
        eprintln!("⚠️  .wwparse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .wwparse.toml")?;

    println!("✅ Created .wwparse.toml with default settings.");
    println!("   Edit it to customize the default log format and verbosity.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete aggregation workflow.
fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let format = config.aggregator.log_format;
    let input_folder = args
        .input_folder
        .as_deref()
        .context("--input-folder is required")?;
    let output_file = args
        .output_file
        .as_deref()
        .context("--output-file is required")?;

    // The only format implemented in v0.1 is JSON; refuse everything else
    // before touching the filesystem.
    if format != LogFormat::Json {
        return Err(error::AggregateError::UnsupportedFormat(format).into());
    }

    let fields = FieldSelection::new(&args.plugin_fields)?;

    // Handle --dry-run: list log files and exit
    if args.dry_run {
        return handle_dry_run(input_folder, format);
    }

    // Load the original target list, if the operator supplied one
    let target_index = match &args.targets {
        Some(path) => {
            let index = TargetIndex::load(path)?;
            info!("Loaded {} targets from {}", index.len(), path.display());
            if index.is_empty() {
                warn!("Targets file {} contains no targets", path.display());
            }
            Some(index)
        }
        None => None,
    };

    println!(
        "🔍 Aggregating {} logs from: {}",
        format,
        input_folder.display()
    );

    let options = AggregateOptions {
        show_progress: std::io::stderr().is_terminal() && !args.quiet,
        targets: target_index,
    };

    let summary = analysis::aggregate(input_folder, format, &fields, output_file, &options)?;

    println!("\n📊 Aggregation Summary:");
    println!("   Records: {}", summary.records);
    println!("   Columns: {}", summary.columns);
    println!(
        "\n✅ Report saved to: {}",
        output_file.display()
    );

    Ok(())
}

/// Handle --dry-run: enumerate log files, print what would be parsed, exit.
fn handle_dry_run(input_folder: &Path, format: LogFormat) -> Result<()> {
    println!("\n🔍 Dry run: listing {} logs (nothing parsed, nothing written)...\n", format);

    let files = LogScanner::new(input_folder, format).discover()?;

    for file in &files {
        println!("     📄 {}", file.display());
    }
    println!("\n   Total: {} log files", files.len());

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .wwparse.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
