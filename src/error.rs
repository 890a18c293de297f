//! Error types for the aggregation pipeline.
//!
//! Four failure classes, each fatal: input-side problems (folder, field
//! list, targets file), the unsupported-format guard, per-file parse
//! failures, and report output failures. Every variant carries the path
//! the operator needs to diagnose and rerun.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::LogFormat;

/// Errors surfaced by the aggregation pipeline.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("input folder does not exist or is not a directory: {0}")]
    InputFolderMissing(PathBuf),

    #[error("failed to read input folder: {path}")]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no .{extension} log files found in {folder}")]
    NoLogFiles {
        folder: PathBuf,
        extension: &'static str,
    },

    #[error("no plugin fields requested")]
    NoFields,

    #[error("blank plugin field name in field list")]
    BlankField,

    #[error("log format '{0}' is not supported in this version")]
    UnsupportedFormat(LogFormat),

    #[error("failed to read log file: {path}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse log file as JSON: {path}")]
    ParseLog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read targets file: {path}")]
    ReadTargets {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report to {path}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to save report to {path}")]
    PersistReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AggregateError>;
