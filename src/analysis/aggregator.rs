//! The aggregation run.
//!
//! Strictly sequential, single pass: enumerate log files, parse each one,
//! project the requested fields, write the CSV report. A malformed file
//! aborts the whole run; there is no partial-report recovery.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::{AggregateError, Result};
use crate::models::{FieldSelection, LogFormat};
use crate::report;
use crate::scanner::LogScanner;
use crate::targets::TargetIndex;

/// Knobs passed explicitly into the run; the aggregator holds no ambient
/// state.
#[derive(Debug, Default)]
pub struct AggregateOptions {
    /// Show a progress bar over the per-file parse loop.
    pub show_progress: bool,
    /// Original target list, when the operator supplied one, used to
    /// surface filename collisions before aggregating.
    pub targets: Option<TargetIndex>,
}

/// What an aggregation run produced.
#[derive(Debug, Clone, Copy)]
pub struct AggregateSummary {
    /// Number of scan records parsed (= data rows written).
    pub records: usize,
    /// Number of columns in the report.
    pub columns: usize,
}

/// Aggregate a folder of per-target scan logs into one CSV report.
///
/// Fails before touching any file when the format is unsupported; fails
/// without writing anything when the input folder or any single log file
/// is bad. Every parsed record contributes exactly one row.
pub fn aggregate(
    input_folder: &Path,
    format: LogFormat,
    fields: &FieldSelection,
    output_file: &Path,
    options: &AggregateOptions,
) -> Result<AggregateSummary> {
    if format != LogFormat::Json {
        return Err(AggregateError::UnsupportedFormat(format));
    }

    let scanner = LogScanner::new(input_folder, format);
    let files = scanner.discover()?;
    info!("Found {} log files to parse", files.len());

    if let Some(index) = &options.targets {
        surface_naming_ambiguities(index, &files);
    }

    let bar = if options.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        if let Some(ref pb) = bar {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                pb.set_message(name.to_string());
            }
        }
        let record = scanner.load(path)?;
        debug!("Parsed {}", record.path().display());
        records.push(record);
        if let Some(ref pb) = bar {
            pb.inc(1);
        }
    }
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    report::write_csv_report(&records, fields, output_file)?;

    Ok(AggregateSummary {
        records: records.len(),
        columns: fields.len(),
    })
}

/// Warn about log files whose provenance the naming scheme has made
/// ambiguous or unknown. Rows are never relabeled or dropped; the
/// limitation is only surfaced.
fn surface_naming_ambiguities(index: &TargetIndex, files: &[PathBuf]) {
    for (stem, targets) in index.collisions() {
        warn!(
            "{} targets share the same log file name '{}.json'; only the last scan survives: {}",
            targets.len(),
            stem,
            targets.join(", ")
        );
    }

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if index.targets_for(stem).is_none() {
            warn!(
                "log file {} matches no target in the supplied list",
                path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn fields() -> FieldSelection {
        FieldSelection::new(["HTTPServer", "IP", "X-Powered-By"]).unwrap()
    }

    fn write_log(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_aggregate_writes_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        write_log(&logs, "exampleorg.json", r#"{"HTTPServer": "nginx", "IP": ["203.0.113.5"]}"#);
        write_log(&logs, "examplecom.json", r#"{"HTTPServer": "Apache"}"#);

        let out = dir.path().join("report.csv");
        let summary = aggregate(
            &logs,
            LogFormat::Json,
            &fields(),
            &out,
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.columns, 3);

        let contents = fs::read_to_string(&out).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "HTTPServer,IP,X-Powered-By");
        // Rows come out in file-name order, not directory order.
        assert_eq!(lines[1], "Apache,,");
        assert_eq!(lines[2], "nginx,203.0.113.5,");
    }

    #[test]
    fn test_aggregate_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        write_log(&logs, "a.json", r#"{"IP": ["10.0.0.2", "10.0.0.1"]}"#);
        write_log(&logs, "b.json", r#"{"HTTPServer": "nginx"}"#);

        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let opts = AggregateOptions::default();

        aggregate(&logs, LogFormat::Json, &fields(), &first, &opts).unwrap();
        aggregate(&logs, LogFormat::Json, &fields(), &second, &opts).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_xml_format_fails_before_any_processing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.csv");

        // Folder deliberately missing: the format guard must fire first.
        let err = aggregate(
            &dir.path().join("nope"),
            LogFormat::Xml,
            &fields(),
            &out,
            &AggregateOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, AggregateError::UnsupportedFormat(LogFormat::Xml)));
        assert!(!out.exists());
    }

    #[test]
    fn test_malformed_log_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        write_log(&logs, "good.json", r#"{"HTTPServer": "nginx"}"#);
        write_log(&logs, "zz-bad.json", "Hostname not known");

        let out = dir.path().join("report.csv");
        let err = aggregate(
            &logs,
            LogFormat::Json,
            &fields(),
            &out,
            &AggregateOptions::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("zz-bad.json"));
        assert!(!out.exists());
    }
}
