//! CSV report generation.
//!
//! Writes the header row (the selected field names, in input order)
//! followed by one data row per scan record, with standard CSV quoting.
//! The report is written through a temporary file in the destination
//! directory and renamed into place, so a failed run never leaves a
//! truncated report behind.

use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::models::{FieldSelection, ScanRecord};

/// Write the consolidated CSV report to `path`, overwriting any prior file.
///
/// On success the file contains exactly `1 + records.len()` lines, every
/// row with the same column count as the header.
pub fn write_csv_report(
    records: &[ScanRecord],
    fields: &FieldSelection,
    path: &Path,
) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|source| AggregateError::PersistReport {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(tmp.as_file());

    let write_err = |source| AggregateError::WriteReport {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(fields.names()).map_err(write_err)?;
    for record in records {
        writer.write_record(record.project(fields)).map_err(write_err)?;
    }
    writer.flush().map_err(|source| AggregateError::PersistReport {
        path: path.to_path_buf(),
        source,
    })?;
    drop(writer);

    debug!("Persisting report to {}", path.display());
    tmp.persist(path)
        .map_err(|e| AggregateError::PersistReport {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}
