//! Log-file discovery and record loading.
//!
//! The scan phase leaves one structured file per target in a single flat
//! folder; this scanner enumerates the files matching the requested format
//! and parses each into a [`ScanRecord`]. Enumeration is sorted by file
//! name so repeated runs over an unchanged folder see the same sequence
//! regardless of directory-listing order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::models::{LogFormat, ScanRecord};

/// Scanner over a folder of per-target log files.
pub struct LogScanner {
    folder: PathBuf,
    format: LogFormat,
}

impl LogScanner {
    /// Create a scanner for one log folder.
    pub fn new(folder: &Path, format: LogFormat) -> Self {
        Self {
            folder: folder.to_path_buf(),
            format,
        }
    }

    /// Enumerate all log files matching the format's extension.
    ///
    /// Non-recursive: the scan driver writes a flat folder. Fails if the
    /// folder is missing/unreadable or contains no matching files.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.folder.is_dir() {
            return Err(AggregateError::InputFolderMissing(self.folder.clone()));
        }

        let entries = fs::read_dir(&self.folder).map_err(|source| AggregateError::ReadFolder {
            path: self.folder.clone(),
            source,
        })?;

        let extension = self.format.extension();
        let mut files = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
                files.push(path);
            } else {
                debug!("Skipping non-log entry: {}", path.display());
            }
        }

        if files.is_empty() {
            return Err(AggregateError::NoLogFiles {
                folder: self.folder.clone(),
                extension,
            });
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Read and parse one log file into a scan record.
    pub fn load(&self, path: &Path) -> Result<ScanRecord> {
        let contents = fs::read_to_string(path).map_err(|source| AggregateError::ReadLog {
            path: path.to_path_buf(),
            source,
        })?;

        ScanRecord::from_json_str(path, &contents).map_err(|source| AggregateError::ParseLog {
            path: path.to_path_buf(),
            source,
        })
    }
}
