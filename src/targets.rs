//! Scan-driver output contract: log file naming and target lookup.
//!
//! The scan driver stores each target's report under the target string with
//! every non-alphanumeric character stripped. That mapping is lossy: two
//! distinct targets can collide on the same file name (the second scan
//! overwrites the first), and the original target cannot be recovered from
//! a stripped name. This module models the naming rule and, given the
//! operator's original target list, surfaces those ambiguities.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{AggregateError, Result};

/// Derive the log file stem the scan driver uses for a target.
///
/// Keeps ASCII alphanumerics only, matching the driver's naming scheme.
pub fn log_file_stem(target: &str) -> String {
    target
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Index from log file stems back to the targets that produce them.
#[derive(Debug, Clone, Default)]
pub struct TargetIndex {
    by_stem: BTreeMap<String, Vec<String>>,
}

impl TargetIndex {
    /// Load an index from a newline-delimited target list (the same file
    /// fed to the scan driver). Blank lines are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| AggregateError::ReadTargets {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(contents.lines()))
    }

    /// Build an index from individual target lines.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_stem: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for line in lines {
            let target = line.trim();
            if target.is_empty() {
                continue;
            }
            by_stem
                .entry(log_file_stem(target))
                .or_default()
                .push(target.to_string());
        }

        Self { by_stem }
    }

    /// Targets that map to the given log file stem, if any.
    pub fn targets_for(&self, stem: &str) -> Option<&[String]> {
        self.by_stem.get(stem).map(Vec::as_slice)
    }

    /// Stems claimed by more than one distinct target. Rows parsed from
    /// these files have ambiguous provenance: the later scan overwrote the
    /// earlier one.
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_stem
            .iter()
            .filter(|(_, targets)| targets.len() > 1)
            .map(|(stem, targets)| (stem.as_str(), targets.as_slice()))
    }

    /// Number of distinct log file stems in the index.
    pub fn len(&self) -> usize {
        self.by_stem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_stem.is_empty()
    }
}
