//! Data models for scan records and field projection.
//!
//! A scan record is whatever the fingerprinting tool wrote for one target:
//! a JSON object whose top-level keys are plugin names. Values are
//! scanner-defined, so field lookup goes through an explicit discriminated
//! type ([`FieldValue`]) with a total mapping to a CSV cell string.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AggregateError, Result};

/// Separator used when a plugin value is a list and must be flattened
/// into a single CSV cell.
pub const LIST_SEPARATOR: &str = ";";

/// Log format produced by the scan tool.
///
/// XML is listed for parity with the scan tool's own output formats but is
/// not implemented in this version; requesting it fails before any
/// processing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON logs (default)
    #[default]
    Json,
    /// XML logs (not supported in v0.1)
    Xml,
}

impl LogFormat {
    /// File extension (without dot) the scan driver uses for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A plugin value as found in a scan record.
///
/// Scanner output is duck-typed (string, number, or list); this pins it to
/// the three cases the report cares about. `cell` is total: every variant
/// renders to exactly one CSV cell string.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single scalar value.
    Text(String),
    /// A list of values, flattened with [`LIST_SEPARATOR`] on output.
    List(Vec<String>),
    /// The plugin did not appear in the record.
    Absent,
}

impl FieldValue {
    /// Classify a raw JSON value (or its absence) from a scan record.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::Array(items)) => {
                FieldValue::List(items.iter().map(scalar_cell).collect())
            }
            Some(other) => FieldValue::Text(scalar_cell(other)),
        }
    }

    /// Render this value as a single CSV cell.
    ///
    /// List elements are joined in the order the scanner emitted them;
    /// they are never reordered here.
    pub fn cell(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(LIST_SEPARATOR),
            FieldValue::Absent => String::new(),
        }
    }
}

/// Render one scalar scanner value as cell text.
///
/// Nested arrays/objects inside a list are scanner-defined payloads we do
/// not interpret; they fall back to their compact JSON rendering.
fn scalar_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Ordered set of plugin names selected for the report.
///
/// Input order is preserved as the CSV column order. Names are trimmed,
/// blank names are rejected, and duplicates collapse to their first
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    names: Vec<String>,
}

impl FieldSelection {
    /// Build a selection from raw user input.
    pub fn new<I>(raw: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in raw {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(AggregateError::BlankField);
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        if names.is_empty() {
            return Err(AggregateError::NoFields);
        }

        Ok(Self { names })
    }

    /// The selected plugin names, in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns in the report.
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// One parsed scan-output file.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    path: PathBuf,
    plugins: Map<String, Value>,
}

impl ScanRecord {
    /// Parse a record from the raw contents of a log file.
    ///
    /// The content must be one JSON object keyed by plugin name; anything
    /// else (including a top-level array) is malformed.
    pub fn from_json_str(path: &Path, contents: &str) -> serde_json::Result<Self> {
        let plugins: Map<String, Value> = serde_json::from_str(contents.trim())?;
        Ok(Self {
            path: path.to_path_buf(),
            plugins,
        })
    }

    /// The log file this record was parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The alnum-filtered target name this record was stored under.
    #[allow(dead_code)] // Utility for provenance lookups
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Look up one plugin field.
    pub fn field(&self, name: &str) -> FieldValue {
        FieldValue::from_json(self.plugins.get(name))
    }

    /// Project this record onto a field selection, one cell per column.
    ///
    /// Absent fields project to empty cells so every row has the same
    /// column count as the header.
    pub fn project(&self, fields: &FieldSelection) -> Vec<String> {
        fields.names().iter().map(|n| self.field(n).cell()).collect()
    }
}
