use polars::prelude::{CsvReadOptions, DataType, PolarsError, SerReader};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::checksum::calculate_checksum;
use crate::models::{ColumnMapping, Record};
use crate::transformations::cleaning::{normalize_missing, parse_observed_at};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected a JSON array of objects in {origin}, found {found}")]
    JsonShape { origin: String, found: String },
    #[error("Failed to parse CSV from {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: PolarsError,
    },
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// File formats understood by [`FileDataSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat(format!("{} has no extension", path.display())))?;
        extension.parse()
    }
}

impl FromStr for SourceFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SourceFormat::Json),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Json => f.write_str("json"),
            SourceFormat::Csv => f.write_str("csv"),
        }
    }
}

/// A fully loaded, read-only record set together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source_id: String,
    pub checksum: String,
    /// Source column names in source order
    pub columns: Vec<String>,
    pub mapping: ColumnMapping,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Placeholder used when loading failed; every view of it is "no data".
    pub fn empty(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            checksum: String::new(),
            columns: Vec::new(),
            mapping: ColumnMapping::default(),
            records: Vec::new(),
        }
    }

    /// Build records from text rows aligned with `columns`.
    ///
    /// Cells are cleaned on the way in: NA markers become missing and the date
    /// column is coerced, with unparseable dates treated as missing.
    pub fn from_rows(
        source_id: impl Into<String>,
        checksum: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
        mapping: ColumnMapping,
    ) -> Self {
        let source_id = source_id.into();

        for mapped in [
            &mapping.sector,
            &mapping.department_code,
            &mapping.organization_type,
            &mapping.observed_at,
        ] {
            if !columns.contains(mapped) {
                warn!(source = %source_id, column = %mapped, "mapped column not found; values will be missing");
            }
        }

        let mut unparsed_dates = 0usize;
        let records: Vec<Record> = rows
            .into_iter()
            .map(|row| {
                let mut record = Record::new();
                for (column, cell) in columns.iter().zip(row) {
                    let value = normalize_missing(cell.as_deref());
                    if *column == mapping.sector {
                        record.sector = value;
                    } else if *column == mapping.department_code {
                        record.department_code = value;
                    } else if *column == mapping.organization_type {
                        record.organization_type = value;
                    } else if *column == mapping.observed_at {
                        record.observed_at = value.as_deref().and_then(parse_observed_at);
                        if value.is_some() && record.observed_at.is_none() {
                            unparsed_dates += 1;
                        }
                    } else {
                        record.attributes.insert(column.clone(), value);
                    }
                }
                record
            })
            .collect();

        if unparsed_dates > 0 {
            warn!(source = %source_id, count = unparsed_dates, "unparseable dates treated as missing");
        }

        Self {
            source_id,
            checksum: checksum.into(),
            columns,
            mapping,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Anything that can yield the full record set.
pub trait DataSource: Send + Sync {
    /// Stable identity used as the cache key.
    fn source_id(&self) -> String;

    /// Checksum of the source as it is now, for change detection.
    fn checksum(&self) -> Result<String, LoadError>;

    fn load(&self) -> Result<Dataset, LoadError>;
}

/// A local JSON or CSV file.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    path: PathBuf,
    format: Option<SourceFormat>,
    mapping: ColumnMapping,
}

impl FileDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            mapping: ColumnMapping::default(),
        }
    }

    /// Override extension-based format detection.
    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(&self) -> Result<Vec<u8>, LoadError> {
        std::fs::read(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl DataSource for FileDataSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    fn checksum(&self) -> Result<String, LoadError> {
        Ok(calculate_checksum(&self.read_bytes()?))
    }

    fn load(&self) -> Result<Dataset, LoadError> {
        let format = match self.format {
            Some(format) => format,
            None => SourceFormat::from_path(&self.path)?,
        };
        let origin = self.source_id();
        debug!(source = %origin, %format, "loading data file");

        let bytes = self.read_bytes()?;
        let checksum = calculate_checksum(&bytes);
        let (columns, rows) = match format {
            SourceFormat::Json => parse_json(&bytes, &origin)?,
            SourceFormat::Csv => parse_csv(bytes, &origin)?,
        };

        let dataset = Dataset::from_rows(origin, checksum, columns, rows, self.mapping.clone());
        info!(
            source = %dataset.source_id,
            records = dataset.len(),
            columns = dataset.columns.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }
}

/// In-memory rows, for tests and for embedding the engine in another program.
#[derive(Debug, Clone)]
pub struct MemorySource {
    id: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    mapping: ColumnMapping,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            id: id.into(),
            columns,
            rows,
            mapping: ColumnMapping::default(),
        }
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }
}

impl DataSource for MemorySource {
    fn source_id(&self) -> String {
        self.id.clone()
    }

    fn checksum(&self) -> Result<String, LoadError> {
        let content = serde_json::to_vec(&(&self.columns, &self.rows)).map_err(|source| {
            LoadError::Json {
                origin: self.id.clone(),
                source,
            }
        })?;
        Ok(calculate_checksum(&content))
    }

    fn load(&self) -> Result<Dataset, LoadError> {
        Ok(Dataset::from_rows(
            self.id.clone(),
            self.checksum()?,
            self.columns.clone(),
            self.rows.clone(),
            self.mapping.clone(),
        ))
    }
}

type TextTable = (Vec<String>, Vec<Vec<Option<String>>>);

/// Parse a JSON array of flat objects. Columns are ordered by first appearance.
pub fn parse_json(bytes: &[u8], origin: &str) -> Result<TextTable, LoadError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::JsonShape {
                origin: origin.to_string(),
                found: json_kind(&other).to_string(),
            })
        }
    };

    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => objects.push(map),
            other => {
                return Err(LoadError::JsonShape {
                    origin: origin.to_string(),
                    found: format!("an array containing {}", json_kind(&other)),
                })
            }
        }
    }

    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for object in &objects {
        for key in object.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|column| object.get(column).and_then(cell_text))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

/// Parse CSV with a header row; every column is read as text.
pub fn parse_csv(bytes: Vec<u8>, origin: &str) -> Result<TextTable, LoadError> {
    let csv_error = |source: PolarsError| LoadError::Csv {
        origin: origin.to_string(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(csv_error)?;

    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(columns.len()); df.height()];
    for column in df.get_columns() {
        let text = column.cast(&DataType::String).map_err(csv_error)?;
        let values = text.str().map_err(csv_error)?;
        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            row.push(value.map(str::to_string));
        }
    }

    Ok((columns, rows))
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "loaders_tests.rs"]
mod tests;
