//! CSV export of a (filtered) record set.

use chrono::{NaiveDateTime, NaiveTime};
use polars::prelude::{Column, CsvWriter, DataFrame, PolarsError, SerWriter};
use thiserror::Error;

use crate::models::{ColumnMapping, Record};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build export frame: {0}")]
    Frame(#[source] PolarsError),
    #[error("Failed to write CSV: {0}")]
    Write(#[source] PolarsError),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Download name for an export taken at `timestamp`.
pub fn export_file_name(timestamp: NaiveDateTime) -> String {
    format!("haiti_data_filtered_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Serialize `records` as CSV with the dataset's column order.
///
/// Interpreted attributes go back under their source column names. Dates are
/// written as plain dates when every exported timestamp falls on midnight.
pub fn records_to_csv(
    columns: &[String],
    mapping: &ColumnMapping,
    records: &[Record],
) -> Result<String, ExportError> {
    let date_only = records
        .iter()
        .filter_map(|r| r.observed_at)
        .all(|ts| ts.time() == NaiveTime::MIN);

    let frame_columns: Vec<Column> = columns
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| cell_for(record, name, mapping, date_only))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();

    let mut frame = DataFrame::new(frame_columns).map_err(ExportError::Frame)?;

    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)
        .map_err(ExportError::Write)?;

    Ok(String::from_utf8(buffer)?)
}

fn cell_for(record: &Record, column: &str, mapping: &ColumnMapping, date_only: bool) -> Option<String> {
    if column == mapping.sector {
        record.sector.clone()
    } else if column == mapping.department_code {
        record.department_code.clone()
    } else if column == mapping.organization_type {
        record.organization_type.clone()
    } else if column == mapping.observed_at {
        record.observed_at.map(|ts| {
            if date_only {
                ts.format("%Y-%m-%d").to_string()
            } else {
                ts.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        })
    } else {
        record.attributes.get(column).cloned().flatten()
    }
}
