//! Data Transfer Objects for the HTTP API.
//!
//! Chart and summary payloads are the service types themselves, re-exported
//! here since they already derive Serialize/Deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::services::{
    CategorySeries, Chart, ChartPanel, ChartRequest, DashboardView, DateSeries, FilterOptions,
    PieSlice, SummaryMetrics,
};
use crate::models::{Constraint, DateRange, FilterSelection, Record};

/// Filter selection as query parameters.
///
/// `sector`, `department` and `organization_type` accept `All` as "no
/// constraint". The date range only applies when both `start` and `end` are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionQuery {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Maximum number of records to return (records endpoint only)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Chart kind, `bar` (default) or `pie` (charts endpoint only)
    #[serde(default)]
    pub kind: Option<String>,
}

impl SelectionQuery {
    pub fn selection(&self) -> FilterSelection {
        let date_range = match (self.start, self.end) {
            (None, None) => None,
            (start, end) => Some(DateRange::partial(start, end)),
        };

        FilterSelection {
            sector: Constraint::from_param(self.sector.as_deref()),
            department_code: Constraint::from_param(self.department.as_deref()),
            organization_type: Constraint::from_param(self.organization_type.as_deref()),
            date_range,
        }
    }
}

/// Multi-panel request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelsRequest {
    pub panels: Vec<ChartRequest>,
}

/// Filtered records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    /// Records matching the selection
    pub total: usize,
    /// Records included in this response (after `limit`)
    pub returned: usize,
    pub records: Vec<Record>,
}

/// Data quality report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityResponse {
    pub total_records: usize,
    pub is_valid: bool,
    pub issues: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Data source status
    pub data: String,
    /// Data source identity
    pub source: String,
    /// Records loaded
    pub records: usize,
}
