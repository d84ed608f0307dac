//! Dashboard composition: the fixed overview and independently filtered panels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::aggregation::{
    group_and_count, pie_slices, time_series, CategorySeries, DateSeries, PieSlice,
};
use super::summary::{compute_summary, SummaryMetrics};
use crate::models::{DateDimension, Dimension, FilterSelection, Record};
use crate::transformations::apply;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";
pub const NO_DATE_DATA_MESSAGE: &str = "No date data available for the selected filters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            "line" => Ok(ChartKind::Line),
            other => Err(format!(
                "Unknown chart kind '{}'. Must be 'bar', 'pie', or 'line'",
                other
            )),
        }
    }
}

/// A titled series. `message` is set when the series is empty so the
/// renderer can show a "no data" state instead of an empty chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart<S> {
    pub title: String,
    pub axis_label: String,
    pub series: S,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<S> Chart<S> {
    fn new(title: String, axis_label: String, series: S, is_empty: bool, empty_message: &str) -> Self {
        Self {
            title,
            axis_label,
            series,
            message: is_empty.then(|| empty_message.to_string()),
        }
    }

    pub fn has_data(&self) -> bool {
        self.message.is_none()
    }
}

pub fn bar_chart(records: &[Record], dimension: &Dimension, title: Option<String>) -> Chart<CategorySeries> {
    let series: CategorySeries = group_and_count(records, dimension).into();
    let empty = series.is_empty();
    Chart::new(
        title.unwrap_or_else(|| format!("Distribution by {}", dimension.label())),
        dimension.label(),
        series,
        empty,
        NO_DATA_MESSAGE,
    )
}

pub fn pie_chart(records: &[Record], dimension: &Dimension, title: Option<String>) -> Chart<Vec<PieSlice>> {
    let slices = pie_slices(records, dimension);
    let empty = slices.is_empty();
    Chart::new(
        title.unwrap_or_else(|| format!("Distribution by {}", dimension.label())),
        dimension.label(),
        slices,
        empty,
        NO_DATA_MESSAGE,
    )
}

pub fn line_chart(records: &[Record], date_dimension: &DateDimension, title: Option<String>) -> Chart<DateSeries> {
    let series: DateSeries = time_series(records, date_dimension).into();
    let empty = series.is_empty();
    let axis_label = match date_dimension {
        DateDimension::ObservedAt => "Date".to_string(),
        DateDimension::Attribute(name) => name.clone(),
    };
    Chart::new(
        title.unwrap_or_else(|| "Temporal Trend".to_string()),
        axis_label,
        series,
        empty,
        NO_DATE_DATA_MESSAGE,
    )
}

/// The overview page: summary plus the four standard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub summary: SummaryMetrics,
    pub sector_chart: Chart<CategorySeries>,
    pub department_chart: Chart<CategorySeries>,
    pub organization_type_chart: Chart<Vec<PieSlice>>,
    pub timeline: Chart<DateSeries>,
}

pub fn build_dashboard(records: &[Record], selection: &FilterSelection) -> DashboardView {
    let filtered = apply(records, selection);

    DashboardView {
        selection: selection.clone(),
        summary: compute_summary(&filtered),
        sector_chart: bar_chart(&filtered, &Dimension::Sector, None),
        department_chart: bar_chart(&filtered, &Dimension::DepartmentCode, None),
        organization_type_chart: pie_chart(&filtered, &Dimension::OrganizationType, None),
        timeline: line_chart(&filtered, &DateDimension::ObservedAt, None),
    }
}

/// One chart of the multi-panel view, with its own selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    /// Required for bar and pie panels
    #[serde(default)]
    pub dimension: Option<Dimension>,
    /// Line panels only; defaults to the observation date
    #[serde(default)]
    pub date_dimension: Option<DateDimension>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub selection: FilterSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartPanel {
    Bar(Chart<CategorySeries>),
    Pie(Chart<Vec<PieSlice>>),
    Line(Chart<DateSeries>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("panel {index}: a {kind} chart needs a dimension")]
    MissingDimension { index: usize, kind: ChartKind },
}

/// Build every requested panel. Each panel filters the full record set on its own.
pub fn build_panels(records: &[Record], requests: &[ChartRequest]) -> Result<Vec<ChartPanel>, PanelError> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let filtered = apply(records, &request.selection);
            let title = request.title.clone();

            match request.kind {
                ChartKind::Line => {
                    let date_dimension = request.date_dimension.clone().unwrap_or_default();
                    Ok(ChartPanel::Line(line_chart(&filtered, &date_dimension, title)))
                }
                kind => {
                    let dimension = request
                        .dimension
                        .as_ref()
                        .ok_or(PanelError::MissingDimension { index, kind })?;
                    Ok(match kind {
                        ChartKind::Pie => ChartPanel::Pie(pie_chart(&filtered, dimension, title)),
                        _ => ChartPanel::Bar(bar_chart(&filtered, dimension, title)),
                    })
                }
            }
        })
        .collect()
}
