//! HTTP handlers for the REST API.
//!
//! Each handler filters the shared dataset with the request's selection and
//! delegates to the service layer.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::dto::{
    Chart, ChartPanel, DashboardView, DateSeries, FilterOptions, HealthResponse, PanelsRequest,
    QualityResponse, RecordsResponse, SelectionQuery, SummaryMetrics,
};
use super::error::AppError;
use super::state::AppState;
use crate::io::{export_file_name, records_to_csv};
use crate::models::{DateDimension, Dimension};
use crate::services::{self, ChartKind};
use crate::transformations::{apply, validate_records};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the data source loaded. A failed load is not fatal.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let data = match &state.load_error {
        None => "loaded".to_string(),
        Some(message) => format!("unavailable: {}", message),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        data,
        source: state.dataset.source_id.clone(),
        records: state.dataset.len(),
    }))
}

// =============================================================================
// Filters and records
// =============================================================================

/// GET /v1/filters
///
/// Options for the filter controls, computed over the full dataset.
pub async fn get_filters(State(state): State<AppState>) -> HandlerResult<FilterOptions> {
    Ok(Json(services::filter_options(state.records())))
}

/// GET /v1/records
pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> HandlerResult<RecordsResponse> {
    let mut records = apply(state.records(), &query.selection());
    let total = records.len();
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }

    Ok(Json(RecordsResponse {
        total,
        returned: records.len(),
        records,
    }))
}

/// GET /v1/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> HandlerResult<SummaryMetrics> {
    let filtered = apply(state.records(), &query.selection());
    Ok(Json(services::compute_summary(&filtered)))
}

// =============================================================================
// Visualization Endpoints
// =============================================================================

/// GET /v1/dashboard
///
/// Summary plus the four standard charts for one selection.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> HandlerResult<DashboardView> {
    Ok(Json(services::build_dashboard(state.records(), &query.selection())))
}

/// GET /v1/charts/{dimension}
///
/// Bar (default) or pie chart of one categorical dimension.
pub async fn get_chart(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> HandlerResult<ChartPanel> {
    let dimension: Dimension = dimension.parse().map_err(AppError::BadRequest)?;
    let kind = match query.kind.as_deref() {
        None => ChartKind::Bar,
        Some(kind) => kind.parse().map_err(AppError::BadRequest)?,
    };
    debug!(%dimension, %kind, "chart request");

    let filtered = apply(state.records(), &query.selection());
    let panel = match kind {
        ChartKind::Bar => ChartPanel::Bar(services::bar_chart(&filtered, &dimension, None)),
        ChartKind::Pie => ChartPanel::Pie(services::pie_chart(&filtered, &dimension, None)),
        ChartKind::Line => {
            return Err(AppError::BadRequest(
                "Line charts are served by /v1/time-series".to_string(),
            ))
        }
    };

    Ok(Json(panel))
}

/// GET /v1/time-series
pub async fn get_time_series(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> HandlerResult<Chart<DateSeries>> {
    let filtered = apply(state.records(), &query.selection());
    Ok(Json(services::line_chart(
        &filtered,
        &DateDimension::ObservedAt,
        None,
    )))
}

/// POST /v1/panels
///
/// Multi-chart view; every panel carries its own selection.
pub async fn post_panels(
    State(state): State<AppState>,
    Json(request): Json<PanelsRequest>,
) -> HandlerResult<Vec<ChartPanel>> {
    let panels = services::build_panels(state.records(), &request.panels)?;
    Ok(Json(panels))
}

// =============================================================================
// Diagnostics and export
// =============================================================================

/// GET /v1/quality
pub async fn get_quality(State(state): State<AppState>) -> HandlerResult<QualityResponse> {
    let (is_valid, issues) = validate_records(state.records());
    Ok(Json(QualityResponse {
        total_records: state.dataset.len(),
        is_valid,
        issues,
    }))
}

/// GET /v1/export.csv
///
/// CSV download of the filtered records, in the source's column layout.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filtered = apply(state.records(), &query.selection());
    let csv = records_to_csv(&state.dataset.columns, &state.dataset.mapping, &filtered)?;
    let file_name = export_file_name(chrono::Local::now().naive_local());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    ))
}
