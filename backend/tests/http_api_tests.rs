#![cfg(feature = "http-server")]

mod support;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::io::Write;
use tower::ServiceExt;

use haiti_dash::http::{create_router, AppState};
use haiti_dash::io::{DatasetCache, FileDataSource};
use support::PRESENCE_CSV;

/// Router over a temp CSV file. The file handle must outlive the state load.
fn app() -> Router {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(PRESENCE_CSV.as_bytes()).unwrap();

    let state = AppState::from_source(&FileDataSource::new(file.path()), &DatasetCache::new());
    assert!(state.is_available());
    create_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_loaded_data() {
    let (status, body) = get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "loaded");
    assert_eq!(body["records"], 5);
}

#[tokio::test]
async fn test_health_when_load_failed() {
    let state = AppState::from_source(
        &FileDataSource::new("/nonexistent/data_op_pres.csv"),
        &DatasetCache::new(),
    );
    assert!(!state.is_available());

    let (status, body) = get_json(create_router(state.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_str().unwrap().starts_with("unavailable: Unable to load data"));

    // Data endpoints keep answering with empty results
    let (status, body) = get_json(create_router(state), "/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_records"], 0);
    assert_eq!(body["sector_chart"]["message"], "No data available for the selected filters.");
}

#[tokio::test]
async fn test_filters() {
    let (status, body) = get_json(app(), "/v1/filters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["sectors"],
        json!(["All", "Santé", "Sécurité alimentaire", "WASH"])
    );
    assert_eq!(body["departments"], json!(["All", "HT01", "HT03", "HT05"]));
    assert_eq!(body["date_bounds"]["min"], "2023-01-05");
    assert_eq!(body["date_bounds"]["max"], "2023-03-15");
}

#[tokio::test]
async fn test_records_with_selection_and_limit() {
    let (status, body) = get_json(app(), "/v1/records?sector=WASH&department=All&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["returned"], 1);
    assert_eq!(body["records"][0]["attributes"]["Organisation"], "MSF");
}

#[tokio::test]
async fn test_summary_with_date_range() {
    let (_, body) = get_json(app(), "/v1/summary?start=2023-01-01&end=2023-01-31").await;
    assert_eq!(body["total_records"], 2);
    assert_eq!(body["unique_sectors"], 2);
    assert_eq!(body["unique_departments"], 1);
}

#[tokio::test]
async fn test_partial_date_range_is_ignored() {
    let (_, body) = get_json(app(), "/v1/summary?start=2023-02-01").await;
    assert_eq!(body["total_records"], 5);
}

#[tokio::test]
async fn test_department_bar_chart() {
    let (status, body) = get_json(app(), "/v1/charts/department").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "bar");
    assert_eq!(body["series"]["categories"], json!(["HT01", "HT03", "HT05"]));
    assert_eq!(body["series"]["values"], json!([2, 1, 1]));
}

#[tokio::test]
async fn test_pie_chart_of_passthrough_column() {
    let (status, body) = get_json(app(), "/v1/charts/attr:Organisation?kind=pie&sector=Sant%C3%A9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "pie");
    assert_eq!(body["series"].as_array().unwrap().len(), 2);
    assert_eq!(body["series"][0]["label"], "Croix-Rouge");
}

#[tokio::test]
async fn test_chart_rejects_unknown_dimension_and_kind() {
    let (status, body) = get_json(app(), "/v1/charts/colour").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = get_json(app(), "/v1/charts/sector?kind=radar").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(app(), "/v1/charts/sector?kind=line").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_time_series() {
    let (_, body) = get_json(app(), "/v1/time-series?sector=WASH").await;
    assert_eq!(body["series"]["dates"], json!(["2023-01-05", "2023-02-01"]));
    assert_eq!(body["series"]["values"], json!([1, 1]));

    let (_, body) = get_json(app(), "/v1/time-series?sector=Nutrition").await;
    assert_eq!(body["message"], "No date data available for the selected filters.");
}

#[tokio::test]
async fn test_panels() {
    let payload = json!({
        "panels": [
            {"kind": "bar", "dimension": "sector", "selection": {"organization_type": {"exactly": "Agence UN"}}},
            {"kind": "line"},
            {"kind": "pie"}
        ]
    });
    let request = Request::builder()
        .method("POST")
        .uri("/v1/panels")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["message"].as_str().unwrap().contains("panel 2"));

    let payload = json!({
        "panels": [
            {"kind": "bar", "dimension": "sector", "selection": {"organization_type": {"exactly": "Agence UN"}}},
            {"kind": "line", "title": "Trend"}
        ]
    });
    let request = Request::builder()
        .method("POST")
        .uri("/v1/panels")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body[0]["series"]["categories"], json!(["Sécurité alimentaire", "WASH"]));
    assert_eq!(body[1]["title"], "Trend");
    assert_eq!(body[1]["series"]["values"], json!([1, 1, 1, 1]));
}

#[tokio::test]
async fn test_quality_report() {
    let (_, body) = get_json(app(), "/v1/quality").await;
    assert_eq!(body["total_records"], 5);
    assert_eq!(body["is_valid"], false);
    assert_eq!(body["issues"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_csv() {
    let request = Request::builder()
        .uri("/v1/export.csv?department=HT01")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("haiti_data_filtered_"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Organisation,Secteur,adm1code,Typedorganisation,date");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("MSF,WASH,HT01"));
}
