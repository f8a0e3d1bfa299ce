// HTTP request handlers
use crate::domain::query::TimeRange;
use crate::domain::target::Target;
use crate::error::DatasourceError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeBody {
    pub from: String,
    pub to: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    pub range: RangeBody,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: f64,
    #[serde(default)]
    pub targets: Vec<Target>,
}

fn default_interval_ms() -> f64 {
    30_000.0
}

#[derive(Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

fn parse_range(range: &RangeBody) -> Result<TimeRange, DatasourceError> {
    let from_ms = parse_bound(&range.from)?;
    let to_ms = parse_bound(&range.to)?;
    Ok(TimeRange { from_ms, to_ms })
}

fn parse_bound(bound: &str) -> Result<i64, DatasourceError> {
    chrono::DateTime::parse_from_rfc3339(bound)
        .map(|instant| instant.timestamp_millis())
        .map_err(|_| DatasourceError::InvalidTimeRange(bound.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Run one query batch and return the normalized series
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> impl IntoResponse {
    let range = match parse_range(&body.range) {
        Ok(range) => range,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };

    match state
        .datasource_service
        .query(&body.targets, range, body.interval_ms)
        .await
    {
        Ok(data) => Json(data).into_response(),
        Err(error) => {
            eprintln!("Error running query batch: {}", error);
            (StatusCode::BAD_GATEWAY, error.to_string()).into_response()
        }
    }
}

/// Connectivity probe; failure is reported in the body, not the status
pub async fn test_datasource(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.datasource_service.test_datasource().await)
}

/// Device dropdown options
pub async fn list_devices(
    Query(query): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let filter = query.filter.unwrap_or_default();
    match state.datasource_service.query_devices(&filter).await {
        Ok(devices) => Json(devices).into_response(),
        Err(error) => {
            eprintln!("Error fetching devices: {}", error);
            (StatusCode::BAD_GATEWAY, error.to_string()).into_response()
        }
    }
}

/// Measurement dropdown options for one device
pub async fn list_measurements(
    Path(device_obid): Path<i64>,
    Query(query): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let filter = query.filter.unwrap_or_default();
    match state
        .datasource_service
        .find_measurements_for_device(device_obid, &filter)
        .await
    {
        Ok(measurements) => Json(measurements).into_response(),
        Err(error) => {
            eprintln!("Error fetching measurements for device {}: {}", device_obid, error);
            (StatusCode::BAD_GATEWAY, error.to_string()).into_response()
        }
    }
}

/// Candidate metrics for one measurement
pub async fn list_metrics(
    Path(measurement_obid): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state
        .datasource_service
        .find_metrics_for_measurement(measurement_obid)
        .await
    {
        Ok(metrics) => Json(metrics).into_response(),
        Err(error) => {
            eprintln!(
                "Error fetching metrics for measurement {}: {}",
                measurement_obid, error
            );
            (StatusCode::BAD_GATEWAY, error.to_string()).into_response()
        }
    }
}
