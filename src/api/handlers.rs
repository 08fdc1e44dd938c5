//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::cli::DEFAULT_PREVIEW_ROWS;
use crate::error::MonitorError;
use crate::ingest::{ingest_file, IngestOutcome, LoadedDataset};
use crate::status::StatusSummary;
use crate::timeline::{GroupingOptions, TimelineView, Unmatched};
use crate::types::ProjectRow;

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

fn no_dataset() -> Response {
    failure(
        StatusCode::NOT_FOUND,
        "No dataset loaded - POST a spreadsheet to /api/v1/ingest first",
    )
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Project Monitor API Server".to_string(),
        version: state.version.clone(),
        description: "HTTP API for project-status spreadsheets".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/ingest", "Load a spreadsheet as the current dataset"),
            EndpointInfo::new("GET", "/api/v1/dataset", "Current dataset with load metadata"),
            EndpointInfo::new("GET", "/api/v1/preview", "First rows of the current dataset"),
            EndpointInfo::new("GET", "/api/v1/status", "Project totals per status"),
            EndpointInfo::new("GET", "/api/v1/timeline", "Grouped timeline with bar positions"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub dataset_loaded: bool,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        dataset_loaded: state.session.current().is_some(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["ingest", "dataset", "preview", "status", "timeline"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Ingest request
#[derive(Deserialize)]
pub struct IngestRequest {
    pub file_path: String,
}

/// Ingest response
#[derive(Serialize, Default)]
pub struct IngestResponse {
    pub sequence: u64,
    pub file_path: String,
    pub rows: usize,
    pub months: usize,
    pub sub_activities: usize,
}

/// POST /api/v1/ingest - Decode a spreadsheet and make it the current dataset
///
/// Decoding runs on the blocking pool. The result is applied only if no later
/// ingest began meanwhile; a failure keeps the dataset already loaded.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Response {
    let ticket = state.session.begin();
    let path = PathBuf::from(&req.file_path);

    let result = tokio::task::spawn_blocking(move || ingest_file(path))
        .await
        .unwrap_or_else(|e| Err(MonitorError::Decode(format!("Ingestion task failed: {}", e))));

    match state.session.complete(ticket, req.file_path.clone(), result) {
        IngestOutcome::Applied(loaded) => {
            info!(sequence = loaded.sequence, file = %req.file_path, "ingest applied");
            Json(ApiResponse::ok(IngestResponse {
                sequence: loaded.sequence,
                file_path: req.file_path,
                rows: loaded.dataset.row_count(),
                months: loaded.dataset.months.len(),
                sub_activities: loaded.dataset.sub_activities.len(),
            }))
            .into_response()
        }
        IngestOutcome::Superseded { sequence, latest } => failure(
            StatusCode::CONFLICT,
            format!(
                "Ingest #{} superseded by #{}; result discarded",
                sequence, latest
            ),
        ),
        IngestOutcome::Failed { error, .. } => {
            error!(file = %req.file_path, error = %error, "ingest failed");
            let status = if error.is_ingestion_error() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            failure(status, error.to_string())
        }
    }
}

/// GET /api/v1/dataset - Current dataset and where it came from
pub async fn dataset(State(state): State<Arc<AppState>>) -> Response {
    match state.session.current() {
        Some(loaded) => Json(ApiResponse::ok(LoadedDataset::clone(&loaded))).into_response(),
        None => no_dataset(),
    }
}

#[derive(Deserialize, Default)]
pub struct PreviewQuery {
    pub limit: Option<usize>,
}

/// Preview response
#[derive(Serialize, Default)]
pub struct PreviewResponse {
    pub total_rows: usize,
    pub shown: usize,
    pub rows: Vec<ProjectRow>,
}

/// GET /api/v1/preview?limit=N - First rows of the current dataset
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let Some(loaded) = state.session.current() else {
        return no_dataset();
    };

    let rows = loaded
        .dataset
        .preview(query.limit.unwrap_or(DEFAULT_PREVIEW_ROWS))
        .to_vec();
    Json(ApiResponse::ok(PreviewResponse {
        total_rows: loaded.dataset.row_count(),
        shown: rows.len(),
        rows,
    }))
    .into_response()
}

/// GET /api/v1/status - Project totals per status
pub async fn status(State(state): State<Arc<AppState>>) -> Response {
    match state.session.current() {
        Some(loaded) => Json(ApiResponse::ok(StatusSummary::from_dataset(&loaded.dataset)))
            .into_response(),
        None => no_dataset(),
    }
}

#[derive(Deserialize, Default)]
pub struct TimelineQuery {
    #[serde(default)]
    pub isolate_unmatched: bool,
}

impl TimelineQuery {
    pub fn options(&self) -> GroupingOptions {
        GroupingOptions {
            unmatched: if self.isolate_unmatched {
                Unmatched::OwnGroup
            } else {
                Unmatched::FirstGroup
            },
        }
    }
}

/// GET /api/v1/timeline?isolate_unmatched=bool - Grouped timeline
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Response {
    match state.session.current() {
        Some(loaded) => Json(ApiResponse::ok(TimelineView::build(
            &loaded.dataset,
            query.options(),
        )))
        .into_response(),
        None => no_dataset(),
    }
}
