//! API integration tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use project_monitor::api::{build_router, AppState};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::default());
    (build_router(Arc::clone(&state)), state)
}

fn workbook(dir: &TempDir, name: &str, rows: &[&[&str]]) -> PathBuf {
    let path = dir.path().join(name);
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    wb.save(&path).unwrap();
    path
}

fn projects(dir: &TempDir) -> PathBuf {
    workbook(
        dir,
        "projects.xlsx",
        &[
            &["Project", "Owner", "Jan", "Feb", "Status"],
            &["SYSTEM Login", "Ana", "2", "", "UAT"],
            &["SYSTEM Logout", "Ben", "", "9", "Deploy"],
            &["Budget review", "", "16", "23", ""],
        ],
    )
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_ingest(app: &Router, file_path: &str) -> (StatusCode, Value) {
    let body = json!({ "file_path": file_path }).to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/ingest")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ═══════════════════════════════════════════════════════════════════════════
// INFO ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (app, _) = app();
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let paths: Vec<&str> = body["data"]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/api/v1/ingest"));
    assert!(paths.contains(&"/api/v1/timeline"));
}

#[tokio::test]
async fn test_health_and_version() {
    let (app, _) = app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["dataset_loaded"], false);

    let (_, body) = get(&app, "/version").await;
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["request_id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_reads_before_ingest_are_not_found() {
    let (app, _) = app();

    for uri in [
        "/api/v1/dataset",
        "/api/v1/preview",
        "/api/v1/status",
        "/api/v1/timeline",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INGEST AND READS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_ingest_then_read_everything() {
    let dir = TempDir::new().unwrap();
    let path = projects(&dir);
    let (app, _) = app();

    let (status, body) = post_ingest(&app, path.to_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sequence"], 1);
    assert_eq!(body["data"]["rows"], 3);
    assert_eq!(body["data"]["months"], 2);
    assert_eq!(body["data"]["sub_activities"], 1);

    let (_, body) = get(&app, "/api/v1/dataset").await;
    assert_eq!(body["data"]["sequence"], 1);
    assert_eq!(body["data"]["dataset"]["months"], json!(["January", "February"]));
    assert_eq!(body["data"]["dataset"]["rows"][2]["status"], "Unknown");

    let (_, body) = get(&app, "/api/v1/status").await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["counts"][0]["status"], "UAT");
    assert_eq!(body["data"]["counts"][0]["percent"], 33);

    let (_, body) = get(&app, "/health").await;
    assert_eq!(body["data"]["dataset_loaded"], true);
}

#[tokio::test]
async fn test_preview_limit() {
    let dir = TempDir::new().unwrap();
    let path = projects(&dir);
    let (app, _) = app();
    post_ingest(&app, path.to_str().unwrap()).await;

    let (_, body) = get(&app, "/api/v1/preview?limit=2").await;
    assert_eq!(body["data"]["total_rows"], 3);
    assert_eq!(body["data"]["shown"], 2);
    assert_eq!(body["data"]["rows"][1]["project"], "SYSTEM Logout");

    let (_, body) = get(&app, "/api/v1/preview").await;
    assert_eq!(body["data"]["shown"], 3);
}

#[tokio::test]
async fn test_timeline_grouping_option() {
    let dir = TempDir::new().unwrap();
    let path = projects(&dir);
    let (app, _) = app();
    post_ingest(&app, path.to_str().unwrap()).await;

    let (status, body) = get(&app, "/api/v1/timeline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_cells"], 8);
    let groups = body["data"]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["entries"].as_array().unwrap().len(), 3);
    let budget = &groups[0]["entries"][2];
    assert_eq!(budget["span"]["start_percent"], 0.0);
    assert_eq!(budget["span"]["end_percent"], 100.0);

    let (_, body) = get(&app, "/api/v1/timeline?isolate_unmatched=true").await;
    let labels: Vec<&str> = body["data"]["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["SYSTEM", "BUDGET"]);
}

#[tokio::test]
async fn test_failed_ingest_keeps_previous_dataset() {
    let dir = TempDir::new().unwrap();
    let good = projects(&dir);
    let bad = workbook(&dir, "bad.xlsx", &[&["Name", "Status"], &["Alpha", "UAT"]]);
    let (app, state) = app();

    post_ingest(&app, good.to_str().unwrap()).await;
    let (status, body) = post_ingest(&app, bad.to_str().unwrap()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Project"));

    let (_, body) = get(&app, "/api/v1/dataset").await;
    assert_eq!(body["data"]["sequence"], 1);
    assert_eq!(state.session.latest_sequence(), 2);
}

#[tokio::test]
async fn test_missing_file_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    let (app, _) = app();
    let missing = dir.path().join("missing.xlsx");

    let (status, body) = post_ingest(&app, missing.to_str().unwrap()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Decode error"));
}

#[tokio::test]
async fn test_stale_ingest_is_superseded() {
    let dir = TempDir::new().unwrap();
    let path = projects(&dir);
    let (app, state) = app();

    // An earlier attempt is still in flight when the request arrives
    let earlier = state.session.begin();
    let (status, body) = post_ingest(&app, path.to_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sequence"], 2);

    let outcome = state
        .session
        .complete(earlier, "late", Ok(Default::default()));
    assert!(!outcome.is_applied());
    assert_eq!(state.session.current().unwrap().sequence, 2);
}
