//! Project Monitor API Server module
//!
//! HTTP REST API over the ingestion session.
//! Run with `monitor-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
