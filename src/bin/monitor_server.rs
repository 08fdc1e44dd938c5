//! Project Monitor API Server binary
//!
//! HTTP REST API for loading project-status spreadsheets and reading the
//! status totals and timeline built from them.

use clap::Parser;
use project_monitor::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "monitor-server")]
#[command(version)]
#[command(about = "Project Monitor API Server - HTTP API for project-status spreadsheets")]
#[command(long_about = r#"
Project Monitor API Server - HTTP REST API

Load a spreadsheet, then query the dataset built from it:
  - POST /api/v1/ingest    - Load an .xlsx/.xls file as the current dataset
  - GET  /api/v1/dataset   - Current dataset with load metadata
  - GET  /api/v1/preview   - First rows (?limit=N, default 10)
  - GET  /api/v1/status    - Project totals per status
  - GET  /api/v1/timeline  - Grouped timeline (?isolate_unmatched=true)

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Loads are sequence-numbered: a load that finishes after a newer one has
started is discarded, and a failed load keeps the previous dataset.

Example usage:
  monitor-server                           # Start on localhost:8080
  monitor-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/ingest \
    -H "Content-Type: application/json" \
    -d '{"file_path": "projects.xlsx"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "MONITOR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "MONITOR_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
