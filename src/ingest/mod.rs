//! Ingestion pipeline: raw grid → schema → normalized [`Dataset`]
//!
//! ```text
//! GridLoader → infer_schema → normalize_rows → Dataset
//! ```
//!
//! Every stage after decoding is a pure function. Ingestion either yields a
//! complete dataset or an error; nothing partial is ever returned.

pub mod normalize;
pub mod schema;
pub mod session;

pub use normalize::{normalize_rows, split_markers, UNKNOWN_STATUS};
pub use schema::{infer_schema, match_month};
pub use session::{IngestOutcome, IngestSession, IngestTicket, LoadedDataset};

use crate::error::{MonitorError, MonitorResult};
use crate::excel::GridLoader;
use crate::types::{Dataset, RawGrid};
use std::path::Path;
use tracing::{debug, info};

/// Turn a decoded grid into a dataset
pub fn ingest(grid: &RawGrid) -> MonitorResult<Dataset> {
    if grid.row_count() < 2 {
        return Err(MonitorError::Structural(format!(
            "spreadsheet does not contain enough data: {} row(s), need a header row and at least one data row",
            grid.row_count()
        )));
    }

    let headers = grid.headers();
    let schema = infer_schema(&headers)?;

    let sub_activities = schema
        .sub_activity_columns
        .iter()
        .map(|&col| headers[col].clone())
        .collect();
    let rows = normalize_rows(grid, &schema);

    debug!(
        data_rows = grid.data_rows().len(),
        kept = rows.len(),
        "normalized rows"
    );

    Ok(Dataset {
        sub_activities,
        months: schema.months(),
        rows,
    })
}

/// Decode a spreadsheet file and ingest its first sheet
pub fn ingest_file<P: AsRef<Path>>(path: P) -> MonitorResult<Dataset> {
    let path = path.as_ref();
    let grid = GridLoader::new(path).load()?;
    let dataset = ingest(&grid)?;
    info!(
        file = %path.display(),
        projects = dataset.row_count(),
        months = dataset.months.len(),
        "ingested spreadsheet"
    );
    Ok(dataset)
}
