//! Row normalization - raw data rows → [`ProjectRow`] records

use crate::types::{cell_at, Activity, CellValue, MonthMarkers, ProjectRow, RawGrid, Schema};

/// Status used when the status cell is blank
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Normalize every data row of the grid (row 0 is skipped as the header).
///
/// Rows whose project cell is blank are dropped. Output keeps source order and
/// does not merge repeated project names.
pub fn normalize_rows(grid: &RawGrid, schema: &Schema) -> Vec<ProjectRow> {
    let headers = grid.headers();
    grid.data_rows()
        .iter()
        .filter_map(|row| normalize_row(row, schema, &headers))
        .collect()
}

/// Normalize a single data row, `None` when it has no project name
pub fn normalize_row(row: &[CellValue], schema: &Schema, headers: &[String]) -> Option<ProjectRow> {
    let project_cell = cell_at(row, schema.project_column);
    if project_cell.is_blank() {
        return None;
    }
    let project = project_cell.to_text();

    let status_cell = cell_at(row, schema.status_column);
    let status = if status_cell.is_blank() {
        UNKNOWN_STATUS.to_string()
    } else {
        status_cell.to_text()
    };

    // Repeated header names share one entry: last column wins, first position kept
    let mut activities: Vec<Activity> = Vec::with_capacity(schema.sub_activity_columns.len());
    for &col in &schema.sub_activity_columns {
        let name = headers.get(col).map(String::as_str).unwrap_or("");
        let value = cell_at(row, col).to_text();
        match activities.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => activities.push(Activity {
                name: name.to_string(),
                value,
            }),
        }
    }

    let timeline = schema
        .month_columns
        .iter()
        .map(|mc| MonthMarkers {
            month: mc.month,
            markers: split_markers(&cell_at(row, mc.column).to_text()),
        })
        .collect();

    Some(ProjectRow {
        project,
        activities,
        timeline,
        status,
    })
}

/// Split a timeline cell into trimmed comma-separated markers.
///
/// A blank cell yields no markers. Empty tokens between commas are kept, so
/// `"2,,9"` gives `["2", "", "9"]`.
pub fn split_markers(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|token| token.trim().to_string()).collect()
}
