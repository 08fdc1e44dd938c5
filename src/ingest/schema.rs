//! Schema inference - locate Project, Status, month and sub-activity columns
//! from header text alone.

use crate::error::{MonitorError, MonitorResult};
use crate::types::{Month, MonthColumn, Schema};
use tracing::debug;

/// Infer the column layout from the header row.
///
/// Fails with [`MonitorError::Schema`] when no header contains "project" or
/// "status" (case-insensitive).
pub fn infer_schema<S: AsRef<str>>(headers: &[S]) -> MonitorResult<Schema> {
    let lowered: Vec<String> = headers
        .iter()
        .map(|h| h.as_ref().to_lowercase())
        .collect();

    let project_column = find_column(&lowered, "project")
        .ok_or_else(|| MonitorError::Schema("missing required column: Project".to_string()))?;
    let status_column = find_column(&lowered, "status")
        .ok_or_else(|| MonitorError::Schema("missing required column: Status".to_string()))?;

    let mut month_columns: Vec<MonthColumn> = Vec::new();
    for (column, header) in headers.iter().enumerate() {
        let Some(month) = match_month(header.as_ref()) else {
            continue;
        };
        // Last header wins, but the month keeps the position it was first seen at
        match month_columns.iter_mut().find(|mc| mc.month == month) {
            Some(existing) => existing.column = column,
            None => month_columns.push(MonthColumn { month, column }),
        }
    }

    let sub_activity_columns = match month_columns.iter().map(|mc| mc.column).min() {
        Some(first_month) => (project_column + 1..first_month)
            .filter(|&i| i != status_column)
            .collect(),
        // Without a month anchor there is no sub-activity region
        None => Vec::new(),
    };

    debug!(
        project_column,
        status_column,
        months = month_columns.len(),
        sub_activities = sub_activity_columns.len(),
        "inferred schema"
    );

    Ok(Schema {
        project_column,
        status_column,
        month_columns,
        sub_activity_columns,
    })
}

fn find_column(lowered: &[String], needle: &str) -> Option<usize> {
    lowered.iter().position(|h| h.contains(needle))
}

/// Match a header against the canonical months.
///
/// Months are tried in calendar order and the first hit wins, so a header
/// mentioning both "mar" and "oct" resolves to March. Matching is a plain
/// substring test on the full name or the 3-letter abbreviation, which means
/// headers like "Decision" match December.
pub fn match_month(header: &str) -> Option<Month> {
    let header = header.to_lowercase();
    Month::ALL.into_iter().find(|m| {
        header.contains(&m.name().to_lowercase()) || header.contains(&m.abbreviation().to_lowercase())
    })
}
