//! Grouped timeline view
//!
//! Combines project grouping and bar positioning into a render-ready model:
//! one entry per distinct project, clustered under group labels, each with
//! its bar extent and a detail line built from its sub-activities.

pub mod group;
pub mod position;

pub use group::{group_projects, GroupingOptions, TimelineGroup, Unmatched};
pub use position::{
    gradient_css, position, stop_for_cell, stop_rgb, TimelineSpan, CELLS_PER_MONTH,
    GRADIENT_STOPS, WEEK_LABELS,
};

use crate::types::{Dataset, Month, ProjectRow};
use serde::Serialize;

/// Fixed colors for well-known group labels
const GROUP_COLORS: [(&str, &str); 5] = [
    ("REVAMPS", "#3b82f6"),
    ("EDUCATION", "#ef4444"),
    ("SYSTEM", "#22c55e"),
    ("DEVELOPMENT", "#a855f7"),
    ("RESEARCH", "#eab308"),
];

/// One project row of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub project: String,
    pub status: String,
    /// `None` when the project has no markers in any month
    pub span: Option<TimelineSpan>,
    /// "name: value" for each non-empty sub-activity
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineGroupView {
    pub label: String,
    pub color: String,
    pub entries: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineView {
    pub months: Vec<Month>,
    pub week_labels: Vec<u32>,
    pub total_cells: usize,
    pub gradient: String,
    pub groups: Vec<TimelineGroupView>,
}

impl TimelineView {
    pub fn build(dataset: &Dataset, options: GroupingOptions) -> Self {
        let names = dataset.project_names();
        let groups = group_projects(&names, options)
            .into_iter()
            .map(|group| TimelineGroupView {
                color: group_color(&group.label),
                entries: group
                    .projects
                    .iter()
                    // Duplicate names resolve to their first row
                    .filter_map(|name| dataset.find_project(name))
                    .map(|row| entry_for(row, &dataset.months))
                    .collect(),
                label: group.label,
            })
            .collect();

        Self {
            months: dataset.months.clone(),
            week_labels: WEEK_LABELS.to_vec(),
            total_cells: dataset.months.len() * CELLS_PER_MONTH,
            gradient: gradient_css(),
            groups,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

fn entry_for(row: &ProjectRow, months: &[Month]) -> TimelineEntry {
    TimelineEntry {
        project: row.project.clone(),
        status: row.status.clone(),
        span: position(row, months),
        details: activity_summary(row),
    }
}

/// Detail line for a project: non-empty activities as "name: value"
pub fn activity_summary(row: &ProjectRow) -> String {
    row.activities
        .iter()
        .filter(|a| !a.value.is_empty())
        .map(|a| format!("{}: {}", a.name, a.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display color for a group label.
///
/// Known labels have a fixed color; anything else gets a hue derived from its
/// first character.
pub fn group_color(label: &str) -> String {
    if let Some((_, color)) = GROUP_COLORS.iter().find(|(name, _)| *name == label) {
        return color.to_string();
    }
    let code = label.encode_utf16().next().unwrap_or(0) as u32;
    format!("hsl({}, 70%, 50%)", (code * 137) % 360)
}
