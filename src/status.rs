//! Per-status aggregation
//!
//! Counts projects by their status text, in order of first appearance, with
//! the share of the total and a display color per status.

use crate::types::Dataset;
use serde::Serialize;

/// Color for statuses missing from [`STATUS_COLORS`]
pub const DEFAULT_STATUS_COLOR: &str = "#6b7280";

/// Known workflow statuses and their colors
pub const STATUS_COLORS: [(&str, &str); 8] = [
    ("Inisiasi", "#DF1F3BCC"),
    ("Menunggu Approval", "#F44336CC"),
    ("Sedang Proses Input Kajian", "#8BC34BCC"),
    ("Finalisasi BRD", "#4CAF50CC"),
    ("UAT", "#4051B5CC"),
    ("Review BRD Final", "#009688CC"),
    ("Deploy", "#673AB7CC"),
    ("Released", "#9C27B0CC"),
];

pub fn status_color(status: &str) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_STATUS_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    /// Share of all rows, rounded to a whole percent
    pub percent: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub counts: Vec<StatusCount>,
}

impl StatusSummary {
    /// Aggregate every row (duplicate project names each count)
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for row in &dataset.rows {
            match tally.iter_mut().find(|(status, _)| *status == row.status) {
                Some((_, count)) => *count += 1,
                None => tally.push((row.status.as_str(), 1)),
            }
        }

        let total = dataset.rows.len();
        let counts = tally
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
                percent: percent_of(count, total),
                color: status_color(status).to_string(),
            })
            .collect();

        Self { total, counts }
    }

    pub fn count_for(&self, status: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

fn percent_of(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectRow;

    fn dataset(statuses: &[&str]) -> Dataset {
        Dataset {
            sub_activities: vec![],
            months: vec![],
            rows: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| ProjectRow {
                    project: format!("P{}", i),
                    activities: vec![],
                    timeline: vec![],
                    status: s.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let summary = StatusSummary::from_dataset(&dataset(&["UAT", "Deploy", "UAT", "Unknown"]));

        assert_eq!(summary.total, 4);
        let order: Vec<&str> = summary.counts.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(order, vec!["UAT", "Deploy", "Unknown"]);
        assert_eq!(summary.count_for("UAT"), 2);
        assert_eq!(summary.count_for("Missing"), 0);
    }

    #[test]
    fn test_percentages_are_rounded() {
        let summary = StatusSummary::from_dataset(&dataset(&["A", "B", "B"]));
        assert_eq!(summary.counts[0].percent, 33);
        assert_eq!(summary.counts[1].percent, 67);
    }

    #[test]
    fn test_colors_known_and_default() {
        assert_eq!(status_color("Released"), "#9C27B0CC");
        assert_eq!(status_color("released"), DEFAULT_STATUS_COLOR);
        let summary = StatusSummary::from_dataset(&dataset(&["UAT", "Other"]));
        assert_eq!(summary.counts[0].color, "#4051B5CC");
        assert_eq!(summary.counts[1].color, DEFAULT_STATUS_COLOR);
    }

    #[test]
    fn test_empty_dataset() {
        let summary = StatusSummary::from_dataset(&Dataset::default());
        assert_eq!(summary.total, 0);
        assert!(summary.counts.is_empty());
    }
}
