//! Timeline bar positioning.
//!
//! The timeline grid has four cells per month (one per week). A project's bar
//! covers every cell from the start of its first active month to the end of its
//! last active month, expressed as percentages of the full row width.

use crate::types::{Month, ProjectRow};
use serde::{Deserialize, Serialize};

/// Week cells per month
pub const CELLS_PER_MONTH: usize = 4;

/// Day labels of the four week cells
pub const WEEK_LABELS: [u32; CELLS_PER_MONTH] = [2, 9, 16, 23];

/// Bar gradient, start to end
pub const GRADIENT_STOPS: [&str; 9] = [
    "#e11d48", "#fb7185", "#fbbf24", "#a3e635", "#34d399", "#22d3ee", "#818cf8", "#a855f7",
    "#d946ef",
];

/// Horizontal extent of one project's bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSpan {
    pub start_month: Month,
    pub end_month: Month,
    pub start_index: usize,
    pub end_index: usize,
    pub total_cells: usize,
    /// Left edge, percent of row width
    pub start_percent: f64,
    /// Right edge (exclusive), percent of row width
    pub end_percent: f64,
}

impl TimelineSpan {
    pub fn width_percent(&self) -> f64 {
        self.end_percent - self.start_percent
    }

    /// First week cell covered
    pub fn start_cell(&self) -> usize {
        self.start_index * CELLS_PER_MONTH
    }

    /// One past the last week cell covered
    pub fn end_cell(&self) -> usize {
        self.end_index * CELLS_PER_MONTH + CELLS_PER_MONTH
    }

    pub fn month_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Compute the bar for a project over the dataset's month order.
///
/// Returns `None` when no month has markers or there are no months at all;
/// the caller renders an empty row.
pub fn position(row: &ProjectRow, months: &[Month]) -> Option<TimelineSpan> {
    if months.is_empty() {
        return None;
    }

    let start_index = months.iter().position(|&m| row.is_active_in(m))?;
    let end_index = months.iter().rposition(|&m| row.is_active_in(m))?;

    let total_cells = months.len() * CELLS_PER_MONTH;
    let total = total_cells as f64;
    let start_percent = (start_index * CELLS_PER_MONTH) as f64 / total * 100.0;
    let end_percent = (end_index * CELLS_PER_MONTH + CELLS_PER_MONTH) as f64 / total * 100.0;

    Some(TimelineSpan {
        start_month: months[start_index],
        end_month: months[end_index],
        start_index,
        end_index,
        total_cells,
        start_percent,
        end_percent,
    })
}

/// CSS `linear-gradient` for the bar
pub fn gradient_css() -> String {
    format!("linear-gradient(to right, {})", GRADIENT_STOPS.join(", "))
}

/// Parse a `#rrggbb` stop into RGB components
pub fn stop_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Gradient stop for the `offset`-th of `len` cells along a bar
pub fn stop_for_cell(offset: usize, len: usize) -> &'static str {
    if len <= 1 {
        return GRADIENT_STOPS[0];
    }
    let last = GRADIENT_STOPS.len() - 1;
    let idx = (offset.min(len - 1) * last + (len - 1) / 2) / (len - 1);
    GRADIENT_STOPS[idx]
}
