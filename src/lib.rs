//! Project Monitor - project-status spreadsheets as datasets and timelines
//!
//! This library reads a project-tracking workbook (one row per project, month
//! columns holding week markers), infers its column layout from the header
//! row, and normalizes the rows into a [`Dataset`]. On top of the dataset it
//! builds per-status totals and a grouped timeline with bar positions.
//!
//! # Features
//!
//! - Header-driven schema inference (Project, Status, months, sub-activities)
//! - Excel import (.xlsx / .xls, first worksheet)
//! - Sequence-ordered reloads that keep the last good dataset
//! - Timeline grouping by name prefix and bar positioning by week cell
//! - HTTP API (`monitor-server`) and CLI (`monitor`)
//!
//! # Example
//!
//! ```no_run
//! use project_monitor::ingest::ingest_file;
//! use project_monitor::timeline::{GroupingOptions, TimelineView};
//!
//! let dataset = ingest_file("projects.xlsx")?;
//! println!("Projects: {}", dataset.row_count());
//!
//! let view = TimelineView::build(&dataset, GroupingOptions::default());
//! for group in &view.groups {
//!     println!("{}: {} projects", group.label, group.entries.len());
//! }
//! # Ok::<(), project_monitor::error::MonitorError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod ingest;
pub mod status;
pub mod timeline;
pub mod types;

// Re-export commonly used types
pub use error::{MonitorError, MonitorResult};
pub use types::{CellValue, Dataset, Month, ProjectRow, RawGrid, Schema};
