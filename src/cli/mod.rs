//! CLI command handlers

pub mod commands;

pub use commands::{export, inspect, preview, status, timeline, watch, DEFAULT_PREVIEW_ROWS};
