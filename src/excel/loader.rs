//! Grid loader implementation - Excel (.xlsx / .xls) → [`RawGrid`]

use crate::error::{MonitorError, MonitorResult};
use crate::types::{CellValue, RawGrid};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File extensions accepted for upload
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Advisory upload size (10 MB). Larger files are logged, never rejected.
pub const ADVISORY_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Decodes the first worksheet of a workbook into a raw cell grid
pub struct GridLoader {
    path: PathBuf,
}

impl GridLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the workbook and return its first sheet as a grid
    pub fn load(&self) -> MonitorResult<RawGrid> {
        self.check_extension()?;
        self.check_size();

        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| MonitorError::Decode(format!("Failed to open Excel file: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MonitorError::Decode("Workbook has no worksheets".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| MonitorError::Decode(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        let grid = range_to_grid(&range);
        debug!(
            sheet = %sheet_name,
            rows = grid.row_count(),
            "decoded worksheet"
        );
        Ok(grid)
    }

    fn check_extension(&self) -> MonitorResult<()> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(())
        } else {
            Err(MonitorError::Decode(format!(
                "Unsupported file type '{}': expected .xlsx or .xls",
                self.path.display()
            )))
        }
    }

    fn check_size(&self) {
        if let Ok(meta) = std::fs::metadata(&self.path) {
            if meta.len() > ADVISORY_SIZE_LIMIT {
                warn!(
                    file = %self.path.display(),
                    bytes = meta.len(),
                    "spreadsheet exceeds the 10 MB advisory limit"
                );
            }
        }
    }
}

/// Convert a calamine range into a grid, one row per sheet row
fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    RawGrid::new(rows)
}

/// Map a calamine cell onto the scalar kinds the pipeline understands
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates keep their serial number, matching how the sheet stores them
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_scalars() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String("Alpha".to_string())),
            CellValue::Text("Alpha".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(convert_cell(&Data::Int(16)), CellValue::Number(16.0));
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_convert_cell_empty_string_is_empty() {
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Empty);
    }

    #[test]
    fn test_convert_cell_error_is_empty() {
        assert_eq!(
            convert_cell(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Empty
        );
    }

    #[test]
    fn test_range_to_grid_keeps_shape() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Project".to_string()));
        range.set_value((0, 1), Data::String("Status".to_string()));
        range.set_value((1, 0), Data::String("A".to_string()));

        let grid = range_to_grid(&range);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.headers(), vec!["Project", "Status"]);
        assert_eq!(grid.data_rows()[0][1], CellValue::Empty);
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let loader = GridLoader::new("report.csv");
        let err = loader.load().unwrap_err();
        assert!(matches!(err, MonitorError::Decode(_)));
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(GridLoader::new("REPORT.XLSX").check_extension().is_ok());
        assert!(GridLoader::new("legacy.Xls").check_extension().is_ok());
        assert!(GridLoader::new("no_extension").check_extension().is_err());
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = GridLoader::new("missing/file.xlsx").load().unwrap_err();
        assert!(matches!(err, MonitorError::Decode(_)));
    }
}
