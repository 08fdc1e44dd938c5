use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Raw Grid (decoded spreadsheet, before schema inference)
//==============================================================================

/// A single decoded spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// String coercion used by every consumer of raw cells.
    ///
    /// Numbers print without a trailing `.0` so a day marker typed as `16`
    /// comes out as `"16"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{}", n),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Blank means absent, empty, or whitespace only
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from(s.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Row-major grid of cells. Row 0 is the header row.
///
/// Rows may be ragged; a missing cell reads as [`CellValue::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals (empty string = empty cell)
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| CellValue::from(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header texts (row 0), string-coerced
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(CellValue::to_text).collect())
            .unwrap_or_default()
    }

    /// Data rows (everything after the header row)
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        if self.rows.len() > 1 {
            &self.rows[1..]
        } else {
            &[]
        }
    }
}

/// Cell lookup tolerant of ragged rows
pub fn cell_at(row: &[CellValue], index: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(index).unwrap_or(&EMPTY)
}

//==============================================================================
// Canonical Months
//==============================================================================

/// One of the 12 calendar months, the stable key for timeline data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Canonical scan order for header matching
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Three-letter abbreviation ("Jan", "Feb", ...)
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//==============================================================================
// Inferred Schema
//==============================================================================

/// Column index assigned to a canonical month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthColumn {
    pub month: Month,
    pub column: usize,
}

/// Column layout inferred from the header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub project_column: usize,
    pub status_column: usize,
    /// Month columns in order of first appearance in the headers
    pub month_columns: Vec<MonthColumn>,
    /// Columns strictly between the project column and the first month column
    /// (status column excluded)
    pub sub_activity_columns: Vec<usize>,
}

impl Schema {
    /// Lowest column index holding a month, if any month was found
    pub fn first_month_column(&self) -> Option<usize> {
        self.month_columns.iter().map(|mc| mc.column).min()
    }

    pub fn months(&self) -> Vec<Month> {
        self.month_columns.iter().map(|mc| mc.month).collect()
    }

    pub fn column_for(&self, month: Month) -> Option<usize> {
        self.month_columns
            .iter()
            .find(|mc| mc.month == month)
            .map(|mc| mc.column)
    }
}

//==============================================================================
// Normalized Dataset
//==============================================================================

/// Value of one sub-activity column for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub value: String,
}

/// Markers (day tokens) recorded for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthMarkers {
    pub month: Month,
    pub markers: Vec<String>,
}

/// One normalized data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub project: String,
    pub activities: Vec<Activity>,
    pub timeline: Vec<MonthMarkers>,
    pub status: String,
}

impl ProjectRow {
    pub fn activity(&self, name: &str) -> Option<&str> {
        self.activities
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Markers for a month; empty when the month has no entry
    pub fn markers(&self, month: Month) -> &[String] {
        self.timeline
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.markers.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_active_in(&self, month: Month) -> bool {
        !self.markers(month).is_empty()
    }
}

/// Output of ingestion, consumed read-only by every view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub sub_activities: Vec<String>,
    pub months: Vec<Month>,
    pub rows: Vec<ProjectRow>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Distinct project names in order of first appearance
    pub fn project_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.project.as_str()) {
                names.push(row.project.as_str());
            }
        }
        names
    }

    /// First row carrying this project name.
    ///
    /// Duplicate project names are not distinguishable: later rows with the
    /// same name are never returned.
    pub fn find_project(&self, name: &str) -> Option<&ProjectRow> {
        self.rows.iter().find(|row| row.project == name)
    }

    /// Leading rows for a preview table
    pub fn preview(&self, limit: usize) -> &[ProjectRow] {
        &self.rows[..self.rows.len().min(limit)]
    }
}
