//! Excel decoding for project status workbooks
//!
//! Only the first worksheet is read. `.xlsx` and legacy `.xls` are both
//! accepted; the format is picked from the file extension.

mod loader;

pub use loader::{GridLoader, ADVISORY_SIZE_LIMIT, SUPPORTED_EXTENSIONS};
