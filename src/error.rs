use thiserror::Error;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet could not be decoded (unreadable, corrupt, wrong format)
    #[error("Decode error: {0}")]
    Decode(String),

    /// The grid does not have the minimal shape (header row + data)
    #[error("Structural error: {0}")]
    Structural(String),

    /// A required column could not be located in the header row
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl MonitorError {
    /// True for errors raised while turning a file into a dataset
    pub fn is_ingestion_error(&self) -> bool {
        matches!(
            self,
            MonitorError::Decode(_) | MonitorError::Structural(_) | MonitorError::Schema(_)
        )
    }
}
