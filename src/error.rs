use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("data directory does not exist: {0}")]
    DataDirNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("interview not found: {0}")]
    InterviewNotFound(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
