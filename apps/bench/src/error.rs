use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("invalid trace at line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] rivo_storage::StorageError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
