use thiserror::Error;

/// Failures raised by log store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log record: {0}")]
    Malformed(#[from] serde_json::Error),
}
