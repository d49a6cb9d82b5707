use thiserror::Error;

/// Main error type for the windgen crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write output to {path}: {message}")]
    Output { path: String, message: String },

    #[error("Generation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
