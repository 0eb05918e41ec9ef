//! Error types for the fallible edges of the metrics crate
//!
//! Alignment, normalization, rates and attribution are total and never
//! return these. Only I/O-backed helpers (vocabulary loading) do.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetricsError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}
