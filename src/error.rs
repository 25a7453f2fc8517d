use crate::sources::error::SourceError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("No weather data provided")]
    MissingInput,

    #[error("Invalid format '{0}', expected one of: processed, weather, full")]
    InvalidFormat(String),

    #[error("Failed to decode advisory request")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Could not resolve date range bounds")]
    DateParsingError,

    #[error("Processing failed: {0}")]
    ProcessingFailed(#[from] SourceError),

    #[error("Failed evaluating observation frame")]
    Frame(#[from] PolarsError),
}
