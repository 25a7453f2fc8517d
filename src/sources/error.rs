use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path '{0}' exists but is not a directory")]
    CacheDirNotADirectory(PathBuf),

    #[error("Failed to delete cache '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Failed to read observation file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download or decompression failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("I/O error processing CSV data for feed '{feed}'")]
    CsvReadIo {
        feed: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data for feed '{feed}'")]
    CsvReadPolars {
        feed: String,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{column}' not found in feed '{feed}'")]
    MissingColumn { feed: String, column: String },

    #[error("Unexpected schema in feed '{feed}': {message}")]
    SchemaMismatch { feed: String, message: String },

    #[error("Missing value for '{column}' in row {row}")]
    MissingValue { row: usize, column: String },

    #[error("Invalid date '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("Failed to parse observations from '{0}'")]
    JsonParse(PathBuf, #[source] serde_json::Error),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
