use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("No CDS API credentials found; set CDSAPI_URL/CDSAPI_KEY or create '{0}'")]
    MissingCredentials(PathBuf),

    #[error("Failed to read credentials file '{0}'")]
    CredentialsRead(PathBuf, #[source] std::io::Error),

    #[error("Credentials file '{0}' is missing a '{1}:' entry")]
    CredentialsIncomplete(PathBuf, &'static str),

    #[error("No years selected for retrieval")]
    EmptyYearSelection,

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode reply from {0}")]
    ReplyDecode(String, #[source] reqwest::Error),

    #[error("Retrieval task {request_id} failed: {message}")]
    TaskFailed { request_id: String, message: String },

    #[error("Retrieval task {request_id} finished without a download location")]
    MissingDownloadLocation { request_id: String },

    #[error("Data download or decompression failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("I/O error processing CSV data for request '{slug}'")]
    CsvReadIo {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing error processing CSV data for request '{slug}'")]
    CsvReadPolars {
        slug: String,
        #[source]
        source: PolarsError,
    },

    #[error("CSV column count ({found}) does not match requested schema length ({expected}) for request '{slug}'")]
    SchemaMismatch {
        slug: String,
        expected: usize,
        found: usize,
    },

    #[error("Failed to rename columns for request '{slug}'")]
    ColumnRename {
        slug: String,
        #[source]
        source: PolarsError,
    },

    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
