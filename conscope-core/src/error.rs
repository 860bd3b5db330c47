//! Error types for conscope-core

use thiserror::Error;

/// Main error type for the conscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory listing could not be fetched or scraped
    #[error("listing error: {0}")]
    Listing(String),

    /// No analysis file resolved under any naming convention
    #[error("no analysis found for transcript: {0}")]
    AnalysisNotFound(String),
}

/// Result type alias for conscope-core
pub type Result<T> = std::result::Result<T, Error>;
