use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timeout '{0}': expected a whole number of seconds")]
    InvalidTimeout(String),

    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("No more pages to load")]
    NoNextPage,

    #[error("Fetch task ended unexpectedly: {0}")]
    TaskAborted(String),
}

pub type Result<T> = std::result::Result<T, BrowseError>;
