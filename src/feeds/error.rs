use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("No feed is registered for {0}")]
    UnknownUrl(String),

    #[error("Failed to parse CSV data of the {feed} feed")]
    CsvRead {
        feed: String,
        #[source]
        source: PolarsError,
    },

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
