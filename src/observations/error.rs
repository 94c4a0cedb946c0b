use crate::feeds::error::FeedError;
use crate::output::error::OutputError;
use crate::types::feed::FeedKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("No header of the {feed} feed contains '{label}'")]
    MissingColumn { feed: String, label: String },

    #[error("Label '{label}' of the {feed} feed matches several headers: {headers:?}")]
    AmbiguousColumn {
        feed: String,
        label: String,
        headers: Vec<String>,
    },

    #[error("The {0} feed has no rows")]
    EmptyFeed(FeedKind),

    #[error("Invalid observation timestamp in the {feed} feed at row {row}: {message}")]
    InvalidTimestamp {
        feed: String,
        row: usize,
        message: String,
    },

    #[error("Invalid number '{value}' in column '{column}' of the {feed} feed at row {row}")]
    InvalidNumber {
        feed: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Failed to read station table '{0}'")]
    StationTableRead(PathBuf, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error(transparent)]
    Output(#[from] OutputError),

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
