use crate::feeds::error::FeedError;
use crate::output::error::OutputError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationTableError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Failed to parse station metadata document")]
    JsonParse(#[from] serde_json::Error),

    #[error("Station '{code}' is missing a field or has a malformed one")]
    MissingField {
        code: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Station metadata contains an empty station code")]
    EmptyCode,

    #[error("Station code '{0}' appears more than once after trimming")]
    DuplicateCode(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),

    #[error(transparent)]
    Output(#[from] OutputError),

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
