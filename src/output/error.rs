use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to stage output file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move output file into place at '{0}'")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("Failed to render CSV")]
    Csv(#[source] PolarsError),

    #[error("Failed to read column for GeoJSON rendering")]
    Frame(#[from] PolarsError),

    #[error("Failed to serialize GeoJSON")]
    GeoJson(#[from] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
