use crate::feeds::error::FeedError;
use crate::observations::error::ObservationError;
use crate::output::error::OutputError;
use crate::stations::error::StationTableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmedasError {
    #[error(transparent)]
    StationTable(#[from] StationTableError),

    #[error(transparent)]
    Observation(#[from] ObservationError),
}

/// Broad category of a failure, independent of the pipeline it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A feed could not be fetched.
    Network,
    /// A document or table did not have the expected shape.
    Schema,
    /// A value could not be parsed.
    Parse,
    /// Reading the reference table or writing outputs failed.
    Io,
    /// A DataFrame operation failed.
    Frame,
}

impl AmedasError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmedasError::StationTable(e) => station_table_kind(e),
            AmedasError::Observation(e) => observation_kind(e),
        }
    }
}

fn feed_kind(error: &FeedError) -> ErrorKind {
    match error {
        FeedError::NetworkRequest(..) | FeedError::HttpStatus { .. } | FeedError::UnknownUrl(_) => {
            ErrorKind::Network
        }
        FeedError::CsvRead { .. } => ErrorKind::Parse,
        FeedError::TaskJoin(_) => ErrorKind::Io,
    }
}

fn output_kind(error: &OutputError) -> ErrorKind {
    match error {
        OutputError::Csv(_) | OutputError::Frame(_) | OutputError::GeoJson(_) => ErrorKind::Frame,
        OutputError::NotADirectory(_)
        | OutputError::DirCreation(..)
        | OutputError::Write(..)
        | OutputError::Persist(..)
        | OutputError::TaskJoin(_) => ErrorKind::Io,
    }
}

fn station_table_kind(error: &StationTableError) -> ErrorKind {
    match error {
        StationTableError::Feed(e) => feed_kind(e),
        StationTableError::JsonParse(_)
        | StationTableError::MissingField { .. }
        | StationTableError::EmptyCode
        | StationTableError::DuplicateCode(_) => ErrorKind::Schema,
        StationTableError::DataFrame(_) => ErrorKind::Frame,
        StationTableError::Output(e) => output_kind(e),
        StationTableError::TaskJoin(_) => ErrorKind::Io,
    }
}

fn observation_kind(error: &ObservationError) -> ErrorKind {
    match error {
        ObservationError::Feed(e) => feed_kind(e),
        ObservationError::MissingColumn { .. }
        | ObservationError::AmbiguousColumn { .. }
        | ObservationError::EmptyFeed(_) => ErrorKind::Schema,
        ObservationError::InvalidTimestamp { .. } | ObservationError::InvalidNumber { .. } => {
            ErrorKind::Parse
        }
        ObservationError::StationTableRead(..) | ObservationError::TaskJoin(_) => ErrorKind::Io,
        ObservationError::DataFrame(_) => ErrorKind::Frame,
        ObservationError::Output(e) => output_kind(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::feed::FeedKind;

    #[test]
    fn test_error_kinds() {
        let schema: AmedasError = ObservationError::EmptyFeed(FeedKind::WindSpeed).into();
        assert_eq!(schema.kind(), ErrorKind::Schema);

        let parse: AmedasError = ObservationError::InvalidNumber {
            feed: "temperature".to_string(),
            column: "最高気温(℃)".to_string(),
            row: 3,
            value: "x".to_string(),
        }
        .into();
        assert_eq!(parse.kind(), ErrorKind::Parse);

        let network: AmedasError =
            StationTableError::Feed(FeedError::UnknownUrl("mem://x".to_string())).into();
        assert_eq!(network.kind(), ErrorKind::Network);

        let io: AmedasError = StationTableError::Output(OutputError::NotADirectory(
            std::path::PathBuf::from("/tmp/file"),
        ))
        .into();
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(
            io.to_string(),
            "Output path '/tmp/file' exists but is not a directory"
        );
    }
}
