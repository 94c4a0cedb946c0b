mod amedas;
mod error;
mod feeds;
mod observations;
mod output;
mod stations;
mod types;
mod utils;

pub use amedas::*;
pub use error::{AmedasError, ErrorKind};

pub use feeds::error::FeedError;
pub use feeds::source::{FeedSource, HttpFeedSource, StaticFeedSource};

pub use observations::error::ObservationError;
pub use observations::merge::{merge_observations, merged_columns, MergedObservations};
pub use observations::merger::ObservationMerger;
pub use observations::normalize::{normalize_feed, ObservationTable};
pub use observations::reference::{load_station_table, type_station_table};
pub use observations::schema::{ColumnBinding, FeedSchema};

pub use output::error::OutputError;
pub use stations::error::StationTableError;
pub use stations::table_builder::{parse_station_document, StationTableBuilder};

pub use types::endpoints::Endpoints;
pub use types::feed::{FeedField, FeedKind};
pub use types::output::*;
pub use types::station::{StationEntry, StationRecord};
