//! Output file names and the summaries returned by each pipeline run.

use chrono::NaiveDateTime;
use std::path::PathBuf;

pub const STATION_TABLE_CSV: &str = "amedastable.csv";
pub const STATION_TABLE_GEOJSON: &str = "amedastable.geojson";
pub const OBSERVATIONS_CSV: &str = "amedas-data.csv";
pub const OBSERVATIONS_GEOJSON: &str = "amedas-data.geojson";

/// Result of a station table build.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTableReport {
    /// Number of stations written.
    pub stations: usize,
    pub csv_path: PathBuf,
    pub geojson_path: PathBuf,
}

/// Result of an observation merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationReport {
    /// Rows in the merged table, one per reference station.
    pub stations: usize,
    /// Canonical observation instant taken from the wind-speed feed.
    pub observed_at: NaiveDateTime,
    /// Reference stations that found a row in the precipitation feed.
    pub matched_precipitation: usize,
    /// Reference stations that found a row in the wind-speed feed.
    pub matched_wind_speed: usize,
    /// Reference stations that found a row in the temperature feed.
    pub matched_temperature: usize,
    pub csv_path: PathBuf,
    pub geojson_path: PathBuf,
}
