//! Entry point for building the AMeDAS station table and merging the latest
//! observations onto it.

use crate::error::AmedasError;
use crate::feeds::source::{FeedSource, HttpFeedSource};
use crate::observations::merger::ObservationMerger;
use crate::stations::table_builder::StationTableBuilder;
use crate::types::endpoints::Endpoints;
use crate::types::output::{ObservationReport, StationTableReport, STATION_TABLE_CSV};
use bon::bon;
use log::info;
use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = ".";

/// Client running the two pipelines against a set of [`Endpoints`].
///
/// Both pipelines fetch their feeds one at a time and only touch the output
/// directory once everything has been fetched, parsed and rendered.
///
/// # Examples
///
/// ```rust,no_run
/// # use amedas::{Amedas, AmedasError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AmedasError> {
/// let client = Amedas::new();
///
/// // Writes ./amedastable.csv and ./amedastable.geojson
/// let stations = client.station_table().call().await?;
///
/// // Reads ./amedastable.csv, writes ./amedas-data.csv and ./amedas-data.geojson
/// let observations = client
///     .observations()
///     .station_table(stations.csv_path)
///     .call()
///     .await?;
/// println!("{} stations at {}", observations.stations, observations.observed_at);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Amedas<S = HttpFeedSource> {
    source: S,
    endpoints: Endpoints,
}

impl Amedas<HttpFeedSource> {
    /// Creates a client that downloads from the public JMA endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    /// Creates a client that downloads over HTTP from custom endpoints.
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self::with_source(HttpFeedSource::new(), endpoints)
    }
}

impl Default for Amedas<HttpFeedSource> {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl<S: FeedSource> Amedas<S> {
    /// Creates a client that reads every feed through `source`.
    pub fn with_source(source: S, endpoints: Endpoints) -> Self {
        Self { source, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Downloads the station metadata and writes `amedastable.csv` and
    /// `amedastable.geojson`.
    ///
    /// # Arguments
    ///
    /// * `.output_dir(PathBuf)`: Optional. Directory for both files, created if
    ///   missing. Defaults to the current directory.
    ///
    /// # Errors
    ///
    /// [`AmedasError::StationTable`] if the document cannot be fetched or does
    /// not have the expected shape, or if the outputs cannot be written.
    #[builder]
    pub async fn station_table(
        &self,
        output_dir: Option<PathBuf>,
    ) -> Result<StationTableReport, AmedasError> {
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let report = StationTableBuilder::new(&self.source, &self.endpoints)
            .run(&output_dir)
            .await?;
        info!(
            "Station table written: {} stations to {} and {}",
            report.stations,
            report.csv_path.display(),
            report.geojson_path.display()
        );
        Ok(report)
    }

    /// Merges the current wind speed, temperature and precipitation tables onto
    /// the station reference table and writes `amedas-data.csv` and
    /// `amedas-data.geojson`.
    ///
    /// # Arguments
    ///
    /// * `.station_table(PathBuf)`: Optional. Reference table written by
    ///   [`Amedas::station_table`]. Defaults to `./amedastable.csv`.
    /// * `.output_dir(PathBuf)`: Optional. Defaults to the current directory.
    ///
    /// # Errors
    ///
    /// [`AmedasError::Observation`] on any fetch, schema or parse failure. No
    /// output is written in that case.
    #[builder]
    pub async fn observations(
        &self,
        station_table: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Result<ObservationReport, AmedasError> {
        let station_table = station_table
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR).join(STATION_TABLE_CSV));
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let report = ObservationMerger::new(&self.source, &self.endpoints)
            .run(&station_table, &output_dir)
            .await?;
        info!(
            "Observations at {} written for {} stations (precipitation {}, wind speed {}, temperature {})",
            report.observed_at,
            report.stations,
            report.matched_precipitation,
            report.matched_wind_speed,
            report.matched_temperature
        );
        Ok(report)
    }
}
