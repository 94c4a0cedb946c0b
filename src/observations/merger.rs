//! Fetches the three observation feeds in sequence and merges them onto the
//! station reference table.

use crate::feeds::decode::csv_feed_to_dataframe;
use crate::feeds::source::FeedSource;
use crate::observations::error::ObservationError;
use crate::observations::merge::{
    canonical_instant, merge_observations, warn_on_other_instants, MergedObservations,
};
use crate::observations::normalize::{normalize_feed, ObservationTable};
use crate::observations::reference::load_station_table;
use crate::output::csv::render_csv;
use crate::output::geojson::{frame_to_feature_collection, render_geojson};
use crate::output::{write_files, RenderedFile};
use crate::types::endpoints::Endpoints;
use crate::types::feed::FeedKind;
use crate::types::output::{ObservationReport, OBSERVATIONS_CSV, OBSERVATIONS_GEOJSON};
use std::path::Path;
use tokio::task;

pub struct ObservationMerger<'a, S: FeedSource> {
    source: &'a S,
    endpoints: &'a Endpoints,
}

impl<'a, S: FeedSource> ObservationMerger<'a, S> {
    pub fn new(source: &'a S, endpoints: &'a Endpoints) -> Self {
        Self { source, endpoints }
    }

    /// Fetches, decodes and normalizes one feed.
    pub async fn fetch_table(
        &self,
        kind: FeedKind,
        url: &str,
    ) -> Result<ObservationTable, ObservationError> {
        let bytes = self.source.fetch(url).await?;
        let raw = csv_feed_to_dataframe(bytes, kind.name()).await?;
        normalize_feed(kind, &raw)
    }

    /// Loads the reference table, then fetches wind speed, temperature and
    /// precipitation one after the other and left-joins them.
    ///
    /// The precipitation URL depends on the instant of the first wind-speed
    /// row, so the wind-speed feed is always fetched first.
    pub async fn merge(&self, station_table: &Path) -> Result<MergedObservations, ObservationError> {
        let path = station_table.to_path_buf();
        let stations = task::spawn_blocking(move || load_station_table(&path)).await??;

        let wind_speed = self
            .fetch_table(FeedKind::WindSpeed, &self.endpoints.wind_speed)
            .await?;
        let temperature = self
            .fetch_table(FeedKind::Temperature, &self.endpoints.temperature)
            .await?;

        let observed_at = canonical_instant(&wind_speed)?;
        let precipitation_url = self.endpoints.precipitation_url(observed_at);
        let precipitation = self
            .fetch_table(FeedKind::Precipitation, &precipitation_url)
            .await?;

        warn_on_other_instants(&temperature, observed_at);
        warn_on_other_instants(&precipitation, observed_at);

        merge_observations(
            &stations,
            &precipitation,
            &wind_speed,
            &temperature,
            observed_at,
        )
    }

    /// Merges the feeds and writes `amedas-data.csv` and `amedas-data.geojson`
    /// into `output_dir`. Any failure before the write leaves the directory
    /// untouched.
    pub async fn run(
        &self,
        station_table: &Path,
        output_dir: &Path,
    ) -> Result<ObservationReport, ObservationError> {
        let MergedObservations {
            mut frame,
            observed_at,
            matched_precipitation,
            matched_wind_speed,
            matched_temperature,
        } = self.merge(station_table).await?;

        let csv = render_csv(&mut frame)?;
        let geojson = render_geojson(&frame_to_feature_collection(&frame)?)?;
        write_files(
            output_dir,
            vec![
                RenderedFile::new(OBSERVATIONS_CSV, csv),
                RenderedFile::new(OBSERVATIONS_GEOJSON, geojson),
            ],
        )
        .await?;

        Ok(ObservationReport {
            stations: frame.height(),
            observed_at,
            matched_precipitation,
            matched_wind_speed,
            matched_temperature,
            csv_path: output_dir.join(OBSERVATIONS_CSV),
            geojson_path: output_dir.join(OBSERVATIONS_GEOJSON),
        })
    }
}
