//! Left-joins the normalized feeds onto the station reference table.

use crate::observations::error::ObservationError;
use crate::observations::normalize::ObservationTable;
use crate::types::feed::{FeedKind, STATION_CODE_COLUMN};
use crate::types::station::STATION_COLUMNS;
use chrono::NaiveDateTime;
use log::{info, warn};
use polars::prelude::*;

/// Column holding the observation instant in the merged table.
pub const TIME_COLUMN: &str = "time";
/// Text form of the observation instant (no offset; JMA publishes local time).
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ROW_INDEX: &str = "__station_row";

/// Columns of the merged table, in output order.
pub fn merged_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = STATION_COLUMNS.to_vec();
    columns.push(TIME_COLUMN);
    for kind in [FeedKind::Precipitation, FeedKind::WindSpeed, FeedKind::Temperature] {
        columns.extend(kind.observation_fields().iter().map(|f| f.public_name()));
    }
    columns
}

/// The merged table plus coverage counts for logging and reporting.
#[derive(Debug, Clone)]
pub struct MergedObservations {
    pub frame: DataFrame,
    pub observed_at: NaiveDateTime,
    pub matched_precipitation: usize,
    pub matched_wind_speed: usize,
    pub matched_temperature: usize,
}

/// Picks the canonical observation instant: the first row of the wind-speed
/// feed.
///
/// Rows at another instant are counted and logged, not rejected.
pub fn canonical_instant(wind_speed: &ObservationTable) -> Result<NaiveDateTime, ObservationError> {
    let instant = wind_speed
        .first_instant()
        .ok_or(ObservationError::EmptyFeed(wind_speed.kind))?;
    warn_on_other_instants(wind_speed, instant);
    Ok(instant)
}

/// Logs a warning when some rows of `table` were observed at another instant
/// than `instant`.
pub fn warn_on_other_instants(table: &ObservationTable, instant: NaiveDateTime) {
    let others = table.rows_not_at(instant);
    if others > 0 {
        warn!(
            "{} of {} rows in the {} feed are not observed at {}; using {} for every station",
            others,
            table.observed_at.len(),
            table.kind,
            instant,
            instant.format(TIME_FORMAT)
        );
    }
}

fn matched(stations: &DataFrame, table: &ObservationTable) -> Result<usize, ObservationError> {
    let codes = table.station_codes()?;
    Ok(stations
        .column(STATION_CODE_COLUMN)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|code| codes.contains(*code))
        .count())
}

/// Left-joins precipitation, wind speed and temperature onto `stations`.
///
/// The reference table drives the join, so the result has exactly one row per
/// station in reference-table order; stations missing from a feed get nulls in
/// that feed's columns. Every row carries `observed_at` as its `time`.
pub fn merge_observations(
    stations: &DataFrame,
    precipitation: &ObservationTable,
    wind_speed: &ObservationTable,
    temperature: &ObservationTable,
    observed_at: NaiveDateTime,
) -> Result<MergedObservations, ObservationError> {
    let key = || col(STATION_CODE_COLUMN);
    let selection: Vec<Expr> = merged_columns().into_iter().map(col).collect();

    let frame = stations
        .clone()
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .left_join(precipitation.frame.clone().lazy(), key(), key())
        .left_join(wind_speed.frame.clone().lazy(), key(), key())
        .left_join(temperature.frame.clone().lazy(), key(), key())
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .with_column(lit(observed_at.format(TIME_FORMAT).to_string()).alias(TIME_COLUMN))
        .select(selection)
        .collect()?;

    let merged = MergedObservations {
        observed_at,
        matched_precipitation: matched(stations, precipitation)?,
        matched_wind_speed: matched(stations, wind_speed)?,
        matched_temperature: matched(stations, temperature)?,
        frame,
    };
    info!(
        "Merged {} stations at {} (precipitation {}, wind speed {}, temperature {})",
        merged.frame.height(),
        observed_at.format(TIME_FORMAT),
        merged.matched_precipitation,
        merged.matched_wind_speed,
        merged.matched_temperature
    );
    Ok(merged)
}
