//! Turns a raw, string-typed observation feed into a typed table keyed by
//! trimmed station code.

use crate::observations::error::ObservationError;
use crate::observations::schema::FeedSchema;
use crate::types::feed::{FeedField, FeedKind, ValueKind, STATION_CODE_COLUMN, TIMESTAMP_FIELDS};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashSet;

/// A normalized observation feed.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    pub kind: FeedKind,
    /// Observation instant of every raw row, in feed order.
    pub observed_at: Vec<NaiveDateTime>,
    /// One row per station code: the key column followed by the feed's
    /// observation fields under their public names.
    pub frame: DataFrame,
}

impl ObservationTable {
    /// The instant of the first row of the feed.
    pub fn first_instant(&self) -> Option<NaiveDateTime> {
        self.observed_at.first().copied()
    }

    /// Number of rows whose instant differs from `instant`.
    pub fn rows_not_at(&self, instant: NaiveDateTime) -> usize {
        self.observed_at.iter().filter(|at| **at != instant).count()
    }

    /// Station codes present in the feed.
    pub fn station_codes(&self) -> Result<HashSet<String>, ObservationError> {
        Ok(self
            .frame
            .column(STATION_CODE_COLUMN)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }
}

/// Assembles an instant from its `[year, month, day, hour, minute]` cells.
///
/// # Errors
///
/// Returns a description of the first part that is missing, non-numeric or
/// outside the calendar.
pub fn assemble_timestamp(parts: [Option<&str>; 5]) -> Result<NaiveDateTime, String> {
    let mut values = [0i64; 5];
    for ((value, part), field) in values.iter_mut().zip(parts).zip(TIMESTAMP_FIELDS) {
        let text = part
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing {}", field.public_name()))?;
        *value = text
            .parse::<i64>()
            .map_err(|_| format!("{} '{}' is not a number", field.public_name(), text))?;
    }
    let [year, month, day, hour, minute] = values;

    let date = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .zip(u32::try_from(day).ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day))?;
    u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(h, m)| date.and_hms_opt(h, m, 0))
        .ok_or_else(|| format!("{:02}:{:02} is not a time of day", hour, minute))
}

/// Reads a string column as trimmed cells, blank cells becoming `None`.
pub(crate) fn trimmed_cells(
    df: &DataFrame,
    column: &str,
) -> Result<Vec<Option<String>>, ObservationError> {
    Ok(df
        .column(column)?
        .str()?
        .into_iter()
        .map(|cell| {
            cell.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect())
}

/// Parses cells as floats. Blank cells are null, anything else that does not
/// parse is an error naming the row.
pub(crate) fn parse_floats(
    cells: &[Option<String>],
    feed: &str,
    column: &str,
) -> Result<Vec<Option<f64>>, ObservationError> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(text) => text
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ObservationError::InvalidNumber {
                    feed: feed.to_string(),
                    column: column.to_string(),
                    row,
                    value: text.clone(),
                }),
        })
        .collect()
}

/// Same as [`parse_floats`] for integer cells.
pub(crate) fn parse_integers(
    cells: &[Option<String>],
    feed: &str,
    column: &str,
) -> Result<Vec<Option<i64>>, ObservationError> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(text) => text
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ObservationError::InvalidNumber {
                    feed: feed.to_string(),
                    column: column.to_string(),
                    row,
                    value: text.clone(),
                }),
        })
        .collect()
}

/// Types a column whose cells may be codes or text: integers if all cells are
/// integers, floats if all are numbers, strings otherwise.
fn infer_series(name: &str, cells: Vec<Option<String>>) -> Series {
    let name = PlSmallStr::from(name);
    let as_ints: Option<Vec<Option<i64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.parse::<i64>().ok().map(Some),
        })
        .collect();
    if let Some(ints) = as_ints {
        return Series::new(name, ints);
    }
    let as_floats: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.parse::<f64>().ok().map(Some),
        })
        .collect();
    match as_floats {
        Some(floats) => Series::new(name, floats),
        None => Series::new(name, cells),
    }
}

pub(crate) fn pick<T: Clone>(values: &[T], keep: &[usize]) -> Vec<T> {
    keep.iter().map(|&i| values[i].clone()).collect()
}

/// Binds, types and deduplicates a raw feed.
///
/// Rows without a station code are dropped. When a code occurs more than once
/// only its first row is kept, so a left join against the table can never
/// multiply reference rows.
///
/// # Errors
///
/// Schema errors from [`FeedSchema::bind_frame`], [`ObservationError::InvalidTimestamp`]
/// for any row whose timestamp parts do not assemble, and
/// [`ObservationError::InvalidNumber`] for malformed measurements.
pub fn normalize_feed(kind: FeedKind, raw: &DataFrame) -> Result<ObservationTable, ObservationError> {
    let schema = FeedSchema::bind_frame(kind, raw)?;
    let feed = kind.to_string();
    let header = |field: FeedField| {
        schema
            .header(field)
            .ok_or_else(|| ObservationError::MissingColumn {
                feed: feed.clone(),
                label: field.label().to_string(),
            })
    };

    let codes = trimmed_cells(raw, header(FeedField::StationCode)?)?;

    let mut part_columns = Vec::with_capacity(TIMESTAMP_FIELDS.len());
    for field in TIMESTAMP_FIELDS {
        part_columns.push(trimmed_cells(raw, header(field)?)?);
    }
    let observed_at = (0..raw.height())
        .map(|row| {
            let parts = [
                part_columns[0][row].as_deref(),
                part_columns[1][row].as_deref(),
                part_columns[2][row].as_deref(),
                part_columns[3][row].as_deref(),
                part_columns[4][row].as_deref(),
            ];
            assemble_timestamp(parts).map_err(|message| {
                ObservationError::InvalidTimestamp {
                    feed: feed.clone(),
                    row,
                    message,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut keep = Vec::with_capacity(codes.len());
    let mut duplicates = 0usize;
    let mut missing_codes = 0usize;
    for (row, code) in codes.iter().enumerate() {
        match code {
            None => missing_codes += 1,
            Some(code) if seen.insert(code.as_str()) => keep.push(row),
            Some(_) => duplicates += 1,
        }
    }
    if missing_codes > 0 {
        warn!("{} feed: dropped {} rows without a station code", feed, missing_codes);
    }
    if duplicates > 0 {
        warn!(
            "{} feed: {} repeated station codes, keeping the first row of each",
            feed, duplicates
        );
    }

    let kept_codes: Vec<String> = keep
        .iter()
        .filter_map(|&i| codes[i].clone())
        .collect();
    let mut columns: Vec<Column> = vec![Series::new(STATION_CODE_COLUMN.into(), kept_codes).into()];

    for field in kind.observation_fields() {
        let source = header(*field)?;
        let name = field.public_name();
        let cells = trimmed_cells(raw, source)?;
        let series = match field.value_kind() {
            ValueKind::Measurement => {
                let values = parse_floats(&cells, &feed, source)?;
                Series::new(name.into(), pick(&values, &keep))
            }
            ValueKind::Direction => infer_series(name, pick(&cells, &keep)),
            ValueKind::Quality | ValueKind::Key | ValueKind::TimestampPart => {
                Series::new(name.into(), pick(&cells, &keep))
            }
        };
        columns.push(series.into());
    }

    let frame = DataFrame::new(columns)?;
    info!(
        "Normalized {} feed: {} stations from {} rows",
        feed,
        frame.height(),
        raw.height()
    );
    Ok(ObservationTable {
        kind,
        observed_at,
        frame,
    })
}
