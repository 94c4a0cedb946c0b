//! Loads the station reference table written by the station table builder.

use crate::observations::error::ObservationError;
use crate::observations::normalize::{parse_floats, parse_integers, pick, trimmed_cells};
use crate::types::feed::STATION_CODE_COLUMN;
use crate::types::station::STATION_COLUMNS;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

const SOURCE_NAME: &str = "station table";

/// Reads `amedastable.csv` from `path` and types it.
///
/// # Errors
///
/// [`ObservationError::StationTableRead`] if the file cannot be read or parsed
/// as CSV, plus the errors of [`type_station_table`].
pub fn load_station_table(path: &Path) -> Result<DataFrame, ObservationError> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ObservationError::StationTableRead(path.to_path_buf(), e))?;
    let table = type_station_table(&raw)?;
    info!(
        "Loaded {} reference stations from {}",
        table.height(),
        path.display()
    );
    Ok(table)
}

/// Types a string-only station table: trimmed codes, float coordinates,
/// integer altitude, text for everything else.
///
/// Rows without a code are dropped; a repeated code keeps its first row. Both
/// cases are logged.
pub fn type_station_table(raw: &DataFrame) -> Result<DataFrame, ObservationError> {
    let present: HashSet<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if let Some(missing) = STATION_COLUMNS.iter().find(|c| !present.contains(**c)) {
        return Err(ObservationError::MissingColumn {
            feed: SOURCE_NAME.to_string(),
            label: missing.to_string(),
        });
    }

    let codes = trimmed_cells(raw, STATION_CODE_COLUMN)?;
    let mut seen = HashSet::new();
    let mut keep = Vec::with_capacity(codes.len());
    for (row, code) in codes.iter().enumerate() {
        match code {
            Some(code) if seen.insert(code.as_str()) => keep.push(row),
            Some(code) => warn!("Station table repeats code {}; keeping the first row", code),
            None => warn!("Station table row {} has no code and is skipped", row),
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(STATION_COLUMNS.len());
    for name in STATION_COLUMNS {
        let cells = trimmed_cells(raw, name)?;
        let series = match name {
            "lat" | "lon" => {
                let values = parse_floats(&cells, SOURCE_NAME, name)?;
                Series::new(name.into(), pick(&values, &keep))
            }
            "alt" => {
                let values = parse_integers(&cells, SOURCE_NAME, name)?;
                Series::new(name.into(), pick(&values, &keep))
            }
            _ => Series::new(name.into(), pick(&cells, &keep)),
        };
        columns.push(series.into());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::decode::read_string_csv;
    use std::io::Write;

    const TABLE: &str = "\
AmeCode,type,elems,lat,lon,alt,kjName,knName,enName
44132,A,11112010,35.69,139.75,25,東京,トウキョウ,Tokyo
 44136 ,C,11112000,35.6616,139.3183,123,八王子,ハチオウジ,Hachioji
44132,A,11112010,0,0,0,重複,ジュウフク,Duplicate
";

    #[test]
    fn test_type_station_table() -> Result<(), Box<dyn std::error::Error>> {
        let raw = read_string_csv(TABLE.to_string(), "test")?;
        let df = type_station_table(&raw)?;

        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, STATION_COLUMNS);
        assert_eq!(df.column("AmeCode")?.str()?.get(1), Some("44136"));
        assert_eq!(df.column("lat")?.f64()?.get(0), Some(35.69));
        assert_eq!(df.column("alt")?.i64()?.get(1), Some(123));
        assert_eq!(df.column("enName")?.str()?.get(0), Some("Tokyo"));
        Ok(())
    }

    #[test]
    fn test_missing_column_is_a_schema_error() -> Result<(), Box<dyn std::error::Error>> {
        let raw = read_string_csv("AmeCode,lat\n1,2\n".to_string(), "test")?;
        let err = type_station_table(&raw).unwrap_err();
        assert!(matches!(
            err,
            ObservationError::MissingColumn { ref label, .. } if label == "type"
        ));
        Ok(())
    }

    #[test]
    fn test_load_station_table_from_disk() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(TABLE.as_bytes())?;
        file.flush()?;

        let df = load_station_table(file.path())?;
        assert_eq!(df.height(), 2);

        let missing = load_station_table(Path::new("/nonexistent/amedastable.csv"));
        assert!(matches!(
            missing,
            Err(ObservationError::StationTableRead(..))
        ));
        Ok(())
    }
}
