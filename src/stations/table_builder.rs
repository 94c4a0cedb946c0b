//! Builds the station reference table from the JMA station metadata document.

use crate::feeds::source::FeedSource;
use crate::output::csv::render_csv;
use crate::output::geojson::{frame_to_feature_collection, render_geojson};
use crate::output::{write_files, RenderedFile};
use crate::stations::error::StationTableError;
use crate::types::endpoints::Endpoints;
use crate::types::output::{StationTableReport, STATION_TABLE_CSV, STATION_TABLE_GEOJSON};
use crate::types::station::{StationEntry, StationRecord, STATION_COLUMNS};
use log::info;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tokio::task;

/// Parses the metadata document (an object keyed by station code) into
/// records, in document order.
///
/// # Errors
///
/// [`StationTableError::JsonParse`] if the document is not a JSON object,
/// [`StationTableError::MissingField`] naming the station whose entry does not
/// match the expected shape, [`StationTableError::EmptyCode`] and
/// [`StationTableError::DuplicateCode`] for codes that are blank or collide
/// once trimmed.
pub fn parse_station_document(bytes: &[u8]) -> Result<Vec<StationRecord>, StationTableError> {
    let document: Map<String, Value> = serde_json::from_slice(bytes)?;

    let mut seen = HashSet::with_capacity(document.len());
    let mut records = Vec::with_capacity(document.len());
    for (code, value) in document {
        let entry: StationEntry =
            serde_json::from_value(value).map_err(|source| StationTableError::MissingField {
                code: code.clone(),
                source,
            })?;
        let record = StationRecord::from_entry(&code, entry);
        if record.code.is_empty() {
            return Err(StationTableError::EmptyCode);
        }
        if !seen.insert(record.code.clone()) {
            return Err(StationTableError::DuplicateCode(record.code));
        }
        records.push(record);
    }
    Ok(records)
}

fn text_column(name: &str, records: &[StationRecord], value: fn(&StationRecord) -> &str) -> Column {
    let values: Vec<&str> = records.iter().map(value).collect();
    Series::new(name.into(), values).into()
}

/// Lays records out as the reference table, one row per station.
pub fn stations_to_dataframe(records: &[StationRecord]) -> Result<DataFrame, PolarsError> {
    let [code, kind, elems, lat, lon, alt, kj, kn, en] = STATION_COLUMNS;
    let latitudes: Vec<f64> = records.iter().map(|r| r.latitude).collect();
    let longitudes: Vec<f64> = records.iter().map(|r| r.longitude).collect();
    let altitudes: Vec<i64> = records.iter().map(|r| r.altitude).collect();

    DataFrame::new(vec![
        text_column(code, records, |r| &r.code),
        text_column(kind, records, |r| &r.kind),
        text_column(elems, records, |r| &r.elems),
        Series::new(lat.into(), latitudes).into(),
        Series::new(lon.into(), longitudes).into(),
        Series::new(alt.into(), altitudes).into(),
        text_column(kj, records, |r| &r.kanji_name),
        text_column(kn, records, |r| &r.kana_name),
        text_column(en, records, |r| &r.english_name),
    ])
}

/// Downloads station metadata and writes `amedastable.csv` and
/// `amedastable.geojson`.
pub struct StationTableBuilder<'a, S: FeedSource> {
    source: &'a S,
    endpoints: &'a Endpoints,
}

impl<'a, S: FeedSource> StationTableBuilder<'a, S> {
    pub fn new(source: &'a S, endpoints: &'a Endpoints) -> Self {
        Self { source, endpoints }
    }

    pub async fn fetch_records(&self) -> Result<Vec<StationRecord>, StationTableError> {
        let url = &self.endpoints.station_table;
        let bytes = self.source.fetch(url).await?;
        let records = task::spawn_blocking(move || parse_station_document(&bytes)).await??;
        info!("Parsed {} stations from {}", records.len(), url);
        Ok(records)
    }

    pub async fn build(&self) -> Result<DataFrame, StationTableError> {
        let records = self.fetch_records().await?;
        Ok(stations_to_dataframe(&records)?)
    }

    /// Builds the table and writes both outputs into `output_dir`. Nothing is
    /// written unless every step before the write succeeded.
    pub async fn run(&self, output_dir: &Path) -> Result<StationTableReport, StationTableError> {
        let mut table = self.build().await?;
        let csv = render_csv(&mut table)?;
        let geojson = render_geojson(&frame_to_feature_collection(&table)?)?;

        write_files(
            output_dir,
            vec![
                RenderedFile::new(STATION_TABLE_CSV, csv),
                RenderedFile::new(STATION_TABLE_GEOJSON, geojson),
            ],
        )
        .await?;

        Ok(StationTableReport {
            stations: table.height(),
            csv_path: output_dir.join(STATION_TABLE_CSV),
            geojson_path: output_dir.join(STATION_TABLE_GEOJSON),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::source::StaticFeedSource;
    use crate::observations::reference::load_station_table;

    const DOCUMENT: &str = r#"{
        "44132": {"type":"A","elems":"11112010","lat":[35,41.4],"lon":[139,45.0],"alt":25,
                  "kjName":"東京","knName":"トウキョウ","enName":"Tokyo"},
        "11001": {"type":"C","elems":"11112010","lat":[45,31.2],"lon":[141,56.1],"alt":26,
                  "kjName":"宗谷岬","knName":"ソウヤミサキ","enName":"Soyamisaki"},
        "44136": {"type":"C","elems":"11112000","lat":[35,39],"lon":[139,44],"alt":123,
                  "kjName":"八王子","knName":"ハチオウジ","enName":"Hachioji"}
    }"#;

    fn source_with(body: &str) -> (StaticFeedSource, Endpoints) {
        let endpoints = Endpoints {
            station_table: "mem://amedastable.json".to_string(),
            ..Endpoints::default()
        };
        let mut source = StaticFeedSource::new();
        source.insert(endpoints.station_table.clone(), body.as_bytes().to_vec());
        (source, endpoints)
    }

    #[test]
    fn test_document_order_is_preserved() -> Result<(), Box<dyn std::error::Error>> {
        let records = parse_station_document(DOCUMENT.as_bytes())?;
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["44132", "11001", "44136"]);

        let hachioji = &records[2];
        assert!((hachioji.latitude - 35.65).abs() < 1e-12);
        assert!((hachioji.longitude - 139.733_333_333_333_3).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_missing_key_names_the_station() {
        let err = parse_station_document(
            br#"{"44132":{"type":"A","elems":"1","lat":[35,0],"lon":[139,0],"alt":1,"kjName":"x","knName":"y"}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StationTableError::MissingField { ref code, .. } if code == "44132"
        ));
    }

    #[test]
    fn test_malformed_document_and_codes() {
        assert!(matches!(
            parse_station_document(b"[1, 2, 3]"),
            Err(StationTableError::JsonParse(_))
        ));

        let entry = r#"{"type":"A","elems":"1","lat":[35,0],"lon":[139,0],"alt":1,"kjName":"x","knName":"y","enName":"z"}"#;
        let blank = format!(r#"{{" ": {entry}}}"#);
        assert!(matches!(
            parse_station_document(blank.as_bytes()),
            Err(StationTableError::EmptyCode)
        ));

        let colliding = format!(r#"{{"44132": {entry}, " 44132 ": {entry}}}"#);
        assert!(matches!(
            parse_station_document(colliding.as_bytes()),
            Err(StationTableError::DuplicateCode(ref code)) if code == "44132"
        ));
    }

    #[test]
    fn test_dataframe_layout() -> Result<(), Box<dyn std::error::Error>> {
        let df = stations_to_dataframe(&parse_station_document(DOCUMENT.as_bytes())?)?;
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, STATION_COLUMNS);
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("alt")?.i64()?.get(2), Some(123));
        assert_eq!(df.column("enName")?.str()?.get(1), Some("Soyamisaki"));
        Ok(())
    }

    #[tokio::test]
    async fn test_run_writes_both_files() -> Result<(), Box<dyn std::error::Error>> {
        let (source, endpoints) = source_with(DOCUMENT);
        let dir = tempfile::tempdir()?;

        let report = StationTableBuilder::new(&source, &endpoints)
            .run(dir.path())
            .await?;
        assert_eq!(report.stations, 3);
        assert_eq!(report.csv_path, dir.path().join("amedastable.csv"));

        let csv = std::fs::read_to_string(&report.csv_path)?;
        assert!(csv.starts_with("AmeCode,type,elems,lat,lon,alt,kjName,knName,enName\n"));
        assert!(csv.contains("八王子"));

        let geojson: Value = serde_json::from_str(&std::fs::read_to_string(&report.geojson_path)?)?;
        let props = &geojson["features"][0]["properties"];
        let keys: Vec<&str> = props
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["AmeCode", "type", "elems", "alt", "kjName", "knName", "enName"]);
        assert_eq!(geojson["features"].as_array().unwrap().len(), 3);

        // The written table is readable as the merger's reference input and
        // reproduces the coordinates exactly.
        let reference = load_station_table(&report.csv_path)?;
        let built = StationTableBuilder::new(&source, &endpoints).build().await?;
        assert_eq!(
            reference.column("lon")?.f64()?.get(2),
            built.column("lon")?.f64()?.get(2)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() -> Result<(), Box<dyn std::error::Error>> {
        let (source, endpoints) = source_with(DOCUMENT);
        let dir = tempfile::tempdir()?;
        let builder = StationTableBuilder::new(&source, &endpoints);

        let first = builder.run(dir.path()).await?;
        let csv_before = std::fs::read(&first.csv_path)?;
        let geojson_before = std::fs::read(&first.geojson_path)?;

        let second = builder.run(dir.path()).await?;
        assert_eq!(std::fs::read(&second.csv_path)?, csv_before);
        assert_eq!(std::fs::read(&second.geojson_path)?, geojson_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let (source, endpoints) = source_with(r#"{"44132": {"type": "A"}}"#);
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("out");

        let result = StationTableBuilder::new(&source, &endpoints).run(&out).await;
        assert!(matches!(result, Err(StationTableError::MissingField { .. })));
        assert!(!out.exists());
        Ok(())
    }
}
