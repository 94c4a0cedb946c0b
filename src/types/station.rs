//! Data structures for AMeDAS station metadata, both as published by JMA and as
//! flattened into the station reference table.

use serde::{Deserialize, Serialize};

/// Columns of the station reference table, in output order.
pub const STATION_COLUMNS: [&str; 9] = [
    "AmeCode", "type", "elems", "lat", "lon", "alt", "kjName", "knName", "enName",
];

/// One entry of the JMA station metadata document, keyed by station code.
///
/// Coordinates are published as `[degrees, minutes]` pairs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationEntry {
    /// Station category (e.g. "A", "B", "C").
    #[serde(rename = "type")]
    pub kind: String,
    /// Flag string listing the observed elements.
    pub elems: String,
    /// Latitude as `[degrees, minutes]`.
    pub lat: [f64; 2],
    /// Longitude as `[degrees, minutes]`.
    pub lon: [f64; 2],
    /// Altitude in metres.
    pub alt: i64,
    pub kj_name: String,
    pub kn_name: String,
    pub en_name: String,
}

/// A flattened station with decimal-degree coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// Trimmed station code, unique within one table.
    pub code: String,
    pub kind: String,
    pub elems: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    pub altitude: i64,
    pub kanji_name: String,
    pub kana_name: String,
    pub english_name: String,
}

/// Converts a degrees/minutes pair to decimal degrees.
pub fn to_decimal_degrees(degrees: f64, minutes: f64) -> f64 {
    degrees + minutes / 60.0
}

impl StationRecord {
    pub fn from_entry(code: &str, entry: StationEntry) -> Self {
        Self {
            code: code.trim().to_string(),
            kind: entry.kind,
            elems: entry.elems,
            latitude: to_decimal_degrees(entry.lat[0], entry.lat[1]),
            longitude: to_decimal_degrees(entry.lon[0], entry.lon[1]),
            altitude: entry.alt,
            kanji_name: entry.kj_name,
            kana_name: entry.kn_name,
            english_name: entry.en_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_degrees() {
        assert!((to_decimal_degrees(35.0, 39.0) - 35.65).abs() < 1e-12);
        assert!((to_decimal_degrees(139.0, 44.0) - 139.733_333_333_333_3).abs() < 1e-9);
        assert_eq!(to_decimal_degrees(43.0, 0.0), 43.0);
    }

    #[test]
    fn test_entry_deserializes_and_flattens() {
        let json = r#"{"type":"A","elems":"11112010","lat":[35,41.4],"lon":[139,45.0],
            "alt":25,"kjName":"東京","knName":"トウキョウ","enName":"Tokyo"}"#;
        let entry: StationEntry = serde_json::from_str(json).unwrap();
        let record = StationRecord::from_entry(" 44132 ", entry);

        assert_eq!(record.code, "44132");
        assert_eq!(record.kind, "A");
        assert_eq!(record.altitude, 25);
        assert!((record.latitude - 35.69).abs() < 1e-12);
        assert_eq!(record.longitude, 139.75);
        assert_eq!(record.kanji_name, "東京");
        assert_eq!(record.english_name, "Tokyo");
    }

    #[test]
    fn test_entry_missing_key_is_rejected() {
        let json = r#"{"type":"A","elems":"1","lat":[35,0],"lon":[139,0],"alt":1,"kjName":"x","knName":"y"}"#;
        assert!(serde_json::from_str::<StationEntry>(json).is_err());
    }
}
