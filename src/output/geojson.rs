//! Point-feature GeoJSON rendering of station-keyed tables.

use crate::output::error::OutputError;
use ::geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeometryValue};
use polars::prelude::*;
use serde_json::{Number, Value as JsonValue};

pub const LATITUDE_COLUMN: &str = "lat";
pub const LONGITUDE_COLUMN: &str = "lon";

/// Converts one cell to its JSON property value.
///
/// Numbers stay numbers and text stays text. Nulls and non-finite floats become
/// JSON `null`.
pub fn any_value_to_json(value: AnyValue<'_>) -> JsonValue {
    match value {
        AnyValue::Null => JsonValue::Null,
        AnyValue::Boolean(b) => JsonValue::Bool(b),
        AnyValue::String(s) => JsonValue::String(s.to_string()),
        AnyValue::StringOwned(s) => JsonValue::String(s.to_string()),
        AnyValue::Int32(v) => JsonValue::from(v),
        AnyValue::Int64(v) => JsonValue::from(v),
        AnyValue::UInt32(v) => JsonValue::from(v),
        AnyValue::UInt64(v) => JsonValue::from(v),
        AnyValue::Float32(v) => float_to_json(f64::from(v)),
        AnyValue::Float64(v) => float_to_json(v),
        other => JsonValue::String(other.to_string()),
    }
}

fn float_to_json(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Builds one Point feature per row of `df`.
///
/// The geometry is `[lon, lat]`; every other column becomes a property, in
/// column order. A row with a null coordinate gets a null geometry.
pub fn frame_to_feature_collection(df: &DataFrame) -> Result<FeatureCollection, OutputError> {
    let latitudes = df.column(LATITUDE_COLUMN)?.f64()?;
    let longitudes = df.column(LONGITUDE_COLUMN)?.f64()?;
    let property_columns: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != LATITUDE_COLUMN && c.name().as_str() != LONGITUDE_COLUMN)
        .collect();

    let mut features = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut properties = JsonObject::new();
        for column in &property_columns {
            properties.insert(column.name().to_string(), any_value_to_json(column.get(row)?));
        }
        let geometry = match (longitudes.get(row), latitudes.get(row)) {
            (Some(lon), Some(lat)) => Some(Geometry::new(GeometryValue::Point(vec![lon, lat]))),
            _ => None,
        };
        features.push(Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Pretty-prints a collection with two-space indentation. Non-ASCII text is
/// written as-is.
pub fn render_geojson(collection: &FeatureCollection) -> Result<Vec<u8>, OutputError> {
    let mut bytes = serde_json::to_vec_pretty(collection)?;
    bytes.push(b'\n');
    Ok(bytes)
}
