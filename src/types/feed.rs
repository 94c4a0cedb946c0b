//! Defines the three observation feeds and the fields each of them carries.

use std::fmt;

/// One of the near-real-time JMA observation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Today's maximum wind speed and its direction.
    WindSpeed,
    /// Today's maximum temperature.
    Temperature,
    /// Precipitation over the last hour.
    Precipitation,
}

/// How the cells of a field are typed once the feed is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Trimmed text used as the join key.
    Key,
    /// One integer part of the observation timestamp.
    TimestampPart,
    /// Float; blank is null, anything else non-numeric is a parse error.
    Measurement,
    /// Opaque quality code kept as text; blank is null.
    Quality,
    /// Numeric when every non-blank cell parses, text otherwise.
    Direction,
}

/// A column of interest in an observation feed.
///
/// Feed headers embed the observation date, so a field is identified by a label
/// that appears *inside* its header rather than by the full header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedField {
    StationCode,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    MaxWindSpeed,
    MaxWindSpeedQuality,
    WindDirection,
    WindDirectionQuality,
    MaxTemperature,
    MaxTemperatureQuality,
    Precipitation,
    PrecipitationQuality,
}

/// Name of the station code column shared by the reference table and every
/// normalized feed.
pub const STATION_CODE_COLUMN: &str = "AmeCode";

/// Timestamp parts in assembly order.
pub const TIMESTAMP_FIELDS: [FeedField; 5] = [
    FeedField::Year,
    FeedField::Month,
    FeedField::Day,
    FeedField::Hour,
    FeedField::Minute,
];

impl FeedField {
    /// The label searched for inside the feed headers.
    pub fn label(&self) -> &'static str {
        match self {
            FeedField::StationCode => "観測所番号",
            FeedField::Year => "現在時刻(年)",
            FeedField::Month => "現在時刻(月)",
            FeedField::Day => "現在時刻(日)",
            FeedField::Hour => "現在時刻(時)",
            FeedField::Minute => "現在時刻(分)",
            FeedField::MaxWindSpeed => "最大値(m/s)",
            FeedField::MaxWindSpeedQuality => "最大値の品質情報",
            FeedField::WindDirection => "最大値観測時の風向",
            FeedField::WindDirectionQuality => "最大値観測時の風向の品質情報",
            FeedField::MaxTemperature => "最高気温(℃)",
            FeedField::MaxTemperatureQuality => "最高気温の品質情報",
            FeedField::Precipitation => "現在値(mm)",
            FeedField::PrecipitationQuality => "現在値の品質情報",
        }
    }

    /// The column name used in the merged output.
    pub fn public_name(&self) -> &'static str {
        match self {
            FeedField::StationCode => STATION_CODE_COLUMN,
            FeedField::Year => "year",
            FeedField::Month => "month",
            FeedField::Day => "day",
            FeedField::Hour => "hour",
            FeedField::Minute => "minute",
            FeedField::MaxWindSpeed => "wind_max_ms",
            FeedField::MaxWindSpeedQuality => "wind_qual",
            FeedField::WindDirection => "wind_dir",
            FeedField::WindDirectionQuality => "wind_dir_qual",
            FeedField::MaxTemperature => "temp_max_c",
            FeedField::MaxTemperatureQuality => "temp_qual",
            FeedField::Precipitation => "rain_1h_mm",
            FeedField::PrecipitationQuality => "rain_qual",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FeedField::StationCode => ValueKind::Key,
            FeedField::Year
            | FeedField::Month
            | FeedField::Day
            | FeedField::Hour
            | FeedField::Minute => ValueKind::TimestampPart,
            FeedField::MaxWindSpeed | FeedField::MaxTemperature | FeedField::Precipitation => {
                ValueKind::Measurement
            }
            FeedField::MaxWindSpeedQuality
            | FeedField::WindDirectionQuality
            | FeedField::MaxTemperatureQuality
            | FeedField::PrecipitationQuality => ValueKind::Quality,
            FeedField::WindDirection => ValueKind::Direction,
        }
    }
}

impl FeedKind {
    /// Observation fields carried into the merged table, in output order.
    pub fn observation_fields(&self) -> &'static [FeedField] {
        match self {
            FeedKind::WindSpeed => &[
                FeedField::MaxWindSpeed,
                FeedField::MaxWindSpeedQuality,
                FeedField::WindDirection,
                FeedField::WindDirectionQuality,
            ],
            FeedKind::Temperature => &[
                FeedField::MaxTemperature,
                FeedField::MaxTemperatureQuality,
            ],
            FeedKind::Precipitation => &[
                FeedField::Precipitation,
                FeedField::PrecipitationQuality,
            ],
        }
    }

    /// Every field the feed must expose: key, timestamp parts, observations.
    pub fn required_fields(&self) -> Vec<FeedField> {
        let mut fields = vec![FeedField::StationCode];
        fields.extend_from_slice(&TIMESTAMP_FIELDS);
        fields.extend_from_slice(self.observation_fields());
        fields
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            FeedKind::WindSpeed => "wind-speed",
            FeedKind::Temperature => "temperature",
            FeedKind::Precipitation => "precipitation",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
