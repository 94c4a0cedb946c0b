//! Remote locations of the JMA feeds consumed by the two pipelines.

use chrono::NaiveDateTime;

const STATION_TABLE_URL: &str = "https://www.jma.go.jp/bosai/amedas/const/amedastable.json";
const WIND_SPEED_URL: &str =
    "https://www.data.jma.go.jp/stats/data/mdrr/wind_rct/alltable/mxwsp00_rct.csv";
const TEMPERATURE_URL: &str =
    "https://www.data.jma.go.jp/stats/data/mdrr/tem_rct/alltable/mxtemsadext00_rct.csv";
const PRECIPITATION_URL_TEMPLATE: &str =
    "https://www.data.jma.go.jp/stats/data/mdrr/pre_rct/alltable/pre1h00_{timestamp}.csv";

/// Placeholder substituted with the observation instant in
/// [`Endpoints::precipitation_template`].
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// The set of URLs the pipelines fetch from.
///
/// [`Endpoints::default`] points at the public JMA endpoints. The precipitation
/// feed is published per observation instant, so its URL is a template holding
/// [`TIMESTAMP_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Station metadata document (JSON).
    pub station_table: String,
    /// Daily maximum wind speed table (CSV, Shift_JIS).
    pub wind_speed: String,
    /// Daily maximum temperature table (CSV, Shift_JIS).
    pub temperature: String,
    /// One-hour precipitation table (CSV, Shift_JIS), keyed by instant.
    pub precipitation_template: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            station_table: STATION_TABLE_URL.to_string(),
            wind_speed: WIND_SPEED_URL.to_string(),
            temperature: TEMPERATURE_URL.to_string(),
            precipitation_template: PRECIPITATION_URL_TEMPLATE.to_string(),
        }
    }
}

impl Endpoints {
    /// Resolves the precipitation URL for an observation instant, formatted as
    /// `YYYYMMDDHHMM`.
    pub fn precipitation_url(&self, observed_at: NaiveDateTime) -> String {
        self.precipitation_template.replace(
            TIMESTAMP_PLACEHOLDER,
            &observed_at.format("%Y%m%d%H%M").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_precipitation_url_uses_instant() {
        let at = NaiveDate::from_ymd_opt(2024, 7, 3)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(
            Endpoints::default().precipitation_url(at),
            "https://www.data.jma.go.jp/stats/data/mdrr/pre_rct/alltable/pre1h00_202407030905.csv"
        );
    }

    #[test]
    fn test_custom_template() {
        let endpoints = Endpoints {
            precipitation_template: "mem://pre/{timestamp}".to_string(),
            ..Endpoints::default()
        };
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(endpoints.precipitation_url(at), "mem://pre/202401011200");
    }
}
