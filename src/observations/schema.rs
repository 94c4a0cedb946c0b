//! Binds the date-qualified headers of an observation feed to named fields.
//!
//! Each header is examined once and claimed by the most specific field label it
//! contains, so a header such as `…最大値観測時の風向の品質情報` goes to the
//! direction quality field and not to the direction field whose label is a
//! prefix of it. Every required field must then own exactly one header.

use crate::observations::error::ObservationError;
use crate::types::feed::{FeedField, FeedKind};
use log::debug;
use polars::prelude::DataFrame;
use std::collections::HashMap;

/// The header a field was bound to, plus whatever text surrounded the label
/// (usually the observation date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub field: FeedField,
    pub header: String,
    pub qualifier: String,
}

/// The resolved column layout of one feed.
#[derive(Debug, Clone)]
pub struct FeedSchema {
    feed: FeedKind,
    bindings: Vec<ColumnBinding>,
}

impl FeedSchema {
    /// Binds every field required by `feed` to one of `headers`.
    ///
    /// # Errors
    ///
    /// [`ObservationError::MissingColumn`] if no header claims a field,
    /// [`ObservationError::AmbiguousColumn`] if more than one does.
    pub fn bind<S: AsRef<str>>(feed: FeedKind, headers: &[S]) -> Result<Self, ObservationError> {
        let fields = feed.required_fields();
        let mut claimed: HashMap<FeedField, Vec<&str>> = HashMap::new();

        for header in headers {
            let header = header.as_ref();
            let most_specific = fields
                .iter()
                .filter(|field| header.contains(field.label()))
                .max_by_key(|field| field.label().len());
            if let Some(field) = most_specific {
                claimed.entry(*field).or_default().push(header);
            }
        }

        let mut bindings = Vec::with_capacity(fields.len());
        for field in fields {
            match claimed.get(&field).map(Vec::as_slice) {
                None | Some([]) => {
                    return Err(ObservationError::MissingColumn {
                        feed: feed.to_string(),
                        label: field.label().to_string(),
                    })
                }
                Some([header]) => {
                    let qualifier = header.replacen(field.label(), "", 1).trim().to_string();
                    if !qualifier.is_empty() {
                        debug!(
                            "{} feed: '{}' bound to '{}' (qualifier '{}')",
                            feed,
                            field.label(),
                            header,
                            qualifier
                        );
                    }
                    bindings.push(ColumnBinding {
                        field,
                        header: header.to_string(),
                        qualifier,
                    });
                }
                Some(many) => {
                    return Err(ObservationError::AmbiguousColumn {
                        feed: feed.to_string(),
                        label: field.label().to_string(),
                        headers: many.iter().map(|h| h.to_string()).collect(),
                    })
                }
            }
        }

        Ok(Self { feed, bindings })
    }

    /// Binds against the column names of a parsed feed.
    pub fn bind_frame(feed: FeedKind, df: &DataFrame) -> Result<Self, ObservationError> {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        Self::bind(feed, &headers)
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// The header bound to `field`, if the field belongs to this feed.
    pub fn header(&self, field: FeedField) -> Option<&str> {
        self.bindings
            .iter()
            .find(|binding| binding.field == field)
            .map(|binding| binding.header.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON: [&str; 9] = [
        "観測所番号",
        "都道府県",
        "地点",
        "国際地点番号",
        "現在時刻(年)",
        "現在時刻(月)",
        "現在時刻(日)",
        "現在時刻(時)",
        "現在時刻(分)",
    ];

    fn with_common(extra: &[&str]) -> Vec<String> {
        COMMON
            .iter()
            .chain(extra.iter())
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_bind_wind_headers_prefers_most_specific_label() {
        let headers = with_common(&[
            "3日の最大値(m/s)",
            "3日の最大値の品質情報",
            "3日の最大値観測時の風向(16方位)",
            "3日の最大値観測時の風向の品質情報",
            "3日の最大値起時(時)",
        ]);
        let schema = FeedSchema::bind(FeedKind::WindSpeed, &headers).unwrap();

        assert_eq!(
            schema.header(FeedField::WindDirection),
            Some("3日の最大値観測時の風向(16方位)")
        );
        assert_eq!(
            schema.header(FeedField::WindDirectionQuality),
            Some("3日の最大値観測時の風向の品質情報")
        );
        assert_eq!(schema.header(FeedField::MaxWindSpeed), Some("3日の最大値(m/s)"));
        assert_eq!(schema.header(FeedField::StationCode), Some("観測所番号"));

        let speed = schema
            .bindings()
            .iter()
            .find(|b| b.field == FeedField::MaxWindSpeed)
            .unwrap();
        assert_eq!(speed.qualifier, "3日の");
    }

    #[test]
    fn test_every_required_field_is_bound_exactly_once() {
        let headers = with_common(&["最高気温(℃)", "最高気温の品質情報", "最高気温起時(時)"]);
        let schema = FeedSchema::bind(FeedKind::Temperature, &headers).unwrap();

        assert_eq!(
            schema.bindings().len(),
            FeedKind::Temperature.required_fields().len()
        );
        for field in FeedKind::Temperature.required_fields() {
            assert!(schema.header(field).is_some(), "{:?} not bound", field);
        }
        assert_eq!(schema.header(FeedField::Precipitation), None);
    }

    #[test]
    fn test_missing_label_is_a_schema_error() {
        let headers = with_common(&["現在値の品質情報"]);
        let err = FeedSchema::bind(FeedKind::Precipitation, &headers).unwrap_err();

        assert!(matches!(
            err,
            ObservationError::MissingColumn { ref label, .. } if label == "現在値(mm)"
        ));
    }

    #[test]
    fn test_duplicate_match_is_a_schema_error() {
        let headers = with_common(&[
            "2日の最高気温(℃)",
            "3日の最高気温(℃)",
            "最高気温の品質情報",
        ]);
        let err = FeedSchema::bind(FeedKind::Temperature, &headers).unwrap_err();

        match err {
            ObservationError::AmbiguousColumn { label, headers, .. } => {
                assert_eq!(label, "最高気温(℃)");
                assert_eq!(headers.len(), 2);
            }
            other => panic!("expected AmbiguousColumn, got {other:?}"),
        }
    }
}
