//! Decoding of the Shift_JIS CSV feeds into string-typed DataFrames.

use crate::feeds::error::FeedError;
use encoding_rs::SHIFT_JIS;
use log::{info, warn};
use polars::prelude::*;
use std::io::Cursor;
use tokio::task;

/// Decodes a Shift_JIS body to UTF-8 text. Malformed sequences are replaced
/// with U+FFFD and reported once per feed.
pub fn decode_shift_jis(bytes: &[u8], feed: &str) -> String {
    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        warn!(
            "The {} feed contained byte sequences that are not valid Shift_JIS; they were replaced",
            feed
        );
    }
    text.into_owned()
}

/// Parses CSV text (with a header row) into a DataFrame whose columns are all
/// strings. Typing happens later, field by field, so that a malformed cell is
/// reported instead of silently turned into a null.
pub fn read_string_csv(text: String, feed: &str) -> Result<DataFrame, FeedError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| FeedError::CsvRead {
            feed: feed.to_string(),
            source: e,
        })
}

/// Decodes and parses a raw CSV feed body on a blocking thread.
pub async fn csv_feed_to_dataframe(bytes: Vec<u8>, feed: &str) -> Result<DataFrame, FeedError> {
    let feed_owned = feed.to_string();
    let df = task::spawn_blocking(move || {
        let text = decode_shift_jis(&bytes, &feed_owned);
        read_string_csv(text, &feed_owned)
    })
    .await??;
    info!(
        "Parsed {} feed: {} rows, {} columns",
        feed,
        df.height(),
        df.width()
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_jis(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_shift_jis_round_trips_japanese_text() {
        let bytes = shift_jis("観測所番号,地点\n11001,宗谷岬\n");
        assert_eq!(
            decode_shift_jis(&bytes, "test"),
            "観測所番号,地点\n11001,宗谷岬\n"
        );
    }

    #[test]
    fn test_read_string_csv_keeps_everything_as_text() -> Result<(), Box<dyn std::error::Error>> {
        let df = read_string_csv("code,value\n0011,1.5\n0012,\n".to_string(), "test")?;

        assert_eq!(df.height(), 2);
        let codes = df.column("code")?.str()?;
        assert_eq!(codes.get(0), Some("0011"));
        assert_eq!(df.column("value")?.dtype(), &DataType::String);
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_feed_to_dataframe_decodes_headers() -> Result<(), Box<dyn std::error::Error>>
    {
        let bytes = shift_jis("観測所番号,現在値(mm)\n44132,0.5\n");
        let df = csv_feed_to_dataframe(bytes, "precipitation").await?;

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["観測所番号", "現在値(mm)"]);
        Ok(())
    }
}
