use crate::output::error::OutputError;
use polars::prelude::*;

/// Renders `df` as UTF-8 CSV with a header row. Nulls become empty fields.
pub fn render_csv(df: &mut DataFrame) -> Result<Vec<u8>, OutputError> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(df)
        .map_err(OutputError::Csv)?;
    Ok(buffer)
}
