//! Rendering of tables to CSV and GeoJSON, and atomic writing of the results.

pub mod csv;
pub mod error;
pub mod geojson;

use crate::output::error::OutputError;
use crate::utils::{ensure_output_dir, persist_all};
use log::info;
use std::path::{Path, PathBuf};
use tokio::task;

/// A fully rendered output file waiting to be written.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub file_name: &'static str,
    pub contents: Vec<u8>,
}

impl RenderedFile {
    pub fn new(file_name: &'static str, contents: Vec<u8>) -> Self {
        Self {
            file_name,
            contents,
        }
    }
}

/// Writes every file into `output_dir`, creating the directory if needed.
///
/// All files are staged as temporary files next to their destination before
/// the first one is moved into place. Returns the final paths in input order.
pub async fn write_files(
    output_dir: &Path,
    files: Vec<RenderedFile>,
) -> Result<Vec<PathBuf>, OutputError> {
    ensure_output_dir(output_dir).await?;
    let dir = output_dir.to_path_buf();
    let paths = task::spawn_blocking(move || persist_all(&dir, files)).await??;
    for path in &paths {
        info!("Wrote {}", path.display());
    }
    Ok(paths)
}
