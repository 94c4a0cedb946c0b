use crate::output::error::OutputError;
use crate::output::RenderedFile;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub async fn ensure_output_dir(path: &Path) -> Result<(), OutputError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(OutputError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| OutputError::DirCreation(path.to_path_buf(), e))?;
            Ok(())
        }
        Err(e) => Err(OutputError::DirCreation(path.to_path_buf(), e)),
    }
}

/// Stages every file in `dir`, then moves each into place.
///
/// Nothing is renamed until all files have been staged, so a failed write
/// leaves the previous outputs untouched.
pub fn persist_all(dir: &Path, files: Vec<RenderedFile>) -> Result<Vec<PathBuf>, OutputError> {
    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let target = dir.join(file.file_name);
        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| OutputError::Write(target.clone(), e))?;
        temp.write_all(&file.contents)
            .and_then(|_| temp.flush())
            .map_err(|e| OutputError::Write(target.clone(), e))?;
        staged.push((temp, target));
    }

    let mut paths = Vec::with_capacity(staged.len());
    for (temp, target) in staged {
        temp.persist(&target)
            .map_err(|e| OutputError::Persist(target.clone(), e))?;
        paths.push(target);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_all_writes_every_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let files = vec![
            RenderedFile::new("a.csv", b"x,y\n1,2\n".to_vec()),
            RenderedFile::new("a.geojson", b"{}\n".to_vec()),
        ];
        let paths = persist_all(dir.path(), files)?;

        assert_eq!(paths, vec![dir.path().join("a.csv"), dir.path().join("a.geojson")]);
        assert_eq!(std::fs::read(&paths[0])?, b"x,y\n1,2\n");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_output_dir_creates_and_rejects_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("out").join("today");
        ensure_output_dir(&nested).await?;
        assert!(nested.is_dir());

        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x")?;
        assert!(matches!(
            ensure_output_dir(&file).await,
            Err(OutputError::NotADirectory(_))
        ));
        Ok(())
    }
}
