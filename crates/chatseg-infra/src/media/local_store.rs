//! LocalMediaStore -- [`MediaStore`] backed by `tokio::fs`.
//!
//! Staged files are named with a UUIDv7 so concurrent resolutions never
//! collide and names sort by creation time. Nothing here deletes staged
//! files; cleanup of the staging directory is up to the embedding
//! application.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chatseg_core::media::MediaStore;
use chatseg_types::error::SegmentError;
use uuid::Uuid;

/// Media store rooted at a staging directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    staging_dir: PathBuf,
}

impl LocalMediaStore {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }
}

impl MediaStore for LocalMediaStore {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, SegmentError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn staging_path(&self, extension: Option<&str>) -> Result<PathBuf, SegmentError> {
        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| io_error(&self.staging_dir, e))?;

        let id = Uuid::now_v7().simple().to_string();
        let name = match extension {
            Some(ext) => format!("{id}.{ext}"),
            None => id,
        };
        Ok(self.staging_dir.join(name))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SegmentError> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| io_error(path, e))
    }
}

/// Map an I/O failure on `path` to the matching [`SegmentError`].
pub(crate) fn io_error(path: &Path, err: std::io::Error) -> SegmentError {
    match err.kind() {
        ErrorKind::NotFound => SegmentError::NotFound(path.display().to_string()),
        _ => SegmentError::Storage(format!("{}: {err}", path.display())),
    }
}
