//! Media store trait.
//!
//! Defines the filesystem side of materialization: existence checks, reads,
//! and a process-wide staging area for downloaded and decoded media.
//! The `LocalMediaStore` adapter lives in chatseg-infra.

use std::future::Future;
use std::path::{Path, PathBuf};

use chatseg_types::error::SegmentError;

/// Filesystem access used by the materializer.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait MediaStore: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, SegmentError>> + Send;

    /// Reserve a fresh path inside the staging area.
    ///
    /// Every call returns a distinct name so concurrent resolutions never
    /// collide. The staging directory is created if needed; the file itself
    /// is not.
    fn staging_path(
        &self,
        extension: Option<&str>,
    ) -> impl Future<Output = Result<PathBuf, SegmentError>> + Send;

    /// Write `bytes` to `path`, replacing any existing content.
    fn write(
        &self,
        path: &Path,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), SegmentError>> + Send;
}
