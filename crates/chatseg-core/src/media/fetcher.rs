//! Media fetcher trait.
//!
//! The network side of materialization. The reqwest-backed
//! `HttpMediaFetcher` lives in chatseg-infra.

use std::future::Future;
use std::path::Path;

use chatseg_types::error::SegmentError;

/// Downloads remote media.
pub trait MediaFetcher: Send + Sync {
    /// Download `url` into the file at `dest`.
    ///
    /// Failures map to [`SegmentError::Network`] and are not retried. A
    /// download that fails or is cancelled midway may leave a partial file at
    /// `dest`.
    fn download(
        &self,
        url: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<(), SegmentError>> + Send;
}
