//! File token registry trait.
//!
//! The external publishing gateway maps opaque tokens to local paths and
//! serves them at `GET /api/file/{token}`. Token lifetime and storage belong
//! to the gateway; this crate only registers paths.

use std::future::Future;
use std::path::Path;

use chatseg_types::error::SegmentError;

/// Registers local files with the publishing gateway.
///
/// Implementations must tolerate concurrent `register` calls.
pub trait TokenRegistry: Send + Sync {
    /// Register `path` and return the token that now serves it.
    fn register(&self, path: &Path) -> impl Future<Output = Result<String, SegmentError>> + Send;
}
