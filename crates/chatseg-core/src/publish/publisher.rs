//! Publisher -- turns a resource into `{callback_base}/api/file/{token}`.
//!
//! The callback base comes from [`ChatsegConfig`] and the token from an
//! injected [`TokenRegistry`]; there is no process-wide state.

use std::path::Path;

use tracing::debug;

use chatseg_types::config::ChatsegConfig;
use chatseg_types::error::SegmentError;
use chatseg_types::resource::ResourceRef;
use chatseg_types::segment::Media;

use super::registry::TokenRegistry;
use crate::media::{Materializer, MediaFetcher, MediaStore};

/// Publishes local files through the external file-token gateway.
pub struct Publisher<R> {
    registry: R,
    callback_base: Option<String>,
}

impl<R: TokenRegistry> Publisher<R> {
    pub fn new(registry: R, config: &ChatsegConfig) -> Self {
        Self {
            registry,
            callback_base: config.callback_base().map(str::to_string),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The normalized callback base (no trailing slash), if configured.
    pub fn callback_base(&self) -> Option<&str> {
        self.callback_base.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.callback_base.is_some()
    }

    /// Materialize `reference` locally and publish it.
    ///
    /// Fails with [`SegmentError::Configuration`] before any download or
    /// registration when no callback base is configured.
    pub async fn publish<S: MediaStore, F: MediaFetcher>(
        &self,
        materializer: &Materializer<S, F>,
        reference: &ResourceRef,
    ) -> Result<String, SegmentError> {
        self.require_base()?;
        let path = materializer.resolve_to_local_path(reference).await?;
        self.publish_path(&path).await
    }

    /// Publish a media segment, using its original path when still present.
    pub async fn publish_media<S: MediaStore, F: MediaFetcher>(
        &self,
        materializer: &Materializer<S, F>,
        media: &dyn Media,
    ) -> Result<String, SegmentError> {
        self.require_base()?;
        let path = materializer.resolve_media(media).await?;
        self.publish_path(&path).await
    }

    /// Register an already-materialized path.
    pub async fn publish_path(&self, path: &Path) -> Result<String, SegmentError> {
        let base = self.require_base()?;
        let token = self.registry.register(path).await?;
        let url = format!("{base}/api/file/{token}");
        debug!(path = %path.display(), url = %url, "registered file for callback");
        Ok(url)
    }

    fn require_base(&self) -> Result<&str, SegmentError> {
        self.callback_base
            .as_deref()
            .ok_or_else(SegmentError::publishing_unavailable)
    }
}
