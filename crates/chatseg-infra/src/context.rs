//! MediaContext -- the concrete adapters wired together from a config.
//!
//! Owns one materializer and one publisher so that a whole application
//! shares a single staging directory and token table.

use std::path::Path;
use std::time::Duration;

use chatseg_core::codec::WireEncoder;
use chatseg_core::media::Materializer;
use chatseg_core::publish::Publisher;
use chatseg_types::config::ChatsegConfig;
use chatseg_types::error::SegmentError;

use crate::config::{load_config, resolve_staging_dir};
use crate::media::{HttpMediaFetcher, LocalMediaStore};
use crate::publish::InMemoryTokenRegistry;

pub type LocalMaterializer = Materializer<LocalMediaStore, HttpMediaFetcher>;
pub type LocalPublisher = Publisher<InMemoryTokenRegistry>;
pub type LocalWireEncoder<'a> =
    WireEncoder<'a, LocalMediaStore, HttpMediaFetcher, InMemoryTokenRegistry>;

pub struct MediaContext {
    materializer: LocalMaterializer,
    publisher: LocalPublisher,
}

impl MediaContext {
    /// Build the adapters described by `config`, staging under `data_dir`
    /// unless the config says otherwise.
    pub fn from_config(config: &ChatsegConfig, data_dir: &Path) -> Result<Self, SegmentError> {
        let store = LocalMediaStore::new(resolve_staging_dir(config, data_dir));
        let fetcher = HttpMediaFetcher::new(Duration::from_secs(config.download_timeout_secs))?;
        let registry = InMemoryTokenRegistry::from_config(config);

        tracing::info!(
            staging_dir = %store.staging_dir().display(),
            publishing = config.callback_base().is_some(),
            "media context ready"
        );

        Ok(Self {
            materializer: Materializer::new(store, fetcher),
            publisher: Publisher::new(registry, config),
        })
    }

    /// Load `{data_dir}/config.toml` and build from it.
    pub async fn load(data_dir: &Path) -> Result<Self, SegmentError> {
        let config = load_config(data_dir).await;
        Self::from_config(&config, data_dir)
    }

    pub fn materializer(&self) -> &LocalMaterializer {
        &self.materializer
    }

    pub fn publisher(&self) -> &LocalPublisher {
        &self.publisher
    }

    /// The token table, for serving `GET /api/file/{token}`.
    pub fn registry(&self) -> &InMemoryTokenRegistry {
        self.publisher.registry()
    }

    pub fn encoder(&self) -> LocalWireEncoder<'_> {
        WireEncoder::new(&self.materializer, &self.publisher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatseg_core::media::MediaStore;
    use chatseg_types::segment::{File, Segment};
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_uses_default_staging_dir() {
        let tmp = TempDir::new().unwrap();
        let ctx = MediaContext::load(tmp.path()).await.unwrap();

        assert_eq!(ctx.materializer().store().staging_dir(), tmp.path().join("temp"));
        assert!(!ctx.publisher().is_available());
    }

    #[tokio::test]
    async fn local_file_published_and_redeemable() {
        let tmp = TempDir::new().unwrap();
        let config = ChatsegConfig {
            callback_api_base: Some("http://cb:6185".to_string()),
            ..ChatsegConfig::default()
        };
        let ctx = MediaContext::from_config(&config, tmp.path()).unwrap();

        let path = ctx.materializer().stage_bytes(b"report", Some("txt")).await.unwrap();
        assert!(ctx.materializer().store().exists(&path).await);

        let file = File::new("report.txt", path.display().to_string());
        let payload = ctx.encoder().to_wire_payload(&Segment::from(file)).await.unwrap();

        let link = payload["data"]["file"].as_str().unwrap();
        let token = link.strip_prefix("http://cb:6185/api/file/").unwrap();
        assert_eq!(ctx.registry().take(token), Some(path));
    }
}
