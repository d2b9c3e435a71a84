//! HttpMediaFetcher -- [`MediaFetcher`] backed by `reqwest`.
//!
//! Streams the response body straight to disk. Non-2xx statuses, transport
//! errors and timeouts all surface as [`SegmentError::Network`]; there are
//! no retries. A partially written file is removed on failure.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use chatseg_core::media::MediaFetcher;
use chatseg_types::error::SegmentError;

use super::local_store::io_error;

/// Downloads media over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SegmentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SegmentError::Configuration(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn stream_to_file(&self, url: &str, dest: &Path) -> Result<u64, SegmentError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?
            .error_for_status()
            .map_err(|e| network_error(url, e))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| io_error(dest, e))?;
        let mut body = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| network_error(url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| io_error(dest, e))?;

        Ok(written)
    }
}

impl MediaFetcher for HttpMediaFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), SegmentError> {
        match self.stream_to_file(url, dest).await {
            Ok(size) => {
                debug!(url = %url, dest = %dest.display(), size, "download finished");
                Ok(())
            }
            Err(err) => {
                warn!(url = %url, error = %err, "download failed");
                let _ = tokio::fs::remove_file(dest).await;
                Err(err)
            }
        }
    }
}

fn network_error(url: &str, err: reqwest::Error) -> SegmentError {
    match err.status() {
        Some(status) => SegmentError::Network(format!("HTTP {status} fetching {url}")),
        None => SegmentError::Network(format!("fetching {url}: {err}")),
    }
}
