//! Materializer -- resolves resource references to local files or base64.
//!
//! Every call does the work again: there is no cache keyed by reference, and
//! segments are never rewritten with the resolved location. Callers that
//! want to reuse a resolution keep the returned path themselves.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use chatseg_types::error::SegmentError;
use chatseg_types::resource::ResourceRef;
use chatseg_types::segment::{File, Media};

use super::fetcher::MediaFetcher;
use super::store::MediaStore;

/// Converts a [`ResourceRef`] into a local path or an inline payload,
/// downloading or decoding into the staging area as needed.
pub struct Materializer<S, F> {
    store: S,
    fetcher: F,
}

impl<S: MediaStore, F: MediaFetcher> Materializer<S, F> {
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve `reference` to a file that exists on disk.
    ///
    /// - `LocalPath`: returned (absolute) if it exists, else `NotFound`.
    /// - `RemoteUrl`: downloaded to a fresh staging file.
    /// - `InlineBlob`: decoded to a fresh staging file.
    pub async fn resolve_to_local_path(
        &self,
        reference: &ResourceRef,
    ) -> Result<PathBuf, SegmentError> {
        self.resolve_to_local_path_as(reference, None).await
    }

    /// Like [`Self::resolve_to_local_path`], naming staged copies with
    /// `extension`.
    pub async fn resolve_to_local_path_as(
        &self,
        reference: &ResourceRef,
        extension: Option<&str>,
    ) -> Result<PathBuf, SegmentError> {
        match reference {
            ResourceRef::LocalPath(path) => self.existing_local(path).await,
            ResourceRef::RemoteUrl(url) => self.download(url, extension).await,
            ResourceRef::InlineBlob(payload) => {
                let bytes = decode_blob(payload)?;
                self.stage_bytes(&bytes, extension).await
            }
        }
    }

    /// Resolve `reference` to a raw base64 payload (no `base64://` prefix).
    pub async fn resolve_to_base64(&self, reference: &ResourceRef) -> Result<String, SegmentError> {
        match reference {
            ResourceRef::InlineBlob(payload) => Ok(payload.clone()),
            ResourceRef::LocalPath(path) => {
                let path = self.existing_local(path).await?;
                self.read_base64(&path).await
            }
            ResourceRef::RemoteUrl(url) => {
                let path = self.download(url, None).await?;
                self.read_base64(&path).await
            }
        }
    }

    /// Write `bytes` to a fresh staging file and return its path.
    pub async fn stage_bytes(
        &self,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> Result<PathBuf, SegmentError> {
        let path = self.store.staging_path(extension).await?;
        self.store.write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "staged inline media");
        Ok(path)
    }

    /// Resolve a media segment to a local file, preferring its original path
    /// when that file is still present.
    pub async fn resolve_media(&self, media: &dyn Media) -> Result<PathBuf, SegmentError> {
        if let Some(path) = self.present_hint(media).await {
            return Ok(path);
        }
        let reference = media.resource()?;
        self.resolve_to_local_path_as(&reference, media.staging_extension())
            .await
    }

    /// Resolve a media segment to a raw base64 payload, preferring its
    /// original path when that file is still present.
    pub async fn media_to_base64(&self, media: &dyn Media) -> Result<String, SegmentError> {
        if let Some(path) = self.present_hint(media).await {
            return self.read_base64(&path).await;
        }
        let reference = media.resource()?;
        self.resolve_to_base64(&reference).await
    }

    /// Locate the content of a file segment.
    ///
    /// Returns the URL when `allow_return_url` is set and one is present,
    /// otherwise the existing local path, otherwise downloads the URL into
    /// staging. Fails when neither is usable.
    pub async fn file_location(
        &self,
        file: &File,
        allow_return_url: bool,
    ) -> Result<String, SegmentError> {
        if allow_return_url && !file.url.is_empty() {
            return Ok(file.url.clone());
        }

        if !file.file.is_empty() {
            let local = absolute(Path::new(&file.file))?;
            if self.store.exists(&local).await {
                return Ok(local.display().to_string());
            }
        }

        if !file.url.is_empty() {
            let path = self.download(&file.url, None).await?;
            return Ok(path.display().to_string());
        }

        if file.file.is_empty() {
            Err(SegmentError::Validation(format!(
                "file segment '{}' has neither a path nor a url",
                file.name
            )))
        } else {
            Err(SegmentError::NotFound(file.file.clone()))
        }
    }

    async fn present_hint(&self, media: &dyn Media) -> Option<PathBuf> {
        let hint = absolute(media.path_hint()?).ok()?;
        self.store.exists(&hint).await.then_some(hint)
    }

    async fn existing_local(&self, path: &Path) -> Result<PathBuf, SegmentError> {
        let path = absolute(path)?;
        if self.store.exists(&path).await {
            Ok(path)
        } else {
            Err(SegmentError::NotFound(path.display().to_string()))
        }
    }

    async fn download(&self, url: &str, extension: Option<&str>) -> Result<PathBuf, SegmentError> {
        let dest = self.store.staging_path(extension).await?;
        debug!(url = %url, dest = %dest.display(), "downloading media");
        self.fetcher.download(url, &dest).await?;

        if !self.store.exists(&dest).await {
            return Err(SegmentError::Network(format!("download failed: {url}")));
        }
        Ok(dest)
    }

    async fn read_base64(&self, path: &Path) -> Result<String, SegmentError> {
        let bytes = self.store.read(path).await?;
        Ok(STANDARD.encode(bytes))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, SegmentError> {
    std::path::absolute(path).map_err(|e| {
        SegmentError::Validation(format!("cannot resolve path {}: {e}", path.display()))
    })
}

fn decode_blob(payload: &str) -> Result<Vec<u8>, SegmentError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| SegmentError::Validation(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetcher, MockStore};
    use chatseg_types::segment::{Image, Record};

    fn materializer(store: &MockStore, fetcher: MockFetcher) -> Materializer<MockStore, MockFetcher> {
        Materializer::new(store.clone(), fetcher)
    }

    #[tokio::test]
    async fn local_path_returned_when_present() {
        let store = MockStore::default().with_file("/srv/a.png", b"png");
        let m = materializer(&store, MockFetcher::new(&store));

        let path = m
            .resolve_to_local_path(&ResourceRef::LocalPath("/srv/a.png".into()))
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/a.png"));
        assert_eq!(store.staged_count(), 0);
    }

    #[tokio::test]
    async fn missing_local_path_is_not_found() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));

        let err = m
            .resolve_to_local_path(&ResourceRef::LocalPath("/srv/missing.png".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, SegmentError::NotFound(_)));
    }

    #[tokio::test]
    async fn remote_url_downloads_into_staging() {
        let store = MockStore::default();
        let fetcher = MockFetcher::new(&store).with_response("http://x/y.png", b"remote");
        let m = materializer(&store, fetcher.clone());

        let path = m
            .resolve_to_local_path(&ResourceRef::RemoteUrl("http://x/y.png".to_string()))
            .await
            .unwrap();
        assert!(path.starts_with("/staging"));
        assert_eq!(store.contents(&path).unwrap(), b"remote");
        assert_eq!(fetcher.calls(), vec!["http://x/y.png".to_string()]);
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));

        let err = m
            .resolve_to_local_path(&ResourceRef::RemoteUrl("http://x/gone.png".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SegmentError::Network(_)));
    }

    #[tokio::test]
    async fn inline_blob_is_decoded_into_staging() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));

        let path = m
            .resolve_to_local_path_as(&ResourceRef::inline("QUJD"), Some("jpg"))
            .await
            .unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(store.contents(&path).unwrap(), b"ABC");
    }

    #[tokio::test]
    async fn invalid_blob_is_validation_error() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));

        let err = m
            .resolve_to_local_path(&ResourceRef::inline("%%%"))
            .await
            .unwrap_err();
        assert!(matches!(err, SegmentError::Validation(_)));
    }

    #[tokio::test]
    async fn no_caching_between_calls() {
        let store = MockStore::default();
        let fetcher = MockFetcher::new(&store).with_response("http://x/y.png", b"remote");
        let m = materializer(&store, fetcher.clone());
        let reference = ResourceRef::RemoteUrl("http://x/y.png".to_string());

        let first = m.resolve_to_local_path(&reference).await.unwrap();
        let second = m.resolve_to_local_path(&reference).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn base64_for_every_form() {
        let store = MockStore::default().with_file("/srv/a.bin", b"local");
        let fetcher = MockFetcher::new(&store).with_response("https://x/a.bin", b"remote");
        let m = materializer(&store, fetcher);

        let local = m
            .resolve_to_base64(&ResourceRef::LocalPath("/srv/a.bin".into()))
            .await
            .unwrap();
        assert_eq!(STANDARD.decode(local).unwrap(), b"local");

        let remote = m
            .resolve_to_base64(&ResourceRef::RemoteUrl("https://x/a.bin".to_string()))
            .await
            .unwrap();
        assert_eq!(STANDARD.decode(remote).unwrap(), b"remote");

        let inline = m.resolve_to_base64(&ResourceRef::inline("base64://QUJD")).await.unwrap();
        assert_eq!(inline, "QUJD");
    }

    #[tokio::test]
    async fn staged_path_round_trips_through_base64() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));
        let original = b"\x00\x01binary\xff".to_vec();

        let path = m.stage_bytes(&original, None).await.unwrap();
        let blob = m
            .resolve_to_base64(&ResourceRef::LocalPath(path))
            .await
            .unwrap();
        assert_eq!(STANDARD.decode(blob).unwrap(), original);
    }

    #[tokio::test]
    async fn media_prefers_present_path_hint() {
        let store = MockStore::default().with_file("/srv/voice.amr", b"amr");
        let fetcher = MockFetcher::new(&store).with_response("http://x/voice.amr", b"remote");
        let m = materializer(&store, fetcher.clone());

        let record = Record {
            path: Some("/srv/voice.amr".to_string()),
            ..Record::from_url("http://x/voice.amr").unwrap()
        };
        let path = m.resolve_media(&record).await.unwrap();
        assert_eq!(path, PathBuf::from("/srv/voice.amr"));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn image_media_stages_with_jpg_extension() {
        let store = MockStore::default();
        let m = materializer(&store, MockFetcher::new(&store));

        let path = m.resolve_media(&Image::from_bytes(b"img")).await.unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[tokio::test]
    async fn file_location_order() {
        let store = MockStore::default().with_file("/srv/a.txt", b"a");
        let fetcher = MockFetcher::new(&store).with_response("http://x/a.txt", b"a");
        let m = materializer(&store, fetcher.clone());

        let both = File {
            name: "a.txt".to_string(),
            file: "/srv/a.txt".to_string(),
            url: "http://x/a.txt".to_string(),
        };
        assert_eq!(m.file_location(&both, true).await.unwrap(), "http://x/a.txt");
        assert_eq!(m.file_location(&both, false).await.unwrap(), "/srv/a.txt");

        let remote_only = File::from_url("a.txt", "http://x/a.txt").unwrap();
        let staged = m.file_location(&remote_only, false).await.unwrap();
        assert!(staged.starts_with("/staging"));
        assert_eq!(fetcher.calls().len(), 1);

        let missing = File::new("b.txt", "/srv/b.txt");
        assert!(matches!(
            m.file_location(&missing, false).await,
            Err(SegmentError::NotFound(_))
        ));
    }
}
