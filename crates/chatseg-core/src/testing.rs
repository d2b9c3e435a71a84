//! In-memory mock ports shared by the unit tests of this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chatseg_types::config::ChatsegConfig;
use chatseg_types::error::SegmentError;

use crate::codec::WireEncoder;
use crate::media::{Materializer, MediaFetcher, MediaStore};
use crate::publish::{Publisher, TokenRegistry};

/// A filesystem held in a map. Staging paths are `/staging/{n}[.ext]`.
#[derive(Clone, Default)]
pub(crate) struct MockStore {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    staged: Arc<AtomicUsize>,
}

impl MockStore {
    pub(crate) fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), bytes.to_vec());
        self
    }

    pub(crate) fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub(crate) fn staged_count(&self) -> usize {
        self.staged.load(Ordering::SeqCst)
    }
}

impl MediaStore for MockStore {
    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, SegmentError> {
        self.contents(path)
            .ok_or_else(|| SegmentError::NotFound(path.display().to_string()))
    }

    async fn staging_path(&self, extension: Option<&str>) -> Result<PathBuf, SegmentError> {
        let n = self.staged.fetch_add(1, Ordering::SeqCst);
        let name = match extension {
            Some(ext) => format!("{n}.{ext}"),
            None => n.to_string(),
        };
        Ok(Path::new("/staging").join(name))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SegmentError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Serves scripted responses into a [`MockStore`], optionally after a delay.
/// Unknown URLs fail with a network error.
#[derive(Clone)]
pub(crate) struct MockFetcher {
    store: MockStore,
    responses: HashMap<String, (Vec<u8>, Duration)>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub(crate) fn new(store: &MockStore) -> Self {
        Self {
            store: store.clone(),
            responses: HashMap::new(),
            calls: Arc::default(),
        }
    }

    pub(crate) fn with_response(self, url: &str, bytes: &[u8]) -> Self {
        self.with_delayed_response(url, bytes, Duration::ZERO)
    }

    pub(crate) fn with_delayed_response(mut self, url: &str, bytes: &[u8], delay: Duration) -> Self {
        self.responses
            .insert(url.to_string(), (bytes.to_vec(), delay));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MediaFetcher for MockFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), SegmentError> {
        self.calls.lock().unwrap().push(url.to_string());
        let (bytes, delay) = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| SegmentError::Network(format!("HTTP 404 Not Found: {url}")))?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.store.write(dest, &bytes).await
    }
}

/// Hands out `tok-{n}` tokens and remembers every registered path.
#[derive(Clone, Default)]
pub(crate) struct RecordingRegistry {
    registered: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingRegistry {
    pub(crate) fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().unwrap().clone()
    }
}

impl TokenRegistry for RecordingRegistry {
    async fn register(&self, path: &Path) -> Result<String, SegmentError> {
        let mut registered = self.registered.lock().unwrap();
        registered.push(path.to_path_buf());
        Ok(format!("tok-{}", registered.len() - 1))
    }
}

/// Mock ports wired into a materializer and publisher.
pub(crate) struct Fixture {
    pub(crate) fetcher: MockFetcher,
    pub(crate) registry: RecordingRegistry,
    pub(crate) materializer: Materializer<MockStore, MockFetcher>,
    pub(crate) publisher: Publisher<RecordingRegistry>,
}

impl Fixture {
    pub(crate) fn new(store: MockStore, fetcher: MockFetcher, callback: Option<&str>) -> Self {
        let registry = RecordingRegistry::default();
        let config = ChatsegConfig {
            callback_api_base: callback.map(str::to_string),
            ..ChatsegConfig::default()
        };
        Self {
            materializer: Materializer::new(store, fetcher.clone()),
            publisher: Publisher::new(registry.clone(), &config),
            fetcher,
            registry,
        }
    }

    pub(crate) fn encoder(&self) -> WireEncoder<'_, MockStore, MockFetcher, RecordingRegistry> {
        WireEncoder::new(&self.materializer, &self.publisher)
    }
}
