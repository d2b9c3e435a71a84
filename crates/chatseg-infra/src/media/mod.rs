//! Filesystem and HTTP adapters for the materializer ports.

pub mod http_fetcher;
pub mod local_store;

pub use http_fetcher::HttpMediaFetcher;
pub use local_store::LocalMediaStore;
