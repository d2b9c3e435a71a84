//! Media materialization: turning a resource reference into a local file or
//! an inline base64 blob.
//!
//! The ports ([`MediaStore`], [`MediaFetcher`]) are defined here and
//! implemented in chatseg-infra.

pub mod fetcher;
pub mod materializer;
pub mod store;

pub use fetcher::MediaFetcher;
pub use materializer::Materializer;
pub use store::MediaStore;
