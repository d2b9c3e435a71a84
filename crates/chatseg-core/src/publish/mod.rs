//! Publishing: exposing a local file as a callback-fetchable HTTP URL.

pub mod publisher;
pub mod registry;

pub use publisher::Publisher;
pub use registry::TokenRegistry;
