//! Token registry adapter for the publisher.

pub mod token_registry;

pub use token_registry::InMemoryTokenRegistry;
