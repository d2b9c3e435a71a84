//! Infrastructure layer for chatseg.
//!
//! Contains implementations of the ports defined in `chatseg-core`: a
//! `tokio::fs` staging store, a reqwest media fetcher, an in-memory file
//! token registry, plus config loading and the [`context::MediaContext`]
//! that wires them together.

pub mod config;
pub mod context;
pub mod media;
pub mod publish;
