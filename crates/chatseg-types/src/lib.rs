//! Shared domain types for chat message segments.
//!
//! This crate contains the segment model used across chatseg: the
//! [`segment::Segment`] sum type and its payloads, [`resource::ResourceRef`],
//! configuration and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, base64, thiserror.

pub mod config;
pub mod error;
pub mod resource;
pub mod segment;
