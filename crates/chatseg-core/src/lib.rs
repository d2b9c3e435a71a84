//! Segment encoding, media materialization and publishing for chatseg.
//!
//! This crate defines the ports (`MediaStore`, `MediaFetcher`,
//! `TokenRegistry`) that the infrastructure layer implements. It depends
//! only on `chatseg-types` -- never on `chatseg-infra` or any network or
//! filesystem crate.

pub mod codec;
pub mod media;
pub mod publish;

#[cfg(test)]
mod testing;
