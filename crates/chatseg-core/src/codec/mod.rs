//! Segment encoders.
//!
//! - [`legacy`]: `[CQ:...]` tag strings, pure.
//! - [`record`]: `{type, data}` structured records, pure.
//! - [`wire`] and [`forward`]: platform payloads, which may download,
//!   inline or publish media.

pub mod forward;
pub mod legacy;
pub mod record;
pub mod wire;

pub use legacy::{message_to_legacy_string, to_legacy_string};
pub use record::{from_structured_record, to_structured_record};
pub use wire::WireEncoder;
