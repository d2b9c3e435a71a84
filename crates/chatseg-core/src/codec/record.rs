//! Structured record encoding: `{"type": <kind>, "data": {<non-null fields>}}`.
//!
//! This is the best-effort legacy shape. It reflects resource references
//! verbatim and never performs disk or network access, even for media.
//! Plain text is trimmed and a mention carries only `qq`; every other kind
//! is its serde form minus null fields.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use chatseg_types::error::SegmentError;
use chatseg_types::segment::Segment;

/// Encode one segment as a structured record.
pub fn to_structured_record(segment: &Segment) -> Result<Value, SegmentError> {
    match segment {
        Segment::Plain(plain) => Ok(json!({"type": "text", "data": {"text": plain.text.trim()}})),
        Segment::At(at) => Ok(json!({"type": "at", "data": {"qq": at.qq}})),
        other => serde_record(other),
    }
}

fn serde_record(segment: &Segment) -> Result<Value, SegmentError> {
    let mut record = serde_json::to_value(segment)?;
    let Some(object) = record.as_object_mut() else {
        return Err(SegmentError::Serialization(format!(
            "{} did not serialize to an object",
            segment.kind()
        )));
    };

    let data = object
        .entry("data")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(fields) = data {
        fields.retain(|_, value| !value.is_null());
    }

    Ok(record)
}

/// Decode a structured record back into a segment.
pub fn from_structured_record(record: &Value) -> Result<Segment, SegmentError> {
    Ok(Segment::deserialize(record)?)
}
