//! Legacy tag string encoding.
//!
//! Plain text is emitted bare with `&`, `[` and `]` escaped. Every other
//! kind becomes `[CQ:<kind>,<key>=<value>,...]` with `,` escaped as well.
//! Booleans render as `1`/`0`, absent fields are omitted, nested values
//! (reply chains, node content) render as compact JSON.

use serde_json::Value;

use chatseg_types::error::SegmentError;
use chatseg_types::segment::Segment;

/// Escape plain text for the legacy format.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
}

/// Escape a field value inside a `[CQ:...]` tag.
pub fn escape_value(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace(',', "&#44;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
}

/// Reverse [`escape_text`] and [`escape_value`].
pub fn unescape(text: &str) -> String {
    text.replace("&#44;", ",")
        .replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&amp;", "&")
}

/// Encode one segment. Pure: never touches disk or network.
pub fn to_legacy_string(segment: &Segment) -> Result<String, SegmentError> {
    match segment {
        Segment::Plain(plain) if plain.convert => Ok(escape_text(&plain.text)),
        Segment::Plain(plain) => Ok(plain.text.clone()),
        Segment::Unknown(_) => Ok(String::new()),
        other => tag_string(other),
    }
}

/// Encode a whole message by concatenating its segments.
pub fn message_to_legacy_string(segments: &[Segment]) -> Result<String, SegmentError> {
    segments.iter().map(to_legacy_string).collect()
}

fn tag_string(segment: &Segment) -> Result<String, SegmentError> {
    let record = serde_json::to_value(segment)?;
    let mut output = format!("[CQ:{}", segment.kind().as_str());

    if let Some(data) = record.get("data").and_then(Value::as_object) {
        for (key, value) in data {
            let rendered = match value {
                Value::Null => continue,
                Value::Bool(flag) => String::from(if *flag { "1" } else { "0" }),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            output.push(',');
            output.push_str(key);
            output.push('=');
            output.push_str(&escape_value(&rendered));
        }
    }

    output.push(']');
    Ok(output)
}
