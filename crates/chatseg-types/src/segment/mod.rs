//! Chat message segment model.
//!
//! A message is an ordered sequence of [`Segment`]s. `Segment` is a closed
//! sum type with one payload struct per kind. Its serde representation is
//! the generic structured record:
//!
//! ```json
//! {"type": "image", "data": {"file": "http://x/y.png", "cache": true, ...}}
//! ```
//!
//! so `serde_json::to_value(&segment)` and `serde_json::from_value(record)`
//! convert in both directions. Payload field order is significant: the
//! legacy tag string emits fields in declaration order.

pub mod forward;
pub mod media;
pub mod simple;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SegmentError;
use crate::resource::ResourceRef;

pub use forward::{Forward, Node, Nodes, Reply};
pub use media::{CardImage, File, Image, Record, Video};
pub use simple::{
    Anonymous, At, Contact, Dice, Face, Json, Location, Music, Plain, Poke, RedBag, Rps, Shake,
    Share, Tts, Unknown, WechatEmoji, Xml,
};

/// One atomic unit of chat message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Segment {
    #[serde(rename = "text", alias = "plain")]
    Plain(Plain),
    Face(Face),
    Record(Record),
    Video(Video),
    At(At),
    Rps(Rps),
    Dice(Dice),
    Shake(Shake),
    Anonymous(Anonymous),
    Share(Share),
    Contact(Contact),
    Location(Location),
    Music(Music),
    Image(Image),
    Reply(Reply),
    RedBag(RedBag),
    Poke(Poke),
    Forward(Forward),
    Node(Node),
    Nodes(Nodes),
    Xml(Xml),
    Json(Json),
    CardImage(CardImage),
    Tts(Tts),
    Unknown(Unknown),
    File(File),
    #[serde(alias = "WechatEmoji")]
    WechatEmoji(WechatEmoji),
}

/// The kind tag of a [`Segment`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Plain,
    Face,
    Record,
    Video,
    At,
    Rps,
    Dice,
    Shake,
    Anonymous,
    Share,
    Contact,
    Location,
    Music,
    Image,
    Reply,
    RedBag,
    Poke,
    Forward,
    Node,
    Nodes,
    Xml,
    Json,
    CardImage,
    Tts,
    Unknown,
    File,
    WechatEmoji,
}

impl SegmentKind {
    /// Lowercased kind name, as used in `[CQ:<kind>,...]`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Plain => "plain",
            SegmentKind::Face => "face",
            SegmentKind::Record => "record",
            SegmentKind::Video => "video",
            SegmentKind::At => "at",
            SegmentKind::Rps => "rps",
            SegmentKind::Dice => "dice",
            SegmentKind::Shake => "shake",
            SegmentKind::Anonymous => "anonymous",
            SegmentKind::Share => "share",
            SegmentKind::Contact => "contact",
            SegmentKind::Location => "location",
            SegmentKind::Music => "music",
            SegmentKind::Image => "image",
            SegmentKind::Reply => "reply",
            SegmentKind::RedBag => "redbag",
            SegmentKind::Poke => "poke",
            SegmentKind::Forward => "forward",
            SegmentKind::Node => "node",
            SegmentKind::Nodes => "nodes",
            SegmentKind::Xml => "xml",
            SegmentKind::Json => "json",
            SegmentKind::CardImage => "cardimage",
            SegmentKind::Tts => "tts",
            SegmentKind::Unknown => "unknown",
            SegmentKind::File => "file",
            SegmentKind::WechatEmoji => "wechatemoji",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Plain(_) => SegmentKind::Plain,
            Segment::Face(_) => SegmentKind::Face,
            Segment::Record(_) => SegmentKind::Record,
            Segment::Video(_) => SegmentKind::Video,
            Segment::At(_) => SegmentKind::At,
            Segment::Rps(_) => SegmentKind::Rps,
            Segment::Dice(_) => SegmentKind::Dice,
            Segment::Shake(_) => SegmentKind::Shake,
            Segment::Anonymous(_) => SegmentKind::Anonymous,
            Segment::Share(_) => SegmentKind::Share,
            Segment::Contact(_) => SegmentKind::Contact,
            Segment::Location(_) => SegmentKind::Location,
            Segment::Music(_) => SegmentKind::Music,
            Segment::Image(_) => SegmentKind::Image,
            Segment::Reply(_) => SegmentKind::Reply,
            Segment::RedBag(_) => SegmentKind::RedBag,
            Segment::Poke(_) => SegmentKind::Poke,
            Segment::Forward(_) => SegmentKind::Forward,
            Segment::Node(_) => SegmentKind::Node,
            Segment::Nodes(_) => SegmentKind::Nodes,
            Segment::Xml(_) => SegmentKind::Xml,
            Segment::Json(_) => SegmentKind::Json,
            Segment::CardImage(_) => SegmentKind::CardImage,
            Segment::Tts(_) => SegmentKind::Tts,
            Segment::Unknown(_) => SegmentKind::Unknown,
            Segment::File(_) => SegmentKind::File,
            Segment::WechatEmoji(_) => SegmentKind::WechatEmoji,
        }
    }

    /// The media view of this segment, for the kinds that carry a resource.
    pub fn as_media(&self) -> Option<&dyn Media> {
        match self {
            Segment::Image(image) => Some(image),
            Segment::Record(record) => Some(record),
            Segment::Video(video) => Some(video),
            Segment::CardImage(card) => Some(card),
            Segment::File(file) => Some(file),
            _ => None,
        }
    }
}

/// Common view over media-bearing payloads.
pub trait Media: Send + Sync {
    /// The authoritative resource reference, parsed from the stored string.
    fn resource(&self) -> Result<ResourceRef, SegmentError>;

    /// The original local path the segment was built from, if any. Used as a
    /// fast path when the file is still on disk.
    fn path_hint(&self) -> Option<&Path>;

    /// File extension for staged copies of this media, if the kind has one.
    fn staging_extension(&self) -> Option<&'static str> {
        None
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Segment {
                fn from(payload: $variant) -> Self {
                    Segment::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload!(
    Plain, Face, Record, Video, At, Rps, Dice, Shake, Anonymous, Share, Contact, Location, Music,
    Image, Reply, RedBag, Poke, Forward, Node, Nodes, Xml, Json, CardImage, Tts, Unknown, File,
    WechatEmoji,
);

/// Accept ids that arrive either as JSON strings or as numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
