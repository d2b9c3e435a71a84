//! Segments that reference or embed other messages: replies, forward
//! references and forwarded-message bundles.
//!
//! A [`Nodes`] bundle holds [`Node`]s; each node holds its own segment list,
//! which may contain further nodes. Bundles are built top-down and never
//! back-referenced, so the structure is acyclic.

use serde::{Deserialize, Serialize};

use super::{Segment, string_or_number};

/// A reply to an earlier message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reply {
    /// Id of the quoted message.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Segments of the quoted message.
    pub chain: Vec<Segment>,
    #[serde(deserialize_with = "string_or_number")]
    pub sender_id: String,
    pub sender_nickname: String,
    /// Unix timestamp of the quoted message.
    pub time: i64,
    /// Plain-text rendering of the quoted message.
    pub message_str: String,
    // Deprecated, kept for older adapters.
    pub text: String,
    pub qq: i64,
    pub seq: i64,
}

impl Default for Reply {
    fn default() -> Self {
        Self {
            id: String::new(),
            chain: Vec::new(),
            sender_id: "0".to_string(),
            sender_nickname: String::new(),
            time: 0,
            message_str: String::new(),
            text: String::new(),
            qq: 0,
            seq: 0,
        }
    }
}

impl Reply {
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// Reference to a forwarded message stored on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Forward {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl Forward {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

/// One forwarded message: its content plus who sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: i64,
    /// Sender display name.
    pub name: String,
    /// Sender id.
    #[serde(deserialize_with = "string_or_number")]
    pub uin: String,
    pub content: Vec<Segment>,
    pub seq: String,
    pub time: i64,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            uin: "0".to_string(),
            content: Vec::new(),
            seq: String::new(),
            time: 0,
        }
    }
}

impl Node {
    pub fn new(content: Vec<Segment>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn with_sender(mut self, uin: impl ToString, name: impl Into<String>) -> Self {
        self.uin = uin.to_string();
        self.name = name.into();
        self
    }
}

/// A forwarded-message bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nodes {
    pub nodes: Vec<Node>,
}

impl Nodes {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}
