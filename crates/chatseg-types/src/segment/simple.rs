//! Segment payloads without media or nested segments.

use serde::{Deserialize, Serialize};

use super::string_or_number;

fn default_true() -> bool {
    true
}

/// Plain text. `convert = false` sends the text without legacy escaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plain {
    pub text: String,
    #[serde(skip_serializing, default = "default_true")]
    pub convert: bool,
}

impl Default for Plain {
    fn default() -> Self {
        Self {
            text: String::new(),
            convert: true,
        }
    }
}

impl Plain {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            convert: true,
        }
    }

    /// Text that is emitted verbatim in the legacy tag string.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            convert: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Face {
    pub id: i64,
}

impl Face {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// A mention. `qq` is a user id, or `"all"` for everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct At {
    #[serde(deserialize_with = "string_or_number")]
    pub qq: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl At {
    pub fn user(id: impl ToString) -> Self {
        Self {
            qq: id.to_string(),
            name: String::new(),
        }
    }

    pub fn all() -> Self {
        Self::user("all")
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_all(&self) -> bool {
        self.qq == "all"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rps {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shake {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anonymous {
    pub ignore: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Share {
    pub url: String,
    pub title: String,
    pub content: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub contact_type: String,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub content: String,
}

/// Music share. `music_type` is one of `qq`, `163`, `xm`, `custom`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Music {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub music_type: String,
    pub id: i64,
    pub url: String,
    pub audio: String,
    pub title: String,
    pub content: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedBag {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poke {
    pub id: i64,
    pub qq: i64,
    #[serde(rename = "type")]
    pub poke_type: String,
}

impl Poke {
    pub fn new(poke_type: impl Into<String>) -> Self {
        Self {
            poke_type: poke_type.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Xml {
    pub data: String,
    pub resid: i64,
}

/// A JSON card. `data` holds the serialized JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Json {
    pub data: String,
    pub resid: i64,
}

impl Json {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            resid: 0,
        }
    }

    pub fn from_value(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }
}

/// Text to be synthesized to speech by the receiving side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tts {
    pub text: String,
}

impl Tts {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A segment the adapter could not classify. Renders to nothing in the
/// legacy tag string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unknown {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WechatEmoji {
    pub md5: String,
    pub md5_len: i64,
    pub cdnurl: String,
}
