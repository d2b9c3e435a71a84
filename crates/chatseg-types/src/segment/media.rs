//! Media-bearing segment payloads: images, voice records, videos, card
//! images and files.
//!
//! Each stores its resource as the prefixed textual form understood by
//! [`ResourceRef::parse`]. Builders validate their input; the `from_url`
//! family rejects anything that is not http(s).

use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::Media;
use crate::error::SegmentError;
use crate::resource::{ResourceRef, is_remote_url};

fn require_url(url: &str) -> Result<(), SegmentError> {
    if is_remote_url(url) {
        Ok(())
    } else {
        Err(SegmentError::Validation(format!("not a valid url: {url}")))
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub file: String,
    /// Platform image type, emitted as `type`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(rename = "subType")]
    pub sub_type: i64,
    pub url: String,
    pub cache: bool,
    pub id: i64,
    pub c: i64,
    pub path: String,
    /// Platform-side cache key, when the platform has one.
    pub file_unique: String,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            file: String::new(),
            image_type: None,
            sub_type: 0,
            url: String::new(),
            cache: true,
            id: 40000,
            c: 2,
            path: String::new(),
            file_unique: String::new(),
        }
    }
}

impl Image {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Result<Self, SegmentError> {
        let url = url.into();
        require_url(&url)?;
        Ok(Self::new(url))
    }

    pub fn from_file_system(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let reference = ResourceRef::local(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().display().to_string(),
            ..Self::new(reference.to_uri())
        })
    }

    pub fn from_base64(payload: impl Into<String>) -> Self {
        Self::new(ResourceRef::inline(payload).to_uri())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_base64(STANDARD.encode(bytes))
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, SegmentError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| SegmentError::Storage(format!("failed to read image: {e}")))?;
        Ok(Self::from_bytes(&bytes))
    }

    /// `url` wins over `file` when both are set.
    pub fn source(&self) -> &str {
        non_empty(&self.url).unwrap_or(&self.file)
    }
}

impl Media for Image {
    fn resource(&self) -> Result<ResourceRef, SegmentError> {
        ResourceRef::parse(self.source())
    }

    fn path_hint(&self) -> Option<&Path> {
        non_empty(&self.path).map(Path::new)
    }

    fn staging_extension(&self) -> Option<&'static str> {
        Some("jpg")
    }
}

// ---------------------------------------------------------------------------
// Record (voice)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub file: String,
    pub magic: bool,
    pub url: String,
    pub cache: bool,
    pub proxy: bool,
    pub timeout: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            file: String::new(),
            magic: false,
            url: String::new(),
            cache: true,
            proxy: true,
            timeout: 0,
            path: None,
        }
    }
}

impl Record {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Result<Self, SegmentError> {
        let url = url.into();
        require_url(&url)?;
        Ok(Self::new(url))
    }

    pub fn from_file_system(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let reference = ResourceRef::local(path.as_ref())?;
        Ok(Self {
            path: Some(path.as_ref().display().to_string()),
            ..Self::new(reference.to_uri())
        })
    }

    pub fn from_base64(payload: impl Into<String>) -> Self {
        Self::new(ResourceRef::inline(payload).to_uri())
    }

    /// `file` wins over `url` when both are set.
    pub fn source(&self) -> &str {
        non_empty(&self.file).unwrap_or(&self.url)
    }
}

impl Media for Record {
    fn resource(&self) -> Result<ResourceRef, SegmentError> {
        ResourceRef::parse(self.source())
    }

    fn path_hint(&self) -> Option<&Path> {
        self.path.as_deref().and_then(non_empty).map(Path::new)
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub file: String,
    pub cover: String,
    pub c: i64,
    pub path: String,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            file: String::new(),
            cover: String::new(),
            c: 2,
            path: String::new(),
        }
    }
}

impl Video {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Result<Self, SegmentError> {
        let url = url.into();
        require_url(&url)?;
        Ok(Self::new(url))
    }

    pub fn from_file_system(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let reference = ResourceRef::local(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().display().to_string(),
            ..Self::new(reference.to_uri())
        })
    }
}

impl Media for Video {
    fn resource(&self) -> Result<ResourceRef, SegmentError> {
        ResourceRef::parse(&self.file)
    }

    fn path_hint(&self) -> Option<&Path> {
        non_empty(&self.path).map(Path::new)
    }
}

// ---------------------------------------------------------------------------
// CardImage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardImage {
    pub file: String,
    pub cache: bool,
    pub minwidth: i64,
    pub minheight: i64,
    pub maxwidth: i64,
    pub maxheight: i64,
    pub source: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for CardImage {
    fn default() -> Self {
        Self {
            file: String::new(),
            cache: true,
            minwidth: 400,
            minheight: 400,
            maxwidth: 500,
            maxheight: 500,
            source: String::new(),
            icon: String::new(),
            path: None,
        }
    }
}

impl CardImage {
    pub fn from_file_system(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let reference = ResourceRef::local(path.as_ref())?;
        Ok(Self {
            file: reference.to_uri(),
            path: Some(path.as_ref().display().to_string()),
            ..Self::default()
        })
    }
}

impl Media for CardImage {
    fn resource(&self) -> Result<ResourceRef, SegmentError> {
        ResourceRef::parse(&self.file)
    }

    fn path_hint(&self) -> Option<&Path> {
        self.path.as_deref().and_then(non_empty).map(Path::new)
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// A file attachment. `file` is a local path, `url` a download link; either
/// may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    pub name: String,
    pub file: String,
    pub url: String,
}

impl File {
    /// A file from a local path or, for http(s) input, a URL.
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        let mut this = Self {
            name: name.into(),
            ..Self::default()
        };
        this.set_location(file);
        this
    }

    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Result<Self, SegmentError> {
        let url = url.into();
        require_url(&url)?;
        Ok(Self {
            name: name.into(),
            file: String::new(),
            url,
        })
    }

    /// Store `location` as the URL if it is http(s), otherwise as the local
    /// path.
    pub fn set_location(&mut self, location: impl Into<String>) {
        let location = location.into();
        if is_remote_url(&location) {
            self.url = location;
        } else {
            self.file = location;
        }
    }
}

impl Media for File {
    fn resource(&self) -> Result<ResourceRef, SegmentError> {
        match (non_empty(&self.file), non_empty(&self.url)) {
            (Some(file), _) => ResourceRef::parse(file),
            (None, Some(url)) => ResourceRef::parse(url),
            (None, None) => Err(SegmentError::Validation(format!(
                "file segment '{}' has neither a path nor a url",
                self.name
            ))),
        }
    }

    fn path_hint(&self) -> Option<&Path> {
        non_empty(&self.file).map(Path::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_rejects_other_schemes() {
        assert!(matches!(
            Image::from_url("ftp://x/y.png"),
            Err(SegmentError::Validation(_))
        ));
        assert!(Record::from_url("file:///tmp/a.wav").is_err());
        assert!(Video::from_url("https://x/v.mp4").is_ok());
        assert!(File::from_url("a.txt", "/tmp/a.txt").is_err());
    }

    #[test]
    fn image_source_prefers_url() {
        let mut image = Image::new("base64://QUJD");
        assert_eq!(image.source(), "base64://QUJD");
        image.url = "http://x/y.png".to_string();
        assert_eq!(image.source(), "http://x/y.png");
        assert!(image.resource().unwrap().is_remote());
    }

    #[test]
    fn record_source_prefers_file() {
        let record = Record {
            url: "http://x/a.amr".to_string(),
            ..Record::from_base64("QUJD")
        };
        assert_eq!(record.resource().unwrap(), ResourceRef::InlineBlob("QUJD".to_string()));
    }

    #[test]
    fn from_bytes_encodes_base64() {
        let image = Image::from_bytes(b"ABC");
        assert_eq!(image.file, "base64://QUJD");
    }

    #[test]
    fn from_reader_reads_everything() {
        let image = Image::from_reader(&b"ABC"[..]).unwrap();
        assert_eq!(image.file, "base64://QUJD");
    }

    #[test]
    fn from_file_system_records_path_hint() {
        let video = Video::from_file_system("clips/a.mp4").unwrap();
        assert!(video.file.starts_with("file:///"));
        assert_eq!(video.path_hint(), Some(Path::new("clips/a.mp4")));
        match video.resource().unwrap() {
            ResourceRef::LocalPath(path) => assert!(path.ends_with("clips/a.mp4")),
            other => panic!("unexpected {other:?}"),
        }

        let card = CardImage::from_file_system("cards/a.png").unwrap();
        assert_eq!(card.path_hint(), Some(Path::new("cards/a.png")));
    }

    #[test]
    fn file_location_routes_by_scheme() {
        let remote = File::new("a.txt", "https://x/a.txt");
        assert_eq!(remote.url, "https://x/a.txt");
        assert!(remote.file.is_empty());

        let local = File::new("a.txt", "/tmp/a.txt");
        assert_eq!(local.file, "/tmp/a.txt");
        assert!(local.url.is_empty());
    }

    #[test]
    fn file_without_location_has_no_resource() {
        let file = File {
            name: "empty".to_string(),
            ..File::default()
        };
        assert!(matches!(file.resource(), Err(SegmentError::Validation(_))));
    }
}
