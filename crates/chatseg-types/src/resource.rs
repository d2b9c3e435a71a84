//! Resource references: where a piece of media lives.
//!
//! A segment stores its media reference as an opaque string tagged by a
//! fixed prefix scheme. [`ResourceRef::parse`] dispatches on those exact
//! prefixes, in this order:
//!
//! ```text
//! file:///<abs-path>   -> LocalPath
//! http://, https://    -> RemoteUrl
//! base64://<payload>   -> InlineBlob
//! anything else        -> LocalPath (must exist when materialized)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SegmentError;

/// Prefix of a local file reference.
pub const FILE_SCHEME: &str = "file:///";

/// Prefix of an inline base64 payload.
pub const BASE64_SCHEME: &str = "base64://";

/// Where a piece of media lives. Exactly one form is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// Absolute or relative filesystem path.
    LocalPath(PathBuf),
    /// An http or https URL.
    RemoteUrl(String),
    /// Self-contained base64 payload, stored without the `base64://` prefix.
    InlineBlob(String),
}

/// Whether `raw` is an http(s) URL.
pub fn is_remote_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

impl ResourceRef {
    /// Parse the textual wire encoding of a reference.
    ///
    /// Does not touch the filesystem; unprefixed strings are taken as local
    /// paths and their existence is checked when they are materialized.
    pub fn parse(raw: &str) -> Result<Self, SegmentError> {
        if raw.is_empty() {
            return Err(SegmentError::Validation(
                "no valid file or URL provided".to_string(),
            ));
        }

        if let Some(rest) = raw.strip_prefix(FILE_SCHEME) {
            return Ok(ResourceRef::LocalPath(file_uri_path(rest)));
        }
        if is_remote_url(raw) {
            return Ok(ResourceRef::RemoteUrl(raw.to_string()));
        }
        if let Some(payload) = raw.strip_prefix(BASE64_SCHEME) {
            return Ok(ResourceRef::InlineBlob(payload.to_string()));
        }

        Ok(ResourceRef::LocalPath(PathBuf::from(raw)))
    }

    /// A local reference to `path`, made absolute against the current
    /// working directory.
    pub fn local(path: impl AsRef<Path>) -> Result<Self, SegmentError> {
        let absolute = std::path::absolute(path.as_ref()).map_err(|e| {
            SegmentError::Validation(format!(
                "cannot make {} absolute: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(ResourceRef::LocalPath(absolute))
    }

    /// A remote reference. Rejects anything that is not http(s).
    pub fn remote(url: impl Into<String>) -> Result<Self, SegmentError> {
        let url = url.into();
        if !is_remote_url(&url) {
            return Err(SegmentError::Validation(format!("not a valid url: {url}")));
        }
        Ok(ResourceRef::RemoteUrl(url))
    }

    /// An inline reference; a leading `base64://` is tolerated.
    pub fn inline(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        match payload.strip_prefix(BASE64_SCHEME) {
            Some(rest) => ResourceRef::InlineBlob(rest.to_string()),
            None => ResourceRef::InlineBlob(payload),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ResourceRef::RemoteUrl(_))
    }

    /// The prefixed textual form stored on segments.
    ///
    /// Local paths are written as `file:///` followed by the path verbatim,
    /// so an absolute unix path yields four slashes; [`ResourceRef::parse`]
    /// accepts both spellings.
    pub fn to_uri(&self) -> String {
        match self {
            ResourceRef::LocalPath(path) => format!("{FILE_SCHEME}{}", path.display()),
            ResourceRef::RemoteUrl(url) => url.clone(),
            ResourceRef::InlineBlob(payload) => format!("{BASE64_SCHEME}{payload}"),
        }
    }
}

/// `file:///` references always name absolute paths.
fn file_uri_path(rest: &str) -> PathBuf {
    let path = Path::new(rest);
    if path.is_absolute() || cfg!(windows) {
        path.to_path_buf()
    } else {
        Path::new("/").join(path)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl std::str::FromStr for ResourceRef {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceRef::parse(s)
    }
}
