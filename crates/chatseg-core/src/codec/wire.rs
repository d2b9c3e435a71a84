//! Wire payload encoding -- the platform-facing JSON for outbound messages.
//!
//! Unlike the legacy and structured-record forms this may perform I/O:
//!
//! | Kind           | Wire shape                                                        |
//! |----------------|-------------------------------------------------------------------|
//! | Plain          | `{type:"text", data:{text}}`                                      |
//! | Image / Record | remote URL passed through, otherwise inlined as `base64://`       |
//! | Video / File   | remote URL passed through, else published if possible, else raw   |
//! | Node / Nodes   | see [`super::forward`]                                            |
//! | everything else| the structured record                                             |
//!
//! Errors from materialization or publishing propagate unchanged.

use serde_json::{Value, json};
use tracing::debug;

use chatseg_types::error::SegmentError;
use chatseg_types::resource::{BASE64_SCHEME, ResourceRef, is_remote_url};
use chatseg_types::segment::{File, Media, Plain, Segment, SegmentKind, Video};

use super::record::to_structured_record;
use crate::media::{Materializer, MediaFetcher, MediaStore};
use crate::publish::{Publisher, TokenRegistry};

/// Encodes segments into wire payloads, resolving media through the
/// borrowed materializer and publisher.
pub struct WireEncoder<'a, S, F, R> {
    pub(super) materializer: &'a Materializer<S, F>,
    pub(super) publisher: &'a Publisher<R>,
}

impl<'a, S, F, R> WireEncoder<'a, S, F, R>
where
    S: MediaStore,
    F: MediaFetcher,
    R: TokenRegistry,
{
    pub fn new(materializer: &'a Materializer<S, F>, publisher: &'a Publisher<R>) -> Self {
        Self {
            materializer,
            publisher,
        }
    }

    /// Encode one segment.
    pub async fn to_wire_payload(&self, segment: &Segment) -> Result<Value, SegmentError> {
        match segment {
            Segment::Plain(plain) => Ok(encode_plain(plain)),
            Segment::Image(image) => self.passthrough_or_inline(SegmentKind::Image, image).await,
            Segment::Record(record) => {
                self.passthrough_or_inline(SegmentKind::Record, record)
                    .await
            }
            Segment::Video(video) => self.encode_video(video).await,
            Segment::File(file) => self.encode_file(file).await,
            Segment::Node(node) => self.encode_node(node).await,
            Segment::Nodes(nodes) => self.encode_nodes(nodes).await,
            other => to_structured_record(other),
        }
    }

    /// Encode a whole outbound message, preserving segment order.
    pub async fn encode_message(&self, segments: &[Segment]) -> Result<Vec<Value>, SegmentError> {
        let mut payloads = Vec::with_capacity(segments.len());
        for segment in segments {
            payloads.push(self.to_wire_payload(segment).await?);
        }
        Ok(payloads)
    }

    /// `{type, data:{file: "base64://<blob>"}}` for an image or voice record.
    pub(super) async fn inline_media(
        &self,
        kind: SegmentKind,
        media: &dyn Media,
    ) -> Result<Value, SegmentError> {
        let blob = self.materializer.media_to_base64(media).await?;
        Ok(file_payload(kind, format!("{BASE64_SCHEME}{blob}")))
    }

    async fn passthrough_or_inline(
        &self,
        kind: SegmentKind,
        media: &dyn Media,
    ) -> Result<Value, SegmentError> {
        match media.resource()? {
            ResourceRef::RemoteUrl(url) => Ok(file_payload(kind, url)),
            _ => self.inline_media(kind, media).await,
        }
    }

    async fn encode_video(&self, video: &Video) -> Result<Value, SegmentError> {
        let file = match video.resource()? {
            ResourceRef::RemoteUrl(url) => url,
            _ if self.publisher.is_available() => {
                let url = self
                    .publisher
                    .publish_media(self.materializer, video)
                    .await?;
                debug!(url = %url, "generated video callback link");
                url
            }
            _ => video.file.clone(),
        };
        Ok(file_payload(SegmentKind::Video, file))
    }

    /// `{type:"file", data:{name, file}}`. A URL in either field is passed
    /// through.
    pub(super) async fn encode_file(&self, file: &File) -> Result<Value, SegmentError> {
        let location = if !file.url.is_empty() {
            file.url.clone()
        } else if is_remote_url(&file.file) {
            file.file.clone()
        } else if file.file.is_empty() {
            return Err(SegmentError::Serialization(format!(
                "file segment '{}' has neither a path nor a url",
                file.name
            )));
        } else if self.publisher.is_available() {
            let url = self
                .publisher
                .publish_media(self.materializer, file)
                .await?;
            debug!(url = %url, "generated file callback link");
            url
        } else {
            file.file.clone()
        };

        Ok(json!({
            "type": "file",
            "data": {
                "name": file.name,
                "file": location,
            },
        }))
    }
}

pub(super) fn encode_plain(plain: &Plain) -> Value {
    json!({"type": "text", "data": {"text": plain.text}})
}

fn file_payload(kind: SegmentKind, file: String) -> Value {
    json!({"type": kind.as_str(), "data": {"file": file}})
}
