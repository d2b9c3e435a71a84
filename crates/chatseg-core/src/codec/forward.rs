//! Forwarded-message encoding.
//!
//! A [`Node`] becomes `{type:"node", data:{user_id, nickname, content}}`
//! and a [`Nodes`] bundle becomes `{messages:[...]}`. Inside a node every
//! image and voice record is inlined as base64, even when it has a remote
//! URL. Bundle nodes are encoded concurrently but their order is kept.

use std::future::Future;
use std::pin::Pin;

use futures_util::future::try_join_all;
use serde_json::{Value, json};

use chatseg_types::error::SegmentError;
use chatseg_types::segment::{Node, Nodes, Segment, SegmentKind};

use super::record::to_structured_record;
use super::wire::{WireEncoder, encode_plain};
use crate::media::{MediaFetcher, MediaStore};
use crate::publish::TokenRegistry;

/// Boxed future for recursive node encoding.
type NodeFuture<'b> = Pin<Box<dyn Future<Output = Result<Value, SegmentError>> + Send + 'b>>;

impl<S, F, R> WireEncoder<'_, S, F, R>
where
    S: MediaStore,
    F: MediaFetcher,
    R: TokenRegistry,
{
    /// Encode a single forwarded node, recursing into nested nodes.
    pub fn encode_node<'b>(&'b self, node: &'b Node) -> NodeFuture<'b> {
        Box::pin(async move {
            let mut content = Vec::with_capacity(node.content.len());
            for segment in &node.content {
                let payload = match segment {
                    Segment::Plain(plain) => encode_plain(plain),
                    Segment::Image(image) => self.inline_media(SegmentKind::Image, image).await?,
                    Segment::Record(record) => {
                        self.inline_media(SegmentKind::Record, record).await?
                    }
                    Segment::File(file) => self.encode_file(file).await?,
                    Segment::Node(inner) => self.encode_node(inner).await?,
                    Segment::Nodes(inner) => self.encode_nodes(inner).await?,
                    other => to_structured_record(other)?,
                };
                content.push(payload);
            }

            Ok(json!({
                "type": "node",
                "data": {
                    "user_id": node.uin,
                    "nickname": node.name,
                    "content": content,
                },
            }))
        })
    }

    /// Encode a bundle as `{messages: [...]}`.
    pub async fn encode_nodes(&self, nodes: &Nodes) -> Result<Value, SegmentError> {
        let messages = try_join_all(nodes.nodes.iter().map(|node| self.encode_node(node))).await?;
        Ok(json!({ "messages": messages }))
    }
}
