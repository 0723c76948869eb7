//! Transport contract consumed by the session engine.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;

use crate::error::Result;
use crate::models::{AssistantReply, SendMessageRequest};

/// Raw byte chunks of a streamed reply. Chunks have arbitrary length and no
/// message-boundary semantics; an `Err` item is a mid-stream failure.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// The three backend operations the session engine needs.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// Open the streaming endpoint and return the chunk producer.
    ///
    /// An `Err` from this call means the stream could not be established
    /// (connect failure, non-success status, unreadable body) and is the
    /// engine's trigger to fall back.
    async fn send_streaming(&self, request: &SendMessageRequest) -> Result<ChunkStream>;

    /// One-shot variant returning the complete answer; used as the fallback
    /// path.
    async fn send_blocking(&self, request: &SendMessageRequest) -> Result<AssistantReply>;

    /// Ask the backend to discard server-side conversational memory for this
    /// session.
    async fn reset_session(&self) -> Result<()>;
}
