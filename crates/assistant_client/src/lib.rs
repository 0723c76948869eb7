//! assistant_client - HTTP transport for the assistant session engine
//!
//! Consumes the backend contract as a black box:
//! - `POST /assistant/send-message-stream` - streamed raw UTF-8 body
//! - `POST /assistant/send-message` - blocking JSON reply (fallback)
//! - `POST /assistant/reset-chat` - discard server-side memory
//!
//! The streamed body is an undifferentiated byte stream, not event-framed;
//! `Utf8StreamDecoder` decodes it continuously across chunk boundaries.

pub mod client;
pub mod client_trait;
pub mod decode;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use client::HttpAssistantClient;
pub use client_trait::{AssistantTransport, ChunkStream};
pub use decode::Utf8StreamDecoder;
pub use error::TransportError;
pub use models::{AssistantReply, AttachmentPayload, HistoryEntry, SendMessageRequest};
