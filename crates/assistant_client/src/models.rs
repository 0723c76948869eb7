//! Wire types for the assistant backend contract.

use assistant_core::message::{Attachment, AttachmentKind, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prior turn replayed to the backend. Only the role and the text are
/// replayed; attachments are never carried in history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Attachment metadata as sent on the wire. The bytes stay local; the
/// backend receives the reference only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AttachmentPayload {
    pub kind: AttachmentKind,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<&Attachment> for AttachmentPayload {
    fn from(attachment: &Attachment) -> Self {
        Self {
            kind: attachment.kind,
            name: attachment.name.clone(),
            url: attachment.url.clone(),
            size: attachment.byte_size,
        }
    }
}

/// Request body shared by the streaming and the blocking send endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SendMessageRequest {
    pub message: String,
    pub conversation_history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentPayload>>,
}

/// Parsed body of the blocking endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AssistantReply {
    pub response: String,
    /// Server-assigned timestamp; the engine falls back to client time when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
