//! Message and attachment data model.
//!
//! `Message` and `Attachment` own their resources (an attachment carries the
//! handle to its local bytes), so neither is `Clone`. The rendering layer
//! works with the cloneable `MessageView`/`AttachmentMeta` projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handle::AttachmentHandle;

/// Who authored a message.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment classification.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// Classify by media type: `image/*` is an image, everything else a
    /// generic file.
    pub fn from_mime(media_type: &str) -> Self {
        if media_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

/// A binary attachment on an outgoing user message.
///
/// Owns the handle to the locally held bytes until the handle is released.
#[derive(Debug)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub name: String,
    /// Informational only; never validated against the buffer.
    pub byte_size: Option<u64>,
    /// Locally assigned reference sent to the backend in place of the bytes.
    pub url: String,
    pub handle: AttachmentHandle,
}

impl Attachment {
    /// Cloneable metadata projection for render snapshots and wire payloads.
    pub fn meta(&self) -> AttachmentMeta {
        AttachmentMeta {
            kind: self.kind,
            name: self.name.clone(),
            byte_size: self.byte_size,
            url: self.url.clone(),
        }
    }
}

/// Attachment metadata without the buffer handle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AttachmentMeta {
    pub kind: AttachmentKind,
    pub name: String,
    pub byte_size: Option<u64>,
    pub url: String,
}

/// A single timeline entry.
#[derive(Debug)]
pub struct Message {
    /// Stable for the message's lifetime; streaming updates target it.
    pub id: Uuid,
    pub role: Role,
    /// Assistant content starts empty and is appended to while streaming;
    /// user content is fixed at creation.
    pub content: String,
    /// Assigned client-side at construction, not server time.
    pub timestamp: DateTime<Utc>,
    /// Fixed at creation for user messages; always empty for assistant
    /// messages.
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Build a user message from composed text and drained attachments.
    pub fn user(content: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            attachments,
        }
    }

    /// The empty assistant placeholder inserted into the timeline before any
    /// response byte arrives.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: Utc::now(),
            attachments: Vec::new(),
        }
    }

    /// A completed assistant message installed by the fallback path. Keeps
    /// the placeholder's `id` so the in-place swap is invisible to observers.
    pub fn assistant_reply(id: Uuid, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            attachments: Vec::new(),
        }
    }

    /// Cloneable projection for the rendering layer.
    pub fn view(&self) -> MessageView {
        MessageView {
            id: self.id,
            role: self.role,
            content: self.content.clone(),
            timestamp: self.timestamp,
            attachments: self.attachments.iter().map(Attachment::meta).collect(),
        }
    }
}

/// Render view of a message.
#[derive(Serialize, Clone, Debug)]
pub struct MessageView {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub attachments: Vec<AttachmentMeta>,
}
