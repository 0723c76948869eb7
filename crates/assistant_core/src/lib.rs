//! assistant_core - Core types for the assistant session engine
//!
//! This crate provides the foundational types used across the assistant crates:
//! - `message` - Message, Role, Attachment and their render views
//! - `handle` - exclusively-owned attachment buffers with release accounting
//! - `store` - the pending-attachment set for the next outgoing message
//! - `timeline` - the ordered message sequence for one session
//! - `state` - busy/streaming/error flags observed by the rendering layer
//! - `auth` - the authentication signal consumed by the lifecycle controller
//! - `config` - backend connection settings

pub mod auth;
pub mod config;
pub mod handle;
pub mod message;
pub mod state;
pub mod store;
pub mod timeline;

// Re-export commonly used types
pub use auth::AuthState;
pub use config::AssistantConfig;
pub use handle::{AttachmentHandle, HandleStats};
pub use message::{Attachment, AttachmentKind, AttachmentMeta, Message, MessageView, Role};
pub use state::{SessionPhase, SessionState};
pub use store::AttachmentStore;
pub use timeline::MessageTimeline;
