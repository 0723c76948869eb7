//! assistant_session - Send orchestration and lifecycle for the assistant
//!
//! `SessionEngine` drives one conversational session: it appends the user
//! message and the assistant placeholder, consumes the streamed reply chunk
//! by chunk, falls back to the blocking endpoint when streaming fails, and
//! exposes the busy/streaming/error state the rendering layer observes.
//! `LifecycleController` tears the session down when the host application
//! signs out.

pub mod engine;
pub mod error;
pub mod lifecycle;

// Re-export commonly used types
pub use engine::{SendOutcome, SessionEngine, SessionSnapshot};
pub use error::SessionError;
pub use lifecycle::LifecycleController;
