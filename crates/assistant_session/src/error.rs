//! Session engine error types.

use assistant_client::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused to discard its conversational memory; local state
    /// was left untouched.
    #[error("failed to reset chat session: {0}")]
    ResetFailed(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
