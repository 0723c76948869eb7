//! Authentication signal consumed by the lifecycle controller.

use serde::{Deserialize, Serialize};

/// Authentication state as published by the host application.
///
/// The session engine never inspects credentials; it only reacts to the
/// transition into `SignedOut`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

impl AuthState {
    pub fn is_signed_out(&self) -> bool {
        matches!(self, AuthState::SignedOut)
    }
}
