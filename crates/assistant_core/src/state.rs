//! Observable session state.

use serde::{Deserialize, Serialize};

/// Render-facing flags for one session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// True from send-initiation until completion or error, across both the
    /// streaming and the fallback path. Acts as the at-most-one-send mutex.
    pub busy: bool,
    /// True only while the streamed response body is being consumed; false
    /// during fallback.
    pub streaming: bool,
    /// User-facing description of the last failure; cleared at the start of
    /// every send and on reset. Sticky for display only, never blocking.
    pub last_error: Option<String>,
}

impl SessionState {
    /// Coarse phase view of the send state machine.
    pub fn phase(&self) -> SessionPhase {
        if self.streaming {
            SessionPhase::Streaming
        } else if self.busy {
            SessionPhase::Sending
        } else if self.last_error.is_some() {
            SessionPhase::Error
        } else {
            SessionPhase::Idle
        }
    }

    /// Whether the send affordance should be enabled. Only `busy` disables
    /// it; a past error never does.
    pub fn accepts_input(&self) -> bool {
        !self.busy
    }
}

/// The states of the send machine:
/// `Idle -> Streaming -> Idle` on success,
/// `Idle -> Streaming -> Sending -> Idle` when the stream fails and the
/// blocking fallback answers, and `-> Error` when both paths fail. `Error`
/// returns to `Idle` on the next send attempt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    /// Busy without an active stream: establishing, or the blocking fallback.
    Sending,
    Streaming,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phase_is_idle() {
        assert_eq!(SessionState::default().phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = SessionState::default();
        state.busy = true;
        state.streaming = true;
        assert_eq!(state.phase(), SessionPhase::Streaming);

        state.streaming = false;
        assert_eq!(state.phase(), SessionPhase::Sending);

        state.busy = false;
        state.last_error = Some("Failed to send message".into());
        assert_eq!(state.phase(), SessionPhase::Error);
    }

    #[test]
    fn test_error_never_blocks_input() {
        let state = SessionState {
            busy: false,
            streaming: false,
            last_error: Some("Failed to send message".into()),
        };
        assert!(state.accepts_input());

        let busy = SessionState {
            busy: true,
            ..SessionState::default()
        };
        assert!(!busy.accepts_input());
    }
}
