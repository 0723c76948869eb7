//! Binds session teardown to the host's authentication signal.

use std::sync::Arc;

use assistant_client::AssistantTransport;
use assistant_core::auth::AuthState;
use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::engine::SessionEngine;

/// Watches the authentication channel and tears the session down on every
/// transition into `SignedOut`.
///
/// Teardown is purely local (timeline, draft, pending attachments, error
/// state); the reset endpoint is never called on this path.
pub struct LifecycleController {
    task: JoinHandle<()>,
}

impl LifecycleController {
    pub fn spawn<T>(
        engine: Arc<SessionEngine<T>>,
        mut auth: watch::Receiver<AuthState>,
    ) -> Self
    where
        T: AssistantTransport + 'static,
    {
        let task = tokio::spawn(async move {
            loop {
                if auth.changed().await.is_err() {
                    debug!("auth channel closed; lifecycle watcher exiting");
                    break;
                }
                let state = *auth.borrow();
                if state.is_signed_out() {
                    engine.handle_signed_out().await;
                }
            }
        });
        Self { task }
    }

    /// Stop watching. Does not tear the session down.
    pub fn shutdown(self) {
        self.task.abort();
    }
}
