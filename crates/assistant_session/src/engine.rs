//! Session engine - drives one conversational session.

use std::sync::Arc;

use assistant_client::{
    AssistantTransport, AttachmentPayload, HistoryEntry, HttpAssistantClient, SendMessageRequest,
    TransportError, Utf8StreamDecoder,
};
use assistant_core::config::AssistantConfig;
use assistant_core::handle::HandleStats;
use assistant_core::message::{AttachmentKind, AttachmentMeta, Message, MessageView};
use assistant_core::state::SessionState;
use assistant_core::store::AttachmentStore;
use assistant_core::timeline::MessageTimeline;
use bytes::Bytes;
use chrono::Utc;
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// User-facing description when both the stream and the fallback fail.
const SEND_ERROR: &str = "Failed to send message";
/// User-facing description when the backend refuses to reset.
const RESET_ERROR: &str = "Failed to reset chat session";

/// How a send attempt concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send, or a send was already in flight.
    Rejected,
    /// The streamed reply completed normally.
    Streamed,
    /// The stream failed and the blocking fallback answered.
    Fallback,
    /// Both paths failed; `last_error` describes it.
    Failed,
    /// The session was torn down mid-flight; all output was dropped.
    Superseded,
}

/// Everything the rendering layer observes, as one consistent copy.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub messages: Vec<MessageView>,
    pub pending_attachments: Vec<AttachmentMeta>,
    pub draft: String,
    pub state: SessionState,
}

struct SessionInner {
    timeline: MessageTimeline,
    attachments: AttachmentStore,
    draft: String,
    state: SessionState,
    /// Generation marker; bumped by teardown and successful reset so stale
    /// in-flight sends stop writing.
    epoch: u64,
}

enum StreamOutcome {
    Completed,
    Failed(TransportError),
    Superseded,
}

/// Orchestrates sends for one session.
///
/// Created once per logical session and shared by `Arc` with the rendering
/// layer; `dispose` is the explicit end of the value's useful life.
pub struct SessionEngine<T: AssistantTransport> {
    transport: Arc<T>,
    inner: RwLock<SessionInner>,
    revision: watch::Sender<u64>,
}

impl SessionEngine<HttpAssistantClient> {
    /// Engine over the real HTTP transport.
    pub fn connect(config: &AssistantConfig) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpAssistantClient::new(config)?)))
    }
}

impl<T: AssistantTransport> SessionEngine<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transport,
            inner: RwLock::new(SessionInner {
                timeline: MessageTimeline::new(),
                attachments: AttachmentStore::new(),
                draft: String::new(),
                state: SessionState::default(),
                epoch: 0,
            }),
            revision,
        }
    }

    /// Revision counter, bumped on every observable mutation. The rendering
    /// layer re-reads `snapshot` whenever it changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read().await;
        SessionSnapshot {
            messages: inner.timeline.views(),
            pending_attachments: inner.attachments.pending_meta(),
            draft: inner.draft.clone(),
            state: inner.state.clone(),
        }
    }

    /// Handle accounting for the attachments this session has allocated.
    pub async fn handle_stats(&self) -> Arc<HandleStats> {
        self.inner.read().await.attachments.stats()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        {
            let mut inner = self.inner.write().await;
            inner.draft = text.into();
        }
        self.notify();
    }

    /// Stage pasted or uploaded content for the next send. The kind is
    /// classified from the media type: `image/*` previews as an image,
    /// everything else as a generic file.
    pub async fn add_attachment(
        &self,
        name: impl Into<String>,
        media_type: &str,
        data: Bytes,
    ) -> AttachmentMeta {
        let kind = AttachmentKind::from_mime(media_type);
        let meta = {
            let mut inner = self.inner.write().await;
            inner.attachments.add(name, kind, data)
        };
        self.notify();
        meta
    }

    /// Unstage a pending attachment; out-of-range indices are ignored.
    pub async fn remove_attachment(&self, index: usize) {
        {
            let mut inner = self.inner.write().await;
            inner.attachments.remove(index);
        }
        self.notify();
    }

    /// Send `text` plus any pending attachments.
    ///
    /// At most one send is in flight per session; a second call while busy
    /// is a silent no-op, not a queued retry. The user message and the empty
    /// assistant placeholder are both appended before any network byte
    /// arrives, so display order is stable from the start.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let trimmed = text.trim();
        let (epoch, placeholder_id, request) = {
            let mut inner = self.inner.write().await;
            if inner.state.busy {
                debug!("send ignored: a send is already in flight");
                return SendOutcome::Rejected;
            }
            if trimmed.is_empty() && inner.attachments.is_empty() {
                debug!("send ignored: nothing to send");
                return SendOutcome::Rejected;
            }

            // Prior user/assistant turns only; attachments are not replayed
            // from history.
            let conversation_history: Vec<HistoryEntry> = inner
                .timeline
                .messages()
                .iter()
                .map(|m| HistoryEntry {
                    role: m.role,
                    content: m.content.clone(),
                })
                .collect();

            let attachments = inner.attachments.drain();
            let payloads: Vec<AttachmentPayload> =
                attachments.iter().map(AttachmentPayload::from).collect();
            let user = Message::user(trimmed, attachments);
            let request = SendMessageRequest {
                message: user.content.clone(),
                conversation_history,
                attachments: if payloads.is_empty() {
                    None
                } else {
                    Some(payloads)
                },
            };

            inner.timeline.append(user);
            inner.draft.clear();
            inner.state.busy = true;
            inner.state.last_error = None;

            let placeholder = Message::assistant_placeholder();
            let placeholder_id = placeholder.id;
            inner.timeline.append(placeholder);
            inner.state.streaming = true;

            (inner.epoch, placeholder_id, request)
        };
        self.notify();

        match self.stream_reply(epoch, placeholder_id, &request).await {
            StreamOutcome::Completed => {
                let finished = self
                    .if_current(epoch, |inner| {
                        inner.state.streaming = false;
                        inner.state.busy = false;
                    })
                    .await;
                if finished {
                    SendOutcome::Streamed
                } else {
                    SendOutcome::Superseded
                }
            }
            StreamOutcome::Superseded => SendOutcome::Superseded,
            StreamOutcome::Failed(err) => {
                warn!("streaming failed, falling back to blocking send: {err}");
                let still_current = self
                    .if_current(epoch, |inner| inner.state.streaming = false)
                    .await;
                if !still_current {
                    return SendOutcome::Superseded;
                }
                self.fall_back(epoch, placeholder_id, &request).await
            }
        }
    }

    /// Ask the backend to discard its conversational memory, then clear
    /// local state. On failure the timeline is left untouched so the user is
    /// never shown a reset that did not happen server-side.
    pub async fn reset_chat(&self) -> Result<(), crate::error::SessionError> {
        match self.transport.reset_session().await {
            Ok(()) => {
                {
                    let mut inner = self.inner.write().await;
                    inner.epoch += 1;
                    inner.timeline.clear();
                    inner.state = SessionState::default();
                }
                self.notify();
                info!("assistant session reset");
                Ok(())
            }
            Err(err) => {
                warn!("reset failed; keeping local history: {err}");
                {
                    let mut inner = self.inner.write().await;
                    inner.state.last_error = Some(RESET_ERROR.to_string());
                }
                self.notify();
                Err(crate::error::SessionError::ResetFailed(err))
            }
        }
    }

    /// Unconditional local teardown for the signed-out transition. No server
    /// round-trip: a signed-out session has no authority to call reset.
    pub async fn handle_signed_out(&self) {
        info!("signed out; clearing assistant session locally");
        self.teardown().await;
    }

    /// Explicit end of the engine's useful life; clears all local state and
    /// releases every attachment buffer.
    pub async fn dispose(&self) {
        self.teardown().await;
    }

    async fn teardown(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.epoch += 1;
            inner.timeline.clear();
            inner.draft.clear();
            for attachment in inner.attachments.drain() {
                attachment.handle.release();
            }
            inner.state = SessionState::default();
        }
        self.notify();
    }

    async fn stream_reply(
        &self,
        epoch: u64,
        placeholder_id: Uuid,
        request: &SendMessageRequest,
    ) -> StreamOutcome {
        let mut stream = match self.transport.send_streaming(request).await {
            Ok(stream) => stream,
            Err(err) => return StreamOutcome::Failed(err),
        };

        let mut decoder = Utf8StreamDecoder::new();
        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(err) => return StreamOutcome::Failed(err),
            };
            let text = decoder.decode(&chunk);
            if text.is_empty() {
                continue;
            }
            let applied = self
                .if_current(epoch, |inner| {
                    inner.timeline.update_content(placeholder_id, &text);
                })
                .await;
            if !applied {
                return StreamOutcome::Superseded;
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            let applied = self
                .if_current(epoch, |inner| {
                    inner.timeline.update_content(placeholder_id, &tail);
                })
                .await;
            if !applied {
                return StreamOutcome::Superseded;
            }
        }
        StreamOutcome::Completed
    }

    async fn fall_back(
        &self,
        epoch: u64,
        placeholder_id: Uuid,
        request: &SendMessageRequest,
    ) -> SendOutcome {
        match self.transport.send_blocking(request).await {
            Ok(reply) => {
                let timestamp = reply.timestamp.unwrap_or_else(Utc::now);
                let final_message =
                    Message::assistant_reply(placeholder_id, reply.response, timestamp);
                let installed = self
                    .if_current(epoch, |inner| {
                        // The full answer replaces whatever partial content
                        // streamed; it is never appended to it.
                        inner.timeline.replace(placeholder_id, final_message);
                        inner.state.busy = false;
                    })
                    .await;
                if installed {
                    SendOutcome::Fallback
                } else {
                    SendOutcome::Superseded
                }
            }
            Err(err) => {
                error!("fallback send failed: {err}");
                let recorded = self
                    .if_current(epoch, |inner| {
                        // The placeholder stays in the timeline with whatever
                        // partial content it has; degraded but consistent.
                        inner.state.last_error = Some(SEND_ERROR.to_string());
                        inner.state.busy = false;
                        inner.state.streaming = false;
                    })
                    .await;
                if recorded {
                    SendOutcome::Failed
                } else {
                    SendOutcome::Superseded
                }
            }
        }
    }

    /// Apply `mutate` only if the send that captured `epoch` has not been
    /// superseded by a teardown or reset.
    async fn if_current<F>(&self, epoch: u64, mutate: F) -> bool
    where
        F: FnOnce(&mut SessionInner),
    {
        {
            let mut inner = self.inner.write().await;
            if inner.epoch != epoch {
                debug!("dropping update from superseded send");
                return false;
            }
            mutate(&mut inner);
        }
        self.notify();
        true
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}
