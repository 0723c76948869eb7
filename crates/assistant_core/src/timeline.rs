//! Ordered message timeline for one assistant session.

use log::warn;
use uuid::Uuid;

use crate::message::{Message, MessageView};

/// Append-only ordered message sequence.
///
/// Insertion order is chronological order is display order. No reordering,
/// no single-message deletion; entries leave only through a full `clear`.
#[derive(Debug, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Render views of every message, in display order.
    pub fn views(&self) -> Vec<MessageView> {
        self.messages.iter().map(Message::view).collect()
    }

    /// Add to the end of the timeline.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append `delta` to the content of the message with `id`.
    ///
    /// A missing id means the caller raced a reset; the delta is dropped and
    /// logged rather than crashing the render loop. Returns whether a message
    /// was updated.
    pub fn update_content(&mut self, id: Uuid, delta: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.content.push_str(delta);
                true
            }
            None => {
                warn!("dropping content update for unknown message {id}");
                false
            }
        }
    }

    /// Swap the message with `id` for `final_message` in a single assignment,
    /// so no observer sees a half-updated entry. Returns whether a message
    /// was replaced.
    pub fn replace(&mut self, id: Uuid, final_message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(slot) => {
                *slot = final_message;
                true
            }
            None => {
                warn!("no message {id} to replace");
                false
            }
        }
    }

    /// Drop every message, releasing any attachment buffers they carried.
    pub fn clear(&mut self) {
        for message in self.messages.drain(..) {
            for attachment in message.attachments {
                attachment.handle.release();
            }
        }
    }
}
