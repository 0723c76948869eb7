//! Pending attachment set for the next outgoing message.

use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use uuid::Uuid;

use crate::handle::{AttachmentHandle, HandleStats};
use crate::message::{Attachment, AttachmentKind, AttachmentMeta};

/// Holds content pasted or uploaded into the composer but not yet sent.
///
/// Mutated only from the UI task: `add`/`remove` while composing, `drain`
/// exactly once at send time. An item is either removed (store releases its
/// handle) or drained (handle travels with the message), never both.
#[derive(Debug, Default)]
pub struct AttachmentStore {
    pending: Vec<Attachment>,
    stats: Arc<HandleStats>,
}

impl AttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared accounting for every handle this store has allocated.
    pub fn stats(&self) -> Arc<HandleStats> {
        Arc::clone(&self.stats)
    }

    /// Allocate a handle for `data` and append a new pending attachment.
    /// Always succeeds for valid input.
    pub fn add(&mut self, name: impl Into<String>, kind: AttachmentKind, data: Bytes) -> AttachmentMeta {
        let name = name.into();
        let byte_size = Some(data.len() as u64);
        let url = format!("local://attachment/{}", Uuid::new_v4());
        let handle = AttachmentHandle::allocate(name.clone(), data, Arc::clone(&self.stats));
        let attachment = Attachment {
            kind,
            name,
            byte_size,
            url,
            handle,
        };
        let meta = attachment.meta();
        self.pending.push(attachment);
        meta
    }

    /// Remove the pending attachment at `index` and release its buffer.
    ///
    /// Out-of-range indices are ignored; removal races with the UI are
    /// harmless and must not panic.
    pub fn remove(&mut self, index: usize) {
        if index >= self.pending.len() {
            debug!(
                "ignoring attachment removal at {} (pending: {})",
                index,
                self.pending.len()
            );
            return;
        }
        let attachment = self.pending.remove(index);
        attachment.handle.release();
    }

    /// Take every pending attachment for the message being sent.
    ///
    /// Handles travel with the returned attachments; the store keeps no
    /// reference and releases nothing.
    pub fn drain(&mut self) -> Vec<Attachment> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Metadata of the pending set, for the composer preview.
    pub fn pending_meta(&self) -> Vec<AttachmentMeta> {
        self.pending.iter().map(Attachment::meta).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_allocates_and_appends() {
        let mut store = AttachmentStore::new();
        let image = store.add("shot.png", AttachmentKind::Image, Bytes::from_static(b"png"));
        let file = store.add("doc.pdf", AttachmentKind::File, Bytes::from_static(b"pdf"));
        assert_eq!(image.kind, AttachmentKind::Image);
        assert_eq!(file.kind, AttachmentKind::File);
        assert_eq!(store.len(), 2);
        assert!(image.url.starts_with("local://attachment/"));
    }

    #[test]
    fn test_remove_releases_exactly_once() {
        let mut store = AttachmentStore::new();
        let stats = store.stats();
        store.add("a.png", AttachmentKind::Image, Bytes::from_static(b"aa"));
        store.add("b.png", AttachmentKind::Image, Bytes::from_static(b"bb"));

        store.remove(0);
        assert_eq!(stats.created(), 2);
        assert_eq!(stats.released(), 1);
        assert_eq!(store.len(), 1);

        store.remove(0);
        assert_eq!(stats.released(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut store = AttachmentStore::new();
        let stats = store.stats();
        store.add("a.png", AttachmentKind::Image, Bytes::from_static(b"aa"));

        store.remove(5);
        assert_eq!(store.len(), 1);
        assert_eq!(stats.released(), 0);
    }

    #[test]
    fn test_drain_transfers_ownership_without_release() {
        let mut store = AttachmentStore::new();
        let stats = store.stats();
        store.add("a.png", AttachmentKind::Image, Bytes::from_static(b"aa"));
        store.add("b.pdf", AttachmentKind::File, Bytes::from_static(b"bb"));

        let drained = store.drain();
        assert_eq!(drained.len(), 2);
        assert!(store.is_empty());
        // Ownership transferred: nothing released by the store.
        assert_eq!(stats.released(), 0);
        assert_eq!(stats.live(), 2);

        for attachment in drained {
            attachment.handle.release();
        }
        assert_eq!(stats.live(), 0);
    }
}
