//! Exclusively-owned attachment buffers with release accounting.
//!
//! Every handle must be released exactly once: when its attachment is removed
//! from the pending set, or once the message that carried it leaves the
//! timeline. `release` consumes the handle, so a double release does not
//! compile; a handle dropped without release is a leak, logged at warn level
//! before the accounting is reconciled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use log::warn;

/// Counters shared between a store and every handle it has allocated.
///
/// Leak tests assert the exactly-once invariant against these.
#[derive(Debug, Default)]
pub struct HandleStats {
    created: AtomicU64,
    released: AtomicU64,
    live_bytes: AtomicU64,
}

impl HandleStats {
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    /// Handles allocated but not yet released.
    pub fn live(&self) -> u64 {
        self.created() - self.released()
    }

    pub fn live_bytes(&self) -> u64 {
        self.live_bytes.load(Ordering::SeqCst)
    }
}

/// Exclusive owner of one attachment's local bytes.
#[derive(Debug)]
pub struct AttachmentHandle {
    name: String,
    data: Bytes,
    stats: Arc<HandleStats>,
    released: bool,
}

impl AttachmentHandle {
    pub(crate) fn allocate(name: String, data: Bytes, stats: Arc<HandleStats>) -> Self {
        stats.created.fetch_add(1, Ordering::SeqCst);
        stats.live_bytes.fetch_add(data.len() as u64, Ordering::SeqCst);
        Self {
            name,
            data,
            stats,
            released: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The held bytes; valid until the handle is released.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Free the underlying buffer. Consuming `self` makes a second release
    /// unrepresentable.
    pub fn release(mut self) {
        self.mark_released();
    }

    fn mark_released(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stats.released.fetch_add(1, Ordering::SeqCst);
        self.stats
            .live_bytes
            .fetch_sub(self.data.len() as u64, Ordering::SeqCst);
        self.data = Bytes::new();
    }
}

impl Drop for AttachmentHandle {
    fn drop(&mut self) {
        if !self.released {
            warn!("attachment handle '{}' dropped without release", self.name);
            self.mark_released();
        }
    }
}
