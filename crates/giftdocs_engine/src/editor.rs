use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::endpoint::EndpointId;

/// Counts live editor instances.
///
/// A page takes a lease when it opens and the lease gives the slot back when it
/// is dropped, so closing a page can never leak an editor.
#[derive(Debug, Clone, Default)]
pub struct EditorRegistry {
    live: Arc<AtomicUsize>,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, endpoint: EndpointId) -> EditorLease {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(endpoint = %endpoint, live, "Editor acquired");
        EditorLease {
            live: Arc::clone(&self.live),
            endpoint,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct EditorLease {
    live: Arc<AtomicUsize>,
    endpoint: EndpointId,
}

impl EditorLease {
    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }
}

impl Drop for EditorLease {
    fn drop(&mut self) {
        let live = self.live.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(endpoint = %self.endpoint, live, "Editor released");
    }
}
