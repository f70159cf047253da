use parking_lot::RwLock;
use ragline_vector_store::VectorStore;
use std::sync::Arc;

/// Process-wide handle to the currently published vector store
///
/// Starts empty. `publish` swaps the whole store as one indivisible update;
/// `current` hands out a snapshot that stays valid however many times the
/// store is replaced afterwards. There is no partial state to observe and
/// no mutation of a live store.
#[derive(Debug, Default)]
pub struct ActiveStore {
    inner: RwLock<Arc<VectorStore>>,
}

impl ActiveStore {
    /// Create a handle holding an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the currently published store
    #[must_use]
    pub fn current(&self) -> Arc<VectorStore> {
        self.inner.read().clone()
    }

    /// Replace the published store
    pub fn publish(&self, store: VectorStore) {
        let records = store.len();
        *self.inner.write() = Arc::new(store);
        log::info!("Published store with {records} record(s)");
    }
}
