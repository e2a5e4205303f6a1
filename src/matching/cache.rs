//! Per-slot embedding cache.
//!
//! An entry remembers the exact text that produced its vector. It is valid only
//! while the slot still holds that text; editing the slot makes the entry stale
//! without removing it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::lock;
use super::types::{SlotId, TextSlot};

/// One cache entry: the text that was embedded and the vector it produced.
#[derive(Debug, Clone)]
pub struct CachedEmbedding {
    pub embedded_content: String,
    pub vector: Arc<[f32]>,
}

/// Embedding cache keyed by [`SlotId`].
///
/// Writes replace whole entries under a lock, so readers see either the old
/// entry or the new one.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: Mutex<HashMap<SlotId, CachedEmbedding>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SlotId, CachedEmbedding>> {
        lock(&self.entries)
    }

    /// True iff an entry exists for `slot.id` whose text equals `slot.content`.
    pub fn is_valid(&self, slot: &TextSlot) -> bool {
        self.get(slot).is_some()
    }

    /// The cached vector for `slot`, only if the entry is still valid.
    pub fn get(&self, slot: &TextSlot) -> Option<Arc<[f32]>> {
        self.lock()
            .get(&slot.id)
            .filter(|entry| entry.embedded_content == slot.content)
            .map(|entry| Arc::clone(&entry.vector))
    }

    /// Record `vector` for `slot`, overwriting any prior entry.
    ///
    /// `slot.content` must be the text that was sent to the provider.
    pub fn put(&self, slot: &TextSlot, vector: Arc<[f32]>) {
        self.lock().insert(
            slot.id,
            CachedEmbedding {
                embedded_content: slot.content.clone(),
                vector,
            },
        );
    }

    /// Drop the entry for `id`, if any.
    pub fn invalidate(&self, id: SlotId) {
        self.lock().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
