//! Incremental embedding cache and similarity ranking.
//!
//! [`MatchEngine`] is the entry point. It owns the [`SlotBoard`] the caller edits, the
//! [`EmbeddingCache`], and the [`FetchCoordinator`] that refreshes stale slots, and it
//! ranks candidates with [`cosine_similarity`].

pub mod cache;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod scorer;
pub mod slots;
pub mod types;

use std::sync::{Mutex, MutexGuard};

pub use cache::{CachedEmbedding, EmbeddingCache};
pub use coordinator::{FetchCoordinator, FetchOutcome, FreshVectors};
pub use engine::MatchEngine;
pub use error::{MatchError, ScoreError};
pub use scorer::{cosine_similarity, percentage};
pub use slots::SlotBoard;
pub use types::{ExclusionReason, MatchReport, MatchScore, SlotId, TextSlot};

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Every critical section in this module leaves its data consistent before it can
/// panic, so poisoning carries no information here.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
