//! Refreshing stale slots through the vector provider.
//!
//! [`FetchCoordinator::ensure_fresh`] answers valid slots from the cache and fetches
//! the rest in parallel. At most one provider call per slot is in flight: a second
//! request for the same slot waits on the first. A fetched vector is written to the
//! cache only if the slot still holds the text that was sent; otherwise the result is
//! dropped and the slot stays stale until the next refresh.
//!
//! Each provider call runs as its own tokio task, so it settles and leaves the
//! in-flight map even when every request waiting on it has been dropped. The
//! coordinator must therefore be driven from inside a tokio runtime.

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::cache::EmbeddingCache;
use super::lock;
use super::slots::SlotBoard;
use super::types::{SlotId, TextSlot};
use crate::embedding::{ProviderError, VectorProvider};

/// Outcome of obtaining one slot's vector.
pub type FetchOutcome = Result<Arc<[f32]>, ProviderError>;

/// Per-slot outcomes of one [`FetchCoordinator::ensure_fresh`] batch.
pub type FreshVectors = BTreeMap<SlotId, FetchOutcome>;

type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

struct InFlight {
    /// Text that was sent to the provider.
    content: String,
    fetch: SharedFetch,
}

pub struct FetchCoordinator {
    provider: Arc<dyn VectorProvider>,
    board: Arc<Mutex<SlotBoard>>,
    cache: Arc<EmbeddingCache>,
    in_flight: Arc<Mutex<HashMap<SlotId, InFlight>>>,
}

impl FetchCoordinator {
    pub fn new(
        provider: Arc<dyn VectorProvider>,
        board: Arc<Mutex<SlotBoard>>,
        cache: Arc<EmbeddingCache>,
    ) -> Self {
        Self {
            provider,
            board,
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Obtain a vector for every slot, fetching only the stale ones.
    ///
    /// Fetches run concurrently and a failure in one slot does not affect the others.
    /// Every requested slot id appears in the result.
    pub async fn ensure_fresh(&self, slots: &[TextSlot]) -> FreshVectors {
        let fetches = slots
            .iter()
            .map(|slot| async move { (slot.id, self.fetch(slot).await) });
        join_all(fetches).await.into_iter().collect()
    }

    /// Obtain a vector for one slot's text, from the cache if it is valid.
    pub async fn fetch(&self, slot: &TextSlot) -> FetchOutcome {
        loop {
            if let Some(vector) = self.cache.get(slot) {
                debug!(slot = %slot.id, "embedding cache hit");
                return Ok(vector);
            }

            let (sent, fetch) = self.join_or_launch(slot);
            let outcome = fetch.await;
            if sent == slot.content {
                return outcome;
            }
            // The fetch we waited on was for an earlier edit of this slot.
            debug!(slot = %slot.id, "joined fetch carried older text, fetching again");
        }
    }

    /// Number of provider calls currently in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn join_or_launch(&self, slot: &TextSlot) -> (String, SharedFetch) {
        let mut in_flight = lock(&self.in_flight);
        if let Some(pending) = in_flight.get(&slot.id) {
            debug!(slot = %slot.id, "joining in-flight fetch");
            return (pending.content.clone(), pending.fetch.clone());
        }

        let fetch = self.launch(slot.clone());
        in_flight.insert(
            slot.id,
            InFlight {
                content: slot.content.clone(),
                fetch: fetch.clone(),
            },
        );
        (slot.content.clone(), fetch)
    }

    /// Spawn the provider call for `sent`. Called with the in-flight lock held, so the
    /// task cannot remove its entry before it has been inserted.
    fn launch(&self, sent: TextSlot) -> SharedFetch {
        let provider = Arc::clone(&self.provider);
        let board = Arc::clone(&self.board);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);

        debug!(slot = %sent.id, provider = provider.name(), "fetching embedding");

        let task = tokio::spawn(async move {
            let outcome = provider.embed(&sent.content).await.map(Arc::<[f32]>::from);
            match &outcome {
                Ok(vector) => store_if_current(&board, &cache, &sent, vector),
                Err(err) => warn!(slot = %sent.id, error = %err, "embedding fetch failed"),
            }
            lock(&in_flight).remove(&sent.id);
            outcome
        });

        async move {
            task.await.unwrap_or_else(|err| {
                Err(ProviderError::Transport(format!("fetch task failed: {err}")))
            })
        }
        .boxed()
        .shared()
    }
}

/// Cache `vector` only if the slot still holds the text that produced it.
///
/// The board lock is held across the check and the write, so an edit or removal
/// cannot slip in between.
fn store_if_current(
    board: &Mutex<SlotBoard>,
    cache: &EmbeddingCache,
    sent: &TextSlot,
    vector: &Arc<[f32]>,
) {
    let board = lock(board);
    if board.content(sent.id) == Some(sent.content.as_str()) {
        cache.put(sent, Arc::clone(vector));
        debug!(slot = %sent.id, dims = vector.len(), "embedding cached");
    } else {
        warn!(slot = %sent.id, "slot changed while fetching, discarding result");
    }
}
