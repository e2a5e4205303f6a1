//! Match orchestration: refresh, score, rank.
//!
//! [`MatchEngine::match_candidates`] snapshots the board, makes sure every slot has
//! a vector (fetching stale ones in parallel), scores each candidate against the
//! query, and returns the candidates sorted by descending similarity.
//!
//! Overlapping calls are not serialized against each other. Each runs its own pass;
//! the fetch coordinator keeps them from duplicating provider calls or writing stale
//! vectors into the cache.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::cache::EmbeddingCache;
use super::coordinator::FetchCoordinator;
use super::error::MatchError;
use super::lock;
use super::scorer::{cosine_similarity, percentage};
use super::slots::SlotBoard;
use super::types::{ExclusionReason, MatchReport, MatchScore, SlotId, TextSlot};
use crate::embedding::VectorProvider;

pub struct MatchEngine {
    board: Arc<Mutex<SlotBoard>>,
    cache: Arc<EmbeddingCache>,
    coordinator: FetchCoordinator,
}

impl MatchEngine {
    /// Create an engine with the given query text and no candidates.
    pub fn new(provider: Arc<dyn VectorProvider>, query: impl Into<String>) -> Self {
        let board = Arc::new(Mutex::new(SlotBoard::new(query)));
        let cache = Arc::new(EmbeddingCache::new());
        let coordinator =
            FetchCoordinator::new(provider, Arc::clone(&board), Arc::clone(&cache));
        Self {
            board,
            cache,
            coordinator,
        }
    }

    /// Create an engine pre-filled with a query and candidates, in order.
    pub fn with_candidates<I, S>(
        provider: Arc<dyn VectorProvider>,
        query: impl Into<String>,
        candidates: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = Self::new(provider, query);
        for candidate in candidates {
            engine.add_candidate(candidate);
        }
        engine
    }

    // ── Slot editing ────────────────────────────────────────────────────────────

    pub fn query(&self) -> TextSlot {
        lock(&self.board).query().clone()
    }

    pub fn candidates(&self) -> Vec<TextSlot> {
        lock(&self.board).candidates().to_vec()
    }

    pub fn set_query(&self, content: impl Into<String>) {
        lock(&self.board).set_query(content);
    }

    pub fn add_candidate(&self, content: impl Into<String>) -> SlotId {
        let id = lock(&self.board).add_candidate(content);
        debug!(slot = %id, "candidate added");
        id
    }

    /// Replace the text of the query or of a candidate.
    pub fn set_text(&self, id: SlotId, content: impl Into<String>) -> Result<(), MatchError> {
        lock(&self.board).set_content(id, content)
    }

    /// Remove a candidate and drop its cached vector.
    pub fn remove_candidate(&self, id: SlotId) -> Result<TextSlot, MatchError> {
        let mut board = lock(&self.board);
        let removed = board.remove_candidate(id)?;
        // Under the board lock, so an in-flight fetch cannot re-add the entry.
        self.cache.invalidate(id);
        debug!(slot = %id, "candidate removed");
        Ok(removed)
    }

    /// True if the slot's cached vector matches its current text.
    pub fn is_cached(&self, id: SlotId) -> bool {
        let board = lock(&self.board);
        board
            .content(id)
            .is_some_and(|content| self.cache.is_valid(&TextSlot::new(id, content)))
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    // ── Matching ────────────────────────────────────────────────────────────────

    /// Rank the board's current candidates against its current query.
    pub async fn match_candidates(&self) -> Result<MatchReport, MatchError> {
        let (query, candidates) = {
            let board = lock(&self.board);
            (board.query().clone(), board.candidates().to_vec())
        };
        self.match_slots(&query, &candidates).await
    }

    /// Rank `candidates` against `query`.
    ///
    /// Vectors are written to the cache only for slots that are on the board with the
    /// same text when their fetch completes. Every slot id, the query's included, must
    /// appear once.
    pub async fn match_slots(
        &self,
        query: &TextSlot,
        candidates: &[TextSlot],
    ) -> Result<MatchReport, MatchError> {
        let mut seen = BTreeSet::from([query.id]);
        if let Some(dup) = candidates.iter().find(|slot| !seen.insert(slot.id)) {
            return Err(MatchError::DuplicateSlot(dup.id));
        }

        let (query_outcome, mut fresh) = futures::join!(
            self.coordinator.fetch(query),
            self.coordinator.ensure_fresh(candidates)
        );
        let query_vector = query_outcome.map_err(MatchError::QueryEmbeddingUnavailable)?;

        let mut report = MatchReport::default();
        for slot in candidates {
            let Some(outcome) = fresh.remove(&slot.id) else {
                continue;
            };
            let vector = match outcome {
                Ok(vector) => vector,
                Err(err) => {
                    report.excluded.insert(slot.id, ExclusionReason::Provider(err));
                    continue;
                }
            };

            let score = cosine_similarity(&query_vector, &vector).map_err(|source| {
                MatchError::Scoring {
                    slot: slot.id,
                    source,
                }
            })?;
            if score.is_nan() {
                report.excluded.insert(slot.id, ExclusionReason::DegenerateVector);
                continue;
            }

            report.ranked.push(MatchScore {
                slot_id: slot.id,
                content: slot.content.clone(),
                score,
                percentage: percentage(score),
            });
        }

        // Stable sort: equal scores keep slot order.
        report
            .ranked
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        info!(
            candidates = candidates.len(),
            ranked = report.ranked.len(),
            excluded = report.excluded.len(),
            top = report.top().map(|s| s.content.as_str()).unwrap_or(""),
            "match complete"
        );
        Ok(report)
    }
}
