//! Slot, score, and report types shared by the matching components.
//!
//! Defines [`SlotId`] (stable slot identity), [`TextSlot`] (a slot and its current
//! text), [`MatchScore`] (one ranked candidate), and [`MatchReport`] (the result of a
//! match, including the candidates that could not be scored).

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::embedding::ProviderError;

/// Stable identifier of a text slot.
///
/// The query has one fixed id. Candidate ids are handed out in increasing order and
/// never reused, so a candidate keeps its id when other candidates come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    Query,
    Candidate(u64),
}

impl SlotId {
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Candidate(n) => write!(f, "candidate-{n}"),
        }
    }
}

// Serialized as a string so it can be used as a JSON object key.
impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One piece of caller-editable text and the slot it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSlot {
    pub id: SlotId,
    pub content: String,
}

impl TextSlot {
    pub fn new(id: SlotId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub slot_id: SlotId,
    /// The candidate text that was embedded and scored.
    pub content: String,
    /// Raw cosine similarity in `[-1, 1]`.
    pub score: f64,
    /// `score * 100`, rounded to two decimals.
    pub percentage: f64,
}

/// Why a candidate is missing from [`MatchReport::ranked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The provider could not embed the candidate's text.
    Provider(ProviderError),
    /// The query or candidate vector has zero magnitude, so no angle exists.
    DegenerateVector,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "{err}"),
            Self::DegenerateVector => f.write_str("zero-magnitude vector"),
        }
    }
}

impl Serialize for ExclusionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of one match pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatchReport {
    /// Candidates ordered by descending score; ties keep slot order.
    pub ranked: Vec<MatchScore>,
    /// Candidates that could not be scored, with the reason.
    pub excluded: BTreeMap<SlotId, ExclusionReason>,
}

impl MatchReport {
    /// The best-scoring candidate, if any.
    pub fn top(&self) -> Option<&MatchScore> {
        self.ranked.first()
    }
}
