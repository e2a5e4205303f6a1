use thiserror::Error;

use super::types::SlotId;
use crate::embedding::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("vector length mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("cannot score empty vectors")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("query embedding unavailable: {0}")]
    QueryEmbeddingUnavailable(ProviderError),

    #[error("scoring {slot} failed: {source}")]
    Scoring {
        slot: SlotId,
        #[source]
        source: ScoreError,
    },

    #[error("no such slot: {0}")]
    UnknownSlot(SlotId),

    #[error("the query slot cannot be removed")]
    QueryNotRemovable,

    #[error("slot {0} appears more than once")]
    DuplicateSlot(SlotId),
}
