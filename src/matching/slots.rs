//! The caller-editable slot list: one query slot plus ordered candidate slots.

use super::error::MatchError;
use super::types::{SlotId, TextSlot};

/// Current text of every slot.
///
/// Candidate ids come from a counter that only moves forward, so removing or adding
/// one candidate never changes another candidate's id.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    query: TextSlot,
    candidates: Vec<TextSlot>,
    next_candidate: u64,
}

impl SlotBoard {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: TextSlot::new(SlotId::Query, query),
            candidates: Vec::new(),
            next_candidate: 0,
        }
    }

    pub fn query(&self) -> &TextSlot {
        &self.query
    }

    pub fn candidates(&self) -> &[TextSlot] {
        &self.candidates
    }

    /// Current text of `id`, or `None` if no such slot exists.
    pub fn content(&self, id: SlotId) -> Option<&str> {
        match id {
            SlotId::Query => Some(self.query.content.as_str()),
            SlotId::Candidate(_) => self
                .candidates
                .iter()
                .find(|slot| slot.id == id)
                .map(|slot| slot.content.as_str()),
        }
    }

    pub fn set_query(&mut self, content: impl Into<String>) {
        self.query.content = content.into();
    }

    /// Append a candidate and return its new id.
    pub fn add_candidate(&mut self, content: impl Into<String>) -> SlotId {
        let id = SlotId::Candidate(self.next_candidate);
        self.next_candidate += 1;
        self.candidates.push(TextSlot::new(id, content));
        id
    }

    /// Replace the text of an existing slot (query or candidate).
    pub fn set_content(&mut self, id: SlotId, content: impl Into<String>) -> Result<(), MatchError> {
        let slot = match id {
            SlotId::Query => &mut self.query,
            SlotId::Candidate(_) => self
                .candidates
                .iter_mut()
                .find(|slot| slot.id == id)
                .ok_or(MatchError::UnknownSlot(id))?,
        };
        slot.content = content.into();
        Ok(())
    }

    /// Remove a candidate, returning the removed slot.
    pub fn remove_candidate(&mut self, id: SlotId) -> Result<TextSlot, MatchError> {
        if id.is_query() {
            return Err(MatchError::QueryNotRemovable);
        }
        let pos = self
            .candidates
            .iter()
            .position(|slot| slot.id == id)
            .ok_or(MatchError::UnknownSlot(id))?;
        Ok(self.candidates.remove(pos))
    }

    /// The query followed by all candidates in order.
    pub fn snapshot(&self) -> Vec<TextSlot> {
        std::iter::once(self.query.clone())
            .chain(self.candidates.iter().cloned())
            .collect()
    }
}
