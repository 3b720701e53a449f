// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for the streak search.
//!
//! The trail holds the partial streak under construction: the ordered picks
//! made so far and the set of participants they use. Every change is a push
//! onto the trail, so backtracking to an earlier checkpoint is a truncation
//! that also releases the participants picked since.

use crate::model::{ParticipantId, ParticipantSet, Pick};

/// The current partial selection, with O(1) undo.
///
/// # Memory Model
///
/// - DYNAMIC: The trail is the only mutable state of a backtracking search
/// - Each search owns its own trail, so independent searches over the same
///   index never interfere
#[derive(Debug, Default)]
pub struct Trail {
    /// Picks in day order.
    picks: Vec<Pick>,
    /// Participants appearing in `picks`.
    used: ParticipantSet,
}

impl Trail {
    /// Create a new empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick for the next day.
    ///
    /// # Panics
    ///
    /// Panics if the participant is already on the trail (a search bug: the
    /// engine only offers unused participants).
    pub fn push(&mut self, pick: Pick) {
        let fresh = self.used.insert(pick.participant);
        assert!(
            fresh,
            "Participant {} picked twice on one trail",
            pick.participant.value()
        );
        self.picks.push(pick);
    }

    /// Undo the most recent pick.
    pub fn pop(&mut self) -> Option<Pick> {
        let pick = self.picks.pop()?;
        self.used.remove(pick.participant);
        Some(pick)
    }

    /// Current position, for a later [`rewind_to`](Self::rewind_to).
    pub fn checkpoint(&self) -> usize {
        self.picks.len()
    }

    /// Undo every pick made since `checkpoint`.
    pub fn rewind_to(&mut self, checkpoint: usize) {
        while self.picks.len() > checkpoint {
            self.pop();
        }
    }

    /// The picks made so far.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// Participants already used.
    pub fn used(&self) -> &ParticipantSet {
        &self.used
    }

    pub fn is_used(&self, participant: ParticipantId) -> bool {
        self.used.contains(participant)
    }

    /// Get the current number of picks on the trail.
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// Check if the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}
