// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Value types shared by every search formulation.
//!
//! - ParticipantId: interned participant handle
//! - ActivityId: interned activity (expedition) handle
//! - Pick: one day's choice of (participant, activity)
//! - ParticipantSet: bitset of participants

pub mod participant_set;

pub use participant_set::ParticipantSet;

/// A participant, interned by a [`DayIndex`](crate::index::DayIndex).
///
/// Ids are assigned in ascending order of participant name, so iterating
/// participants by id visits them alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(u32);

impl ParticipantId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Get the id as a usize (for array indexing).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An activity, interned by a [`DayIndex`](crate::index::DayIndex).
///
/// Opaque to the search; only the index knows its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityId(u32);

impl ActivityId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One element of a streak: the participant chosen for a day and the
/// activity that put them there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pick {
    pub participant: ParticipantId,
    pub activity: ActivityId,
}

impl Pick {
    pub fn new(participant: ParticipantId, activity: ActivityId) -> Self {
        Self {
            participant,
            activity,
        }
    }
}

/// True if no participant appears twice in `picks`.
pub fn all_distinct(picks: &[Pick]) -> bool {
    let mut seen = ParticipantSet::empty();
    picks.iter().all(|pick| seen.insert(pick.participant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_ordering() {
        assert!(ParticipantId::new(1) < ParticipantId::new(2));
        assert_eq!(ParticipantId::new(7).index(), 7);
    }

    #[test]
    fn test_all_distinct() {
        let a = Pick::new(ParticipantId::new(0), ActivityId::new(0));
        let b = Pick::new(ParticipantId::new(1), ActivityId::new(0));
        let a_again = Pick::new(ParticipantId::new(0), ActivityId::new(5));

        assert!(all_distinct(&[]));
        assert!(all_distinct(&[a, b]));
        assert!(!all_distinct(&[a, b, a_again]));
    }
}
