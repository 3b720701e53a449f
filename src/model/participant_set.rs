// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! ParticipantSet type for representing sets of participants as bitsets.
//!
//! A ParticipantSet is a compact representation of a set of interned
//! participants, where bit i represents the presence of participant i.
//!
//! # Examples
//!
//! ```
//! use streak_search::model::{ParticipantId, ParticipantSet};
//!
//! let mut set = ParticipantSet::empty();
//! set.insert(ParticipantId::new(0));
//! set.insert(ParticipantId::new(70));
//!
//! assert_eq!(set.len(), 2);
//! let ids: Vec<u32> = set.iter().map(|p| p.value()).collect();
//! assert_eq!(ids, vec![0, 70]);
//! ```

use crate::model::ParticipantId;
use std::fmt;

const WORD_BITS: usize = 64;

/// A set of participants represented as a growable bitset.
///
/// The word vector never ends in a zero word, so two sets with the same
/// members always have identical representations. This makes the derived
/// `Eq` and `Hash` usable as set equality, which the forward enumeration
/// relies on for deduplication. The derived `Ord` is an arbitrary but fixed
/// total order, used to keep enumeration output deterministic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ParticipantSet {
    words: Vec<u64>,
}

impl ParticipantSet {
    /// Create an empty participant set.
    pub const fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Create a set containing a single participant.
    pub fn singleton(participant: ParticipantId) -> Self {
        let mut set = Self::empty();
        set.insert(participant);
        set
    }

    /// Create a participant set from a slice of participants.
    pub fn from_participants(participants: &[ParticipantId]) -> Self {
        participants.iter().copied().collect()
    }

    fn locate(participant: ParticipantId) -> (usize, u64) {
        let index = participant.index();
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    /// Check if the set contains a specific participant.
    pub fn contains(&self, participant: ParticipantId) -> bool {
        let (word, mask) = Self::locate(participant);
        self.words.get(word).is_some_and(|bits| bits & mask != 0)
    }

    /// Insert a participant. Returns true if it was not already present.
    pub fn insert(&mut self, participant: ParticipantId) -> bool {
        let (word, mask) = Self::locate(participant);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    /// Remove a participant. Returns true if it was present.
    pub fn remove(&mut self, participant: ParticipantId) -> bool {
        let (word, mask) = Self::locate(participant);
        let Some(bits) = self.words.get_mut(word) else {
            return false;
        };
        let present = *bits & mask != 0;
        *bits &= !mask;
        self.trim();
        present
    }

    /// Get the number of participants in the set (population count).
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add every member of `other` to this set.
    pub fn union_with(&mut self, other: &ParticipantSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    /// A new set with `participant` added.
    pub fn with(&self, participant: ParticipantId) -> Self {
        let mut set = self.clone();
        set.insert(participant);
        set
    }

    /// Members present in both sets.
    pub fn intersection(&self, other: &ParticipantSet) -> Self {
        let mut set = Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        };
        set.trim();
        set
    }

    /// Iterate over all participants in the set.
    ///
    /// Participants are yielded in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.words.iter().enumerate().flat_map(|(word, &bits)| {
            ParticipantSetIter { bits }.map(move |bit| {
                ParticipantId::new((word * WORD_BITS + bit) as u32)
            })
        })
    }
}

/// Iterator over the set bits of one word.
struct ParticipantSetIter {
    bits: u64,
}

impl Iterator for ParticipantSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let bit = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(bit)
    }
}

impl FromIterator<ParticipantId> for ParticipantSet {
    fn from_iter<I: IntoIterator<Item = ParticipantId>>(iter: I) -> Self {
        let mut set = Self::empty();
        for participant in iter {
            set.insert(participant);
        }
        set
    }
}

impl fmt::Debug for ParticipantSet {
    /// Format a participant set as "{0, 3, 70}".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| p.value())).finish()
    }
}
