// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Forward set enumeration.
//!
//! Instead of exploring picks one path at a time, this formulation keeps,
//! for one start date, every distinct *set* of participants that some
//! day-by-day selection can reach, and grows all of them one day at a time.
//! Two paths that reach the same set (say A then B, or B then A) collapse
//! into one entry, which removes the permutation blow-up of path search at
//! the price of holding all reachable sets in memory.
//!
//! Each set remembers the first path found to it, so an example streak can
//! still be reported with its activities.
//!
//! There is no deadline: enumeration runs until no set can grow. When the
//! number of live sets passes the explosion threshold a warning is logged
//! and enumeration carries on.

pub mod sliding;

pub use sliding::SlidingEnumerator;

use crate::index::{DayIndex, DayRecord, Step};
use crate::model::{ParticipantSet, Pick};
use chrono::NaiveDate;
use log::warn;
use std::collections::BTreeMap;

/// Number of live participant sets above which a warning is logged.
pub const DEFAULT_EXPLOSION_THRESHOLD: usize = 100_000;

/// The deepest depth reached by the sets grown from one start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStreak {
    pub start: NaiveDate,
    /// Days covered: the size of every set alive at the end.
    pub length: usize,
    /// The first recorded path to the first surviving set.
    pub example: Vec<Pick>,
    /// Distinct sets alive at the final depth.
    pub tied_sets: usize,
    /// Most sets alive at any depth.
    pub peak_sets: usize,
    /// The explosion threshold was passed.
    pub exploded: bool,
}

impl SetStreak {
    /// The first day after the streak.
    pub fn end_date(&self, step: Step) -> Option<NaiveDate> {
        step.advance(self.start, self.length as u64)
    }

    /// Members of the example set.
    pub fn example_set(&self) -> ParticipantSet {
        self.example.iter().map(|pick| pick.participant).collect()
    }
}

/// All distinct sets reachable from one start date, keyed by set, each with
/// the first path that reached it.
#[derive(Debug)]
pub(crate) struct LiveStreak {
    start: NaiveDate,
    depth: usize,
    groups: BTreeMap<ParticipantSet, Vec<Pick>>,
    peak_sets: usize,
    exploded: bool,
}

impl LiveStreak {
    /// One singleton set per participant present on `start`.
    pub(crate) fn seed(start: NaiveDate, record: &DayRecord) -> Self {
        let groups: BTreeMap<ParticipantSet, Vec<Pick>> = record
            .picks()
            .iter()
            .map(|pick| (ParticipantSet::singleton(pick.participant), vec![*pick]))
            .collect();
        Self {
            start,
            depth: if groups.is_empty() { 0 } else { 1 },
            peak_sets: groups.len(),
            groups,
            exploded: false,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Grow every set by one participant from `record`.
    ///
    /// Returns false, leaving the streak unchanged, when no set can grow.
    pub(crate) fn advance(&mut self, record: &DayRecord, explosion_threshold: usize) -> bool {
        let mut extended: BTreeMap<ParticipantSet, Vec<Pick>> = BTreeMap::new();
        for (set, path) in &self.groups {
            for pick in record.picks() {
                if set.contains(pick.participant) {
                    continue;
                }
                extended
                    .entry(set.with(pick.participant))
                    .or_insert_with(|| {
                        let mut grown = Vec::with_capacity(path.len() + 1);
                        grown.extend_from_slice(path);
                        grown.push(*pick);
                        grown
                    });
            }
        }
        if extended.is_empty() {
            return false;
        }

        self.groups = extended;
        self.depth += 1;
        self.peak_sets = self.peak_sets.max(self.groups.len());
        if self.groups.len() > explosion_threshold && !self.exploded {
            self.exploded = true;
            warn!(
                "Streak from {} has {} distinct participant sets at depth {} (threshold {}); continuing",
                self.start,
                self.groups.len(),
                self.depth,
                explosion_threshold
            );
        }
        true
    }

    pub(crate) fn finish(self) -> SetStreak {
        let tied_sets = self.groups.len();
        let example = self
            .groups
            .into_iter()
            .next()
            .map(|(_, path)| path)
            .unwrap_or_default();
        SetStreak {
            start: self.start,
            length: self.depth,
            example,
            tied_sets,
            peak_sets: self.peak_sets,
            exploded: self.exploded,
        }
    }
}

/// Runs forward set enumeration for single start dates.
#[derive(Debug, Clone, Copy)]
pub struct ForwardEnumerator<'a> {
    index: &'a DayIndex,
    step: Step,
    explosion_threshold: usize,
}

impl<'a> ForwardEnumerator<'a> {
    pub fn new(index: &'a DayIndex, step: Step) -> Self {
        Self {
            index,
            step,
            explosion_threshold: DEFAULT_EXPLOSION_THRESHOLD,
        }
    }

    pub fn with_explosion_threshold(mut self, threshold: usize) -> Self {
        self.explosion_threshold = threshold;
        self
    }

    /// Grow every reachable set from `start` until none can grow.
    pub fn enumerate(&self, start: NaiveDate) -> SetStreak {
        let mut live = LiveStreak::seed(start, self.index.record(start));
        let mut day = self.step.next(start);
        while !live.is_empty() && live.advance(self.index.record_at(day), self.explosion_threshold)
        {
            day = day.and_then(|day| self.step.next(day));
        }
        live.finish()
    }
}

/// Run one forward enumeration from `start` with the default threshold.
pub fn enumerate(index: &DayIndex, start: NaiveDate, step: Step) -> SetStreak {
    ForwardEnumerator::new(index, step).enumerate(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::all_distinct;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn index_of(days: &[&[&str]]) -> DayIndex {
        let mut builder = DayIndex::builder();
        for (i, names) in days.iter().enumerate() {
            for name in names.iter() {
                builder.add(day(i as u32 + 1), *name, format!("day {}", i + 1));
            }
        }
        builder.build()
    }

    #[test]
    fn test_empty_start() {
        let index = index_of(&[&[], &["A"]]);
        let streak = enumerate(&index, day(1), Step::Forward);
        assert_eq!(streak.length, 0);
        assert!(streak.example.is_empty());
        assert_eq!(streak.tied_sets, 0);
        assert_eq!(streak.end_date(Step::Forward), Some(day(1)));
    }

    #[test]
    fn test_permutations_collapse() {
        // {A,B} on two days: A-B and B-A reach the same set.
        let index = index_of(&[&["C"], &["A", "B"], &["A", "B"], &["C"]]);
        let streak = enumerate(&index, day(1), Step::Forward);

        assert_eq!(streak.length, 3);
        assert_eq!(streak.tied_sets, 1);
        assert_eq!(streak.peak_sets, 2);
        assert_eq!(streak.example_set().len(), 3);
        assert!(all_distinct(&streak.example));
        assert_eq!(streak.end_date(Step::Forward), Some(day(4)));
    }

    #[test]
    fn test_example_path_matches_days() {
        let index = index_of(&[&["A", "B"], &["A"], &["C"]]);
        let streak = enumerate(&index, day(1), Step::Forward);

        assert_eq!(streak.length, 3);
        let names: Vec<&str> = streak
            .example
            .iter()
            .map(|pick| index.participant_name(pick.participant))
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        for (offset, pick) in streak.example.iter().enumerate() {
            let date = Step::Forward.advance(day(1), offset as u64).unwrap();
            assert_eq!(index.record(date).activity(pick.participant), Some(pick.activity));
        }
    }

    #[test]
    fn test_several_sets_tie() {
        let index = index_of(&[&["A", "B", "C"], &["A", "B", "C"]]);
        let streak = enumerate(&index, day(1), Step::Forward);
        assert_eq!(streak.length, 2);
        assert_eq!(streak.tied_sets, 3);
    }

    #[test]
    fn test_backward() {
        let index = index_of(&[&["C"], &["A", "B"], &["A", "B"], &["D"]]);
        let streak = enumerate(&index, day(4), Step::Backward);
        assert_eq!(streak.length, 4);
        assert_eq!(streak.end_date(Step::Backward), day(1).pred_opt());
    }

    #[test]
    fn test_explosion_warns_but_completes() {
        let names: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        let mut builder = DayIndex::builder();
        for d in 1..=6 {
            for name in &names {
                builder.add(day(d), name.as_str(), "crowd");
            }
        }
        let index = builder.build();

        let streak = ForwardEnumerator::new(&index, Step::Forward)
            .with_explosion_threshold(10)
            .enumerate(day(1));
        assert!(streak.exploded);
        assert_eq!(streak.length, 6);
        assert_eq!(streak.tied_sets, 1);
        // C(6,3) sets alive at depth 3.
        assert_eq!(streak.peak_sets, 20);
    }
}
