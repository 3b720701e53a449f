// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters for one scan, incremented by the driver as it runs searches and
//! filters their results.

use crate::engine::SearchCounts;
use std::fmt;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{AsRefStr, EnumCount as EnumCountMacro, EnumIter};

#[derive(EnumCountMacro, EnumIter, AsRefStr, Debug, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Counters {
    /// Start dates searched.
    Searches,
    /// Searches that hit their deadline.
    TimedOut,
    /// Streaks emitted.
    Reported,
    /// Streaks dropped because a longer one already ended on the same day.
    Suppressed,
    /// Streaks shorter than the minimum length.
    BelowMinimum,
    /// Enumerations that passed the explosion threshold.
    ExplosionWarnings,
    /// Days entered by the backtracking engine.
    FrameEntries,
    /// Candidates tried by the backtracking engine.
    Branches,
    /// Candidate loops cut short by pruning.
    EarlyExits,
    /// Sequences the backtracking engine copied off its trail.
    SequenceCopies,
}

const COUNT: usize = Counters::COUNT;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub fn increment(&mut self, counter: Counters) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counters, amount: u64) {
        self.stats[counter as usize] += amount;
    }

    /// Fold in the engine's counters for one search.
    pub fn record_search(&mut self, counts: SearchCounts) {
        self.add(Counters::FrameEntries, counts.entries);
        self.add(Counters::Branches, counts.branches);
        self.add(Counters::EarlyExits, counts.early_exits);
        self.add(Counters::SequenceCopies, counts.copies);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }
}

impl fmt::Display for Statistics {
    /// Format as "searches=7 timed_out=0 ...", skipping zero counters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for counter in Counters::iter().filter(|c| self.get(*c) > 0) {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}={}", counter.as_ref(), self.get(counter))?;
        }
        Ok(())
    }
}
