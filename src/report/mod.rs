// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Maximality and suppression.
//!
//! As a scan slides its start date forward, every suffix of a long streak
//! is itself found as a (shorter) streak ending on the same day. Only the
//! first streak to end on a given day is reported; later ones are
//! sub-streaks of it and are suppressed.

use crate::index::{DayIndex, Step};
use crate::model::{ParticipantSet, Pick};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

/// Why a streak stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Every participant present on the end day was already used.
    ParticipantsExhausted,
    /// The end day lies within the data but has no records.
    NoActivity,
    /// The end day lies beyond the recorded data; the streak may continue
    /// once more data exists.
    EndOfData,
    /// The search gave up; the length is a lower bound.
    TimedOut,
}

impl Termination {
    /// Classify a streak whose first uncovered day is `end`.
    pub fn classify(index: &DayIndex, end: Option<NaiveDate>, step: Step, timed_out: bool) -> Self {
        if timed_out {
            return Termination::TimedOut;
        }
        match end {
            None => Termination::EndOfData,
            Some(end) if index.is_past_end(end, step) => Termination::EndOfData,
            Some(end) if index.record(end).is_empty() => Termination::NoActivity,
            Some(_) => Termination::ParticipantsExhausted,
        }
    }

    /// True if no more data could make the streak longer.
    pub fn is_maximal(self) -> bool {
        matches!(
            self,
            Termination::ParticipantsExhausted | Termination::NoActivity
        )
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::ParticipantsExhausted => "participants exhausted",
            Termination::NoActivity => "no activity",
            Termination::EndOfData => "ongoing",
            Termination::TimedOut => "timed out",
        };
        f.write_str(text)
    }
}

/// End dates already claimed by a reported streak in one scan.
#[derive(Debug, Clone, Default)]
pub struct SeenEndDates {
    dates: BTreeSet<NaiveDate>,
}

impl SeenEndDates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `date`. Returns false if it was already claimed.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// What to do with one search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Report,
    BelowMinimum,
    /// A longer streak already ended on the same day.
    Suppressed,
}

/// Applies the minimum length and end-date suppression for one scan.
#[derive(Debug, Clone, Default)]
pub struct Suppressor {
    min_length: usize,
    seen: SeenEndDates,
}

impl Suppressor {
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            seen: SeenEndDates::new(),
        }
    }

    /// Decide whether a streak of `length` ending at `end` is reported.
    ///
    /// Every reported streak claims its end date, timed out or not, so no two
    /// reports of one scan share an end date.
    pub fn consider(&mut self, length: usize, end: Option<NaiveDate>) -> Verdict {
        if length < self.min_length {
            return Verdict::BelowMinimum;
        }
        match end {
            Some(end) if !self.seen.insert(end) => Verdict::Suppressed,
            _ => Verdict::Report,
        }
    }

    pub fn seen(&self) -> &SeenEndDates {
        &self.seen
    }
}

/// One participant's day in a reported streak, with names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedPick {
    pub participant: String,
    pub activity: String,
}

/// A streak that passed suppression, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakReport {
    /// Graticule, in partitioned scans.
    pub partition: Option<String>,
    pub start: NaiveDate,
    pub step: Step,
    /// First day not covered.
    pub end: Option<NaiveDate>,
    pub picks: Vec<ReportedPick>,
    /// Names of the participants that blocked the next day.
    pub limiting: Vec<String>,
    pub termination: Termination,
    /// Distinct participant sets reaching the same length (set enumeration
    /// only).
    pub alternatives: Option<usize>,
}

impl StreakReport {
    /// Resolve ids in `sequence` and `limiting` against `index`.
    pub fn new(
        index: &DayIndex,
        partition: Option<&str>,
        start: NaiveDate,
        step: Step,
        sequence: &[Pick],
        limiting: &ParticipantSet,
        termination: Termination,
    ) -> Self {
        Self {
            partition: partition.map(str::to_string),
            start,
            step,
            end: step.advance(start, sequence.len() as u64),
            picks: sequence
                .iter()
                .map(|pick| ReportedPick {
                    participant: index.participant_name(pick.participant).to_string(),
                    activity: index.activity_title(pick.activity).to_string(),
                })
                .collect(),
            limiting: limiting
                .iter()
                .map(|p| index.participant_name(p).to_string())
                .collect(),
            termination,
            alternatives: None,
        }
    }

    pub fn with_alternatives(mut self, alternatives: usize) -> Self {
        self.alternatives = Some(alternatives);
        self
    }

    pub fn length(&self) -> usize {
        self.picks.len()
    }

    /// The last day covered by the streak.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let covered = self.picks.len().checked_sub(1)?;
        self.step.advance(self.start, covered as u64)
    }

    /// The covered days in calendar order, as (first, last).
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let last = self.last_day()?;
        Some(match self.step {
            Step::Forward => (self.start, last),
            Step::Backward => (last, self.start),
        })
    }
}
