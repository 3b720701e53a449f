// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Backtracking streak search.
//!
//! This module implements a depth-first branch-and-bound search for the
//! longest run of consecutive days on which one participant per day can be
//! picked without ever picking anyone twice.
//!
//! # Architecture
//!
//! The engine maintains an explicit stack of frames, one per day currently
//! being branched on, so the depth of a streak is limited by memory rather
//! than by the call stack. Each stack entry tracks:
//! - The candidates for its day (participants present and not yet used)
//! - Which candidate is being tried
//! - The best sequence returned by any candidate so far
//! - The accumulated limiting participants
//! - A trail checkpoint to rewind to between candidates
//!
//! The engine alternates between two transitions:
//! 1. Enter a day: poll the deadline, then either return at once (time-out,
//!    or nobody available) or push a frame and try its first candidate
//! 2. Return to the parent frame: keep the longer sequence, merge the
//!    limiting set, then try the next candidate, or pop the frame and return
//!    further up
//!
//! A day that ends a branch returns only the length of the trail; the picks
//! are copied off the trail when, and only when, they beat the parent
//! frame's best so far.
//!
//! # Pruning
//!
//! When a candidate's subtree ends without the candidate itself among the
//! limiting participants, whatever stopped it is independent of the choice
//! made on this day, so no other candidate can reach further and the
//! remaining candidates are skipped. When the candidate *is* limiting, the
//! participants that were unavailable today are limiting too, and the next
//! candidate is tried.
//!
//! # Example
//!
//! ```
//! use streak_search::engine::{BacktrackingSearch, Deadline};
//! use streak_search::index::{DayIndex, Step};
//!
//! let day = |d: u32| chrono::NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let mut builder = DayIndex::builder();
//! builder
//!     .add(day(1), "C", "x")
//!     .add(day(2), "A", "y")
//!     .add(day(2), "B", "y")
//!     .add(day(3), "A", "z");
//! let index = builder.build();
//!
//! let mut engine = BacktrackingSearch::new(&index, Step::Forward, Deadline::unbounded());
//! let result = engine.search(day(1));
//! assert_eq!(result.len(), 3);
//! assert!(!result.timed_out);
//! ```

pub mod deadline;
pub mod result;

pub use deadline::{Countdown, Deadline};
pub use result::StreakResult;

use crate::index::{DayIndex, Step};
use crate::model::{ParticipantSet, Pick};
use crate::trail::Trail;
use chrono::NaiveDate;
use log::trace;

/// Stack entry tracking the state of one day's branching.
#[derive(Debug)]
struct Frame {
    /// The day after this one, where every candidate continues.
    next_day: Option<NaiveDate>,

    /// Available picks for this day, in ascending participant order.
    candidates: Vec<Pick>,

    /// Index of the next candidate to try.
    cursor: usize,

    /// Participants present today but already used.
    unavailable: ParticipantSet,

    /// Longest sequence returned by a candidate so far.
    best: Option<Vec<Pick>>,

    /// Union of the limiting sets returned so far.
    limiting: ParticipantSet,

    /// Trail checkpoint for this stack entry.
    trail_checkpoint: usize,
}

/// A sequence handed back to the parent frame.
#[derive(Debug)]
enum Found {
    /// The first `n` picks of the trail, not yet copied.
    OnTrail(usize),
    Owned(Vec<Pick>),
}

impl Found {
    fn len(&self) -> usize {
        match self {
            Found::OnTrail(n) => *n,
            Found::Owned(sequence) => sequence.len(),
        }
    }
}

/// What a finished day reports to its parent.
#[derive(Debug)]
struct Returned {
    found: Found,
    limiting: ParticipantSet,
    timed_out: bool,
}

impl Returned {
    fn nothing(timed_out: bool) -> Self {
        Self {
            found: Found::Owned(Vec::new()),
            limiting: ParticipantSet::empty(),
            timed_out,
        }
    }
}

enum Transition {
    Enter(Option<NaiveDate>),
    Return(Returned),
}

/// Counters describing the work done by the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCounts {
    /// Days entered (equals deadline polls).
    pub entries: u64,
    /// Candidates tried.
    pub branches: u64,
    /// Frames that skipped remaining candidates by the pruning rule.
    pub early_exits: u64,
    /// Sequences copied off the trail.
    pub copies: u64,
}

/// Backtracking search over one immutable [`DayIndex`].
///
/// A single engine may run any number of searches one after another; each
/// search starts from a fresh trail and stack.
pub struct BacktrackingSearch<'a> {
    index: &'a DayIndex,
    step: Step,
    deadline: Deadline,

    /// Stack of day frames.
    stack: Vec<Frame>,

    /// Picks made so far along the current branch.
    trail: Trail,

    counts: SearchCounts,
}

impl<'a> BacktrackingSearch<'a> {
    /// Create a search over `index`, extending streaks in the `step`
    /// direction, giving up at `deadline`.
    pub fn new(index: &'a DayIndex, step: Step, deadline: Deadline) -> Self {
        Self {
            index,
            step,
            deadline,
            stack: Vec::new(),
            trail: Trail::new(),
            counts: SearchCounts::default(),
        }
    }

    /// Find the longest streak starting on `start`.
    ///
    /// A start date without records yields an empty, not-timed-out result.
    pub fn search(&mut self, start: NaiveDate) -> StreakResult {
        self.stack.clear();
        self.trail = Trail::new();
        self.counts = SearchCounts::default();

        let mut countdown = self.deadline.start();
        let mut transition = Transition::Enter(Some(start));

        let returned = loop {
            transition = match transition {
                Transition::Enter(day) => self.enter(day, &mut countdown),
                Transition::Return(returned) => {
                    if self.stack.is_empty() {
                        break returned;
                    }
                    self.resume(returned)
                }
            };
        };
        let result = StreakResult {
            sequence: copy_out(returned.found, &self.trail, &mut self.counts),
            limiting: returned.limiting,
            timed_out: returned.timed_out,
        };

        trace!(
            "search from {}: length {}, {} entries, {} branches, {} early exits, {} copies{}",
            start,
            result.len(),
            self.counts.entries,
            self.counts.branches,
            self.counts.early_exits,
            self.counts.copies,
            if result.timed_out { " (timed out)" } else { "" }
        );
        result
    }

    /// Get statistics about the last search.
    pub fn counts(&self) -> SearchCounts {
        self.counts
    }

    /// Arrive at `day` with the current trail.
    fn enter(&mut self, day: Option<NaiveDate>, countdown: &mut Countdown) -> Transition {
        self.counts.entries += 1;
        let record = self.index.record_at(day);

        if countdown.expired() {
            return Transition::Return(Returned {
                found: Found::OnTrail(self.trail.len()),
                limiting: record.participants().intersection(self.trail.used()),
                timed_out: true,
            });
        }

        let candidates: Vec<Pick> = record
            .picks()
            .iter()
            .filter(|pick| !self.trail.is_used(pick.participant))
            .copied()
            .collect();

        if candidates.is_empty() {
            // Everyone present today (possibly nobody) is already used.
            return Transition::Return(Returned {
                found: Found::OnTrail(self.trail.len()),
                limiting: record.participants().clone(),
                timed_out: false,
            });
        }

        self.stack.push(Frame {
            next_day: day.and_then(|day| self.step.next(day)),
            candidates,
            cursor: 0,
            unavailable: record.participants().intersection(self.trail.used()),
            best: None,
            limiting: ParticipantSet::empty(),
            trail_checkpoint: self.trail.checkpoint(),
        });
        self.try_next_candidate()
    }

    /// Push the frame's next candidate onto the trail and descend.
    fn try_next_candidate(&mut self) -> Transition {
        let Some(frame) = self.stack.last_mut() else {
            return Transition::Return(Returned::nothing(false));
        };
        self.trail.rewind_to(frame.trail_checkpoint);
        let pick = frame.candidates[frame.cursor];
        frame.cursor += 1;
        self.trail.push(pick);
        self.counts.branches += 1;
        Transition::Enter(frame.next_day)
    }

    /// Fold a child's result into the top frame and decide what comes next.
    fn resume(&mut self, child: Returned) -> Transition {
        let Some(frame) = self.stack.last_mut() else {
            return Transition::Return(child);
        };
        let improves = frame
            .best
            .as_ref()
            .map_or(true, |best| child.found.len() > best.len());
        if improves {
            // Before rewinding: the child's picks may still be on the trail.
            frame.best = Some(copy_out(child.found, &self.trail, &mut self.counts));
        }
        self.trail.rewind_to(frame.trail_checkpoint);
        let chosen = frame.candidates[frame.cursor - 1].participant;
        frame.limiting.union_with(&child.limiting);

        if child.timed_out {
            return self.finish(true);
        }

        if !child.limiting.contains(chosen) {
            if frame.cursor < frame.candidates.len() {
                self.counts.early_exits += 1;
            }
            return self.finish(false);
        }

        frame.limiting.union_with(&frame.unavailable);
        if frame.cursor < frame.candidates.len() {
            self.try_next_candidate()
        } else {
            self.finish(false)
        }
    }

    /// Pop the top frame, returning its best sequence to the parent.
    fn finish(&mut self, timed_out: bool) -> Transition {
        let Some(frame) = self.stack.pop() else {
            return Transition::Return(Returned::nothing(timed_out));
        };
        self.trail.rewind_to(frame.trail_checkpoint);
        Transition::Return(Returned {
            found: Found::Owned(frame.best.unwrap_or_default()),
            limiting: frame.limiting,
            timed_out,
        })
    }
}

/// Turn `found` into an owned sequence, copying from the trail if needed.
fn copy_out(found: Found, trail: &Trail, counts: &mut SearchCounts) -> Vec<Pick> {
    match found {
        Found::OnTrail(n) => {
            counts.copies += 1;
            trail.picks()[..n].to_vec()
        }
        Found::Owned(sequence) => sequence,
    }
}

/// Run one backtracking search from `start`.
pub fn search(index: &DayIndex, start: NaiveDate, step: Step, deadline: Deadline) -> StreakResult {
    BacktrackingSearch::new(index, step, deadline).search(start)
}
