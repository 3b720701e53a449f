// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search dated event logs for distinct-participant streaks.
//!
//! A streak is a run of consecutive days, starting on a given date and
//! walking forward or backward in time, on each of which one participant is
//! picked from those active that day, with no participant picked twice. The
//! crate finds, for each start date, the longest such streak, and reports
//! each maximal streak once.
//!
//! # Architecture
//!
//! ## Tier 1: Index (Immutable)
//!
//! Built once from the event log, then shared by reference:
//! - [`index::DayIndex`] maps each date to the participants present, with
//!   participant names interned to dense ids
//! - Participant sets are canonical bitsets ([`model::ParticipantSet`])
//!
//! ## Tier 2: Search State (Mutable, per search)
//!
//! - [`trail::Trail`] records the picks of the current path and rewinds to
//!   checkpoints on backtrack
//! - The engine's explicit frame stack replaces recursion
//!
//! # Search Formulations
//!
//! 1. **Backtracking** ([`engine`]): depth-first branch-and-bound with
//!    limiting-set pruning and an optional deadline
//! 2. **Forward set enumeration** ([`enumerate`]): grows every distinct set
//!    of used participants one day at a time, for one start date or (sliding)
//!    for all start dates of a range in a single pass
//!
//! Both yield the same lengths. The [`scan`] driver runs either over a date
//! range, and [`report`] suppresses streaks that end on a day already claimed
//! by a longer one.

pub mod engine;
pub mod enumerate;
pub mod error;
pub mod index;
pub mod model;
pub mod render;
pub mod report;
pub mod scan;
pub mod state;
pub mod trail;

// Re-export commonly used types
pub use engine::{BacktrackingSearch, Deadline, StreakResult};
pub use enumerate::{ForwardEnumerator, SetStreak, SlidingEnumerator};
pub use error::{Result, StreakError};
pub use index::{DateRange, DayIndex, EventLog, Expedition, PartitionMode, Step};
pub use report::{StreakReport, Termination};
pub use scan::{Algorithm, ScanConfig, ScanOutcome, Scanner};
pub use trail::Trail;
