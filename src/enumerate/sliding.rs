// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sliding multi-start enumeration.
//!
//! Walks a date range once, keeping one live group of sets per start date
//! at the same time. Every day, each live group tries to grow; groups that
//! cannot are reported, and a new group is seeded from the day's records.
//! Groups still alive when the range ends keep growing (without new seeds)
//! until they stop, so every result matches a single-start
//! [`ForwardEnumerator`](super::ForwardEnumerator) run from the same date.

use super::{LiveStreak, SetStreak, DEFAULT_EXPLOSION_THRESHOLD};
use crate::index::{DateRange, DayIndex, Step};
use log::debug;

#[derive(Debug, Clone, Copy)]
pub struct SlidingEnumerator<'a> {
    index: &'a DayIndex,
    step: Step,
    explosion_threshold: usize,
}

impl<'a> SlidingEnumerator<'a> {
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

    /// Enumerate every start date in `range` that has records.
    ///
    /// Results come out in the order the streaks stop; streaks stopping on
    /// the same day come out in start order.
    pub fn scan(&self, range: DateRange) -> Vec<SetStreak> {
        let origin = match self.step {
            Step::Forward => range.first,
            Step::Backward => range.last,
        };

        let mut live: Vec<LiveStreak> = Vec::new();
        let mut finished: Vec<SetStreak> = Vec::new();
        let mut day = Some(origin);

        loop {
            let seeding = day.filter(|day| range.contains(*day));
            if seeding.is_none() && live.is_empty() {
                break;
            }

            let record = self.index.record_at(day);
            let mut still_live = Vec::with_capacity(live.len() + 1);
            for mut streak in live.drain(..) {
                if streak.advance(record, self.explosion_threshold) {
                    still_live.push(streak);
                } else {
                    let streak = streak.finish();
                    debug!("streak from {} stopped at length {}", streak.start, streak.length);
                    finished.push(streak);
                }
            }

            if let Some(start) = seeding {
                if !record.is_empty() {
                    still_live.push(LiveStreak::seed(start, record));
                }
            }
            live = still_live;
            day = day.and_then(|day| self.step.next(day));
        }

        finished
    }
}
