// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The outcome of one backtracking search.

use crate::index::Step;
use crate::model::{ParticipantSet, Pick};
use chrono::NaiveDate;

/// The longest streak found, and why it could not be extended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakResult {
    /// One pick per day, starting at the search's start date. No participant
    /// appears twice.
    pub sequence: Vec<Pick>,
    /// Participants whose prior use blocked a longer streak.
    pub limiting: ParticipantSet,
    /// The deadline expired; `sequence` is only a lower bound.
    pub timed_out: bool,
}

impl StreakResult {
    /// Number of days covered.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The first day after the streak (in the `step` direction), which is the
    /// day that stopped it.
    pub fn end_date(&self, start: NaiveDate, step: Step) -> Option<NaiveDate> {
        step.advance(start, self.sequence.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityId, ParticipantId};

    #[test]
    fn test_end_date() {
        let start: NaiveDate = "2025-01-05".parse().unwrap();
        let pick = Pick::new(ParticipantId::new(0), ActivityId::new(0));
        let result = StreakResult {
            sequence: vec![pick; 3],
            ..Default::default()
        };

        assert_eq!(result.len(), 3);
        assert_eq!(result.end_date(start, Step::Forward), "2025-01-08".parse().ok());
        assert_eq!(result.end_date(start, Step::Backward), "2025-01-02".parse().ok());
        assert_eq!(StreakResult::default().end_date(start, Step::Forward), Some(start));
    }
}
