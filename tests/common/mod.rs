// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::BTreeSet;
use streak_search::index::{DayIndex, EventLog, Expedition, Step};

pub const GRATICULE: &str = "52 13";

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// The date `offset` days after 2025-01-01.
pub fn nth_day(offset: usize) -> NaiveDate {
    day(1) + chrono::Days::new(offset as u64)
}

/// `{C},{A,B},{A,B},{C},{D,E},{D,E},{C}` on 2025-01-01 to 2025-01-07.
pub fn scenario_log() -> EventLog {
    let days: [&[&str]; 7] = [
        &["C"],
        &["A", "B"],
        &["A", "B"],
        &["C"],
        &["D", "E"],
        &["D", "E"],
        &["C"],
    ];
    EventLog::new(
        days.iter()
            .enumerate()
            .map(|(i, names)| Expedition::new(nth_day(i), GRATICULE, names))
            .collect(),
    )
}

pub fn scenario_index() -> DayIndex {
    DayIndex::from_expeditions(scenario_log().expeditions())
}

/// Participant name for a small numeric id.
pub fn name(id: u8) -> String {
    format!("p{}", id)
}

/// One expedition per non-empty day, starting 2025-01-01.
pub fn log_from_days(days: &[BTreeSet<u8>]) -> EventLog {
    EventLog::new(
        days.iter()
            .enumerate()
            .filter(|(_, present)| !present.is_empty())
            .map(|(i, present)| {
                let names: Vec<String> = present.iter().map(|id| name(*id)).collect();
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                Expedition::new(nth_day(i), GRATICULE, &names)
            })
            .collect(),
    )
}

pub fn index_from_days(days: &[BTreeSet<u8>]) -> DayIndex {
    DayIndex::from_expeditions(log_from_days(days).expeditions())
}

/// Longest streak from `days[start]` by exhaustive search. Days outside the
/// slice have no records.
pub fn brute_force(days: &[BTreeSet<u8>], start: usize, step: Step) -> usize {
    fn go(days: &[BTreeSet<u8>], at: Option<usize>, step: Step, used: &mut BTreeSet<u8>) -> usize {
        let Some(present) = at.and_then(|i| days.get(i)) else {
            return 0;
        };
        let next = at.and_then(|i| match step {
            Step::Forward => i.checked_add(1),
            Step::Backward => i.checked_sub(1),
        });
        let mut best = 0;
        for participant in present {
            if used.insert(*participant) {
                best = best.max(1 + go(days, next, step, used));
                used.remove(participant);
            }
        }
        best
    }
    go(days, Some(start), step, &mut BTreeSet::new())
}
