// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable day index: the read-only tier of the search.
//!
//! A [`DayIndex`] maps each date to a [`DayRecord`] (participant → activity).
//! It is built once, before any search, and never changes afterwards, so a
//! single index can be shared by any number of independent searches.
//!
//! Participants and activities are interned into small integer handles.
//! Participant ids follow the alphabetical order of their names, which
//! fixes the order in which the search engines try candidates.

pub mod records;

pub use records::{EventLog, Expedition};

use crate::error::{Result, StreakError};
use crate::model::{ActivityId, ParticipantId, ParticipantSet, Pick};
use chrono::{Days, NaiveDate};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

/// Direction in which streaks extend from their start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Forward,
    Backward,
}

impl Step {
    /// The date one step after `date`, or None past the end of the calendar.
    pub fn next(self, date: NaiveDate) -> Option<NaiveDate> {
        self.advance(date, 1)
    }

    /// The date `n` steps after `date`.
    pub fn advance(self, date: NaiveDate, n: u64) -> Option<NaiveDate> {
        match self {
            Step::Forward => date.checked_add_days(Days::new(n)),
            Step::Backward => date.checked_sub_days(Days::new(n)),
        }
    }
}

/// An inclusive range of dates, stored in ascending order whatever the
/// direction in which it is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        if first > last {
            return Err(StreakError::InvalidRange {
                from: first,
                to: last,
            });
        }
        Ok(Self { first, last })
    }

    /// The range from the first to the last recorded date of `index`.
    pub fn covering(index: &DayIndex) -> Option<Self> {
        Some(Self {
            first: index.first_date()?,
            last: index.last_date()?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Every date of the range, in the `step` direction.
    pub fn walk(self, step: Step) -> impl Iterator<Item = NaiveDate> {
        let origin = match step {
            Step::Forward => self.first,
            Step::Backward => self.last,
        };
        std::iter::successors(Some(origin), move |date| step.next(*date))
            .take_while(move |date| self.contains(*date))
    }
}

/// The participants present on one date, each with the activity that
/// brought them there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRecord {
    /// Sorted by participant id.
    entries: Vec<Pick>,
    present: ParticipantSet,
}

impl DayRecord {
    fn from_map(map: BTreeMap<ParticipantId, ActivityId>) -> Self {
        let entries: Vec<Pick> = map
            .into_iter()
            .map(|(participant, activity)| Pick::new(participant, activity))
            .collect();
        let present = entries.iter().map(|pick| pick.participant).collect();
        Self { entries, present }
    }

    /// Everyone present on this day.
    pub fn participants(&self) -> &ParticipantSet {
        &self.present
    }

    /// The activity for `participant`, if they were present.
    pub fn activity(&self, participant: ParticipantId) -> Option<ActivityId> {
        self.entries
            .binary_search_by_key(&participant, |pick| pick.participant)
            .ok()
            .map(|i| self.entries[i].activity)
    }

    /// All (participant, activity) pairs in ascending participant order.
    pub fn picks(&self) -> &[Pick] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Date-addressed, immutable collection of day records.
///
/// Dates without records behave exactly like an empty [`DayRecord`].
#[derive(Debug, Clone, Default)]
pub struct DayIndex {
    days: BTreeMap<NaiveDate, DayRecord>,
    participants: Vec<String>,
    activities: Vec<String>,
    empty: DayRecord,
}

impl DayIndex {
    /// Start building an index.
    pub fn builder() -> DayIndexBuilder {
        DayIndexBuilder::default()
    }

    /// Build an index from a collection of expeditions.
    pub fn from_expeditions<'a>(expeditions: impl IntoIterator<Item = &'a Expedition>) -> Self {
        let mut builder = Self::builder();
        for expedition in expeditions {
            builder.add_expedition(expedition);
        }
        builder.build()
    }

    /// The record for `date`; empty when nothing happened that day.
    pub fn record(&self, date: NaiveDate) -> &DayRecord {
        self.days.get(&date).unwrap_or(&self.empty)
    }

    /// Like [`record`](Self::record), treating a date past the end of the
    /// calendar as empty.
    pub fn record_at(&self, date: Option<NaiveDate>) -> &DayRecord {
        date.map_or(&self.empty, |date| self.record(date))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// True if `date` lies outside the recorded data in the `step`
    /// direction, i.e. nothing further can ever be found there.
    pub fn is_past_end(&self, date: NaiveDate, step: Step) -> bool {
        match step {
            Step::Forward => self.last_date().map_or(true, |last| date > last),
            Step::Backward => self.first_date().map_or(true, |first| date < first),
        }
    }

    /// Number of dates that have records.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant_name(&self, participant: ParticipantId) -> &str {
        &self.participants[participant.index()]
    }

    pub fn participant_id(&self, name: &str) -> Option<ParticipantId> {
        self.participants
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .map(|i| ParticipantId::new(i as u32))
    }

    pub fn activity_title(&self, activity: ActivityId) -> &str {
        &self.activities[activity.index()]
    }
}

/// Collects raw (date, participant, activity) entries and interns them.
#[derive(Debug, Default)]
pub struct DayIndexBuilder {
    entries: Vec<(NaiveDate, String, String)>,
}

impl DayIndexBuilder {
    /// Record that `participant` took part in `activity` on `date`.
    pub fn add(
        &mut self,
        date: NaiveDate,
        participant: impl Into<String>,
        activity: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .push((date, participant.into(), activity.into()));
        self
    }

    /// Record every participant of an expedition.
    pub fn add_expedition(&mut self, expedition: &Expedition) -> &mut Self {
        let title = expedition.title();
        for participant in &expedition.participants {
            self.add(expedition.date, participant.as_str(), title.as_str());
        }
        self
    }

    /// Intern names and freeze the index.
    ///
    /// A participant with several activities on one date keeps only the last
    /// one added.
    pub fn build(self) -> DayIndex {
        let participants: Vec<String> = self
            .entries
            .iter()
            .map(|(_, participant, _)| participant.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let participant_ids: HashMap<&str, ParticipantId> = participants
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), ParticipantId::new(i as u32)))
            .collect();

        let mut activities: Vec<String> = Vec::new();
        let mut activity_ids: HashMap<String, ActivityId> = HashMap::new();
        let mut days: BTreeMap<NaiveDate, BTreeMap<ParticipantId, ActivityId>> = BTreeMap::new();

        for (date, participant, activity) in &self.entries {
            let activity_id = *activity_ids.entry(activity.clone()).or_insert_with(|| {
                activities.push(activity.clone());
                ActivityId::new((activities.len() - 1) as u32)
            });
            let participant_id = participant_ids[participant.as_str()];
            let day = days.entry(*date).or_default();
            if let Some(previous) = day.insert(participant_id, activity_id) {
                if previous != activity_id {
                    debug!(
                        "{} has two activities on {}; keeping {:?} over {:?}",
                        participant, date, activity, activities[previous.index()]
                    );
                }
            }
        }

        DayIndex {
            days: days
                .into_iter()
                .map(|(date, map)| (date, DayRecord::from_map(map)))
                .collect(),
            participants,
            activities,
            empty: DayRecord::default(),
        }
    }
}

/// How records are grouped into independent indices (and scans).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartitionMode {
    /// One index over every record, whatever its graticule.
    #[default]
    All,
    /// One index per graticule; streaks never mix graticules.
    Same,
    /// A single index restricted to one graticule.
    Only(String),
}

impl FromStr for PartitionMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "all" => PartitionMode::All,
            "same" => PartitionMode::Same,
            label => PartitionMode::Only(label.to_string()),
        })
    }
}

/// One independently searched index; `label` is None for the unpartitioned
/// index.
#[derive(Debug, Clone)]
pub struct Partition {
    pub label: Option<String>,
    pub index: DayIndex,
}

/// Split an event log into the indices requested by `mode`.
pub fn partition(log: &EventLog, mode: &PartitionMode) -> Result<Vec<Partition>> {
    match mode {
        PartitionMode::All => Ok(vec![Partition {
            label: None,
            index: DayIndex::from_expeditions(log.expeditions()),
        }]),
        PartitionMode::Same => Ok(log
            .graticules()
            .into_iter()
            .map(|label| Partition {
                index: DayIndex::from_expeditions(log.in_graticule(&label)),
                label: Some(label),
            })
            .collect()),
        PartitionMode::Only(label) => {
            let index = DayIndex::from_expeditions(log.in_graticule(label));
            if index.is_empty() {
                return Err(StreakError::UnknownPartition(label.clone()));
            }
            Ok(vec![Partition {
                label: Some(label.clone()),
                index,
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn small_index() -> DayIndex {
        let mut builder = DayIndex::builder();
        builder
            .add(date("2025-01-01"), "Carol", "trip 1")
            .add(date("2025-01-02"), "Bob", "trip 2")
            .add(date("2025-01-02"), "Alice", "trip 2")
            .add(date("2025-01-04"), "Alice", "trip 3");
        builder.build()
    }

    #[test]
    fn test_participants_interned_alphabetically() {
        let index = small_index();
        assert_eq!(index.participant_count(), 3);
        assert_eq!(index.participant_name(ParticipantId::new(0)), "Alice");
        assert_eq!(index.participant_name(ParticipantId::new(1)), "Bob");
        assert_eq!(index.participant_name(ParticipantId::new(2)), "Carol");
        assert_eq!(index.participant_id("Bob"), Some(ParticipantId::new(1)));
        assert_eq!(index.participant_id("Dave"), None);
    }

    #[test]
    fn test_missing_date_is_empty_record() {
        let index = small_index();
        let record = index.record(date("2025-01-03"));
        assert!(record.is_empty());
        assert!(record.participants().is_empty());
        assert!(index.record_at(None).is_empty());
    }

    #[test]
    fn test_record_lookup() {
        let index = small_index();
        let record = index.record(date("2025-01-02"));
        assert_eq!(record.len(), 2);

        let alice = index.participant_id("Alice").unwrap();
        let activity = record.activity(alice).unwrap();
        assert_eq!(index.activity_title(activity), "trip 2");
        assert_eq!(record.activity(index.participant_id("Carol").unwrap()), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut builder = DayIndex::builder();
        builder
            .add(date("2025-01-01"), "A", "first")
            .add(date("2025-01-01"), "A", "second");
        let index = builder.build();

        let record = index.record(date("2025-01-01"));
        assert_eq!(record.len(), 1);
        let activity = record.activity(ParticipantId::new(0)).unwrap();
        assert_eq!(index.activity_title(activity), "second");
    }

    #[test]
    fn test_past_end() {
        let index = small_index();
        assert_eq!(index.first_date(), Some(date("2025-01-01")));
        assert_eq!(index.last_date(), Some(date("2025-01-04")));

        assert!(!index.is_past_end(date("2025-01-03"), Step::Forward));
        assert!(index.is_past_end(date("2025-01-05"), Step::Forward));
        assert!(!index.is_past_end(date("2025-01-05"), Step::Backward));
        assert!(index.is_past_end(date("2024-12-31"), Step::Backward));
        assert!(DayIndex::default().is_past_end(date("2025-01-01"), Step::Forward));
    }

    #[test]
    fn test_step() {
        assert_eq!(Step::Forward.next(date("2025-01-31")), Some(date("2025-02-01")));
        assert_eq!(Step::Backward.next(date("2025-03-01")), Some(date("2025-02-28")));
        assert_eq!(Step::Forward.advance(date("2025-01-01"), 3), Some(date("2025-01-04")));
        assert_eq!(Step::Forward.next(NaiveDate::MAX), None);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date("2025-01-30"), date("2025-02-02")).unwrap();
        let forward: Vec<NaiveDate> = range.walk(Step::Forward).collect();
        assert_eq!(forward.len(), 4);
        assert_eq!(forward[0], date("2025-01-30"));
        assert_eq!(forward[3], date("2025-02-02"));

        let backward: Vec<NaiveDate> = range.walk(Step::Backward).collect();
        assert_eq!(backward[0], date("2025-02-02"));
        assert_eq!(backward.len(), 4);

        assert!(matches!(
            DateRange::new(date("2025-02-02"), date("2025-01-30")),
            Err(StreakError::InvalidRange { .. })
        ));
        assert_eq!(
            DateRange::covering(&small_index()),
            Some(DateRange {
                first: date("2025-01-01"),
                last: date("2025-01-04")
            })
        );
        assert_eq!(DateRange::covering(&DayIndex::default()), None);
    }

    #[test]
    fn test_partition_mode_from_str() {
        assert_eq!("all".parse::<PartitionMode>().unwrap(), PartitionMode::All);
        assert_eq!("same".parse::<PartitionMode>().unwrap(), PartitionMode::Same);
        assert_eq!(
            "52 13".parse::<PartitionMode>().unwrap(),
            PartitionMode::Only("52 13".to_string())
        );
    }
}
