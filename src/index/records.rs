// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Raw expedition records and the JSON event-log loader.
//!
//! Two layouts are accepted:
//!
//! ```text
//! [{"date": "2025-01-01", "graticule": "52 13", "title": "...", "participants": ["C"]}]
//! {"2025-01-01": {"52 13": ["C"]}}
//! ```
//!
//! The second is a date → graticule → participants map; its titles are
//! derived from date and graticule.

use crate::error::{Result, StreakError};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// One activity: a set of participants meeting at a graticule on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expedition {
    pub date: NaiveDate,
    pub graticule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub participants: Vec<String>,
}

impl Expedition {
    pub fn new(date: NaiveDate, graticule: impl Into<String>, participants: &[&str]) -> Self {
        Self {
            date,
            graticule: graticule.into(),
            title: None,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The activity identifier: the explicit title, or "date graticule".
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.date, self.graticule))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventLogFile {
    Records(Vec<Expedition>),
    Nested(BTreeMap<NaiveDate, BTreeMap<String, Vec<String>>>),
}

/// The whole event log, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    expeditions: Vec<Expedition>,
}

impl EventLog {
    pub fn new(expeditions: Vec<Expedition>) -> Self {
        Self { expeditions }
    }

    /// Parse an event log from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let expeditions = match serde_json::from_str::<EventLogFile>(text)? {
            EventLogFile::Records(expeditions) => expeditions,
            EventLogFile::Nested(days) => days
                .into_iter()
                .flat_map(|(date, graticules)| {
                    graticules
                        .into_iter()
                        .map(move |(graticule, participants)| Expedition {
                            date,
                            graticule,
                            title: None,
                            participants,
                        })
                })
                .collect(),
        };
        debug!("Loaded {} expeditions", expeditions.len());
        Ok(Self { expeditions })
    }

    /// Read and parse an event log file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StreakError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn expeditions(&self) -> &[Expedition] {
        &self.expeditions
    }

    /// Expeditions at one graticule.
    pub fn in_graticule<'a>(&'a self, graticule: &'a str) -> impl Iterator<Item = &'a Expedition> {
        self.expeditions
            .iter()
            .filter(move |expedition| expedition.graticule == graticule)
    }

    /// Every distinct graticule label, sorted.
    pub fn graticules(&self) -> BTreeSet<String> {
        self.expeditions
            .iter()
            .map(|expedition| expedition.graticule.clone())
            .collect()
    }

    /// Earliest and latest expedition dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.expeditions.iter().map(|e| e.date).min()?;
        let last = self.expeditions.iter().map(|e| e.date).max()?;
        Some((first, last))
    }

    pub fn len(&self) -> usize {
        self.expeditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expeditions.is_empty()
    }
}

/// Parse an ISO-8601 date such as `2025-01-31`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| StreakError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_records_layout() {
        let log = EventLog::from_json_str(
            r#"[
                {"date": "2025-01-01", "graticule": "52 13", "title": "Berlin", "participants": ["C"]},
                {"date": "2025-01-02", "graticule": "52 13", "participants": ["A", "B"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.expeditions()[0].title(), "Berlin");
        assert_eq!(log.expeditions()[1].title(), "2025-01-02 52 13");
        assert_eq!(log.expeditions()[1].participants, vec!["A", "B"]);
    }

    #[test]
    fn test_nested_layout() {
        let log = EventLog::from_json_str(
            r#"{
                "2025-01-02": {"52 13": ["A", "B"], "51 7": ["Z"]},
                "2025-01-01": {"52 13": ["C"]}
            }"#,
        )
        .unwrap();

        let date: NaiveDate = "2025-01-01".parse().unwrap();
        assert_eq!(log.expeditions()[0], Expedition::new(date, "52 13", &["C"]));
        assert_eq!(log.len(), 3);
        assert_eq!(
            log.graticules().into_iter().collect::<Vec<_>>(),
            vec!["51 7".to_string(), "52 13".to_string()]
        );
        assert_eq!(log.in_graticule("51 7").count(), 1);
        assert_eq!(
            log.date_span(),
            Some((date, "2025-01-02".parse().unwrap()))
        );
        assert_eq!(EventLog::default().date_span(), None);
    }

    #[test]
    fn test_malformed_log() {
        let err = EventLog::from_json_str(r#"{"not a date": 3}"#).unwrap_err();
        assert!(matches!(err, StreakError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, r#"{"2025-01-01": {"52 13": ["C"]}}"#).unwrap();

        let log = EventLog::load(&path).unwrap();
        assert_eq!(log.len(), 1);

        let missing = EventLog::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, StreakError::Io { .. }));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(matches!(
            parse_date("2025-02-30"),
            Err(StreakError::InvalidDate { .. })
        ));
    }
}
