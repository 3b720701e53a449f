// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Text output for reported streaks.

use crate::report::StreakReport;
use std::fmt::Write;

/// Render `reports` as a MediaWiki table, one row per streak.
pub fn wiki_table(reports: &[StreakReport]) -> String {
    let partitioned = reports.iter().any(|r| r.partition.is_some());
    let mut out = String::new();
    out.push_str("{| class=\"wikitable sortable\"\n");
    out.push_str("! ");
    if partitioned {
        out.push_str("Graticule !! ");
    }
    out.push_str("Start !! End !! Length !! Participants !! Stopped by\n");
    for report in reports {
        out.push_str("|-\n| ");
        if partitioned {
            out.push_str(report.partition.as_deref().unwrap_or(""));
            out.push_str(" || ");
        }
        let (first, last) = span_text(report);
        let participants = report
            .picks
            .iter()
            .map(|pick| format!("{} ([[{}]])", pick.participant, pick.activity))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{} || {} || {} || {} || {}",
            first,
            last,
            report.length(),
            participants,
            stopped_by(report)
        );
    }
    out.push_str("|}\n");
    out
}

/// Render `reports` one line each.
pub fn plain(reports: &[StreakReport]) -> String {
    let mut out = String::new();
    for report in reports {
        if let Some(partition) = &report.partition {
            let _ = write!(out, "[{}] ", partition);
        }
        let (first, last) = span_text(report);
        let _ = write!(out, "{}..{} {} day(s)", first, last, report.length());
        if let Some(alternatives) = report.alternatives {
            let _ = write!(out, " ({} set(s))", alternatives);
        }
        let names: Vec<&str> = report.picks.iter().map(|p| p.participant.as_str()).collect();
        let _ = writeln!(out, ": {}; {}", names.join(" "), stopped_by(report));
    }
    out
}

fn span_text(report: &StreakReport) -> (String, String) {
    match report.span() {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (report.start.to_string(), "-".to_string()),
    }
}

fn stopped_by(report: &StreakReport) -> String {
    if report.limiting.is_empty() || !report.termination.is_maximal() {
        report.termination.to_string()
    } else {
        format!("{} ({})", report.termination, report.limiting.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Step;
    use crate::report::{ReportedPick, Termination};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn report(partition: Option<&str>) -> StreakReport {
        let pick = |participant: &str, activity: &str| ReportedPick {
            participant: participant.to_string(),
            activity: activity.to_string(),
        };
        StreakReport {
            partition: partition.map(str::to_string),
            start: day(1),
            step: Step::Forward,
            end: Some(day(4)),
            picks: vec![
                pick("C", "2025-01-01 52 13"),
                pick("A", "2025-01-02 52 13"),
                pick("B", "2025-01-03 52 13"),
            ],
            limiting: vec!["C".to_string()],
            termination: Termination::ParticipantsExhausted,
            alternatives: None,
        }
    }

    #[test]
    fn test_plain() {
        let mut second = report(Some("52 13"));
        second.termination = Termination::EndOfData;
        second.alternatives = Some(2);
        assert_eq!(
            plain(&[report(None), second]),
            "2025-01-01..2025-01-03 3 day(s): C A B; participants exhausted (C)\n\
             [52 13] 2025-01-01..2025-01-03 3 day(s) (2 set(s)): C A B; ongoing\n"
        );
    }

    #[test]
    fn test_wiki_table() {
        let table = wiki_table(&[report(None)]);
        assert_eq!(
            table,
            "{| class=\"wikitable sortable\"\n\
             ! Start !! End !! Length !! Participants !! Stopped by\n\
             |-\n\
             | 2025-01-01 || 2025-01-03 || 3 || C ([[2025-01-01 52 13]]), \
             A ([[2025-01-02 52 13]]), B ([[2025-01-03 52 13]]) || \
             participants exhausted (C)\n\
             |}\n"
        );
    }

    #[test]
    fn test_wiki_table_with_partition_column() {
        let table = wiki_table(&[report(Some("52 13"))]);
        assert!(table.contains("! Graticule !! Start"));
        assert!(table.contains("| 52 13 || 2025-01-01 ||"));
    }

    #[test]
    fn test_empty_streak() {
        let mut empty = report(None);
        empty.picks.clear();
        empty.termination = Termination::TimedOut;
        assert_eq!(plain(&[empty]), "2025-01-01..- 0 day(s): ; timed out\n");
    }
}
