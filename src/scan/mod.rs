// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Scanning a date range for reportable streaks.
//!
//! The scanner is the outer loop: for every partition it walks the start
//! dates of the range in the step direction, runs the chosen search
//! formulation from each start date that has records, and passes each result
//! through a per-partition [`Suppressor`].
//!
//! Searches from different start dates share nothing but the read-only
//! index, so the loop could be parallelised; it is kept sequential to make
//! suppression order (longest streak first) deterministic.

use crate::engine::{BacktrackingSearch, Deadline};
use crate::enumerate::{
    ForwardEnumerator, SetStreak, SlidingEnumerator, DEFAULT_EXPLOSION_THRESHOLD,
};
use crate::error::Result;
use crate::index::{partition, DateRange, DayIndex, EventLog, Partition, PartitionMode, Step};
use crate::report::{StreakReport, Suppressor, Termination, Verdict};
use crate::state::{Counters, Statistics};
use chrono::NaiveDate;
use log::{debug, info};

/// Which search formulation the scanner runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Algorithm {
    /// Branch-and-bound path search, one start date at a time.
    #[default]
    Backtrack,
    /// Forward set enumeration, one start date at a time.
    Enumerate,
    /// Forward set enumeration of all start dates in a single pass.
    Sliding,
}

/// Everything that controls one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Start dates to try; None means each partition's full date span.
    pub range: Option<DateRange>,
    pub step: Step,
    /// Per-search deadline (backtracking only).
    pub deadline: Deadline,
    pub min_length: usize,
    pub partition_mode: PartitionMode,
    pub algorithm: Algorithm,
    /// Live-set count that triggers a warning (set enumeration only).
    pub explosion_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            range: None,
            step: Step::Forward,
            deadline: Deadline::Unbounded,
            min_length: 0,
            partition_mode: PartitionMode::All,
            algorithm: Algorithm::Backtrack,
            explosion_threshold: DEFAULT_EXPLOSION_THRESHOLD,
        }
    }
}

/// The reports of a scan, in emission order, and its counters.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub reports: Vec<StreakReport>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Partition `log` as configured and scan every partition.
    pub fn run(&self, log: &EventLog) -> Result<ScanOutcome> {
        let partitions = partition(log, &self.config.partition_mode)?;
        let mut outcome = ScanOutcome::default();
        for partition in &partitions {
            let reports = self.scan_partition(partition, &mut outcome.statistics);
            outcome.reports.extend(reports);
        }
        info!(
            "Scanned {} partition(s): {} streak(s) reported; {}",
            partitions.len(),
            outcome.reports.len(),
            outcome.statistics
        );
        Ok(outcome)
    }

    /// Scan one partition with its own suppression state.
    pub fn scan_partition(
        &self,
        partition: &Partition,
        statistics: &mut Statistics,
    ) -> Vec<StreakReport> {
        let index = &partition.index;
        let label = partition.label.as_deref();
        let Some(range) = self.config.range.or_else(|| DateRange::covering(index)) else {
            return Vec::new();
        };
        debug!(
            "Scanning {} from {} to {}",
            label.unwrap_or("all graticules"),
            range.first,
            range.last
        );

        let mut scan = PartitionScan {
            index,
            label,
            step: self.config.step,
            suppressor: Suppressor::new(self.config.min_length),
            statistics,
            reports: Vec::new(),
        };

        match self.config.algorithm {
            Algorithm::Backtrack => {
                let mut engine =
                    BacktrackingSearch::new(index, self.config.step, self.config.deadline);
                for start in starts(index, range, self.config.step) {
                    let result = engine.search(start);
                    scan.statistics.increment(Counters::Searches);
                    scan.statistics.record_search(engine.counts());
                    if result.timed_out {
                        scan.statistics.increment(Counters::TimedOut);
                    }
                    let end = result.end_date(start, self.config.step);
                    let termination =
                        Termination::classify(index, end, self.config.step, result.timed_out);
                    scan.offer(StreakReport::new(
                        index,
                        label,
                        start,
                        self.config.step,
                        &result.sequence,
                        &result.limiting,
                        termination,
                    ));
                }
            }
            Algorithm::Enumerate => {
                let enumerator = ForwardEnumerator::new(index, self.config.step)
                    .with_explosion_threshold(self.config.explosion_threshold);
                for start in starts(index, range, self.config.step) {
                    let streak = enumerator.enumerate(start);
                    scan.offer_set_streak(&streak);
                }
            }
            Algorithm::Sliding => {
                let streaks = SlidingEnumerator::new(index, self.config.step)
                    .with_explosion_threshold(self.config.explosion_threshold)
                    .scan(range);
                for streak in &streaks {
                    scan.offer_set_streak(streak);
                }
            }
        }
        debug!(
            "{}: {} end date(s) claimed",
            label.unwrap_or("all graticules"),
            scan.suppressor.seen().len()
        );
        scan.reports
    }
}

/// Start dates of `range` that have records, in `step` order.
fn starts(index: &DayIndex, range: DateRange, step: Step) -> impl Iterator<Item = NaiveDate> + '_ {
    range
        .walk(step)
        .filter(move |date| !index.record(*date).is_empty())
}

/// Suppression state and output for one partition.
struct PartitionScan<'a> {
    index: &'a DayIndex,
    label: Option<&'a str>,
    step: Step,
    suppressor: Suppressor,
    statistics: &'a mut Statistics,
    reports: Vec<StreakReport>,
}

impl PartitionScan<'_> {
    fn offer(&mut self, report: StreakReport) {
        match self.suppressor.consider(report.length(), report.end) {
            Verdict::Report => {
                debug!("{}: {} day(s), {}", report.start, report.length(), report.termination);
                self.statistics.increment(Counters::Reported);
                self.reports.push(report);
            }
            Verdict::BelowMinimum => self.statistics.increment(Counters::BelowMinimum),
            Verdict::Suppressed => self.statistics.increment(Counters::Suppressed),
        }
    }

    fn offer_set_streak(&mut self, streak: &SetStreak) {
        self.statistics.increment(Counters::Searches);
        if streak.exploded {
            self.statistics.increment(Counters::ExplosionWarnings);
        }
        let end = streak.end_date(self.step);
        // Nobody on the end day could join any surviving set, so all of them
        // are limiting.
        let limiting = self.index.record_at(end).participants().clone();
        let report = StreakReport::new(
            self.index,
            self.label,
            streak.start,
            self.step,
            &streak.example,
            &limiting,
            Termination::classify(self.index, end, self.step, false),
        )
        .with_alternatives(streak.tied_sets);
        self.offer(report);
    }
}
