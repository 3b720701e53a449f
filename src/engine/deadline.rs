// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cooperative deadlines.
//!
//! A deadline is never enforced by preemption: the engine polls it once each
//! time it enters a day, and unwinds with whatever it has found so far when
//! the poll says time is up. Time budgets are charged against the CPU time of
//! the process, so a search is not cut short while the machine is busy with
//! something else.

use cpu_time::ProcessTime;
use std::time::Duration;

/// When a search should give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deadline {
    /// Run to completion.
    #[default]
    Unbounded,
    /// Give up once the process has used this much CPU time since the search
    /// started.
    After(Duration),
    /// Give up after this many day entries. Unlike `After`, this is
    /// reproducible from run to run.
    Steps(u64),
}

impl Deadline {
    pub fn unbounded() -> Self {
        Deadline::Unbounded
    }

    pub fn after(limit: Duration) -> Self {
        Deadline::After(limit)
    }

    pub fn steps(limit: u64) -> Self {
        Deadline::Steps(limit)
    }

    /// Start the clock for one search.
    pub fn start(self) -> Countdown {
        Countdown {
            deadline: self,
            started: ProcessTime::now(),
            polls: 0,
        }
    }
}

/// A running deadline, owned by one search.
pub struct Countdown {
    deadline: Deadline,
    started: ProcessTime,
    polls: u64,
}

impl Countdown {
    /// Poll the deadline. Each call counts as one step.
    pub fn expired(&mut self) -> bool {
        self.polls += 1;
        match self.deadline {
            Deadline::Unbounded => false,
            Deadline::After(limit) => self.started.elapsed() > limit,
            Deadline::Steps(limit) => self.polls > limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_expires() {
        let mut countdown = Deadline::default().start();
        assert!((0..1000).all(|_| !countdown.expired()));
    }

    #[test]
    fn test_step_budget() {
        let mut countdown = Deadline::steps(2).start();
        assert!(!countdown.expired());
        assert!(!countdown.expired());
        assert!(countdown.expired());

        let mut none = Deadline::steps(0).start();
        assert!(none.expired());
    }

    #[test]
    fn test_elapsed_budget() {
        let mut generous = Deadline::after(Duration::from_secs(3600)).start();
        assert!(!generous.expired());
    }

    #[test]
    fn test_time_budget_is_spent_by_computation() {
        // Polling burns CPU, so a zero budget runs out without any sleeping.
        let mut zero = Deadline::after(Duration::ZERO).start();
        assert!((0..u64::MAX).any(|_| zero.expired()));
    }
}
