// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate statistics computed over a run's case lists.
//!
//! Counters are always recomputed from the cases rather than patched
//! incrementally, so a counter can never drift from the outcomes it
//! summarizes, no matter what order the input sources were merged in.

use crate::report::{Case, Outcome, Suite, TestRun};
use std::time::Duration;

/// Outcome counts and total duration for one suite.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SuiteStats {
    /// The number of cases that passed.
    pub passed: usize,
    /// The number of cases that failed.
    pub failed: usize,
    /// The number of cases that errored.
    pub errored: usize,
    /// The number of cases that were skipped.
    pub skipped: usize,
    /// The summed duration of all cases. Cases with no recorded duration
    /// contribute zero.
    pub total_duration: Duration,
}

impl SuiteStats {
    /// Computes stats for a suite.
    pub fn from_suite(suite: &Suite) -> Self {
        Self::from_cases(suite.cases.values())
    }

    /// Computes stats by folding over `cases`.
    pub fn from_cases<'a>(cases: impl IntoIterator<Item = &'a Case>) -> Self {
        let mut stats = Self::default();
        for case in cases {
            match case.outcome {
                Outcome::Passed => stats.passed += 1,
                Outcome::Failed => stats.failed += 1,
                Outcome::Errored => stats.errored += 1,
                Outcome::Skipped => stats.skipped += 1,
            }
            stats.total_duration += case.duration;
        }
        stats
    }

    /// The total number of cases counted.
    pub fn test_count(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }
}

/// Outcome counts and total duration summed over every suite in a run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of cases that passed, across all suites.
    pub passed: usize,
    /// The number of cases that failed, across all suites.
    pub failed: usize,
    /// The number of cases that errored, across all suites.
    pub errored: usize,
    /// The number of cases that were skipped, across all suites.
    pub skipped: usize,
    /// The summed duration of all cases, across all suites.
    pub total_duration: Duration,
}

impl RunStats {
    /// Computes run-level stats by summing per-suite stats.
    pub fn from_run(run: &TestRun) -> Self {
        let mut stats = Self::default();
        for suite in run.suites.values() {
            let suite_stats = SuiteStats::from_suite(suite);
            stats.passed += suite_stats.passed;
            stats.failed += suite_stats.failed;
            stats.errored += suite_stats.errored;
            stats.skipped += suite_stats.skipped;
            stats.total_duration += suite_stats.total_duration;
        }
        stats
    }

    /// The total number of cases counted.
    pub fn test_count(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaseSource;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn case(name: &str, outcome: Outcome, millis: u64) -> Case {
        let mut case = Case::new(name, outcome, CaseSource::Primary);
        case.set_duration(Duration::from_millis(millis));
        case
    }

    fn sample_run() -> TestRun {
        let mut run = TestRun::new();
        run.suite_mut("a")
            .add_case(case("p", Outcome::Passed, 500))
            .add_case(case("f", Outcome::Failed, 1200));
        run.suite_mut("b")
            .add_case(case("e", Outcome::Errored, 0))
            .add_case(case("s", Outcome::Skipped, 0))
            .add_case(case("p2", Outcome::Passed, 300));
        run
    }

    #[test_case(Outcome::Passed; "passed")]
    #[test_case(Outcome::Failed; "failed")]
    #[test_case(Outcome::Errored; "errored")]
    #[test_case(Outcome::Skipped; "skipped")]
    fn each_outcome_is_counted_once(outcome: Outcome) {
        let stats = SuiteStats::from_cases([case("n", outcome, 100)].iter());
        assert_eq!(stats.test_count(), 1);
        let expected = match outcome {
            Outcome::Passed => stats.passed,
            Outcome::Failed => stats.failed,
            Outcome::Errored => stats.errored,
            Outcome::Skipped => stats.skipped,
        };
        assert_eq!(expected, 1);
    }

    #[test]
    fn run_stats_sum_suite_stats() {
        let run = sample_run();
        let run_stats = RunStats::from_run(&run);

        assert_eq!(run_stats.passed, 2);
        assert_eq!(run_stats.failed, 1);
        assert_eq!(run_stats.errored, 1);
        assert_eq!(run_stats.skipped, 1);
        assert_eq!(run_stats.test_count(), 5);
        assert_eq!(run_stats.total_duration, Duration::from_millis(2000));

        // The run-level counters equal the sum of the per-suite counters,
        // which equal the sum of the per-case outcomes.
        let summed: usize = run
            .suites
            .values()
            .map(|suite| SuiteStats::from_suite(suite).test_count())
            .sum();
        assert_eq!(summed, run_stats.test_count());
        let case_count: usize = run.suites.values().map(|suite| suite.cases.len()).sum();
        assert_eq!(case_count, run_stats.test_count());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let run = sample_run();
        assert_eq!(RunStats::from_run(&run), RunStats::from_run(&run));
        let suite = &run.suites["a"];
        assert_eq!(SuiteStats::from_suite(suite), SuiteStats::from_suite(suite));
    }
}
