// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The test-run record model: runs, suites and case outcomes.

use crate::errors::UnknownOutcomeError;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::{fmt, str::FromStr, time::Duration};

/// One complete test-execution session: the top-level container for suites.
///
/// A `TestRun` is constructed once per invocation, accumulates suite and case
/// data while the input sources are consumed, and is then aggregated and
/// rendered. It is not mutated after rendering starts.
#[derive(Clone, Debug, Default)]
pub struct TestRun {
    /// The host the run executed on, if the run-start event recorded one.
    pub hostname: Option<String>,

    /// The time at which the run began.
    pub started: Option<DateTime<FixedOffset>>,

    /// The time at which the run finished. `None` while in progress.
    pub finished: Option<DateTime<FixedOffset>>,

    /// The git hash of the build under test, passed through opaquely from the
    /// run configuration.
    pub githash: Option<String>,

    /// Other build metadata passed through from the run configuration, in
    /// configuration order.
    pub metadata: IndexMap<String, String>,

    /// The suites of this run, keyed by name, in first-seen order.
    pub suites: IndexMap<String, Suite>,
}

impl TestRun {
    /// Creates a new, empty test run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the git hash of the build under test.
    pub fn set_githash(&mut self, githash: impl Into<String>) -> &mut Self {
        self.githash = Some(githash.into());
        self
    }

    /// Adds an opaque metadata entry rendered in the summary block.
    pub fn add_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the suite with the given name, creating it if absent.
    ///
    /// Suites are kept in first-seen order regardless of which input source
    /// created them.
    pub fn suite_mut(&mut self, name: &str) -> &mut Suite {
        self.suites
            .entry(name.to_owned())
            .or_insert_with(|| Suite::new(name))
    }
}

/// A named grouping of test cases, owned by exactly one [`TestRun`].
#[derive(Clone, Debug)]
pub struct Suite {
    /// The name of this suite, unique within the run.
    pub name: String,

    /// The cases of this suite, keyed by name, in first-seen order.
    pub cases: IndexMap<String, Case>,
}

impl Suite {
    /// Creates a new, empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: IndexMap::new(),
        }
    }

    /// Adds a case, replacing any existing case with the same name.
    ///
    /// A replaced case keeps its original position, so case order is always
    /// first-seen order no matter which source contributed the record that
    /// won the merge.
    pub fn add_case(&mut self, case: Case) -> &mut Self {
        self.cases.insert(case.name.clone(), case);
        self
    }
}

/// One test outcome, owned by exactly one [`Suite`].
#[derive(Clone, Debug)]
pub struct Case {
    /// The name of this case, unique within its suite (the merge key).
    pub name: String,

    /// The outcome of this case.
    pub outcome: Outcome,

    /// The failure or error message, if the source recorded one.
    pub message: Option<String>,

    /// How long the case took. Zero if the source recorded no duration.
    pub duration: Duration,

    /// Which input source produced this record. Used for merge bookkeeping
    /// only; never rendered.
    pub source: CaseSource,
}

impl Case {
    /// Creates a new case with no message and a zero duration.
    pub fn new(name: impl Into<String>, outcome: Outcome, source: CaseSource) -> Self {
        Self {
            name: name.into(),
            outcome,
            message: None,
            duration: Duration::ZERO,
            source,
        }
    }

    /// Sets the message for this case.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the duration for this case.
    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration = duration;
        self
    }
}

/// The closed set of result states a case may have.
///
/// There is deliberately no catch-all variant: a value outside this set is
/// rejected at ingestion rather than silently mis-rendered.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Outcome {
    /// The test passed.
    Passed,
    /// The test ran to completion and reported a failure.
    Failed,
    /// The test hit an unexpected error before it could report a result.
    Errored,
    /// The test was not run.
    Skipped,
}

impl Outcome {
    /// Returns the canonical lowercase name for this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Errored => "errored",
            Outcome::Skipped => "skipped",
        }
    }

    /// Returns the recognized outcome strings.
    pub fn variants() -> [&'static str; 4] {
        ["passed", "failed", "errored", "skipped"]
    }
}

impl FromStr for Outcome {
    type Err = UnknownOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(Outcome::Passed),
            "failed" => Ok(Outcome::Failed),
            "errored" => Ok(Outcome::Errored),
            "skipped" => Ok(Outcome::Skipped),
            other => Err(UnknownOutcomeError::new(other)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input source produced a case record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaseSource {
    /// The primary JSON-line record stream.
    Primary,
    /// A secondary JUnit results file.
    Junit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_keeps_first_seen_position() {
        let mut suite = Suite::new("sequence");
        suite.add_case(Case::new("ping", Outcome::Failed, CaseSource::Primary));
        suite.add_case(Case::new("ping6", Outcome::Passed, CaseSource::Primary));
        // The replacement wins but stays in first place.
        suite.add_case(Case::new("ping", Outcome::Passed, CaseSource::Junit));

        assert_eq!(suite.cases.len(), 2);
        let (name, case) = suite.cases.get_index(0).unwrap();
        assert_eq!(name, "ping");
        assert_eq!(case.outcome, Outcome::Passed);
        assert_eq!(case.source, CaseSource::Junit);
    }

    #[test]
    fn suite_mut_creates_in_first_seen_order() {
        let mut run = TestRun::new();
        run.suite_mut("zeta");
        run.suite_mut("alpha");
        run.suite_mut("zeta");

        let names: Vec<_> = run.suites.keys().cloned().collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn outcome_round_trips_through_str() {
        for variant in Outcome::variants() {
            let outcome: Outcome = variant.parse().unwrap();
            assert_eq!(outcome.as_str(), variant);
        }
        let err = "maybe".parse::<Outcome>().unwrap_err();
        assert_eq!(err.value(), "maybe");
    }
}
