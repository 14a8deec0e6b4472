// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AsciiDoc rendering of an aggregated test run.
//!
//! The renderer walks suites and cases in first-seen order and builds the
//! whole document in memory; nothing reaches the output sink until rendering
//! has succeeded. All free text goes through [`escape`] so a test-supplied
//! string can never corrupt the surrounding table structure.

use crate::{
    report::{Outcome, Suite, TestRun},
    stats::{RunStats, SuiteStats},
};
use chrono::{DateTime, FixedOffset};
use std::time::Duration;
use swrite::{SWrite, swriteln};

/// Placeholder for values the input sources did not record.
static NOT_KNOWN: &str = "[.deemphasize]#not known#";
/// Placeholder for an empty table cell.
static EMPTY_CELL: &str = "[.deemphasize]#-#";

/// Renders `run` as a complete AsciiDoc document.
///
/// `title` identifies the report; it is supplied by the caller, not derived
/// from the data. `stats` must be the aggregate of `run` (see
/// [`RunStats::from_run`]).
pub fn render_report(title: &str, run: &TestRun, stats: &RunStats) -> String {
    let mut builder = DocBuilder::new();
    swriteln!(builder.out, "= {}", escape(title));
    swriteln!(builder.out);
    swriteln!(builder.out, "== Summary");
    builder.push_summary(run, stats);
    for suite in run.suites.values() {
        builder.push_suite(suite);
    }
    builder.out
}

struct DocBuilder {
    out: String,
}

impl DocBuilder {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn push_summary(&mut self, run: &TestRun, stats: &RunStats) {
        swriteln!(self.out);
        swriteln!(self.out, "[cols=\"1,3\"]");
        swriteln!(self.out, "|===");
        self.push_row(&["*hostname*", &opt_cell(run.hostname.as_deref())]);
        self.push_row(&["*started*", &timestamp_cell(run.started)]);
        self.push_row(&["*finished*", &timestamp_cell(run.finished)]);
        self.push_row(&["*githash*", &opt_cell(run.githash.as_deref())]);
        for (key, value) in &run.metadata {
            let label = format!("*{}*", escape(key));
            self.push_row(&[&label, &escape(value)]);
        }
        self.push_counter_rows(
            stats.test_count(),
            stats.passed,
            stats.failed,
            stats.errored,
            stats.skipped,
            stats.total_duration,
        );
        swriteln!(self.out);
        swriteln!(self.out, "|===");
    }

    fn push_suite(&mut self, suite: &Suite) {
        let stats = SuiteStats::from_suite(suite);

        swriteln!(self.out);
        swriteln!(self.out, "== {}", escape(&suite.name));
        swriteln!(self.out);
        swriteln!(self.out, "[cols=\"1,3\"]");
        swriteln!(self.out, "|===");
        self.push_counter_rows(
            stats.test_count(),
            stats.passed,
            stats.failed,
            stats.errored,
            stats.skipped,
            stats.total_duration,
        );
        swriteln!(self.out);
        swriteln!(self.out, "|===");

        swriteln!(self.out);
        swriteln!(self.out, "[%header,cols=\"4,1,1,4\"]");
        swriteln!(self.out, "|===");
        swriteln!(self.out, "|case|result|duration (s)|message");
        for case in suite.cases.values() {
            let message = match &case.message {
                Some(message) => escape(message),
                None => EMPTY_CELL.to_owned(),
            };
            self.push_row(&[
                &escape(&case.name),
                outcome_marker(case.outcome),
                &format_seconds(case.duration),
                &message,
            ]);
        }
        swriteln!(self.out);
        swriteln!(self.out, "|===");
    }

    fn push_counter_rows(
        &mut self,
        tests: usize,
        passed: usize,
        failed: usize,
        errored: usize,
        skipped: usize,
        duration: Duration,
    ) {
        self.push_row(&["*test cases*", &tests.to_string()]);
        self.push_row(&["*passed*", &passed.to_string()]);
        self.push_row(&["*failed*", &failed.to_string()]);
        self.push_row(&["*errored*", &errored.to_string()]);
        self.push_row(&["*skipped*", &skipped.to_string()]);
        self.push_row(&["*duration (s)*", &format_seconds(duration)]);
    }

    /// Emits one table row, each cell on its own line after a `|` delimiter
    /// line.
    fn push_row(&mut self, cells: &[&str]) {
        swriteln!(self.out);
        for cell in cells {
            swriteln!(self.out, "|");
            swriteln!(self.out, "{cell}");
        }
    }
}

/// Returns the fixed inline role marker for `outcome`.
///
/// The enumeration is closed: a new outcome kind must be given a marker here
/// before it can be rendered.
pub fn outcome_marker(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "[.test-success]#passed#",
        Outcome::Failed => "[.test-failure]#failed#",
        Outcome::Errored => "[.test-error]#errored#",
        Outcome::Skipped => "[.deemphasize]#skipped#",
    }
}

/// Escapes AsciiDoc table-cell delimiters and inline formatting markers.
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '|' | '*' | '_' | '`' | '#' | '~' | '^') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn opt_cell(value: Option<&str>) -> String {
    match value {
        Some(value) => escape(value),
        None => NOT_KNOWN.to_owned(),
    }
}

fn timestamp_cell(timestamp: Option<DateTime<FixedOffset>>) -> String {
    match timestamp {
        Some(timestamp) => timestamp.format("%+").to_string(),
        None => NOT_KNOWN.to_owned(),
    }
}

// Seconds with 3 decimal points, matching JUnit time serialization.
fn format_seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Case, CaseSource};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn render(run: &TestRun) -> String {
        let stats = RunStats::from_run(run);
        render_report("Nightly", run, &stats)
    }

    #[test]
    fn document_structure() {
        let mut run = TestRun::new();
        run.hostname = Some("h1".to_owned());
        run.set_githash("deadbeef");
        let mut case = Case::new("ping6", Outcome::Failed, CaseSource::Primary);
        case.set_duration(Duration::from_millis(1200))
            .set_message("timeout");
        run.suite_mut("sequence")
            .add_case(Case::new("ping", Outcome::Passed, CaseSource::Primary))
            .add_case(case);

        let doc = render(&run);
        assert!(doc.starts_with("= Nightly\n"));
        assert!(doc.contains("== Summary"));
        assert!(doc.contains("== sequence"));
        assert!(doc.contains("|case|result|duration (s)|message"));
        assert!(doc.contains("[.test-success]#passed#"));
        assert!(doc.contains("[.test-failure]#failed#"));
        assert!(doc.contains("deadbeef"));
        assert!(doc.contains("timeout"));
        assert!(doc.contains("1.200"));
    }

    #[test]
    fn absent_values_render_as_not_known() {
        let run = TestRun::new();
        let doc = render(&run);
        // hostname, started, finished, githash.
        let placeholders = doc.matches("[.deemphasize]#not known#").count();
        assert_eq!(placeholders, 4);
    }

    #[test]
    fn metadata_rows_are_passed_through() {
        let mut run = TestRun::new();
        run.add_metadata("branch", "main")
            .add_metadata("builder", "ci-7");
        let doc = render(&run);
        let branch = doc.find("*branch*").unwrap();
        let builder = doc.find("*builder*").unwrap();
        assert!(branch < builder);
        assert!(doc.contains("ci-7"));
    }

    #[test]
    fn missing_message_renders_as_empty_cell() {
        let mut run = TestRun::new();
        run.suite_mut("s")
            .add_case(Case::new("n", Outcome::Passed, CaseSource::Primary));
        let doc = render(&run);
        assert!(doc.contains("[.deemphasize]#-#"));
    }

    #[test]
    fn suites_render_in_first_seen_order() {
        let mut run = TestRun::new();
        run.suite_mut("zeta");
        run.suite_mut("alpha");
        let doc = render(&run);
        let zeta = doc.find("== zeta").unwrap();
        let alpha = doc.find("== alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn messages_cannot_corrupt_table_structure() {
        let mut run = TestRun::new();
        let mut case = Case::new("evil", Outcome::Failed, CaseSource::Primary);
        case.set_message("a|b *bold* _it_");
        run.suite_mut("s").add_case(case);

        let doc = render(&run);
        assert!(doc.contains(r"a\|b \*bold\* \_it\_"));
        // No unescaped pipe survives anywhere in the message.
        assert!(!doc.contains("a|b"));
    }

    #[test_case("a|b", "a\\|b"; "pipe")]
    #[test_case("*x*", "\\*x\\*"; "asterisk")]
    #[test_case("`code`", "\\`code\\`"; "backtick")]
    #[test_case("x#y^z~w", "x\\#y\\^z\\~w"; "role markers")]
    #[test_case("plain text", "plain text"; "no specials")]
    fn escape_cases(input: &str, expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn marker_per_outcome() {
        assert_eq!(outcome_marker(Outcome::Passed), "[.test-success]#passed#");
        assert_eq!(outcome_marker(Outcome::Failed), "[.test-failure]#failed#");
        assert_eq!(outcome_marker(Outcome::Errored), "[.test-error]#errored#");
        assert_eq!(outcome_marker(Outcome::Skipped), "[.deemphasize]#skipped#");
    }

    #[test]
    fn durations_render_with_three_decimals() {
        assert_eq!(format_seconds(Duration::from_millis(500)), "0.500");
        assert_eq!(format_seconds(Duration::ZERO), "0.000");
        assert_eq!(format_seconds(Duration::from_secs(2)), "2.000");
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        let started = DateTime::parse_from_rfc3339("2023-07-31T13:00:00Z").unwrap();
        assert_eq!(timestamp_cell(Some(started)), "2023-07-31T13:00:00+00:00");
    }
}
