// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion of the primary JSON-line record stream.
//!
//! The stream carries one JSON object per line. Three record types are
//! recognized:
//!
//! * `{"type": "start", "hostname": <string>, "started": <RFC 3339 string>}` -
//!   opens the run and carries host metadata
//! * `{"type": "result", "suite": <string>, "name": <string>, "outcome":
//!   "passed"|"failed"|"errored"|"skipped", "duration": <seconds>, "message":
//!   <string, optional>}` - one test outcome, appended to the named suite
//!   (creating it on first sight)
//! * `{"type": "end", "finished": <RFC 3339 string>}` - closes the run
//!
//! Records with any other `type` are skipped so that producers can add new
//! event kinds without breaking older consumers. Everything else is
//! fail-fast: a line that is not valid JSON, is missing required fields, or
//! carries an outcome outside the closed enumeration aborts ingestion with
//! the offending line number.

use crate::{
    errors::IngestError,
    report::{Case, CaseSource, Outcome, TestRun},
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use std::{io::BufRead, time::Duration};

const TYPE_START: &str = "start";
const TYPE_RESULT: &str = "result";
const TYPE_END: &str = "end";

#[derive(Clone, Debug, Deserialize)]
struct StartRecord {
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    started: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ResultRecord {
    suite: String,
    name: String,
    outcome: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct EndRecord {
    #[serde(default)]
    finished: Option<String>,
}

/// Reads the primary record stream into a new [`TestRun`].
///
/// Empty lines are skipped; every other line must be one JSON record. The
/// first malformed line aborts ingestion, nothing is skipped silently.
pub fn read_records(input: impl BufRead) -> Result<TestRun, IngestError> {
    let mut run = TestRun::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|error| IngestError::Io { error })?;
        if line.trim().is_empty() {
            continue;
        }
        ingest_line(&mut run, &line, index + 1)?;
    }
    Ok(run)
}

fn ingest_line(run: &mut TestRun, line: &str, line_number: usize) -> Result<(), IngestError> {
    let value: Value =
        serde_json::from_str(line).map_err(|error| IngestError::MalformedRecord {
            line: line_number,
            error,
        })?;
    let Some(record_type) = value.get("type").and_then(Value::as_str) else {
        return Err(IngestError::MissingRecordType { line: line_number });
    };

    match record_type {
        TYPE_START => {
            let record: StartRecord = from_record_value(value, line_number)?;
            run.hostname = record.hostname;
            run.started = parse_timestamp(record.started, line_number)?;
        }
        TYPE_RESULT => {
            let record: ResultRecord = from_record_value(value, line_number)?;
            let outcome =
                record
                    .outcome
                    .parse::<Outcome>()
                    .map_err(|error| IngestError::UnknownOutcome {
                        line: line_number,
                        error,
                    })?;
            let mut case = Case::new(record.name, outcome, CaseSource::Primary);
            case.set_duration(parse_duration(record.duration, line_number)?);
            if let Some(message) = record.message {
                case.set_message(message);
            }
            run.suite_mut(&record.suite).add_case(case);
        }
        TYPE_END => {
            let record: EndRecord = from_record_value(value, line_number)?;
            run.finished = parse_timestamp(record.finished, line_number)?;
        }
        other => {
            tracing::debug!("line {line_number}: ignoring unrecognized record type `{other}`");
        }
    }

    Ok(())
}

fn from_record_value<T: serde::de::DeserializeOwned>(
    value: Value,
    line: usize,
) -> Result<T, IngestError> {
    serde_json::from_value(value).map_err(|error| IngestError::MalformedRecord { line, error })
}

fn parse_timestamp(
    input: Option<String>,
    line: usize,
) -> Result<Option<DateTime<FixedOffset>>, IngestError> {
    match input {
        Some(input) => DateTime::parse_from_rfc3339(&input)
            .map(Some)
            .map_err(|error| IngestError::MalformedTimestamp { line, input, error }),
        None => Ok(None),
    }
}

fn parse_duration(input: Option<f64>, line: usize) -> Result<Duration, IngestError> {
    match input {
        Some(value) => Duration::try_from_secs_f64(value)
            .map_err(|_| IngestError::InvalidDuration { line, value }),
        None => Ok(Duration::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_a_full_run() {
        let stream = indoc! {r#"
            {"type":"start","hostname":"h1","started":"2023-07-31T13:00:00Z"}
            {"type":"result","suite":"sequence","name":"ping","outcome":"passed","duration":0.5}
            {"type":"result","suite":"sequence","name":"ping6","outcome":"failed","duration":1.2,"message":"timeout"}
            {"type":"end","finished":"2023-07-31T13:00:02Z"}
        "#};
        let run = read_records(stream.as_bytes()).unwrap();

        assert_eq!(run.hostname.as_deref(), Some("h1"));
        assert!(run.started.is_some());
        assert!(run.finished.is_some());
        assert_eq!(run.suites.len(), 1);

        let suite = &run.suites["sequence"];
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases["ping"].outcome, Outcome::Passed);
        assert_eq!(suite.cases["ping"].duration, Duration::from_millis(500));
        assert_eq!(suite.cases["ping6"].outcome, Outcome::Failed);
        assert_eq!(suite.cases["ping6"].message.as_deref(), Some("timeout"));
    }

    #[test]
    fn empty_lines_are_skipped() {
        let stream = "\n\n{\"type\":\"start\",\"hostname\":\"h1\"}\n\n";
        let run = read_records(stream.as_bytes()).unwrap();
        assert_eq!(run.hostname.as_deref(), Some("h1"));
    }

    #[test]
    fn malformed_line_reports_its_line_number() {
        let stream = indoc! {r#"
            {"type":"start","hostname":"h1"}
            not json
        "#};
        let err = read_records(stream.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn missing_type_field_is_rejected() {
        let err = read_records(r#"{"suite":"s","name":"n"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingRecordType { line: 1 }));
    }

    #[test]
    fn missing_required_result_fields_are_rejected() {
        let err = read_records(r#"{"type":"result","suite":"s"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn unknown_record_types_are_ignored() {
        let stream = indoc! {r#"
            {"type":"heartbeat","seq":3}
            {"type":"result","suite":"s","name":"n","outcome":"passed"}
        "#};
        let run = read_records(stream.as_bytes()).unwrap();
        assert_eq!(run.suites["s"].cases.len(), 1);
    }

    #[test]
    fn unknown_outcome_is_fatal() {
        let stream = r#"{"type":"result","suite":"s","name":"n","outcome":"maybe"}"#;
        let err = read_records(stream.as_bytes()).unwrap_err();
        match err {
            IngestError::UnknownOutcome { line, error } => {
                assert_eq!(line, 1);
                assert_eq!(error.value(), "maybe");
            }
            other => panic!("expected UnknownOutcome, got {other:?}"),
        }
    }

    #[test]
    fn missing_duration_is_zero() {
        let stream = r#"{"type":"result","suite":"s","name":"n","outcome":"passed"}"#;
        let run = read_records(stream.as_bytes()).unwrap();
        assert_eq!(run.suites["s"].cases["n"].duration, Duration::ZERO);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let stream = r#"{"type":"result","suite":"s","name":"n","outcome":"passed","duration":-1.0}"#;
        let err = read_records(stream.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidDuration { line: 1, .. }));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let stream = r#"{"type":"start","started":"yesterday"}"#;
        let err = read_records(stream.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MalformedTimestamp { line: 1, .. }
        ));
    }

    #[test]
    fn later_record_wins_the_merge() {
        let stream = indoc! {r#"
            {"type":"result","suite":"s","name":"n","outcome":"passed"}
            {"type":"result","suite":"s","name":"n","outcome":"failed","message":"flaked"}
        "#};
        let run = read_records(stream.as_bytes()).unwrap();
        let suite = &run.suites["s"];
        assert_eq!(suite.cases.len(), 1);
        assert_eq!(suite.cases["n"].outcome, Outcome::Failed);
        assert_eq!(suite.cases["n"].message.as_deref(), Some("flaked"));
    }
}
