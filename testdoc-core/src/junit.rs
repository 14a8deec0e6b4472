// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion of secondary JUnit-style XML results files.
//!
//! A JUnit file contributes cases to the same run as the primary stream:
//! suites are matched by name and cases merge last-write-wins, so a JUnit
//! record for a (suite, case) pair already seen on the stream replaces the
//! streamed record while keeping its position.
//!
//! Only the `testsuite`/`testcase` hierarchy and the `failure`/`error`/
//! `skipped` status children are interpreted. A `testcase` with no status
//! child passed. Properties, captured output and unknown elements are
//! skipped, mirroring the primary stream's forward-compatibility rule.

use crate::{
    errors::JunitParseError,
    report::{Case, CaseSource, Outcome, TestRun},
};
use camino::Utf8Path;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::time::Duration;

/// Reads a JUnit results file into `run`.
///
/// A file that does not exist or is empty contributes nothing; that is not an
/// error.
pub fn read_junit_file(path: &Utf8Path, run: &mut TestRun) -> Result<(), JunitParseError> {
    if !path.exists() {
        tracing::debug!("JUnit file `{path}` not found, contributing nothing");
        return Ok(());
    }
    let content = std::fs::read_to_string(path).map_err(|error| JunitParseError::Read {
        path: path.to_owned(),
        error,
    })?;
    parse_junit(path, &content, run)
}

/// Parses JUnit XML from `content` into `run`.
///
/// `path` is used for error context only.
pub fn parse_junit(
    path: &Utf8Path,
    content: &str,
    run: &mut TestRun,
) -> Result<(), JunitParseError> {
    if content.trim().is_empty() {
        return Ok(());
    }

    let mut reader = Reader::from_str(content);
    let mut parser = JunitParser {
        path,
        run,
        suite: None,
        case: None,
    };
    loop {
        match reader.read_event() {
            Err(error) => {
                return Err(JunitParseError::Xml {
                    path: path.to_owned(),
                    error,
                });
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(elem)) => parser.handle_start(&elem)?,
            Ok(Event::Empty(elem)) => {
                parser.handle_start(&elem)?;
                parser.handle_end(elem.name().as_ref());
            }
            Ok(Event::End(elem)) => parser.handle_end(elem.name().as_ref()),
            Ok(_) => {}
        }
    }
    Ok(())
}

struct JunitParser<'a> {
    path: &'a Utf8Path,
    run: &'a mut TestRun,
    /// The name of the open `testsuite` element, if any.
    suite: Option<String>,
    /// The open `testcase` element, if any.
    case: Option<PendingCase>,
}

struct PendingCase {
    name: String,
    duration: Duration,
    status: Option<(Outcome, Option<String>)>,
}

impl JunitParser<'_> {
    fn handle_start(&mut self, elem: &BytesStart<'_>) -> Result<(), JunitParseError> {
        match elem.name().as_ref() {
            b"testsuite" => {
                let name = self.required_attr(elem, "testsuite", "name")?;
                self.run.suite_mut(&name);
                self.suite = Some(name);
            }
            b"testcase" if self.suite.is_some() => {
                let name = self.required_attr(elem, "testcase", "name")?;
                let duration = match self.attr(elem, "time")? {
                    Some(value) => parse_time(self.path, &value)?,
                    None => Duration::ZERO,
                };
                self.case = Some(PendingCase {
                    name,
                    duration,
                    status: None,
                });
            }
            b"failure" => self.set_status(Outcome::Failed, elem)?,
            b"error" => self.set_status(Outcome::Errored, elem)?,
            b"skipped" => self.set_status(Outcome::Skipped, elem)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, tag: &[u8]) {
        match tag {
            b"testsuite" => self.suite = None,
            b"testcase" => {
                let (Some(suite), Some(pending)) = (self.suite.as_deref(), self.case.take())
                else {
                    return;
                };
                let (outcome, message) = pending.status.unwrap_or((Outcome::Passed, None));
                let mut case = Case::new(pending.name, outcome, CaseSource::Junit);
                case.set_duration(pending.duration);
                if let Some(message) = message {
                    case.set_message(message);
                }
                self.run.suite_mut(suite).add_case(case);
            }
            _ => {}
        }
    }

    fn set_status(
        &mut self,
        outcome: Outcome,
        elem: &BytesStart<'_>,
    ) -> Result<(), JunitParseError> {
        if self.case.is_none() {
            // A status element outside a testcase. Skip it.
            return Ok(());
        }
        let message = self.attr(elem, "message")?;
        if let Some(case) = self.case.as_mut()
            && case.status.is_none()
        {
            case.status = Some((outcome, message));
        }
        Ok(())
    }

    fn attr(
        &self,
        elem: &BytesStart<'_>,
        name: &str,
    ) -> Result<Option<String>, JunitParseError> {
        for attr in elem.attributes() {
            let attr = attr.map_err(|error| JunitParseError::Attr {
                path: self.path.to_owned(),
                error,
            })?;
            if attr.key.as_ref() == name.as_bytes() {
                let value = attr.unescape_value().map_err(|error| JunitParseError::Xml {
                    path: self.path.to_owned(),
                    error,
                })?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn required_attr(
        &self,
        elem: &BytesStart<'_>,
        tag: &'static str,
        name: &'static str,
    ) -> Result<String, JunitParseError> {
        self.attr(elem, name)?
            .ok_or_else(|| JunitParseError::MissingAttr {
                path: self.path.to_owned(),
                tag,
                attr: name,
            })
    }
}

fn parse_time(path: &Utf8Path, value: &str) -> Result<Duration, JunitParseError> {
    value
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| JunitParseError::InvalidTime {
            path: path.to_owned(),
            value: value.to_owned(),
        })
}
