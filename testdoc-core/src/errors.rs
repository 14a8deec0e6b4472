// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testdoc.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Error returned while parsing an [`Outcome`](crate::report::Outcome) value
/// from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized outcome `{value}` (known values: {})",
    crate::report::Outcome::variants().join(", ")
)]
pub struct UnknownOutcomeError {
    value: String,
}

impl UnknownOutcomeError {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The offending outcome value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An error that occurred while ingesting the primary record stream.
///
/// Ingestion is fail-fast: the first bad line aborts the run. A corrupted
/// report is worse than no report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// A line was not a valid JSON record or was missing required fields.
    #[error("line {line}: malformed record")]
    MalformedRecord {
        /// The 1-based line number of the offending record.
        line: usize,
        /// The underlying JSON error.
        #[source]
        error: serde_json::Error,
    },

    /// A record carried no `type` field.
    #[error("line {line}: record is missing the `type` field")]
    MissingRecordType {
        /// The 1-based line number of the offending record.
        line: usize,
    },

    /// A timestamp field was not valid RFC 3339.
    #[error("line {line}: invalid timestamp `{input}`")]
    MalformedTimestamp {
        /// The 1-based line number of the offending record.
        line: usize,
        /// The input that failed to parse.
        input: String,
        /// The underlying parse error.
        #[source]
        error: chrono::ParseError,
    },

    /// A duration was negative or not a finite number of seconds.
    #[error("line {line}: invalid duration {value}")]
    InvalidDuration {
        /// The 1-based line number of the offending record.
        line: usize,
        /// The offending value.
        value: f64,
    },

    /// An outcome value outside the closed enumeration.
    #[error("line {line}: {error}")]
    UnknownOutcome {
        /// The 1-based line number of the offending record.
        line: usize,
        /// The underlying outcome parse error.
        error: UnknownOutcomeError,
    },

    /// Reading the input stream failed.
    #[error("error reading record stream")]
    Io {
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while parsing a secondary JUnit results file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JunitParseError {
    /// Reading the file failed.
    #[error("error reading JUnit file `{path}`")]
    Read {
        /// The file that failed to be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The file contained malformed XML.
    #[error("error parsing JUnit file `{path}`")]
    Xml {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The underlying XML error.
        #[source]
        error: quick_xml::Error,
    },

    /// An element's attribute list was malformed.
    #[error("error parsing attributes in JUnit file `{path}`")]
    Attr {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The underlying attribute error.
        #[source]
        error: quick_xml::events::attributes::AttrError,
    },

    /// A required attribute was missing.
    #[error("JUnit file `{path}`: `<{tag}>` element is missing the `{attr}` attribute")]
    MissingAttr {
        /// The file the element was found in.
        path: Utf8PathBuf,
        /// The element missing the attribute.
        tag: &'static str,
        /// The missing attribute.
        attr: &'static str,
    },

    /// A `time` attribute was not a valid non-negative number of seconds.
    #[error("JUnit file `{path}`: invalid time value `{value}`")]
    InvalidTime {
        /// The file the value was found in.
        path: Utf8PathBuf,
        /// The offending value.
        value: String,
    },
}

/// An error that occurred while writing the rendered report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// Writing the report to a file failed.
    #[error("error writing report to `{file}`")]
    Fs {
        /// The file being written to.
        file: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Writing the report to an output stream failed.
    #[error("error writing report to output stream")]
    Io {
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },
}
