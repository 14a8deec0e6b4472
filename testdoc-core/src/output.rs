// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing the rendered document to its destination.

use crate::errors::WriteReportError;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use std::io::{self, Write};

/// Where the rendered report is written.
#[derive(Debug)]
pub enum ReportSink<'a> {
    /// Write to standard output.
    Stdout,
    /// Write to the file at this path.
    File(&'a Utf8Path),
    /// Write to an in-memory buffer. Used for test capture.
    Buffer(&'a mut Vec<u8>),
}

/// Writes `document` to `sink` verbatim.
///
/// File writes go through a temporary file and rename, so the document
/// appears complete at the target path or not at all.
pub fn write_report(sink: ReportSink<'_>, document: &str) -> Result<(), WriteReportError> {
    match sink {
        ReportSink::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(document.as_bytes())
                .and_then(|()| handle.flush())
                .map_err(|error| WriteReportError::Io { error })
        }
        ReportSink::File(path) => {
            let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
            file.write(|f| f.write_all(document.as_bytes()))
                .map_err(|error| match error {
                    atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => {
                        WriteReportError::Fs {
                            file: path.to_owned(),
                            error,
                        }
                    }
                })
        }
        ReportSink::Buffer(buf) => {
            buf.extend_from_slice(document.as_bytes());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_sink_writes_the_document() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("report.adoc");
        write_report(ReportSink::File(&path), "= Report\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "= Report\n");
    }

    #[test]
    fn file_sink_overwrites_existing_output() {
        let dir = camino_tempfile::tempdir().unwrap();
        let path = dir.path().join("report.adoc");
        std::fs::write(&path, "stale").unwrap();
        write_report(ReportSink::File(&path), "= Fresh\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "= Fresh\n");
    }

    #[test]
    fn buffer_sink_captures_the_document() {
        let mut buf = Vec::new();
        write_report(ReportSink::Buffer(&mut buf), "= Report\n").unwrap();
        assert_eq!(buf, b"= Report\n");
    }

    #[test]
    fn file_sink_failure_carries_the_path() {
        let err =
            write_report(ReportSink::File("/nonexistent/dir/report.adoc".into()), "x")
                .unwrap_err();
        match err {
            WriteReportError::Fs { file, .. } => {
                assert_eq!(file, "/nonexistent/dir/report.adoc");
            }
            other => panic!("expected Fs error, got {other:?}"),
        }
    }
}
