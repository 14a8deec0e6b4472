// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::StderrStyles;
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::error::Error;
use testdoc_core::errors::{IngestError, JunitParseError, WriteReportError};
use thiserror::Error;

/// Documented exit codes for `testdoc` failures.
///
/// A testdoc invocation may fail for a variety of expected reasons. This
/// structure documents the exit codes produced for them.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestdocExitCode {}

impl TestdocExitCode {
    /// No errors occurred and testdoc exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a testdoc invocation.
    pub const SETUP_ERROR: i32 = 96;

    /// Ingesting the record stream or a JUnit results file failed.
    pub const INGEST_FAILED: i32 = 102;

    /// Writing the report to stdout or a file produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}

// Note that the #[error()] strings are mostly placeholder messages -- the
// expected way to print out errors is with the display_to_stderr method,
// which colorizes errors.

/// An error expected to occur during a testdoc invocation.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config file read error")]
    ConfigReadError {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("config file parse error")]
    ConfigParseError {
        path: Utf8PathBuf,
        #[source]
        error: serde_json::Error,
    },
    #[error("failed to create assets directory")]
    AssetsDirCreateError {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("record ingestion failed")]
    IngestError {
        #[from]
        error: IngestError,
    },
    #[error("JUnit parse error")]
    JunitParseError {
        #[from]
        error: JunitParseError,
    },
    #[error("write report error")]
    WriteReportError {
        #[from]
        error: WriteReportError,
    },
}

impl ExpectedError {
    pub(crate) fn config_read_error(path: impl Into<Utf8PathBuf>, error: std::io::Error) -> Self {
        Self::ConfigReadError {
            path: path.into(),
            error,
        }
    }

    pub(crate) fn config_parse_error(
        path: impl Into<Utf8PathBuf>,
        error: serde_json::Error,
    ) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            error,
        }
    }

    pub(crate) fn assets_dir_create_error(
        path: impl Into<Utf8PathBuf>,
        error: std::io::Error,
    ) -> Self {
        Self::AssetsDirCreateError {
            path: path.into(),
            error,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigReadError { .. }
            | Self::ConfigParseError { .. }
            | Self::AssetsDirCreateError { .. } => TestdocExitCode::SETUP_ERROR,
            Self::IngestError { .. } | Self::JunitParseError { .. } => {
                TestdocExitCode::INGEST_FAILED
            }
            Self::WriteReportError { .. } => TestdocExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::ConfigReadError { path, error } => {
                tracing::error!("failed to read config file `{}`", path.style(styles.bold));
                Some(error as &dyn Error)
            }
            Self::ConfigParseError { path, error } => {
                tracing::error!("failed to parse config file `{}`", path.style(styles.bold));
                Some(error as &dyn Error)
            }
            Self::AssetsDirCreateError { path, error } => {
                tracing::error!(
                    "failed to create assets directory `{}`",
                    path.style(styles.bold)
                );
                Some(error as &dyn Error)
            }
            Self::IngestError { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::JunitParseError { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::WriteReportError { error } => {
                tracing::error!("{error}");
                error.source()
            }
        };

        while let Some(error) = next_error {
            tracing::error!(target: "testdoc_cli::no_heading", "\nCaused by:\n  {}", error);
            next_error = error.source();
        }
    }
}
