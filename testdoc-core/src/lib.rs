// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core engine for testdoc: ingest test-result records, aggregate them, and
//! render an AsciiDoc report.
//!
//! The pipeline is strictly sequential. [`ingest::read_records`] consumes the
//! primary JSON-line record stream into a [`report::TestRun`],
//! [`junit::read_junit_file`] merges secondary JUnit results into the same
//! run, [`stats::RunStats::from_run`] computes aggregate counters,
//! [`render::render_report`] produces the document text, and
//! [`output::write_report`] writes it to its sink. Each invocation constructs
//! its own run; there is no shared state.

#![warn(missing_docs)]

pub mod errors;
pub mod ingest;
pub mod junit;
pub mod output;
pub mod render;
pub mod report;
pub mod stats;
