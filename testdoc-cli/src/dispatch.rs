// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    config::RunConfig,
    errors::ExpectedError,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::BufRead;
use testdoc_core::{
    ingest::read_records, junit::read_junit_file, output::write_report, render::render_report,
    stats::RunStats,
};

/// Render machine-produced test results as an AsciiDoc report.
///
/// Reads a JSON-line record stream from standard input, optionally merges
/// JUnit XML results files, and writes an AsciiDoc document to standard
/// output or a file.
#[derive(Debug, Parser)]
#[command(version, name = "testdoc", styles = clap_styles::style())]
pub struct TestdocApp {
    /// Identifying label for the report
    #[arg(long, value_name = "TITLE")]
    title: String,

    /// Destination directory for staged supplementary assets
    #[arg(long, value_name = "DIR")]
    assets_dir: Option<Utf8PathBuf>,

    /// Run-configuration file carrying build metadata such as `githash`
    #[arg(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// JUnit XML results file to merge after the record stream
    #[arg(long, value_name = "PATH")]
    junit: Vec<Utf8PathBuf>,

    /// Write the report to this file instead of standard output
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    #[command(flatten)]
    output_opts: OutputOpts,
}

impl TestdocApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output_opts.init()
    }

    /// Executes the invocation: ingest, merge, aggregate, render, write.
    pub fn exec(
        self,
        input: impl BufRead,
        output_writer: &mut OutputWriter,
    ) -> Result<(), ExpectedError> {
        let config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(assets_dir) = &self.assets_dir {
            let images_dir = assets_dir.join("images");
            std::fs::create_dir_all(&images_dir)
                .map_err(|error| ExpectedError::assets_dir_create_error(images_dir.clone(), error))?;
        }

        let mut run = read_records(input)?;
        for path in &self.junit {
            read_junit_file(path, &mut run)?;
        }
        run.githash = config.githash;
        run.metadata = config.metadata;
        tracing::debug!(
            "ingested {} suites from the record stream and {} JUnit files",
            run.suites.len(),
            self.junit.len()
        );

        let stats = RunStats::from_run(&run);
        let document = render_report(&self.title, &run, &stats);

        let sink = output_writer.report_sink(self.output.as_deref());
        write_report(sink, &document)?;
        Ok(())
    }
}
