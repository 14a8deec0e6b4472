// Copyright (c) The testdoc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::ExpectedError;
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;

/// The run-configuration file supplied by the invoker.
///
/// The file is a JSON object of opaque strings. `githash` is recognized by
/// name; every other entry is passed through into the summary block
/// unchanged, in file order.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RunConfig {
    #[serde(default)]
    pub(crate) githash: Option<String>,

    #[serde(flatten)]
    pub(crate) metadata: IndexMap<String, String>,
}

impl RunConfig {
    /// Loads the configuration from a JSON file.
    pub(crate) fn from_file(path: &Utf8Path) -> Result<Self, ExpectedError> {
        let content = std::fs::read_to_string(path)
            .map_err(|error| ExpectedError::config_read_error(path, error))?;
        serde_json::from_str(&content)
            .map_err(|error| ExpectedError::config_parse_error(path, error))
    }
}
