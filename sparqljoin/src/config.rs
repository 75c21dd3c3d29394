/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::error::Result;

/// Knobs of the triple loader. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Substring marking a value as an entity reference, e.g. `wsdbm:User12`.
    pub entity_marker: String,
    /// Namespaces re-attached as `ns:` when full URIs are compacted.
    pub namespaces: Vec<String>,
    /// Token separator of a line.
    pub separator: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            entity_marker: "wsdbm:".to_string(),
            namespaces: vec!["wsdbm".to_string(), "foaf".to_string(), "rev".to_string()],
            separator: '\t',
        }
    }
}

impl LoaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config = LoaderConfig::from_json_str(r#"{ "separator": "," }"#).unwrap();
        assert_eq!(config.separator, ',');
        assert_eq!(config.entity_marker, "wsdbm:");
        assert_eq!(config.namespaces.len(), 3);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(LoaderConfig::from_json_str("{ not json").is_err());
    }
}
