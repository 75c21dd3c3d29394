/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Turns line-oriented triple files into per-property tables.
//!
//! Each line holds `subject property object` separated by the configured
//! separator. Subjects must be plain numbers; objects are
//! classified as entity references, numbers or plain strings. Lines that
//! cannot be turned into an [`Item`] are logged and skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use shared::dictionary::Dictionary;
use shared::error::{Error, Result};
use shared::item::{DataType, Item};

use crate::config::LoaderConfig;
use crate::database::Database;
use crate::simple_table::SimpleTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triplet {
    pub subject: String,
    pub property: String,
    pub object: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: usize,
    pub loaded: usize,
    pub dropped: usize,
}

pub struct DataLoader {
    config: LoaderConfig,
}

impl Default for DataLoader {
    fn default() -> Self {
        DataLoader::new(LoaderConfig::default())
    }
}

impl DataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        DataLoader { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Database> {
        let path = path.as_ref();
        info!("Loading dataset {}", path.display());
        let file = File::open(path)?;
        self.load_reader(BufReader::new(file))
    }

    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<Database> {
        self.load_with_stats(reader).map(|(database, _)| database)
    }

    pub fn load_with_stats<R: BufRead>(&self, reader: R) -> Result<(Database, LoadStats)> {
        let mut stats = LoadStats::default();
        let mut property_dictionary = Dictionary::new();
        let mut object_dictionary = Dictionary::new();
        let mut items: HashMap<String, Vec<Item>> = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            stats.lines += 1;

            let line_no = idx + 1;
            let parsed = self
                .parse_line(line_no, line)
                .and_then(|triplet| {
                    let item = self.to_item(line_no, &triplet, &mut object_dictionary)?;
                    Ok((triplet, item))
                });
            match parsed {
                Ok((triplet, item)) => {
                    property_dictionary.put(&triplet.property);
                    items.entry(triplet.property).or_default().push(item);
                    stats.loaded += 1;
                }
                Err(err) => {
                    warn!("Dropping line: {}", err);
                    stats.dropped += 1;
                }
            }
        }

        info!(
            "Loaded {} of {} lines into {} property tables ({} dropped)",
            stats.loaded,
            stats.lines,
            items.len(),
            stats.dropped
        );
        debug!(
            "Dictionary sizes: {} properties, {} objects",
            property_dictionary.len(),
            object_dictionary.len()
        );

        let property_dictionary = Arc::new(property_dictionary);
        let object_dictionary = Arc::new(object_dictionary);
        let tables = items
            .into_iter()
            .map(|(name, items)| {
                let table = SimpleTable::with_items(
                    name.clone(),
                    items,
                    Arc::clone(&property_dictionary),
                    Arc::clone(&object_dictionary),
                );
                (name, table)
            })
            .collect();

        Ok((Database::new(tables, property_dictionary, object_dictionary), stats))
    }

    /// Splits a line into its three tokens, compacting full URIs to
    /// `ns:local` form.
    pub fn parse_line(&self, line_no: usize, line: &str) -> Result<Triplet> {
        let mut tokens: Vec<String> = line
            .split(self.config.separator)
            .map(|token| token.trim().to_string())
            .collect();
        if tokens.len() != 3 {
            return Err(Error::malformed(
                line_no,
                format!("expected 3 tokens, found {}", tokens.len()),
            ));
        }

        if tokens[0].starts_with("<http") {
            for token in tokens.iter_mut() {
                *token = self.compact_uri(token);
            }
        }

        let object = tokens[2]
            .split(' ')
            .next()
            .unwrap_or_default()
            .replace('"', "");
        let property = std::mem::take(&mut tokens[1]);
        let subject = std::mem::take(&mut tokens[0]);

        Ok(Triplet {
            subject,
            property,
            object,
        })
    }

    /// `<http://.../wsdbm/User0>` -> `wsdbm:User0`
    fn compact_uri(&self, token: &str) -> String {
        let last = token.rsplit('/').next().unwrap_or(token).replace('>', "");
        let mut local = match last.rsplit_once('#') {
            Some((_, fragment)) => fragment.to_string(),
            None => last,
        };
        for namespace in &self.config.namespaces {
            if token.contains(namespace.as_str()) {
                local = format!("{}:{}", namespace, local);
            }
        }
        local
    }

    pub fn classify(&self, value: &str) -> DataType {
        if value.contains(self.config.entity_marker.as_str()) {
            DataType::Object
        } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            DataType::Integer
        } else {
            DataType::String
        }
    }

    fn to_item(
        &self,
        line_no: usize,
        triplet: &Triplet,
        object_dictionary: &mut Dictionary,
    ) -> Result<Item> {
        // Subjects are compared across properties, so only plain numbers
        // are accepted; `wsdbm:User7` and `wsdbm:Product7` must not meet.
        let subject = match self.classify(&triplet.subject) {
            DataType::Integer => parse_number(line_no, &triplet.subject)?,
            DataType::Object | DataType::String => {
                return Err(Error::malformed(
                    line_no,
                    format!("subject {:?} is not numeric", triplet.subject),
                ))
            }
        };

        let kind = self.classify(&triplet.object);
        let object = match kind {
            DataType::String => object_dictionary.put(&triplet.object),
            DataType::Integer => parse_number(line_no, &triplet.object)?,
            DataType::Object => parse_entity(line_no, &triplet.object)?,
        };

        Ok(Item::new(subject, object, kind))
    }
}

fn parse_number(line_no: usize, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|err| Error::malformed(line_no, format!("{:?}: {}", value, err)))
}

// Only used for objects: the values of one property all reference the same
// kind of entity, so their numbers stay distinct once the prefix is gone.
fn parse_entity(line_no: usize, value: &str) -> Result<u32> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(Error::malformed(
            line_no,
            format!("entity {:?} carries no number", value),
        ));
    }
    parse_number(line_no, &digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_values() {
        let loader = DataLoader::default();
        assert_eq!(loader.classify("wsdbm:User12"), DataType::Object);
        assert_eq!(loader.classify("2014"), DataType::Integer);
        assert_eq!(loader.classify("-5"), DataType::String);
        assert_eq!(loader.classify(""), DataType::String);
        assert_eq!(loader.classify("Hello"), DataType::String);
    }

    #[test]
    fn parse_line_strips_literal_decoration() {
        let loader = DataLoader::default();
        let triplet = loader
            .parse_line(1, "3\tsorg:caption\t\"overtrained\" .")
            .unwrap();
        assert_eq!(triplet.subject, "3");
        assert_eq!(triplet.property, "sorg:caption");
        assert_eq!(triplet.object, "overtrained");
    }

    #[test]
    fn parse_line_compacts_uris() {
        let loader = DataLoader::default();
        let line = "<http://db.uwaterloo.ca/~galuc/wsdbm/User0>\t\
                    <http://xmlns.com/foaf/age>\t\
                    <http://db.uwaterloo.ca/~galuc/wsdbm/AgeGroup3>";
        let triplet = loader.parse_line(1, line).unwrap();
        assert_eq!(triplet.subject, "wsdbm:User0");
        assert_eq!(triplet.property, "foaf:age");
        assert_eq!(triplet.object, "wsdbm:AgeGroup3");
    }

    #[test]
    fn parse_line_keeps_fragment() {
        let loader = DataLoader::default();
        let line = "<http://example.org/1>\t<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>\t42";
        let triplet = loader.parse_line(1, line).unwrap();
        assert_eq!(triplet.property, "type");
    }

    #[test]
    fn wrong_token_count_is_malformed() {
        let loader = DataLoader::default();
        let err = loader.parse_line(7, "1\tonly-two").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 7, .. }));
    }

    #[test]
    fn entity_subjects_are_malformed() {
        let loader = DataLoader::default();
        let mut objects = Dictionary::new();
        let triplet = loader.parse_line(3, "wsdbm:User7\tfoaf:age\t30").unwrap();
        let err = loader.to_item(3, &triplet, &mut objects).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn entity_without_digits_is_malformed() {
        assert!(parse_entity(1, "wsdbm:User").is_err());
        assert_eq!(parse_entity(1, "wsdbm:User42").unwrap(), 42);
    }
}
