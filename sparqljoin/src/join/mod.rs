/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Equality joins between two [`ComplexTable`]s.
//!
//! Every algorithm follows the same protocol: `build` indexes R on the join
//! key of one property, `probe` scans S and merges each matching pair of
//! rows, and `join` compacts the probe output into a table whose
//! dictionaries hold exactly what the result references.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::dictionary::Dictionary;
use shared::error::{Error, Result};
use shared::item::{DataType, Item};
use shared::join_on::JoinOn;

use crate::complex_table::{translate_item, ComplexTable};
use crate::joined_items::JoinedItems;

pub mod hash_join;
pub mod parallel_hash_join;
pub mod sort_merge_join;

pub use hash_join::{BuildOutput, HashJoin};
pub use parallel_hash_join::ParallelHashJoin;
pub use sort_merge_join::{SortMergeJoin, SortedBuildOutput};

/// Value two rows are compared on.
///
/// Subjects, numbers and entity references share one numeric space.
/// Strings are ids in R's object dictionary; a string never equals a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JoinKey {
    Number(u32),
    Text(u32),
}

/// Key of an R-side item.
pub fn build_key(item: &Item, join_on: JoinOn) -> JoinKey {
    match (join_on, item.kind()) {
        (JoinOn::Subject, _) => JoinKey::Number(item.subject()),
        (JoinOn::Object, DataType::String) => JoinKey::Text(item.object()),
        (JoinOn::Object, DataType::Integer | DataType::Object) => JoinKey::Number(item.object()),
    }
}

/// Key of an S-side item, expressed in R's id space. `None` when the item
/// holds a string R has never seen, so nothing in R can match it.
pub fn probe_key(
    item: &Item,
    join_on: JoinOn,
    s_objects: &Dictionary,
    r_objects: &Dictionary,
) -> Result<Option<JoinKey>> {
    match (join_on, item.kind()) {
        (JoinOn::Object, DataType::String) => {
            let value = s_objects.get(item.object())?;
            Ok(r_objects.lookup(value).map(JoinKey::Text))
        }
        _ => Ok(Some(build_key(item, join_on))),
    }
}

/// Merges a matching pair into a new row. The row starts as a copy of
/// `r_row`; S's properties and string values are re-encoded into the output
/// dictionaries and overwrite R's values under the same property.
pub fn merge_rows(
    r_row: &JoinedItems,
    s_row: &JoinedItems,
    s_properties: &Dictionary,
    s_objects: &Dictionary,
    output_properties: &mut Dictionary,
    output_objects: &mut Dictionary,
) -> Result<JoinedItems> {
    let mut merged = r_row.clone();
    for (&property, item) in s_row.values() {
        let property = output_properties.put(s_properties.get(property)?);
        let item = translate_item(item, s_objects, output_objects)?;
        if let Some(previous) = merged.insert(property, item) {
            if previous.kind() != item.kind() {
                debug!(
                    "Property {} of subject {} changes kind from {:?} to {:?} during merge",
                    property,
                    merged.subject(),
                    previous.kind(),
                    item.kind()
                );
            }
        }
    }
    Ok(merged)
}

/// Resolves a property name through a table's own dictionary.
pub fn resolve_property(table: &ComplexTable, name: &str) -> Result<u32> {
    table
        .property_id(name)
        .ok_or_else(|| Error::UnknownProperty(name.to_string()))
}

/// What a build output was made from, checked by `probe` before any row
/// position stored in it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSource {
    pub property: u32,
    pub join_on: JoinOn,
    pub rows: usize,
}

impl BuildSource {
    pub fn new(table: &ComplexTable, property: u32, join_on: JoinOn) -> Self {
        BuildSource {
            property,
            join_on,
            rows: table.len(),
        }
    }

    pub(crate) fn check(&self, r: &ComplexTable, property: u32, join_on: JoinOn) -> Result<()> {
        if self.property != property || self.join_on != join_on {
            return Err(Error::BuildMismatch {
                built: self.property,
                built_on: self.join_on,
                requested: property,
                requested_on: join_on,
            });
        }
        if self.rows != r.len() {
            return Err(Error::BuildTableMismatch {
                built_rows: self.rows,
                probed_rows: r.len(),
            });
        }
        Ok(())
    }
}

/// Output dictionaries of a probe start as copies of R's, so R's rows keep
/// their ids while S's entries are appended.
pub(crate) fn probe_dictionaries(r: &ComplexTable) -> (Dictionary, Dictionary) {
    (r.property_dictionary().clone(), r.object_dictionary().clone())
}

pub trait Join {
    type BuildOutput;

    /// Indexes `table` on the `join_on` field of `property`. Rows without
    /// the property are left out.
    fn build(&self, table: &ComplexTable, property: u32, join_on: JoinOn)
        -> Result<Self::BuildOutput>;

    /// Streams `s` against the build output of `r`, emitting one merged row
    /// per matching pair. Dictionaries of the result are not compacted.
    #[allow(clippy::too_many_arguments)]
    fn probe(
        &self,
        build: &Self::BuildOutput,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: u32,
        join_on_r: JoinOn,
        property_s: u32,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable>;

    /// Inner join of `r` and `s`. Neither input is modified.
    fn join(
        &self,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: u32,
        join_on_r: JoinOn,
        property_s: u32,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable> {
        let build = self.build(r, property_r, join_on_r)?;
        let probed = self.probe(&build, r, s, property_r, join_on_r, property_s, join_on_s)?;

        let mut result = ComplexTable::new();
        result.insert_complex_table(&probed)?;

        debug!(
            "Compaction: {} -> {} properties, {} -> {} objects",
            probed.property_dictionary().len(),
            result.property_dictionary().len(),
            probed.object_dictionary().len(),
            result.object_dictionary().len()
        );
        info!(
            "Joined {} x {} rows on {}/{} into {} rows",
            r.len(),
            s.len(),
            join_on_r,
            join_on_s,
            result.len()
        );
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinAlgorithm {
    #[default]
    Hash,
    ParallelHash,
    SortMerge,
}

impl JoinAlgorithm {
    pub fn join(
        self,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: u32,
        join_on_r: JoinOn,
        property_s: u32,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable> {
        match self {
            JoinAlgorithm::Hash => HashJoin.join(r, s, property_r, join_on_r, property_s, join_on_s),
            JoinAlgorithm::ParallelHash => {
                ParallelHashJoin.join(r, s, property_r, join_on_r, property_s, join_on_s)
            }
            JoinAlgorithm::SortMerge => {
                SortMergeJoin.join(r, s, property_r, join_on_r, property_s, join_on_s)
            }
        }
    }

    /// Same as [`JoinAlgorithm::join`], with properties given by name.
    pub fn join_by_name(
        self,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: &str,
        join_on_r: JoinOn,
        property_s: &str,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable> {
        let property_r = resolve_property(r, property_r)?;
        let property_s = resolve_property(s, property_s)?;
        self.join(r, s, property_r, join_on_r, property_s, join_on_s)
    }
}

impl FromStr for JoinAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(JoinAlgorithm::Hash),
            "parallel" | "parallel-hash" => Ok(JoinAlgorithm::ParallelHash),
            "sort-merge" | "merge" => Ok(JoinAlgorithm::SortMerge),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for JoinAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinAlgorithm::Hash => write!(f, "hash"),
            JoinAlgorithm::ParallelHash => write!(f, "parallel-hash"),
            JoinAlgorithm::SortMerge => write!(f, "sort-merge"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_keys_ignore_kind() {
        let item = Item::new(4, 9, DataType::String);
        assert_eq!(build_key(&item, JoinOn::Subject), JoinKey::Number(4));
        assert_eq!(build_key(&item, JoinOn::Object), JoinKey::Text(9));
    }

    #[test]
    fn numbers_and_entities_share_a_key_space() {
        let number = Item::new(1, 12, DataType::Integer);
        let entity = Item::new(2, 12, DataType::Object);
        assert_eq!(
            build_key(&number, JoinOn::Object),
            build_key(&entity, JoinOn::Object)
        );
    }

    #[test]
    fn probe_key_translates_strings_into_r_space() {
        let mut r_objects = Dictionary::new();
        r_objects.put("x");
        r_objects.put("shared");
        let mut s_objects = Dictionary::new();
        let shared = s_objects.put("shared");
        let only_s = s_objects.put("only in s");

        let item = Item::new(1, shared, DataType::String);
        assert_eq!(
            probe_key(&item, JoinOn::Object, &s_objects, &r_objects).unwrap(),
            Some(JoinKey::Text(2))
        );
        let item = Item::new(1, only_s, DataType::String);
        assert_eq!(probe_key(&item, JoinOn::Object, &s_objects, &r_objects).unwrap(), None);
    }

    #[test]
    fn merge_rows_reencodes_strings_and_overwrites() {
        let mut r_properties = Dictionary::new();
        let p1 = r_properties.put("p1");
        let mut r_objects = Dictionary::new();
        r_objects.put("r-value");

        let mut s_properties = Dictionary::new();
        s_properties.put("p2");
        let s_p1 = s_properties.put("p1");
        let s_p2 = s_properties.lookup("p2").unwrap();
        let mut s_objects = Dictionary::new();
        let s_value = s_objects.put("s-value");

        let r_row = JoinedItems::with_item(5, p1, Item::new(5, 10, DataType::Integer));
        let mut s_row = JoinedItems::new(7);
        s_row.insert(s_p1, Item::new(7, 11, DataType::Integer));
        s_row.insert(s_p2, Item::new(7, s_value, DataType::String));

        let mut out_properties = r_properties.clone();
        let mut out_objects = r_objects.clone();
        let merged = merge_rows(
            &r_row,
            &s_row,
            &s_properties,
            &s_objects,
            &mut out_properties,
            &mut out_objects,
        )
        .unwrap();

        assert_eq!(merged.subject(), 5);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(p1).unwrap().object(), 11);
        let p2 = out_properties.lookup("p2").unwrap();
        let value = merged.get(p2).unwrap();
        assert_eq!(out_objects.get(value.object()).unwrap(), "s-value");
        assert_eq!(r_row.get(p1).unwrap().object(), 10);
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("hash".parse::<JoinAlgorithm>().unwrap(), JoinAlgorithm::Hash);
        assert_eq!("parallel".parse::<JoinAlgorithm>().unwrap(), JoinAlgorithm::ParallelHash);
        assert_eq!("sort-merge".parse::<JoinAlgorithm>().unwrap(), JoinAlgorithm::SortMerge);
        assert!("nested-loop".parse::<JoinAlgorithm>().is_err());
    }
}
