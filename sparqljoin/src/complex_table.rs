/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use shared::dictionary::Dictionary;
use shared::error::{Error, Result};
use shared::item::{DataType, Item};

use crate::joined_items::JoinedItems;

/// Multi-property table. Every property id and every STRING object id used
/// by a row is owned by this table's dictionaries.
#[derive(Debug, Clone, Default)]
pub struct ComplexTable {
    rows: Vec<JoinedItems>,
    property_dictionary: Dictionary,
    object_dictionary: Dictionary,
}

impl ComplexTable {
    pub fn new() -> Self {
        ComplexTable::default()
    }

    pub fn from_parts(
        rows: Vec<JoinedItems>,
        property_dictionary: Dictionary,
        object_dictionary: Dictionary,
    ) -> Self {
        ComplexTable {
            rows,
            property_dictionary,
            object_dictionary,
        }
    }

    /// Appends a row whose ids already belong to this table's dictionaries.
    pub fn insert(&mut self, row: JoinedItems) {
        self.rows.push(row);
    }

    /// Appends `row`, re-encoding its property ids and STRING objects from
    /// the source dictionaries into this table's own. Every id is resolved
    /// before anything is put, so a miss leaves the table unchanged.
    pub fn insert_translated(
        &mut self,
        row: &JoinedItems,
        source_properties: &Dictionary,
        source_objects: &Dictionary,
    ) -> Result<()> {
        let mut resolved = Vec::with_capacity(row.len());
        for (&property, item) in row.values() {
            let name = source_properties.get(property)?;
            let text = match item.kind() {
                DataType::String => Some(source_objects.get(item.object())?),
                DataType::Integer | DataType::Object => None,
            };
            resolved.push((name, item, text));
        }

        let mut translated = JoinedItems::new(row.subject());
        for (name, item, text) in resolved {
            let property = self.property_dictionary.put(name);
            let item = match text {
                Some(text) => item.with_object(self.object_dictionary.put(text)),
                None => *item,
            };
            translated.insert(property, item);
        }
        self.rows.push(translated);
        Ok(())
    }

    /// Copies every row of `other` into this table. Only the dictionary
    /// entries those rows reference end up in this table.
    pub fn insert_complex_table(&mut self, other: &ComplexTable) -> Result<()> {
        self.rows.reserve(other.len());
        for row in &other.rows {
            self.insert_translated(row, &other.property_dictionary, &other.object_dictionary)?;
        }
        Ok(())
    }

    pub fn rows(&self) -> &[JoinedItems] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<JoinedItems> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn property_dictionary(&self) -> &Dictionary {
        &self.property_dictionary
    }

    pub fn object_dictionary(&self) -> &Dictionary {
        &self.object_dictionary
    }

    pub fn property_id(&self, name: &str) -> Option<u32> {
        self.property_dictionary.lookup(name)
    }

    /// Property name -> printable value for one row of this table.
    pub fn decode_row(
        &self,
        row: &JoinedItems,
        entity_marker: &str,
    ) -> Result<BTreeMap<String, String>> {
        let mut decoded = BTreeMap::new();
        for (&property, item) in row.values() {
            let name = self.property_dictionary.get(property)?;
            let value = match item.kind() {
                DataType::String => self.object_dictionary.get(item.object())?.to_string(),
                DataType::Integer => item.object().to_string(),
                DataType::Object => format!("{}{}", entity_marker, item.object()),
            };
            decoded.insert(name.to_string(), value);
        }
        Ok(decoded)
    }

    /// Property ids and STRING object ids referenced by at least one row.
    pub fn referenced_ids(&self) -> (FxHashSet<u32>, FxHashSet<u32>) {
        let mut properties = FxHashSet::default();
        let mut objects = FxHashSet::default();
        for row in &self.rows {
            for (&property, item) in row.values() {
                properties.insert(property);
                if item.kind() == DataType::String {
                    objects.insert(item.object());
                }
            }
        }
        (properties, objects)
    }

    /// Fails on the first id a row uses that the table's dictionaries lack.
    pub fn check_dictionaries(&self) -> Result<()> {
        for row in &self.rows {
            for (&property, item) in row.values() {
                if !self.property_dictionary.contains_id(property) {
                    return Err(Error::DictionaryMiss(property));
                }
                if item.kind() == DataType::String
                    && !self.object_dictionary.contains_id(item.object())
                {
                    return Err(Error::DictionaryMiss(item.object()));
                }
            }
        }
        Ok(())
    }
}

/// Re-encodes a STRING object from `source` into `target`. Numbers and
/// entity references are comparable across tables and pass through.
pub(crate) fn translate_item(
    item: &Item,
    source: &Dictionary,
    target: &mut Dictionary,
) -> Result<Item> {
    match item.kind() {
        DataType::String => {
            let object = target.put(source.get(item.object())?);
            Ok(item.with_object(object))
        }
        DataType::Integer | DataType::Object => Ok(*item),
    }
}
