/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use shared::item::Item;
use shared::join_on::JoinOn;

/// Everything known so far about one subject: property id -> fact.
///
/// Property ids are scoped to the dictionaries of the table holding the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedItems {
    subject: u32,
    values: FxHashMap<u32, Item>,
}

impl JoinedItems {
    pub fn new(subject: u32) -> Self {
        JoinedItems {
            subject,
            values: FxHashMap::default(),
        }
    }

    pub fn with_item(subject: u32, property: u32, item: Item) -> Self {
        let mut row = JoinedItems::new(subject);
        row.insert(property, item);
        row
    }

    pub fn from_values(subject: u32, values: FxHashMap<u32, Item>) -> Self {
        JoinedItems { subject, values }
    }

    pub fn subject(&self) -> u32 {
        self.subject
    }

    pub fn values(&self) -> &FxHashMap<u32, Item> {
        &self.values
    }

    /// Stores `item` under `property`, returning the item it replaced.
    pub fn insert(&mut self, property: u32, item: Item) -> Option<Item> {
        self.values.insert(property, item)
    }

    pub fn get(&self, property: u32) -> Option<&Item> {
        self.values.get(&property)
    }

    pub fn properties(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One-directional match: every property of `self` is present in
    /// `other` with an equal item. Extra properties on `other` are ignored,
    /// so `a.contained_in(&b)` does not imply `b.contained_in(&a)`.
    /// Use `==` for structural equality.
    pub fn contained_in(&self, other: &JoinedItems) -> bool {
        self.values
            .iter()
            .all(|(property, item)| other.values.get(property) == Some(item))
    }

    /// Ordering key of this row for `property`/`join_on`, if the row has it.
    pub fn sort_key(&self, property: u32, join_on: JoinOn) -> Option<u32> {
        self.get(property).map(|item| item.key(join_on))
    }
}
