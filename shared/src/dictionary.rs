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

use crate::error::{Error, Result};

/// First id handed out by a fresh dictionary. Id 0 never names a value.
pub const FIRST_ID: u32 = 1;

// Dictionary for encoding and decoding strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    string_to_id: FxHashMap<String, u32>,
    id_to_string: FxHashMap<u32, String>,
    next_id: u32,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            string_to_id: FxHashMap::default(),
            id_to_string: FxHashMap::default(),
            next_id: FIRST_ID,
        }
    }

    /// Returns the id of `value`, allocating the next id if the value was
    /// never seen before.
    pub fn put(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.string_to_id.get(value) {
            id
        } else {
            let id = self.next_id;
            self.string_to_id.insert(value.to_string(), id);
            self.id_to_string.insert(id, value.to_string());
            self.next_id += 1;
            id
        }
    }

    pub fn get(&self, id: u32) -> Result<&str> {
        self.id_to_string
            .get(&id)
            .map(|s| s.as_str())
            .ok_or(Error::DictionaryMiss(id))
    }

    /// Inverse lookup that never allocates.
    pub fn lookup(&self, value: &str) -> Option<u32> {
        self.string_to_id.get(value).copied()
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.id_to_string.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.id_to_string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_string.is_empty()
    }

    /// Entries in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        (FIRST_ID..self.next_id)
            .filter_map(move |id| self.id_to_string.get(&id).map(|s| (id, s.as_str())))
    }
}
