/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

use crate::join_on::JoinOn;

/// How the `object` of an [`Item`] has to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    /// Id in the object dictionary of the owning table.
    String,
    /// Numeric literal, stored as is.
    Integer,
    /// Entity reference, stored as the number of the entity.
    Object,
}

/// A single fact of one property: `subject` has the value `object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    subject: u32,
    object: u32,
    kind: DataType,
}

impl Item {
    pub fn new(subject: u32, object: u32, kind: DataType) -> Self {
        Item { subject, object, kind }
    }

    pub fn subject(&self) -> u32 {
        self.subject
    }

    pub fn object(&self) -> u32 {
        self.object
    }

    pub fn kind(&self) -> DataType {
        self.kind
    }

    /// Field selected by `join_on`.
    pub fn key(&self, join_on: JoinOn) -> u32 {
        match join_on {
            JoinOn::Subject => self.subject,
            JoinOn::Object => self.object,
        }
    }

    /// Copy of this item with a different object value.
    pub fn with_object(&self, object: u32) -> Self {
        Item { object, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_selects_field() {
        let item = Item::new(5, 10, DataType::Integer);
        assert_eq!(item.key(JoinOn::Subject), 5);
        assert_eq!(item.key(JoinOn::Object), 10);
    }

    #[test]
    fn with_object_keeps_subject_and_kind() {
        let item = Item::new(3, 1, DataType::String).with_object(9);
        assert_eq!(item, Item::new(3, 9, DataType::String));
    }
}
