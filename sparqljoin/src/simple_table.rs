/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::sync::Arc;

use shared::dictionary::Dictionary;
use shared::error::Result;
use shared::item::Item;

use crate::complex_table::{translate_item, ComplexTable};
use crate::joined_items::JoinedItems;

/// All facts of one property, as produced by the loader. The dictionaries
/// are the global ones of the load and are shared read-only.
#[derive(Debug, Clone)]
pub struct SimpleTable {
    name: String,
    items: Vec<Item>,
    property_dictionary: Arc<Dictionary>,
    object_dictionary: Arc<Dictionary>,
}

impl SimpleTable {
    pub fn new(
        name: impl Into<String>,
        property_dictionary: Arc<Dictionary>,
        object_dictionary: Arc<Dictionary>,
    ) -> Self {
        SimpleTable {
            name: name.into(),
            items: Vec::new(),
            property_dictionary,
            object_dictionary,
        }
    }

    pub fn with_items(
        name: impl Into<String>,
        items: Vec<Item>,
        property_dictionary: Arc<Dictionary>,
        object_dictionary: Arc<Dictionary>,
    ) -> Self {
        SimpleTable {
            name: name.into(),
            items,
            property_dictionary,
            object_dictionary,
        }
    }

    pub fn insert(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn property_dictionary(&self) -> &Dictionary {
        &self.property_dictionary
    }

    pub fn object_dictionary(&self) -> &Dictionary {
        &self.object_dictionary
    }

    /// One row per item, with dictionaries scoped to this table's content.
    pub fn to_complex_table(&self) -> Result<ComplexTable> {
        let mut property_dictionary = Dictionary::new();
        let mut object_dictionary = Dictionary::new();
        let property = property_dictionary.put(&self.name);

        let mut rows = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let item = translate_item(item, &self.object_dictionary, &mut object_dictionary)?;
            rows.push(JoinedItems::with_item(item.subject(), property, item));
        }
        Ok(ComplexTable::from_parts(rows, property_dictionary, object_dictionary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::item::DataType;

    #[test]
    fn to_complex_table_scopes_dictionaries() {
        let mut properties = Dictionary::new();
        properties.put("sorg:caption");
        properties.put("sorg:text");
        let mut objects = Dictionary::new();
        objects.put("not in this table");
        let caption = objects.put("overtrained");

        let mut table = SimpleTable::new("sorg:caption", Arc::new(properties), Arc::new(objects));
        table.insert(Item::new(1, caption, DataType::String));
        table.insert(Item::new(2, 17, DataType::Integer));

        let complex = table.to_complex_table().unwrap();
        assert_eq!(complex.len(), 2);
        assert_eq!(complex.property_dictionary().len(), 1);
        assert_eq!(complex.object_dictionary().len(), 1);

        let property = complex.property_id("sorg:caption").unwrap();
        let first = complex.rows()[0].get(property).unwrap();
        assert_eq!(complex.object_dictionary().get(first.object()).unwrap(), "overtrained");
        assert_eq!(complex.rows()[1].get(property).unwrap().object(), 17);
        complex.check_dictionaries().unwrap();
    }
}
