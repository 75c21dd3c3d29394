/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;
use std::sync::Arc;

use shared::dictionary::Dictionary;
use shared::error::{Error, Result};

use crate::complex_table::ComplexTable;
use crate::simple_table::SimpleTable;

/// Output of one load: a table per property plus the global dictionaries
/// every table shares.
#[derive(Debug, Clone)]
pub struct Database {
    tables: HashMap<String, SimpleTable>,
    property_dictionary: Arc<Dictionary>,
    object_dictionary: Arc<Dictionary>,
}

impl Database {
    pub fn new(
        tables: HashMap<String, SimpleTable>,
        property_dictionary: Arc<Dictionary>,
        object_dictionary: Arc<Dictionary>,
    ) -> Self {
        Database {
            tables,
            property_dictionary,
            object_dictionary,
        }
    }

    pub fn table(&self, property: &str) -> Result<&SimpleTable> {
        self.tables
            .get(property)
            .ok_or_else(|| Error::UnknownProperty(property.to_string()))
    }

    pub fn complex_table(&self, property: &str) -> Result<ComplexTable> {
        self.table(property)?.to_complex_table()
    }

    /// Property names in lexical order.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn tables(&self) -> &HashMap<String, SimpleTable> {
        &self.tables
    }

    pub fn property_dictionary(&self) -> &Arc<Dictionary> {
        &self.property_dictionary
    }

    pub fn object_dictionary(&self) -> &Arc<Dictionary> {
        &self.object_dictionary
    }
}
