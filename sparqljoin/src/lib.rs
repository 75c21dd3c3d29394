/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod complex_table;
pub mod config;
pub mod data_loader;
pub mod database;
pub mod join;
pub mod joined_items;
pub mod simple_table;

pub use complex_table::ComplexTable;
pub use config::LoaderConfig;
pub use data_loader::DataLoader;
pub use database::Database;
pub use join::{HashJoin, Join, JoinAlgorithm, ParallelHashJoin, SortMergeJoin};
pub use joined_items::JoinedItems;
pub use simple_table::SimpleTable;
