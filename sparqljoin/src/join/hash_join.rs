/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::debug;
use rustc_hash::FxHashMap;
use shared::error::Result;
use shared::join_on::JoinOn;

use super::{
    build_key, merge_rows, probe_dictionaries, probe_key, BuildSource, Join, JoinKey,
};
use crate::complex_table::ComplexTable;

/// Hash index over R: join key -> positions of the R rows carrying it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub index: FxHashMap<JoinKey, Vec<usize>>,
    pub source: BuildSource,
}

impl BuildOutput {
    pub fn matches(&self, key: &JoinKey) -> &[usize] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Single-threaded build/probe hash join.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashJoin;

impl Join for HashJoin {
    type BuildOutput = BuildOutput;

    fn build(&self, table: &ComplexTable, property: u32, join_on: JoinOn) -> Result<BuildOutput> {
        let mut index: FxHashMap<JoinKey, Vec<usize>> = FxHashMap::default();
        for (idx, row) in table.rows().iter().enumerate() {
            if let Some(item) = row.get(property) {
                index.entry(build_key(item, join_on)).or_default().push(idx);
            }
        }
        debug!("Build: {} distinct keys over {} rows", index.len(), table.len());
        Ok(BuildOutput {
            index,
            source: BuildSource::new(table, property, join_on),
        })
    }

    fn probe(
        &self,
        build: &BuildOutput,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: u32,
        join_on_r: JoinOn,
        property_s: u32,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable> {
        build.source.check(r, property_r, join_on_r)?;

        let (mut properties, mut objects) = probe_dictionaries(r);
        let mut rows = Vec::new();
        for s_row in s.rows() {
            let Some(item) = s_row.get(property_s) else {
                continue;
            };
            let Some(key) = probe_key(item, join_on_s, s.object_dictionary(), r.object_dictionary())?
            else {
                continue;
            };
            for &idx in build.matches(&key) {
                rows.push(merge_rows(
                    &r.rows()[idx],
                    s_row,
                    s.property_dictionary(),
                    s.object_dictionary(),
                    &mut properties,
                    &mut objects,
                )?);
            }
        }
        debug!("Probe: {} rows of S produced {} rows", s.len(), rows.len());
        Ok(ComplexTable::from_parts(rows, properties, objects))
    }
}
