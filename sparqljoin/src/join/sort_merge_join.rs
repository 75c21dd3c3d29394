/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::cmp::Ordering;

use log::debug;
use shared::error::Result;
use shared::join_on::JoinOn;

use super::{
    build_key, merge_rows, probe_dictionaries, probe_key, BuildSource, Join, JoinKey,
};
use crate::complex_table::ComplexTable;

/// R rows carrying the join property, ordered by join key.
#[derive(Debug, Clone)]
pub struct SortedBuildOutput {
    pub entries: Vec<(JoinKey, usize)>,
    pub source: BuildSource,
}

/// Sorts both sides on the join key and merges runs of equal keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortMergeJoin;

impl Join for SortMergeJoin {
    type BuildOutput = SortedBuildOutput;

    fn build(
        &self,
        table: &ComplexTable,
        property: u32,
        join_on: JoinOn,
    ) -> Result<SortedBuildOutput> {
        let mut entries: Vec<(JoinKey, usize)> = table
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| row.get(property).map(|item| (build_key(item, join_on), idx)))
            .collect();
        entries.sort_by_key(|&(key, _)| key);
        debug!("Sorted build: {} of {} rows keyed", entries.len(), table.len());
        Ok(SortedBuildOutput {
            entries,
            source: BuildSource::new(table, property, join_on),
        })
    }

    fn probe(
        &self,
        build: &SortedBuildOutput,
        r: &ComplexTable,
        s: &ComplexTable,
        property_r: u32,
        join_on_r: JoinOn,
        property_s: u32,
        join_on_s: JoinOn,
    ) -> Result<ComplexTable> {
        build.source.check(r, property_r, join_on_r)?;

        let mut probes: Vec<(JoinKey, usize)> = Vec::with_capacity(s.len());
        for (idx, row) in s.rows().iter().enumerate() {
            let Some(item) = row.get(property_s) else {
                continue;
            };
            if let Some(key) = probe_key(item, join_on_s, s.object_dictionary(), r.object_dictionary())? {
                probes.push((key, idx));
            }
        }
        probes.sort_by_key(|&(key, _)| key);

        let (mut properties, mut objects) = probe_dictionaries(r);
        let mut rows = Vec::new();
        let built = &build.entries;
        let (mut i, mut j) = (0, 0);
        while i < built.len() && j < probes.len() {
            match built[i].0.cmp(&probes[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    let key = built[i].0;
                    let r_end = run_end(built, i, key);
                    let s_end = run_end(&probes, j, key);
                    for &(_, s_idx) in &probes[j..s_end] {
                        for &(_, r_idx) in &built[i..r_end] {
                            rows.push(merge_rows(
                                &r.rows()[r_idx],
                                &s.rows()[s_idx],
                                s.property_dictionary(),
                                s.object_dictionary(),
                                &mut properties,
                                &mut objects,
                            )?);
                        }
                    }
                    i = r_end;
                    j = s_end;
                }
            }
        }
        debug!("Merge: {} rows of S produced {} rows", s.len(), rows.len());
        Ok(ComplexTable::from_parts(rows, properties, objects))
    }
}

fn run_end(entries: &[(JoinKey, usize)], start: usize, key: JoinKey) -> usize {
    start + entries[start..].iter().take_while(|(k, _)| *k == key).count()
}
