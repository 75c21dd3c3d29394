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
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use shared::error::Result;
use shared::join_on::JoinOn;

use super::hash_join::BuildOutput;
use super::{
    build_key, merge_rows, probe_dictionaries, probe_key, BuildSource, Join, JoinKey,
};
use crate::complex_table::ComplexTable;

/// Hash join that builds and probes on the rayon pool.
///
/// Only key extraction and index lookups run in parallel. Matches are
/// merged on the calling thread in S order, so dictionary ids and row order
/// come out the same as with [`super::HashJoin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelHashJoin;

impl Join for ParallelHashJoin {
    type BuildOutput = BuildOutput;

    fn build(&self, table: &ComplexTable, property: u32, join_on: JoinOn) -> Result<BuildOutput> {
        let mut index = table
            .rows()
            .par_iter()
            .enumerate()
            .fold(
                FxHashMap::<JoinKey, Vec<usize>>::default,
                |mut local, (idx, row)| {
                    if let Some(item) = row.get(property) {
                        local.entry(build_key(item, join_on)).or_default().push(idx);
                    }
                    local
                },
            )
            .reduce(FxHashMap::default, |mut acc, local| {
                for (key, positions) in local {
                    acc.entry(key).or_default().extend(positions);
                }
                acc
            });
        index
            .par_iter_mut()
            .for_each(|(_, positions)| positions.sort_unstable());

        debug!("Parallel build: {} distinct keys over {} rows", index.len(), table.len());
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

        let pairs: Vec<Vec<(usize, usize)>> = s
            .rows()
            .par_iter()
            .enumerate()
            .map(|(s_idx, s_row)| -> Result<Vec<(usize, usize)>> {
                let Some(item) = s_row.get(property_s) else {
                    return Ok(Vec::new());
                };
                let key =
                    probe_key(item, join_on_s, s.object_dictionary(), r.object_dictionary())?;
                Ok(key
                    .map(|key| build.matches(&key).iter().map(|&r_idx| (r_idx, s_idx)).collect())
                    .unwrap_or_default())
            })
            .collect::<Result<_>>()?;

        let (mut properties, mut objects) = probe_dictionaries(r);
        let mut rows = Vec::with_capacity(pairs.iter().map(Vec::len).sum());
        for (r_idx, s_idx) in pairs.into_iter().flatten() {
            rows.push(merge_rows(
                &r.rows()[r_idx],
                &s.rows()[s_idx],
                s.property_dictionary(),
                s.object_dictionary(),
                &mut properties,
                &mut objects,
            )?);
        }
        debug!("Parallel probe: {} rows of S produced {} rows", s.len(), rows.len());
        Ok(ComplexTable::from_parts(rows, properties, objects))
    }
}
