/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Error type shared by the dictionary, the loader and the join engine.

use thiserror::Error;

use crate::join_on::JoinOn;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An id was resolved that the dictionary never handed out.
    #[error("id {0} is not present in the dictionary")]
    DictionaryMiss(u32),

    /// A raw input line could not be turned into a fact.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// A build output was handed to a probe for a different property/field.
    #[error("build output covers property {built} on {built_on}, probe asked for property {requested} on {requested_on}")]
    BuildMismatch {
        built: u32,
        built_on: JoinOn,
        requested: u32,
        requested_on: JoinOn,
    },

    /// A build output was handed to a probe together with a different R.
    #[error("build output covers {built_rows} rows of R, probe was given {probed_rows}")]
    BuildTableMismatch { built_rows: usize, probed_rows: usize },

    #[error("unknown join algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unknown join key field: {0}")]
    UnknownJoinField(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}
