/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeMap;
use std::process;

use clap::Parser;
use log::error;
use serde::Serialize;
use shared::error::Result;
use shared::join_on::JoinOn;
use sparqljoin::config::LoaderConfig;
use sparqljoin::data_loader::DataLoader;
use sparqljoin::join::JoinAlgorithm;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sparqljoin-cli",
    version = "0.1.0",
    about = "Join two property tables of a triple file",
    long_about = "Loads a tab-separated triple file into per-property tables and joins two of them on the subject or object of their facts."
)]
struct Args {
    #[arg(short, long, help = "Triple file to load", value_name = "FILE")]
    file: String,

    #[arg(short, long, help = "Property of the build side (R)", value_name = "PROPERTY")]
    left: String,

    #[arg(long, default_value = "subject", help = "Join field of R: subject or object")]
    left_on: JoinOn,

    #[arg(short, long, help = "Property of the probe side (S)", value_name = "PROPERTY")]
    right: String,

    #[arg(long, default_value = "subject", help = "Join field of S: subject or object")]
    right_on: JoinOn,

    #[arg(short, long, default_value = "hash", help = "hash, parallel or sort-merge")]
    algorithm: JoinAlgorithm,

    #[arg(long, help = "Print at most this many rows")]
    limit: Option<usize>,

    #[arg(long, help = "Print rows as JSON")]
    json: bool,

    #[arg(short, long, help = "Loader configuration (JSON)", value_name = "FILE")]
    config: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output")]
    verbose: u8,

    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

#[derive(Serialize)]
struct OutputRow {
    subject: u32,
    values: BTreeMap<String, String>,
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => LoaderConfig::from_json_file(path)?,
        None => LoaderConfig::default(),
    };
    let entity_marker = config.entity_marker.clone();
    let database = DataLoader::new(config).load(&args.file)?;

    let r = database.complex_table(&args.left)?;
    let s = database.complex_table(&args.right)?;
    let joined = args.algorithm.join_by_name(
        &r,
        &s,
        &args.left,
        args.left_on,
        &args.right,
        args.right_on,
    )?;

    let limit = args.limit.unwrap_or(usize::MAX);
    let rows = joined
        .rows()
        .iter()
        .take(limit)
        .map(|row| -> Result<OutputRow> {
            Ok(OutputRow {
                subject: row.subject(),
                values: joined.decode_row(row, &entity_marker)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Results: {} rows", joined.len());
        for row in rows {
            println!("{}\t{:?}", row.subject, row.values);
        }
    }
    Ok(())
}

/// Default filter when `RUST_LOG` is unset. `-q` wins over any number of `-v`.
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() {
    let args = Args::parse();

    // log records from the library crates reach the subscriber through tracing-log
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(args.verbose, args.quiet))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&args) {
        error!("{}", err);
        process::exit(1);
    }
}
