// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

use anyhow::Result;
use clap::Parser;
use cube_network::{
    configuration::{read_config, WritePolicy},
    fasttrips,
    highway::HighwayNetwork,
    node_names::NodeNames,
    read, validation, write, Network,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

#[derive(Debug, Parser)]
#[clap(
    name = "cube2fasttrips",
    about = "Convert a Cube transit network to fast-trips tables.",
    version
)]
struct Opt {
    /// Input Cube network: a file, a directory or a zip archive.
    /// Repeat to merge several inputs, in order.
    #[clap(short, long, parse(from_os_str), required = true)]
    input: Vec<PathBuf>,

    /// Records of later inputs replace the records of the same key in place
    /// instead of being appended.
    #[clap(long = "insert-replace")]
    insert_replace: bool,

    /// JSON file containing the conversion configuration.
    #[clap(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// CSV file (`node,name`) giving the names of the stops.
    #[clap(long = "node-names", parse(from_os_str))]
    node_names: Option<PathBuf>,

    /// Directory holding the `nodes.csv` and `links.csv` of the highway
    /// network, used for validation and stop coordinates.
    #[clap(long, parse(from_os_str))]
    highway: Option<PathBuf>,

    /// Directory where the merged Cube network is written.
    #[clap(long = "cube-output", parse(from_os_str))]
    cube_output: Option<PathBuf>,

    /// Base name of the written Cube files.
    #[clap(long, default_value = "transit")]
    name: String,

    /// Output directory of the fast-trips tables.
    #[clap(short, long, parse(from_os_str))]
    output: PathBuf,

    /// What to do with existing output files (overwrite, skip or abort),
    /// overriding the configuration.
    #[clap(long = "on-existing")]
    on_existing: Option<WritePolicy>,
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching cube2fasttrips...");

    let mut config = read_config(opt.config)?;
    if let Some(policy) = opt.on_existing {
        config.on_existing_file = policy;
    }
    let node_names = opt.node_names.map(NodeNames::from_path).transpose()?;

    let mut network = Network::new(&opt.name);
    for input in &opt.input {
        let report =
            read::read_into(input, &mut network, opt.insert_replace, node_names.as_ref())?;
        let warnings = report.warnings().count();
        if warnings > 0 {
            warn!("{} warning(s) while merging {:?}", warnings, input);
        }
    }

    let highway = opt.highway.map(HighwayNetwork::from_dir).transpose()?;
    if let Some(highway) = &highway {
        let report = validation::validate_referential_integrity(&network, highway);
        let problems = report.warnings().count();
        if problems > 0 {
            warn!("{} referential integrity problem(s)", problems);
        }
        let missing = highway.assign_coordinates(&mut network);
        if missing > 0 {
            warn!("{} node(s) without coordinates", missing);
        }
    }

    if let Some(cube_output) = opt.cube_output {
        write::write(&network, cube_output, &opt.name, config.on_existing_file)?;
    }
    fasttrips::write(&network, &config, highway.as_ref(), opt.output)?;
    Ok(())
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter_subscriber)
        .init();
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}
