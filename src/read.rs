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

//! Reading of network files, directories and zip archives.

use crate::file_handler::{FileHandler, PathFileHandler, ZipHandler};
use crate::network::{FileFamily, Network, NetworkReport};
use crate::node_names::NodeNames;
use crate::parser::parse_str;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads a single network file, the family given by its suffix.
pub fn read_file<P: AsRef<Path>>(path: P, node_names: Option<&NodeNames>) -> Result<Network> {
    let path = path.as_ref();
    let family = match FileFamily::from_path(path) {
        Some(family) => family,
        None => bail!("{:?} is not a Cube network file", path),
    };
    info!(file_name = %path.display(), "Reading");
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Error reading {:?}", path))?;
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy());
    parse_str(&name, &text, family, node_names)
        .with_context(|| format!("Error reading {:?}", path))
}

/// Reads every network file available from a file handler, in file name
/// order, merging each of them into `network`.
pub fn read_from_handler<H>(
    file_handler: &mut H,
    network: &mut Network,
    insert_or_replace: bool,
    node_names: Option<&NodeNames>,
) -> Result<NetworkReport>
where
    for<'a> &'a mut H: FileHandler,
{
    let mut report = NetworkReport::default();
    let mut found = false;
    for file_name in file_handler.file_names() {
        let family = match FileFamily::from_path(Path::new(&file_name)) {
            Some(family) => family,
            None => {
                debug!("Skipping {}", file_name);
                continue;
            }
        };
        let (mut reader, path) = file_handler.get_file(&file_name)?;
        info!(file_name = %file_name, "Reading");
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .with_context(|| format!("Error reading {:?}", path))?;
        let fragment = parse_str(&file_name, &text, family, node_names)
            .with_context(|| format!("Error reading {:?}", path))?;
        found = true;
        let fragment_report = network.merge(fragment, insert_or_replace);
        for (_, message) in fragment_report.warnings() {
            debug!("{}", message);
        }
        report.extend(fragment_report);
    }
    if !found {
        warn!("No network file found in {}", file_handler.source_name());
    }
    Ok(report)
}

/// Merges a directory, a zip archive or a single file into `network`.
pub fn read_into<P: AsRef<Path>>(
    path: P,
    network: &mut Network,
    insert_or_replace: bool,
    node_names: Option<&NodeNames>,
) -> Result<NetworkReport> {
    let p = path.as_ref();
    if p.is_dir() {
        let mut file_handler = PathFileHandler::new(p.to_path_buf());
        read_from_handler(&mut file_handler, network, insert_or_replace, node_names)
    } else if is_zip(p) {
        let reader = File::open(p).with_context(|| format!("Error reading {:?}", p))?;
        let mut file_handler = ZipHandler::new(reader, p)?;
        read_from_handler(&mut file_handler, network, insert_or_replace, node_names)
    } else {
        let fragment = read_file(p, node_names)?;
        Ok(network.merge(fragment, insert_or_replace))
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"))
}

/// Reads a directory, a zip archive or a single file. The network is named
/// after the path.
pub fn read<P: AsRef<Path>>(
    path: P,
    insert_or_replace: bool,
    node_names: Option<&NodeNames>,
) -> Result<(Network, NetworkReport)> {
    let p = path.as_ref();
    if !p.is_dir() && !is_zip(p) {
        return Ok((read_file(p, node_names)?, NetworkReport::default()));
    }
    let name = p
        .file_name()
        .map_or_else(|| p.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned();
    let mut network = Network::new(&name);
    let report = read_into(p, &mut network, insert_or_replace, node_names)?;
    Ok((network, report))
}
