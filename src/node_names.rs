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

//! Node name lookup service, built once per network build from a
//! `node,name` file and handed to the parser.

use crate::objects::NodeNumber;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct NodeName {
    node: NodeNumber,
    name: String,
}

/// Stop names by node number.
#[derive(Debug, Clone, Default)]
pub struct NodeNames {
    names: HashMap<NodeNumber, String>,
}

impl NodeNames {
    /// Reads `node,name` records, with a header.
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut names = HashMap::new();
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        for record in rdr.deserialize() {
            let record: NodeName =
                record.context("Error parsing the CSV record into a node name")?;
            names.insert(record.node, record.name);
        }
        Ok(NodeNames { names })
    }

    /// Reads a `node,name` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!("Reading node names from {:?}", path);
        let file = std::fs::File::open(path).with_context(|| format!("Error reading {:?}", path))?;
        Self::from_reader(file).with_context(|| format!("Error reading {:?}", path))
    }

    /// Name of a node.
    pub fn get(&self, node: NodeNumber) -> Option<&str> {
        self.names.get(&node).map(String::as_str)
    }

    /// Names a node, returning the previous name.
    pub fn insert(&mut self, node: NodeNumber, name: impl Into<String>) -> Option<String> {
        self.names.insert(node, name.into())
    }

    /// Number of named nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no node is named.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
