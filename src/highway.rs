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

//! Tables exported from the highway network by Cube: `nodes.csv` with the
//! node coordinates and `links.csv` with the roadway links.

use crate::network::Network;
use crate::objects::{NodeNumber, NodePair};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Node of the highway network.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HighwayNode {
    /// Node number
    #[serde(rename = "N")]
    pub id: NodeNumber,
    /// X coordinate
    #[serde(rename = "X")]
    pub x: f64,
    /// Y coordinate
    #[serde(rename = "Y")]
    pub y: f64,
}

/// Directed roadway link of the highway network.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoadwayLink {
    /// From node
    #[serde(rename = "A")]
    pub a: NodeNumber,
    /// To node
    #[serde(rename = "B")]
    pub b: NodeNumber,
    /// Length, in miles
    #[serde(rename = "DISTANCE")]
    pub distance: f64,
    /// Street name
    #[serde(rename = "STREETNAME", default)]
    pub street_name: Option<String>,
    /// Free flow travel time, in minutes
    #[serde(rename = "TIME", default)]
    pub time: Option<f64>,
}

/// Lookup of the roadway links a line may run on.
pub trait RoadwayLinks {
    /// Whether a roadway link goes from `a` to `b`.
    fn has_roadway_link(&self, a: NodeNumber, b: NodeNumber) -> bool;
    /// Whether the node exists in the highway network.
    fn has_node(&self, node: NodeNumber) -> bool;
}

/// Nodes and links of the highway network.
#[derive(Debug, Clone, Default)]
pub struct HighwayNetwork {
    nodes: HashMap<NodeNumber, HighwayNode>,
    links: HashMap<NodePair, RoadwayLink>,
}

fn read_csv<T, R>(reader: R, what: &str) -> anyhow::Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .map(|record: csv::Result<T>| {
            record.with_context(|| format!("Error parsing the CSV record into a {}", what))
        })
        .collect()
}

impl HighwayNetwork {
    /// Reads the node and link tables.
    pub fn from_readers<N: Read, L: Read>(nodes: N, links: L) -> anyhow::Result<Self> {
        let nodes = read_csv::<HighwayNode, _>(nodes, "highway node")?
            .into_iter()
            .map(|node| (node.id, node))
            .collect();
        let links = read_csv::<RoadwayLink, _>(links, "roadway link")?
            .into_iter()
            .map(|link| (NodePair::new(link.a, link.b), link))
            .collect();
        Ok(HighwayNetwork { nodes, links })
    }

    /// Reads `nodes.csv` and `links.csv` from a directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        info!("Reading highway network from {:?}", dir);
        let open = |name: &str| {
            let path = dir.join(name);
            std::fs::File::open(&path).with_context(|| format!("Error reading {:?}", path))
        };
        Self::from_readers(open("nodes.csv")?, open("links.csv")?)
            .with_context(|| format!("Error reading highway network {:?}", dir))
    }

    /// Node of the highway network.
    pub fn node(&self, node: NodeNumber) -> Option<&HighwayNode> {
        self.nodes.get(&node)
    }

    /// Roadway link from `a` to `b`.
    pub fn link(&self, a: NodeNumber, b: NodeNumber) -> Option<&RoadwayLink> {
        self.links.get(&NodePair::new(a, b))
    }

    /// Coordinates of a node.
    pub fn coord(&self, node: NodeNumber) -> Option<(f64, f64)> {
        self.node(node).map(|n| (n.x, n.y))
    }

    /// Sets the coordinates of every line node known to the highway
    /// network. Returns the number of nodes left without coordinates.
    pub fn assign_coordinates(&self, network: &mut Network) -> usize {
        let mut missing = 0;
        for line in network.lines.iter_mut() {
            for node in line.nodes.iter_mut() {
                node.coord = self.coord(node.id());
                if node.coord.is_none() {
                    missing += 1;
                }
            }
        }
        missing
    }
}

impl RoadwayLinks for HighwayNetwork {
    fn has_roadway_link(&self, a: NodeNumber, b: NodeNumber) -> bool {
        self.links.contains_key(&NodePair::new(a, b))
    }

    fn has_node(&self, node: NodeNumber) -> bool {
        self.nodes.contains_key(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Node, TransitLine};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn highway() -> HighwayNetwork {
        let nodes = "N,X,Y\n1001,6000000.5,2100000\n1002,6000100,2100050\n";
        let links = "A,B,DISTANCE,STREETNAME,TIME\n1001,1002,0.12,MARKET ST,0.5\n1002,1003,0.2,,\n";
        HighwayNetwork::from_readers(nodes.as_bytes(), links.as_bytes()).unwrap()
    }

    #[test]
    fn roadway_links_are_directed() {
        let highway = highway();
        assert!(highway.has_roadway_link(1001, 1002));
        assert!(!highway.has_roadway_link(1002, 1001));
        let link = highway.link(1002, 1003).unwrap();
        assert_eq!(None, link.street_name);
        assert_relative_eq!(0.2, link.distance);
    }

    #[test]
    fn coordinates_of_line_nodes() {
        let highway = highway();
        let mut network = Network::new("test");
        let mut line = TransitLine::new("10");
        line.nodes = vec![Node::new(1001), Node::new(-1002), Node::new(1003)];
        network.lines.push(line);
        assert_eq!(1, highway.assign_coordinates(&mut network));
        let line = network.lookup_by_name("10").unwrap();
        let (x, _) = line.nodes[0].coord.unwrap();
        assert_relative_eq!(6000000.5, x);
        assert!(line.nodes[2].coord.is_none());
    }
}
