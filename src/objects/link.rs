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

//! Support links keyed by an ordered pair of nodes: `LINK`, `SUPPLINK` and
//! `ZONEACCESS` records.

use super::comment::CommentParts;
use super::node::NodeNumber;
use crate::attributes::{Attributes, Value};
use crate::error::{Error, Result};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Ordered pair of nodes. `a-b` and `b-a` are different pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePair {
    /// From node
    pub a: NodeNumber,
    /// To node
    pub b: NodeNumber,
}

impl NodePair {
    /// Pair from `a` to `b`.
    pub fn new(a: NodeNumber, b: NodeNumber) -> Self {
        NodePair { a, b }
    }

    /// Pair from `b` to `a`.
    pub fn reversed(self) -> Self {
        NodePair::new(self.b, self.a)
    }
}

impl fmt::Display for NodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

impl FromStr for NodePair {
    type Err = Error;

    /// Reads `a-b` or `a,b`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue {
            what: "node pair",
            value: s.to_string(),
        };
        let mut parts = s.splitn(2, |c: char| c == '-' || c == ',');
        let a = parts.next().map(str::trim).and_then(|a| a.parse().ok());
        let b = parts.next().map(str::trim).and_then(|b| b.parse().ok());
        match (a, b) {
            (Some(a), Some(b)) => Ok(NodePair::new(a, b)),
            _ => Err(invalid()),
        }
    }
}

/// Static description of a family of node-pair records.
pub trait LinkKind {
    /// Record keyword
    const KEYWORD: &'static str;
    /// Attribute holding the node pair
    const NODES_KEY: &'static str;
    /// Whether a record without `ONEWAY` only goes from `a` to `b`
    const ONE_WAY_BY_DEFAULT: bool;
    /// Name of the family in messages
    const KIND: &'static str;
}

/// `LINK NODES=a-b, ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitLinkKind;

impl LinkKind for TransitLinkKind {
    const KEYWORD: &'static str = "LINK";
    const NODES_KEY: &'static str = "NODES";
    const ONE_WAY_BY_DEFAULT: bool = false;
    const KIND: &'static str = "link";
}

/// `SUPPLINK N=a-b, ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplinkKind;

impl LinkKind for SupplinkKind {
    const KEYWORD: &'static str = "SUPPLINK";
    const NODES_KEY: &'static str = "N";
    const ONE_WAY_BY_DEFAULT: bool = true;
    const KIND: &'static str = "support link";
}

/// `ZONEACCESS LINK=zone-node, ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZacKind;

impl LinkKind for ZacKind {
    const KEYWORD: &'static str = "ZONEACCESS";
    const NODES_KEY: &'static str = "LINK";
    const ONE_WAY_BY_DEFAULT: bool = false;
    const KIND: &'static str = "zone access";
}

/// A record keyed by a node pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<K> {
    id: String,
    nodes: NodePair,
    /// Attributes other than the node pair
    pub attributes: Attributes,
    /// Comment attached to the record
    pub comment: Option<String>,
    kind: PhantomData<K>,
}

/// Off-street link of a `.link` file.
pub type TransitLink = Link<TransitLinkKind>;
/// Support link of a `.link` file.
pub type Supplink = Link<SupplinkKind>;
/// Zone access link of a `.zac` file; `a` is the zone, `b` the node.
pub type ZacLink = Link<ZacKind>;

impl<K: LinkKind> Link<K> {
    /// Record from `a` to `b` without attributes.
    pub fn new(a: NodeNumber, b: NodeNumber) -> Self {
        let nodes = NodePair::new(a, b);
        Link {
            id: nodes.to_string(),
            nodes,
            attributes: Attributes::new(),
            comment: None,
            kind: PhantomData,
        }
    }

    /// Identifier, `a-b`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Node pair of the record.
    pub fn nodes(&self) -> NodePair {
        self.nodes
    }

    /// From node.
    pub fn a(&self) -> NodeNumber {
        self.nodes.a
    }

    /// To node.
    pub fn b(&self) -> NodeNumber {
        self.nodes.b
    }

    /// Changes the node pair and the identifier together.
    pub fn set_nodes(&mut self, nodes: NodePair) {
        self.nodes = nodes;
        self.id = nodes.to_string();
    }

    /// Changes the identifier and the node pair together.
    pub fn set_id(&mut self, id: &str) -> Result<()> {
        let nodes: NodePair = id.parse()?;
        self.set_nodes(nodes);
        Ok(())
    }

    /// Whether the record only goes from `a` to `b`.
    pub fn is_one_way(&self) -> bool {
        self.attributes
            .get("ONEWAY")
            .and_then(Value::as_bool)
            .unwrap_or(K::ONE_WAY_BY_DEFAULT)
    }

    /// Whether the record connects `a` to `b`, using the reverse direction
    /// only when the record is two-way.
    pub fn connects(&self, a: NodeNumber, b: NodeNumber) -> bool {
        let pair = NodePair::new(a, b);
        self.nodes == pair || (!self.is_one_way() && self.nodes == pair.reversed())
    }

    /// `DIST` attribute.
    pub fn distance(&self) -> Option<f64> {
        self.attributes.get("DIST").and_then(Value::as_f64)
    }

    /// `MODE` attribute.
    pub fn mode(&self) -> Option<u32> {
        self.attributes.get("MODE").and_then(Value::as_u32)
    }
}

impl ZacLink {
    /// Zone of the zone access link.
    pub fn zone(&self) -> NodeNumber {
        self.a()
    }

    /// Node reached from the zone.
    pub fn node(&self) -> NodeNumber {
        self.b()
    }
}

impl<K: LinkKind> fmt::Display for Link<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comment = CommentParts::new(self.comment.as_deref());
        let mut repr = comment.open(K::KEYWORD);
        repr.push_str(&format!("{}={}", K::NODES_KEY, self.id));
        let attributes = self.attributes.render(|_, _| true);
        if !attributes.is_empty() {
            repr.push_str(", ");
            repr.push_str(&attributes);
        }
        comment.close(&mut repr);
        f.write_str(&repr)
    }
}
