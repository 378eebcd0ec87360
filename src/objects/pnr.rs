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

//! Park-and-ride records of `.pnr` files.

use super::comment::CommentParts;
use super::node::NodeNumber;
use crate::attributes::{Attributes, Value};
use std::fmt;

/// `PNR NODE=station-lot, ZONES=..., ...`. The lot node is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct PnrLink {
    id: String,
    station: NodeNumber,
    lot: Option<NodeNumber>,
    /// Attributes other than `NODE`
    pub attributes: Attributes,
    /// Comment attached to the record
    pub comment: Option<String>,
}

fn pnr_id(station: NodeNumber, lot: Option<NodeNumber>) -> String {
    match lot {
        Some(lot) => format!("{}-{}", station, lot),
        None => station.to_string(),
    }
}

impl PnrLink {
    /// Park-and-ride at `station`, optionally through the parking `lot` node.
    pub fn new(station: NodeNumber, lot: Option<NodeNumber>) -> Self {
        PnrLink {
            id: pnr_id(station, lot),
            station,
            lot,
            attributes: Attributes::new(),
            comment: None,
        }
    }

    /// Identifier, `station-lot` or `station`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Station node.
    pub fn station(&self) -> NodeNumber {
        self.station
    }

    /// Parking lot node.
    pub fn lot(&self) -> Option<NodeNumber> {
        self.lot
    }

    /// Changes the nodes and the identifier together.
    pub fn set_nodes(&mut self, station: NodeNumber, lot: Option<NodeNumber>) {
        self.station = station;
        self.lot = lot;
        self.id = pnr_id(station, lot);
    }

    /// Zones served by the park-and-ride, ranges expanded.
    pub fn zones(&self) -> Vec<u32> {
        self.attributes
            .get("ZONES")
            .map(Value::expand_sequence)
            .unwrap_or_default()
    }
}

impl fmt::Display for PnrLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comment = CommentParts::new(self.comment.as_deref());
        let mut repr = comment.open("PNR");
        repr.push_str(&format!("NODE={}", self.id));
        let attributes = self.attributes.render(|_, _| true);
        if !attributes.is_empty() {
            repr.push_str(", ");
            repr.push_str(&attributes);
        }
        comment.close(&mut repr);
        f.write_str(&repr)
    }
}
