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

//! Access and transfer link pairs of `.access` and `.xfer` files.

use super::link::NodePair;
use super::comment::push_inline_comment;
use std::fmt;

/// Access mode tag of an access link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTag {
    /// Walk and ride
    Wnr,
    /// Park and ride
    Pnr,
}

impl fmt::Display for AccessTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTag::Wnr => f.write_str("wnr"),
            AccessTag::Pnr => f.write_str("pnr"),
        }
    }
}

/// `nodeA nodeB [wnr|pnr] [value] [;comment]`
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLink {
    /// Linked nodes
    pub nodes: NodePair,
    /// Access mode
    pub tag: Option<AccessTag>,
    /// Distance or time carried by the record
    pub value: Option<f64>,
    /// Comment attached to the record
    pub comment: Option<String>,
}

impl AccessLink {
    /// Access link between two nodes.
    pub fn new(nodes: NodePair) -> Self {
        AccessLink {
            nodes,
            tag: None,
            value: None,
            comment: None,
        }
    }

    /// Identifier, `a-b`.
    pub fn id(&self) -> String {
        self.nodes.to_string()
    }
}

impl fmt::Display for AccessLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut repr = format!("{} {}", self.nodes.a, self.nodes.b);
        if let Some(tag) = self.tag {
            repr.push_str(&format!(" {}", tag));
        }
        if let Some(value) = self.value {
            repr.push_str(&format!(" {}", value));
        }
        if let Some(comment) = &self.comment {
            push_inline_comment(&mut repr, comment);
        }
        f.write_str(&repr)
    }
}
