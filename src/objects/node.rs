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

//! A point on the path of a transit line.

use super::comment::CommentParts;
use crate::attributes::{Attributes, Value};
use std::fmt;

/// Positive node number as found in the highway network.
pub type NodeNumber = u32;

/// Node of a line path. The node number is the identity of the node, the
/// stop flag only tells whether the line stops there. Cube writes non-stop
/// nodes with a negative number.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeNumber,
    stop: bool,
    /// Node attributes such as `ACCESS`, `DELAY`, `XYSPEED` or `TIMEFAC`
    pub attributes: Attributes,
    /// Comment written after the node
    pub comment: Option<String>,
    /// Stop name, from the node name lookup service
    pub description: Option<String>,
    /// Coordinates, from the highway network
    pub coord: Option<(f64, f64)>,
}

impl Node {
    /// Node from its signed Cube form.
    ///
    /// ```
    /// # use cube_network::objects::Node;
    /// let node = Node::new(-1002);
    /// assert_eq!(1002, node.id());
    /// assert!(!node.is_stop());
    /// ```
    pub fn new(signed: i64) -> Self {
        Node {
            id: signed.unsigned_abs() as NodeNumber,
            stop: signed > 0,
            attributes: Attributes::new(),
            comment: None,
            description: None,
            coord: None,
        }
    }

    /// Node from its number and stop flag.
    pub fn with_stop(id: NodeNumber, stop: bool) -> Self {
        let mut node = Node::new(i64::from(id));
        node.stop = stop;
        node
    }

    /// Node number, whatever the stop flag.
    pub fn id(&self) -> NodeNumber {
        self.id
    }

    /// Cube form of the node: negative when the line does not stop.
    pub fn signed(&self) -> i64 {
        if self.stop {
            i64::from(self.id)
        } else {
            -i64::from(self.id)
        }
    }

    /// Whether the line stops at this node.
    pub fn is_stop(&self) -> bool {
        self.stop
    }

    /// Changes the stop flag, the node number is unchanged.
    pub fn set_stop(&mut self, stop: bool) {
        self.stop = stop;
    }

    /// `ACCESS=2` forbids boarding at the node.
    pub fn boarding_allowed(&self) -> bool {
        self.attributes
            .get("ACCESS")
            .and_then(Value::as_u32)
            .map_or(true, |access| access != 2)
    }

    /// Whether the node is written with node attributes.
    pub(crate) fn has_written_attributes(&self) -> bool {
        self.attributes.iter().any(|(k, v)| !skipped_on_output(k, v))
    }

    /// Renders the node as one line of a line file, preceded by own-line
    /// comments when the comment has several parts. `n_equals` prefixes it
    /// with `N=`, `last` drops the trailing comma.
    pub fn line_file_repr(&self, n_equals: bool, last: bool) -> String {
        let comment = CommentParts::new(self.comment.as_deref());
        let mut repr = comment.own_lines();
        repr.push(' ');
        if n_equals {
            repr.push_str("N=");
        }
        repr.push_str(&self.signed().to_string());
        let attributes = self.attributes.render(|k, v| !skipped_on_output(k, v));
        if !attributes.is_empty() {
            repr.push_str(", ");
            repr.push_str(&attributes);
        }
        if !last {
            repr.push(',');
        }
        comment.close(&mut repr);
        repr
    }
}

/// `DELAY=0` is the default and is not written.
fn skipped_on_output(key: &str, value: &Value) -> bool {
    key == "DELAY" && value.is_zero()
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signed())
    }
}
