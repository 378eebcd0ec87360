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

//! Transit line: a named path of nodes with its service attributes.

use super::comment::CommentParts;
use super::node::{Node, NodeNumber};
use super::time_period::TimePeriod;
use crate::attributes::{Attributes, Value};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Cube limits line names to 12 characters.
pub const MAX_NAME_LENGTH: usize = 12;

/// A transit line of a `.lin` file.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitLine {
    name: String,
    /// Line attributes except `NAME`
    pub attributes: Attributes,
    /// Path of the line; stops are the nodes flagged as such
    pub nodes: Vec<Node>,
    /// Comment attached to the line
    pub comment: Option<String>,
}

fn abs(node: i64) -> NodeNumber {
    node.unsigned_abs() as NodeNumber
}

impl TransitLine {
    /// Empty line named `name`, quotes removed.
    pub fn new(name: &str) -> Self {
        TransitLine {
            name: strip_quotes(name).to_string(),
            attributes: Attributes::new(),
            nodes: Vec::new(),
            comment: None,
        }
    }

    /// Copy of `template` under a new name. Attributes, nodes and comment
    /// are duplicated; nothing is shared with the template.
    pub fn from_template(template: &TransitLine, name: &str) -> Self {
        let mut line = template.clone();
        line.set_name(name);
        line
    }

    /// Name of the line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the line, quotes removed.
    pub fn set_name(&mut self, name: &str) {
        self.name = strip_quotes(name).to_string();
    }

    /// Cube mode number.
    pub fn mode(&self) -> Option<u32> {
        self.attributes.get("MODE").and_then(Value::as_u32)
    }

    /// Operator of the line.
    pub fn owner(&self) -> Option<String> {
        self.attributes.get("OWNER").map(|v| v.as_str().into_owned())
    }

    /// Lines are one-way unless `ONEWAY=F`.
    pub fn is_one_way(&self) -> bool {
        self.attributes
            .get("ONEWAY")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Sets `ONEWAY`.
    pub fn set_one_way(&mut self, one_way: bool) {
        let value = if one_way { "T" } else { "F" };
        self.attributes.set("ONEWAY", Value::Text(value.to_string()));
    }

    /// Frequency (headway in minutes) of a time period, 0 without service.
    pub fn freq(&self, period: TimePeriod) -> f64 {
        self.attributes
            .get(&period.freq_key())
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Frequency of the time period named `period`, `"AM"` for instance.
    pub fn get_freq(&self, period: &str) -> Result<f64> {
        Ok(self.freq(period.parse()?))
    }

    /// The five frequencies, in `[AM, MD, PM, EV, EA]` order.
    pub fn freqs(&self) -> [f64; 5] {
        let mut freqs = [0.0; 5];
        for period in TimePeriod::ALL.iter() {
            freqs[period.index()] = self.freq(*period);
        }
        freqs
    }

    /// Sets frequencies. Without `periods`, the five frequencies must be
    /// given in `[AM, MD, PM, EV, EA]` order. When `allow_downgrades` is
    /// false a frequency is only changed when it improves service: a shorter
    /// headway, or any headway where there was none.
    pub fn set_freqs(
        &mut self,
        freqs: &[f64],
        periods: Option<&[TimePeriod]>,
        allow_downgrades: bool,
    ) -> Result<()> {
        let periods = periods.unwrap_or(&TimePeriod::ALL);
        if periods.len() != freqs.len() {
            return Err(Error::Frequencies(format!(
                "line '{}': {} frequencies given for {} time periods",
                self.name,
                freqs.len(),
                periods.len()
            )));
        }
        for (period, freq) in periods.iter().zip(freqs) {
            let current = self.freq(*period);
            let upgrade = *freq > 0.0 && (current == 0.0 || *freq < current);
            if allow_downgrades || upgrade {
                self.attributes.set(&period.freq_key(), *freq);
            } else {
                debug!(
                    "line '{}': keeping {} frequency {} instead of {}",
                    self.name, period, current, freq
                );
            }
        }
        Ok(())
    }

    /// Node numbers of the path, stop flags ignored.
    pub fn node_ids(&self) -> Vec<NodeNumber> {
        self.nodes.iter().map(Node::id).collect()
    }

    /// Signed node numbers of the path, negative for non-stops.
    pub fn signed_nodes(&self) -> Vec<i64> {
        self.nodes.iter().map(Node::signed).collect()
    }

    /// Stops of the line, in path order.
    pub fn stops(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_stop())
    }

    /// Number of stops.
    pub fn num_stops(&self) -> usize {
        self.stops().count()
    }

    /// Position of the first occurrence of the node, stop flag ignored.
    pub fn node_index(&self, node: i64) -> Option<usize> {
        let id = abs(node);
        self.nodes.iter().position(|n| n.id() == id)
    }

    /// Whether the path goes through the node, stop flag ignored.
    pub fn has_node(&self, node: i64) -> bool {
        self.node_index(node).is_some()
    }

    /// Whether `b` directly follows `a` on the path.
    pub fn has_link(&self, a: i64, b: i64) -> bool {
        self.link_index(a, b).is_some()
    }

    fn link_index(&self, a: i64, b: i64) -> Option<usize> {
        let (a, b) = (abs(a), abs(b));
        self.nodes
            .windows(2)
            .position(|w| w[0].id() == a && w[1].id() == b)
    }

    /// Whether `a` appears somewhere before `b` on the path.
    pub fn has_segment(&self, a: i64, b: i64) -> bool {
        match self.node_index(a) {
            Some(start) => {
                let b = abs(b);
                self.nodes[start + 1..].iter().any(|n| n.id() == b)
            }
            None => false,
        }
    }

    /// Whether the path contains the contiguous sequence, stop flags ignored.
    pub fn has_sequence(&self, sequence: &[i64]) -> bool {
        if sequence.is_empty() {
            return true;
        }
        let sequence: Vec<NodeNumber> = sequence.iter().copied().map(abs).collect();
        self.nodes.windows(sequence.len()).any(|w| {
            w.iter()
                .zip(&sequence)
                .all(|(node, id)| node.id() == *id)
        })
    }

    /// Whether the path goes twice through a node.
    pub fn has_duplicate_nodes(&self) -> bool {
        let mut seen = HashSet::new();
        !self.nodes.iter().all(|n| seen.insert(n.id()))
    }

    /// Inserts `new_node` next to the first occurrence of `reference`.
    pub fn insert_node(
        &mut self,
        reference: i64,
        new_node: NodeNumber,
        stop: bool,
        after: bool,
    ) -> Result<()> {
        let index = self.node_index(reference).ok_or_else(|| {
            Error::edit(
                &self.name,
                format!("cannot insert next to node {}, not on the line", abs(reference)),
            )
        })?;
        let at = if after { index + 1 } else { index };
        self.nodes.insert(at, Node::with_stop(new_node, stop));
        Ok(())
    }

    /// Inserts `new_node` between `a` and `b`, which must be consecutive.
    pub fn split_link(&mut self, a: i64, b: i64, new_node: NodeNumber, stop: bool) -> Result<()> {
        let index = self.link_index(a, b).ok_or_else(|| {
            Error::edit(
                &self.name,
                format!("cannot split link {}-{}, not on the line", abs(a), abs(b)),
            )
        })?;
        self.nodes.insert(index + 1, Node::with_stop(new_node, stop));
        Ok(())
    }

    /// Replaces the path up to `old_node` (`beginning`), or from `old_node`
    /// to the end, by `new_section`. `old_node` must be given with its stop
    /// sign: `-5` does not match a stop at node 5.
    pub fn extend_line(
        &mut self,
        old_node: i64,
        new_section: &[i64],
        beginning: bool,
    ) -> Result<()> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.signed() == old_node)
            .ok_or_else(|| {
                Error::edit(
                    &self.name,
                    format!(
                        "cannot extend from node {}, not on the line with this stop status",
                        old_node
                    ),
                )
            })?;
        let section = new_section.iter().map(|n| Node::new(*n));
        if beginning {
            self.nodes.splice(..=index, section);
        } else {
            self.nodes.splice(index.., section);
        }
        Ok(())
    }

    /// Position of `node` at or after `from`: exact sign first, then the
    /// opposite sign.
    fn locate_either_sign(&self, node: i64, from: usize) -> Option<usize> {
        let find = |signed: i64| {
            self.nodes[from..]
                .iter()
                .position(|n| n.signed() == signed)
                .map(|i| i + from)
        };
        find(node).or_else(|| find(-node))
    }

    /// Replaces the nodes from `n1` to `n2` included by `new_section`. The
    /// attributes of the original end nodes move to the end nodes of the new
    /// section; with `preserve_stop_status` their stop flags move as well.
    pub fn replace_segment(
        &mut self,
        n1: i64,
        n2: i64,
        new_section: &[i64],
        preserve_stop_status: bool,
    ) -> Result<()> {
        if new_section.is_empty() {
            return Err(Error::edit(&self.name, "empty replacement section"));
        }
        let start = self.locate_either_sign(n1, 0).ok_or_else(|| {
            Error::edit(&self.name, format!("segment start {} not on the line", abs(n1)))
        })?;
        let end = self.locate_either_sign(n2, start).ok_or_else(|| {
            Error::edit(
                &self.name,
                format!("segment end {} not on the line after {}", abs(n2), abs(n1)),
            )
        })?;
        let first_stop = self.nodes[start].is_stop();
        let last_stop = self.nodes[end].is_stop();
        let first_attributes = self.nodes[start].attributes.clone();
        let last_attributes = self.nodes[end].attributes.clone();
        let mut section: Vec<Node> = new_section.iter().map(|n| Node::new(*n)).collect();
        let last_index = section.len() - 1;
        section[0].attributes = first_attributes;
        section[last_index].attributes.extend(last_attributes);
        if preserve_stop_status {
            section[0].set_stop(first_stop);
            section[last_index].set_stop(last_stop);
        }
        self.nodes.splice(start..=end, section);
        Ok(())
    }

    /// Removes the first occurrence of the node, stop flag ignored.
    pub fn remove_node(&mut self, node: i64) -> Result<Node> {
        let index = self.node_index(node).ok_or_else(|| {
            Error::edit(&self.name, format!("cannot remove node {}, not on the line", abs(node)))
        })?;
        Ok(self.nodes.remove(index))
    }

    /// Turns the line into its opposite direction: the path is reversed and
    /// `R` is appended to the name, truncated first to fit Cube's limit.
    pub fn reverse(&mut self) {
        let mut name: String = self.name.chars().take(MAX_NAME_LENGTH - 1).collect();
        name.push('R');
        self.name = name;
        self.nodes.reverse();
    }

    /// Renders the line in the `.lin` format: `NAME` first, other attributes
    /// in key order, one node per line.
    pub fn line_file_repr(&self) -> String {
        let comment = CommentParts::new(self.comment.as_deref());
        let mut repr = comment.open("LINE");
        repr.push_str(&format!("NAME={}", Value::Quoted(self.name.clone())));
        let attributes = self.attributes.render(|_, _| true);
        if !attributes.is_empty() {
            repr.push_str(", ");
            repr.push_str(&attributes);
        }
        if !self.nodes.is_empty() {
            repr.push(',');
        }
        comment.close(&mut repr);
        let mut n_equals = true;
        for (i, node) in self.nodes.iter().enumerate() {
            repr.push('\n');
            repr.push_str(&node.line_file_repr(n_equals, i + 1 == self.nodes.len()));
            n_equals = node.has_written_attributes();
        }
        repr
    }
}

fn strip_quotes(name: &str) -> &str {
    let name = name.trim();
    for quote in &['"', '\''] {
        if let Some(stripped) = name
            .strip_prefix(*quote)
            .and_then(|n| n.strip_suffix(*quote))
        {
            return stripped;
        }
    }
    name
}

impl fmt::Display for TransitLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line_file_repr())
    }
}
