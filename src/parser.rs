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

//! Conversion of parse trees into network records.
//!
//! A parsed file becomes a [`Network`] fragment: every record lands in its
//! family, in file order, and the comments found between records are kept
//! as comment entries of the family the file belongs to.

use crate::attributes::{Attributes, Value};
use crate::error::{Error, Result};
use crate::grammar::{self, ParseNode, ParseTree, Production};
use crate::network::{FileFamily, Keyed, Network, Records};
use crate::node_names::NodeNames;
use crate::objects::{
    AccessLink, AccessTag, Fare, FarelinksFare, Link, LinkKind, Node, NodeNumber, NodePair,
    PnrLink, TransitLine,
};
use tracing::debug;

/// Converts line, link, park-and-ride, zone access and access link files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitParser<'n> {
    node_names: Option<&'n NodeNames>,
}

impl<'n> TransitParser<'n> {
    /// Parser leaving node descriptions empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser filling node descriptions from `node_names`.
    pub fn with_node_names(node_names: &'n NodeNames) -> Self {
        TransitParser {
            node_names: Some(node_names),
        }
    }

    /// Parses `text`. Top level comments go to `family`, and so do access
    /// links when `family` is [`FileFamily::Xfer`].
    pub fn parse(&self, source_name: &str, text: &str, family: FileFamily) -> Result<Network> {
        let tree = grammar::parse_transit(source_name, text)?;
        let mut network = Network::new(source_name);
        for node in &tree.nodes {
            match node.production {
                Production::Smcw => {
                    for comment in raw_comments(&tree, node) {
                        push_comment(&mut network, family, comment);
                    }
                }
                Production::Line => {
                    for line in self.lines(&tree, node)? {
                        network.lines.push(line);
                    }
                }
                Production::Link => network.links.push(link(&tree, node)?),
                Production::Supplink => network.supplinks.push(link(&tree, node)?),
                Production::Zac => network.zacs.push(link(&tree, node)?),
                Production::Pnr => network.pnrs.push(pnr(&tree, node)?),
                Production::AccessLi => {
                    let access = access_link(&tree, node)?;
                    if family == FileFamily::Xfer {
                        network.xfers.push(access);
                    } else {
                        network.access.push(access);
                    }
                }
                other => return Err(tree.error_at(node, format!("unexpected {}", other))),
            }
        }
        debug!(
            source = %source_name,
            lines = network.lines.len(),
            links = network.links.len() + network.supplinks.len(),
            "Parsed"
        );
        Ok(network)
    }

    /// A `LINE` block: `NAME=` opens a line, every other attribute and the
    /// nodes belong to the line opened last. Comments just ahead of a
    /// `NAME=` belong to the line it opens.
    fn lines(&self, tree: &ParseTree<'_>, record: &ParseNode) -> Result<Vec<TransitLine>> {
        let mut lines: Vec<TransitLine> = Vec::new();
        let mut pending_comments = Vec::new();
        for (i, child) in record.children.iter().enumerate() {
            match child.production {
                Production::Smcw => {
                    let opens_line = record
                        .children
                        .get(i + 1)
                        .map_or(false, |next| is_name_attribute(tree, next));
                    match lines.last_mut() {
                        Some(line) if !opens_line => {
                            append_comments(&mut line.comment, comments(tree, child))
                        }
                        _ => pending_comments.extend(comments(tree, child)),
                    }
                }
                Production::LinAttr => {
                    let (name, value) = attribute(tree, child)?;
                    if name == "NAME" {
                        let mut line = TransitLine::new(&value.as_str());
                        append_comments(&mut line.comment, pending_comments.drain(..).collect());
                        lines.push(line);
                    } else {
                        match lines.last_mut() {
                            Some(line) => {
                                line.attributes.set(&name, value);
                            }
                            None => return Err(structure_error(tree, child, &name)),
                        }
                    }
                }
                Production::LinNode => {
                    let line = lines
                        .last_mut()
                        .ok_or_else(|| structure_error(tree, child, "N"))?;
                    line.nodes.push(self.node(tree, child)?);
                }
                _ => {}
            }
        }
        Ok(lines)
    }

    fn node(&self, tree: &ParseTree<'_>, lin_node: &ParseNode) -> Result<Node> {
        let number = lin_node
            .child(Production::NodeNum)
            .ok_or_else(|| tree.error_at(lin_node, "expected a node number"))?;
        let mut node = Node::new(signed_node_number(tree, number)?);
        for child in &lin_node.children {
            match child.production {
                Production::Smcw => append_comments(&mut node.comment, comments(tree, child)),
                Production::LinNodeAttr => {
                    let (name, value) = attribute(tree, child)?;
                    node.attributes.set(&name, value);
                }
                _ => {}
            }
        }
        node.description = self
            .node_names
            .and_then(|names| names.get(node.id()))
            .map(str::to_string);
        Ok(node)
    }
}

/// Converts `.fare` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FareParser;

impl FareParser {
    /// Parses `text` into the fares of a fragment.
    pub fn parse(&self, source_name: &str, text: &str) -> Result<Network> {
        let tree = grammar::parse_fares(source_name, text)?;
        let mut network = Network::new(source_name);
        for node in &tree.nodes {
            match node.production {
                Production::Smcw => {
                    for comment in raw_comments(&tree, node) {
                        network.fares.push_comment(comment);
                    }
                }
                Production::Farelinks => network.fares.push(farelinks(&tree, node)?),
                Production::Xfare => {
                    for fare in xfares(&tree, node)? {
                        network.fares.push(fare);
                    }
                }
                Production::OdFare => network.fares.push(od_fare(&tree, node)?),
                other => return Err(tree.error_at(node, format!("unexpected {}", other))),
            }
        }
        debug!(source = %source_name, fares = network.fares.len(), "Parsed");
        Ok(network)
    }
}

/// Parses `text` as a file of `family`.
pub fn parse_str(
    source_name: &str,
    text: &str,
    family: FileFamily,
    node_names: Option<&NodeNames>,
) -> Result<Network> {
    match family {
        FileFamily::Fares => FareParser.parse(source_name, text),
        _ => {
            let parser = match node_names {
                Some(names) => TransitParser::with_node_names(names),
                None => TransitParser::new(),
            };
            parser.parse(source_name, text, family)
        }
    }
}

fn push_comment(network: &mut Network, family: FileFamily, comment: String) {
    fn push<T: Keyed>(records: &mut Records<T>, comment: String) {
        records.push_comment(comment);
    }
    match family {
        FileFamily::Lines => push(&mut network.lines, comment),
        FileFamily::Links => push(&mut network.links, comment),
        FileFamily::Pnr => push(&mut network.pnrs, comment),
        FileFamily::Zac => push(&mut network.zacs, comment),
        FileFamily::Access => push(&mut network.access, comment),
        FileFamily::Xfer => push(&mut network.xfers, comment),
        FileFamily::Fares => push(&mut network.fares, comment),
    }
}

/// Comment lines of a top level comment run, `;` included. Block comments
/// are dropped.
fn raw_comments(tree: &ParseTree<'_>, smcw: &ParseNode) -> Vec<String> {
    smcw.children_of(Production::SemicolonComment)
        .map(|c| tree.text(c).trim_end().to_string())
        .collect()
}

/// Text of the `;` comments attached to a record, without the `;`.
fn comments(tree: &ParseTree<'_>, smcw: &ParseNode) -> Vec<String> {
    smcw.children_of(Production::SemicolonComment)
        .map(|c| tree.text(c)[1..].trim().to_string())
        .collect()
}

fn append_comments(comment: &mut Option<String>, parts: Vec<String>) {
    for part in parts {
        match comment {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(&part);
            }
            None => *comment = Some(part),
        }
    }
}

fn is_name_attribute(tree: &ParseTree<'_>, node: &ParseNode) -> bool {
    node.production == Production::LinAttr
        && node
            .children
            .first()
            .map_or(false, |name| tree.text(name).eq_ignore_ascii_case("NAME"))
}

fn record_comment(tree: &ParseTree<'_>, record: &ParseNode) -> Option<String> {
    let mut comment = None;
    for smcw in record.children_of(Production::Smcw) {
        append_comments(&mut comment, comments(tree, smcw));
    }
    comment
}

fn structure_error(tree: &ParseTree<'_>, node: &ParseNode, attribute: &str) -> Error {
    let (line, column) = tree.position(node);
    Error::Structure {
        source_name: tree.source_name().to_string(),
        line,
        column,
        attribute: attribute.to_string(),
    }
}

fn signed_node_number(tree: &ParseTree<'_>, node: &ParseNode) -> Result<i64> {
    let text = tree.text(node);
    match text.parse::<i64>() {
        Ok(n) if n != 0 && n.unsigned_abs() <= u64::from(NodeNumber::MAX) => Ok(n),
        _ => Err(tree.error_at(node, format!("invalid node number '{}'", text))),
    }
}

fn node_number(tree: &ParseTree<'_>, node: &ParseNode) -> Result<NodeNumber> {
    let signed = signed_node_number(tree, node)?;
    if signed < 0 {
        return Err(tree.error_at(node, format!("invalid node number '{}'", signed)));
    }
    Ok(signed as NodeNumber)
}

fn node_pair(tree: &ParseTree<'_>, pair: &ParseNode) -> Result<NodePair> {
    let mut numbers = pair.children_of(Production::NodeNum);
    match (numbers.next(), numbers.next()) {
        (Some(a), Some(b)) => Ok(NodePair::new(
            node_number(tree, a)?,
            node_number(tree, b)?,
        )),
        _ => Err(tree.error_at(pair, "expected a node pair")),
    }
}

fn value(tree: &ParseTree<'_>, node: &ParseNode) -> Value {
    let text = tree.text(node);
    match node.production {
        Production::NumSeq => {
            Value::Sequence(text.chars().filter(|c| !c.is_whitespace()).collect())
        }
        Production::AttrValue
            if text.len() >= 2 && (text.starts_with('"') || text.starts_with('\'')) =>
        {
            Value::Quoted(text[1..text.len() - 1].to_string())
        }
        _ => Value::from_token(text, false),
    }
}

/// Name and value of an attribute.
fn attribute(tree: &ParseTree<'_>, attr: &ParseNode) -> Result<(String, Value)> {
    let (name, value_node) = attribute_nodes(tree, attr)?;
    Ok((name, value(tree, value_node)))
}

fn attribute_nodes<'t>(
    tree: &ParseTree<'_>,
    attr: &'t ParseNode,
) -> Result<(String, &'t ParseNode)> {
    match (attr.children.first(), attr.children.get(1)) {
        (Some(name), Some(value)) => Ok((Attributes::canonical_key(tree.text(name)), value)),
        _ => Err(tree.error_at(attr, "expected an attribute")),
    }
}

/// `LINK`, `SUPPLINK` and `ZONEACCESS` records: the node pair attribute is
/// the identity of the record.
fn link<K: LinkKind>(tree: &ParseTree<'_>, record: &ParseNode) -> Result<Link<K>> {
    let mut nodes = None;
    let mut attributes = Attributes::new();
    let is_attribute = |c: &&ParseNode| {
        matches!(
            c.production,
            Production::LinkAttr | Production::SupplinkAttr | Production::ZacAttr
        )
    };
    for attr in record.children.iter().filter(is_attribute) {
        let (name, value_node) = attribute_nodes(tree, attr)?;
        if value_node.production == Production::NodePair {
            nodes = Some(node_pair(tree, value_node)?);
        } else {
            attributes.set(&name, value(tree, value_node));
        }
    }
    let nodes = nodes.ok_or_else(|| {
        tree.error_at(
            record,
            format!("{} record without {}", K::KEYWORD, K::NODES_KEY),
        )
    })?;
    let mut link = Link::<K>::new(nodes.a, nodes.b);
    link.attributes = attributes;
    link.comment = record_comment(tree, record);
    Ok(link)
}

fn pnr(tree: &ParseTree<'_>, record: &ParseNode) -> Result<PnrLink> {
    let mut nodes = None;
    let mut attributes = Attributes::new();
    for attr in record.children_of(Production::PnrAttr) {
        let (name, value_node) = attribute_nodes(tree, attr)?;
        match value_node.production {
            Production::NodePair if name == "NODE" => {
                let pair = node_pair(tree, value_node)?;
                nodes = Some((pair.a, Some(pair.b)));
            }
            Production::NodeNum if name == "NODE" => {
                nodes = Some((node_number(tree, value_node)?, None));
            }
            _ => {
                attributes.set(&name, value(tree, value_node));
            }
        }
    }
    let (station, lot) = nodes.ok_or_else(|| tree.error_at(record, "PNR record without NODE"))?;
    let mut pnr = PnrLink::new(station, lot);
    pnr.attributes = attributes;
    pnr.comment = record_comment(tree, record);
    Ok(pnr)
}

fn access_link(tree: &ParseTree<'_>, record: &ParseNode) -> Result<AccessLink> {
    let mut numbers = record.children_of(Production::NodeNum);
    let nodes = match (numbers.next(), numbers.next()) {
        (Some(a), Some(b)) => NodePair::new(node_number(tree, a)?, node_number(tree, b)?),
        _ => return Err(tree.error_at(record, "expected two node numbers")),
    };
    let mut access = AccessLink::new(nodes);
    access.tag = record.child(Production::AccessTag).map(|tag| {
        if tree.text(tag).eq_ignore_ascii_case("PNR") {
            AccessTag::Pnr
        } else {
            AccessTag::Wnr
        }
    });
    if let Some(value) = record.child(Production::AccessValue) {
        let text = tree.text(value);
        access.value = Some(
            text.parse()
                .map_err(|_| tree.error_at(value, format!("invalid number '{}'", text)))?,
        );
    }
    access.comment = record_comment(tree, record);
    Ok(access)
}

/// Prices are integer cents.
fn cents(tree: &ParseTree<'_>, node: &ParseNode, text: &str) -> Result<u32> {
    text.parse::<u32>()
        .map_err(|_| tree.error_at(node, format!("invalid fare '{}' (expected cents)", text)))
}

fn farelinks(tree: &ParseTree<'_>, record: &ParseNode) -> Result<Fare> {
    let mut price = None;
    let mut transfers = None;
    let mut farelinks = FarelinksFare {
        links: Vec::new(),
        modes: Vec::new(),
        one_way: None,
        attributes: Attributes::new(),
    };
    for attr in record.children_of(Production::FarelinksAttr) {
        let (name, value_node) = attribute_nodes(tree, attr)?;
        match name.as_str() {
            "FARE" => price = Some(cents(tree, value_node, tree.text(value_node))?),
            "L" if value_node.production == Production::NodePairList => {
                for pair in value_node.children_of(Production::NodePair) {
                    farelinks.links.push(node_pair(tree, pair)?);
                }
            }
            "MODES" => farelinks.modes = value(tree, value_node).expand_sequence(),
            "ONEWAY" => farelinks.one_way = value(tree, value_node).as_bool(),
            "TRANSFERS" => transfers = value(tree, value_node).as_u32(),
            _ => {
                farelinks.attributes.set(&name, value(tree, value_node));
            }
        }
    }
    let price = price.ok_or_else(|| tree.error_at(record, "FARELINKS record without FARE"))?;
    if farelinks.links.is_empty() {
        return Err(tree.error_at(record, "FARELINKS record without L"));
    }
    let mut fare = Fare::farelinks(farelinks, price);
    fare.transfers = transfers;
    fare.comment = record_comment(tree, record);
    Ok(fare)
}

/// `XFARE[from][to]=cost`, or `XFARE[from]=c1,c2,...` for the transfers to
/// modes 1, 2, ... A list after two indices starts at the second index.
fn xfares(tree: &ParseTree<'_>, record: &ParseNode) -> Result<Vec<Fare>> {
    let indices = record
        .children_of(Production::XfareIndex)
        .map(|index| {
            let text = tree.text(index);
            text.parse::<u32>()
                .map_err(|_| tree.error_at(index, format!("invalid mode '{}'", text)))
        })
        .collect::<Result<Vec<_>>>()?;
    let (from_mode, first_to_mode) = match indices.as_slice() {
        [from] => (*from, 1),
        [from, to] => (*from, *to),
        _ => return Err(tree.error_at(record, "XFARE takes one or two mode indices")),
    };
    let mut fares = Vec::new();
    for (offset, cost) in record.children_of(Production::Cost).enumerate() {
        let price = cents(tree, cost, tree.text(cost))?;
        fares.push(Fare::transfer(from_mode, first_to_mode + offset as u32, price));
    }
    if let Some(last) = fares.last_mut() {
        last.comment = record_comment(tree, record);
    }
    Ok(fares)
}

fn od_fare(tree: &ParseTree<'_>, record: &ParseNode) -> Result<Fare> {
    let pair = record
        .child(Production::NodePair)
        .ok_or_else(|| tree.error_at(record, "expected an origin-destination node pair"))?;
    let nodes = node_pair(tree, pair)?;
    let cost = record
        .child(Production::Cost)
        .ok_or_else(|| tree.error_at(record, "expected a fare"))?;
    let mut fare = Fare::od(nodes.a, nodes.b, cents(tree, cost, tree.text(cost))?);
    fare.comment = record_comment(tree, record);
    Ok(fare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{FareRule, TimePeriod};
    use pretty_assertions::assert_eq;

    fn parse_lines(text: &str) -> Network {
        TransitParser::new()
            .parse("test.lin", text, FileFamily::Lines)
            .unwrap()
    }

    #[test]
    fn line_with_frequencies() {
        let network = parse_lines(
            "LINE NAME=\"10\",MODE=11,ONEWAY=T, FREQ[1]=10,FREQ[2]=10,FREQ[3]=10,FREQ[4]=10,FREQ[5]=10, N=1001,N=-1002,N=1003",
        );
        let line = network.lookup_by_name("10").unwrap();
        assert_eq!(vec![1001, 1002, 1003], line.node_ids());
        let stops: Vec<bool> = line.nodes.iter().map(Node::is_stop).collect();
        assert_eq!(vec![true, false, true], stops);
        assert_eq!(10.0, line.get_freq("AM").unwrap());
        assert_eq!(10.0, line.freq(TimePeriod::EA));
        assert_eq!(Some(11), line.mode());
    }

    #[test]
    fn name_opens_a_new_line() {
        let network =
            parse_lines("LINE NAME=\"A\", MODE=1, N=1, 2\nLINE NAME='B', MODE=2, N=3, 4");
        let names: Vec<&str> = network.iterate().map(TransitLine::name).collect();
        assert_eq!(vec!["A", "B"], names);
        assert_eq!(Some(2), network.lookup_by_name("B").unwrap().mode());
    }

    #[test]
    fn name_inside_a_block_opens_a_new_line() {
        let network = parse_lines(
            "LINE NAME=\"A\", MODE=1, N=1, 2,\n; about B\n NAME=\"B\", MODE=2, N=3, 4",
        );
        let names: Vec<&str> = network.iterate().map(TransitLine::name).collect();
        assert_eq!(vec!["A", "B"], names);
        let a = network.lookup_by_name("A").unwrap();
        assert_eq!(vec![1, 2], a.node_ids());
        assert!(a.nodes[1].attributes.is_empty());
        assert_eq!(None, a.comment);
        let b = network.lookup_by_name("B").unwrap();
        assert_eq!(Some(2), b.mode());
        assert_eq!(vec![3, 4], b.node_ids());
        assert_eq!(Some("about B"), b.comment.as_deref());
    }

    #[test]
    fn line_comments_with_several_parts_survive_a_round_trip() {
        let mut network = parse_lines(
            "LINE NAME=\"A\", MODE=1, ; about A\n ; before one\n N=1,\n ; before two\n 2 ; after two\n",
        );
        assert_eq!(1, network.lines.entries().len());
        let line = network.lookup_by_name("A").unwrap();
        assert_eq!(Some("about A"), line.comment.as_deref());
        assert_eq!(Some("before one"), line.nodes[0].comment.as_deref());
        assert_eq!(Some("before two\nafter two"), line.nodes[1].comment.as_deref());

        network.line_mut("A").unwrap().comment = Some("about A\nmore about A".to_string());
        let reparsed = parse_lines(&network.serialize(FileFamily::Lines));
        assert_eq!(network.lines.entries(), reparsed.lines.entries());
    }

    #[test]
    fn record_comments_with_several_parts_survive_a_round_trip() {
        let links = TransitParser::new()
            .parse(
                "test.link",
                "LINK NODES=1-2,\n ; note\n DIST=5 ; trailing\nSUPPLINK N=3-4, MODE=2\n",
                FileFamily::Links,
            )
            .unwrap();
        let link = links.links.lookup_by_name("1-2").unwrap();
        assert_eq!(Some("note\ntrailing"), link.comment.as_deref());
        let reparsed = TransitParser::new()
            .parse("test.link", &links.serialize(FileFamily::Links), FileFamily::Links)
            .unwrap();
        assert_eq!(links.links.entries(), reparsed.links.entries());
        assert_eq!(links.supplinks.entries(), reparsed.supplinks.entries());

        let mut pnrs = TransitParser::new()
            .parse("test.pnr", "PNR NODE=5-6, ZONES=1-3 ; lot", FileFamily::Pnr)
            .unwrap();
        pnrs.pnrs.lookup_by_name_mut("5-6").unwrap().comment = Some("lot\nclosed".to_string());
        let reparsed = TransitParser::new()
            .parse("test.pnr", &pnrs.serialize(FileFamily::Pnr), FileFamily::Pnr)
            .unwrap();
        assert_eq!(pnrs.pnrs.entries(), reparsed.pnrs.entries());

        let fares = FareParser
            .parse(
                "test.fare",
                "FARELINKS FARE=250, ; downtown\n L=1-2, MODES=11 ; peak only\n",
            )
            .unwrap();
        let fare = fares.fares.iter().next().unwrap();
        assert_eq!(Some("downtown\npeak only"), fare.comment.as_deref());
        let reparsed = FareParser
            .parse("test.fare", &fares.serialize(FileFamily::Fares))
            .unwrap();
        assert_eq!(fares.fares.entries(), reparsed.fares.entries());
    }

    #[test]
    fn attribute_before_name() {
        let err = TransitParser::new()
            .parse("bad.lin", "LINE MODE=11, NAME=\"10\", N=1", FileFamily::Lines)
            .unwrap_err();
        assert_eq!(
            "bad.lin:1:6: attribute 'MODE' appears before any NAME=",
            err.to_string()
        );
    }

    #[test]
    fn node_zero_is_invalid() {
        let err = TransitParser::new()
            .parse("bad.lin", "LINE NAME=\"10\", N=1, 0", FileFamily::Lines)
            .unwrap_err();
        assert_eq!("bad.lin:1:22: invalid node number '0'", err.to_string());
    }

    #[test]
    fn comments_are_kept() {
        let network = parse_lines(
            ";;<<PT>>;;\nLINE NAME=\"10\", MODE=11 ; crosstown\n N=1, ACCESS=2 ; first stop\n 2\n; next line\n/* block */\nLINE NAME=\"20\", N=3, 4",
        );
        let entries = network.lines.entries();
        assert_eq!(
            crate::network::Entry::Comment(";;<<PT>>;;".to_string()),
            entries[0]
        );
        assert_eq!(
            crate::network::Entry::Comment("; next line".to_string()),
            entries[2]
        );
        assert_eq!(4, entries.len());
        let line = network.lookup_by_name("10").unwrap();
        assert_eq!(Some("crosstown"), line.comment.as_deref());
        assert_eq!(Some("first stop"), line.nodes[0].comment.as_deref());
        assert!(!line.nodes[0].boarding_allowed());
    }

    #[test]
    fn node_descriptions() {
        let mut names = NodeNames::default();
        names.insert(1001, "Market St");
        let network = TransitParser::with_node_names(&names)
            .parse("test.lin", "LINE NAME=\"10\", N=1001, -1002", FileFamily::Lines)
            .unwrap();
        let line = network.lookup_by_name("10").unwrap();
        assert_eq!(Some("Market St"), line.nodes[0].description.as_deref());
        assert_eq!(None, line.nodes[1].description);
    }

    #[test]
    fn link_families() {
        let network = TransitParser::new()
            .parse(
                "test.link",
                "; walk links\nLINK NODES=1-2, DIST=50, MODES=1-3 ; walk\nSUPPLINK N=3-4, MODE=2\n",
                FileFamily::Links,
            )
            .unwrap();
        let link = network.links.lookup_by_name("1-2").unwrap();
        assert_eq!(Some(50.0), link.distance());
        assert_eq!(Some(&Value::Sequence("1-3".to_string())), link.attributes.get("MODES"));
        assert_eq!(Some("walk"), link.comment.as_deref());
        assert!(network.supplinks.lookup_by_name("3-4").unwrap().is_one_way());
        assert_eq!(2, network.links.entries().len());
    }

    #[test]
    fn pnr_zac_and_access() {
        let pnr = TransitParser::new()
            .parse("test.pnr", "PNR NODE=5-6, ZONES=1-3,7", FileFamily::Pnr)
            .unwrap();
        let lot = pnr.pnrs.lookup_by_name("5-6").unwrap();
        assert_eq!(Some(6), lot.lot());
        assert_eq!(vec![1, 2, 3, 7], lot.zones());
        let zac = TransitParser::new()
            .parse("test.zac", "ZONEACCESS LINK=4-1001, MODE=1", FileFamily::Zac)
            .unwrap();
        assert_eq!(4, zac.zacs.lookup_by_name("4-1001").unwrap().zone());
        let xfer = TransitParser::new()
            .parse("test.xfer", "1001 2002 wnr 1.5 ; walk\n", FileFamily::Xfer)
            .unwrap();
        let access = xfer.xfers.lookup_by_name("1001-2002").unwrap();
        assert_eq!(Some(AccessTag::Wnr), access.tag);
        assert_eq!(Some(1.5), access.value);
        assert!(xfer.access.is_empty());
    }

    #[test]
    fn fares() {
        let network = FareParser
            .parse(
                "test.fare",
                "FARELINKS FARE=250, L=1001-1002 1003-1004, MODES=11-12, ONEWAY=F\nXFARE[11][12]=50\nXFARE[21]=0,25\n1001-2002=300 ; airport\n",
            )
            .unwrap();
        let fares: Vec<&Fare> = network.fares.iter().collect();
        assert_eq!(5, fares.len());
        match &fares[0].rule {
            FareRule::Farelinks(farelinks) => {
                assert_eq!(vec![11, 12], farelinks.modes);
                assert_eq!(8, farelinks.expand().len());
            }
            other => panic!("unexpected rule {:?}", other),
        }
        assert_eq!("XFARE[21][2]", fares[3].key());
        assert_eq!(25, fares[3].price);
        assert_eq!(Some("airport"), fares[4].comment.as_deref());
        assert_eq!(300, fares[4].price);
    }

    #[test]
    fn fares_are_cents() {
        let err = FareParser.parse("bad.fare", "1-2=2.5").unwrap_err();
        assert_eq!("bad.fare:1:5: invalid fare '2.5' (expected cents)", err.to_string());
    }
}
