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

use super::scanner::Scanner;
use super::{ParseNode, Production, Span};
use crate::error::Result;

/// What follows the `=` of a record attribute.
#[derive(Clone, Copy, PartialEq)]
pub(super) enum ValueKind {
    Plain,
    NodePair,
    NodeOrPair,
    NumSeq,
    NodePairList,
}

fn span_of(start: usize, children: &[ParseNode], fallback: usize) -> Span {
    Span {
        start,
        end: children.last().map_or(fallback, |c| c.span.end),
    }
}

fn attribute(
    s: &mut Scanner<'_>,
    production: Production,
    kind_of: &dyn Fn(&str) -> ValueKind,
) -> Result<ParseNode> {
    let start = s.pos();
    let name = match s.attr_name() {
        Some(name) => name,
        None => return Err(s.error(start, "expected an attribute name")),
    };
    let kind = kind_of(s.text(&name).to_ascii_uppercase().as_str());
    s.equals()?;
    let value_start = s.pos();
    let value = match kind {
        ValueKind::Plain => Some(s.attr_value()?),
        ValueKind::NodePair => s.node_pair(),
        ValueKind::NodeOrPair => s.node_pair().or_else(|| s.uint(Production::NodeNum)),
        ValueKind::NumSeq => s.num_seq(),
        ValueKind::NodePairList => s.node_pair_list(),
    };
    let value = match value {
        Some(value) => value,
        None => {
            let expected = match kind {
                ValueKind::NodePair => "a node pair",
                ValueKind::NodeOrPair => "a node or a node pair",
                ValueKind::NumSeq => "a number sequence",
                ValueKind::NodePairList => "a list of node pairs",
                ValueKind::Plain => "an attribute value",
            };
            return Err(s.error(value_start, format!("expected {}", expected)));
        }
    };
    let end = value.span.end;
    Ok(ParseNode::new(
        production,
        Span { start, end },
        vec![name, value],
    ))
}

/// Attaches the comment ending the current physical line, then looks past
/// whitespace and own-line comments. When `continues` accepts what follows,
/// the comments are kept and `true` is returned; otherwise the scanner is
/// rewound to just after the same-line comment.
fn next_element<F>(
    s: &mut Scanner<'_>,
    children: &mut Vec<ParseNode>,
    continues: F,
) -> Result<bool>
where
    F: Fn(&mut Scanner<'_>) -> bool,
{
    if let Some(comment) = s.trailing_comment() {
        children.push(comment);
    }
    let resume = s.pos();
    let comments = s.smcw()?;
    if !s.at_end() && continues(s) {
        children.extend(comments);
        Ok(true)
    } else {
        s.set_pos(resume);
        Ok(false)
    }
}

/// `XFARE[a][b]=cost` has the shape of an attribute but opens a record.
fn starts_record(attr_name: &str) -> bool {
    let base = attr_name.split('[').next().unwrap_or(attr_name);
    base.eq_ignore_ascii_case("XFARE")
}

/// `KEYWORD attr=value, ...` records: links, park-and-ride, zone access,
/// support links and fare links.
pub(super) fn attribute_record(
    s: &mut Scanner<'_>,
    keyword: &str,
    production: Production,
    attr_production: Production,
    kind_of: &dyn Fn(&str) -> ValueKind,
) -> Result<ParseNode> {
    let start = s.pos();
    let keyword_node = match s.keyword(keyword) {
        Some(k) => k,
        None => return Err(s.error(start, format!("expected {}", keyword))),
    };
    let keyword_end = keyword_node.span.end;
    let mut children = vec![keyword_node];
    let mut has_attributes = false;
    let is_attr = |s: &mut Scanner<'_>| {
        s.peek_attr_name()
            .map_or(false, |name| !starts_record(name))
    };
    while next_element(s, &mut children, is_attr)? {
        children.push(attribute(s, attr_production, kind_of)?);
        s.comma();
        has_attributes = true;
    }
    if !has_attributes {
        return Err(s.error(start, format!("{} record without attributes", keyword)));
    }
    Ok(ParseNode::new(
        production,
        span_of(start, &children, keyword_end),
        children,
    ))
}

fn is_node_start(s: &mut Scanner<'_>) -> bool {
    s.peek_int()
        || s
            .peek_attr_name()
            .map_or(false, |name| name.eq_ignore_ascii_case("N"))
}

fn lin_node(s: &mut Scanner<'_>) -> Result<ParseNode> {
    let start = s.pos();
    let mut children = Vec::new();
    if !s.peek_int() {
        let marker = s.attr_name();
        s.equals()?;
        if let Some(marker) = marker {
            children.push(ParseNode::leaf(
                Production::LinNodeStart,
                marker.span.start,
                marker.span.end,
            ));
        }
    }
    match s.int(Production::NodeNum) {
        Some(node) => children.push(node),
        None => return Err(s.error(s.pos(), "expected a node number")),
    }
    s.comma();
    while next_element(s, &mut children, is_node_attr)? {
        children.push(attribute(s, Production::LinNodeAttr, &|_| ValueKind::Plain)?);
        s.comma();
    }
    Ok(ParseNode::new(
        Production::LinNode,
        span_of(start, &children, start),
        children,
    ))
}

/// `N=` starts a node and `NAME=` starts a line.
fn is_node_attr(s: &mut Scanner<'_>) -> bool {
    s.peek_attr_name().map_or(false, |name| {
        !name.eq_ignore_ascii_case("N") && !name.eq_ignore_ascii_case("NAME")
    })
}

fn is_line_attr(s: &mut Scanner<'_>) -> bool {
    !is_node_start(s) && s.peek_attr_name().is_some()
}

/// A `LINE` block. Own-line comments ahead of a node belong to the node. A
/// `NAME=` after the nodes goes back to the line attributes.
fn line(s: &mut Scanner<'_>) -> Result<ParseNode> {
    let start = s.pos();
    let keyword_node = match s.keyword("LINE") {
        Some(k) => k,
        None => return Err(s.error(start, "expected LINE")),
    };
    let keyword_end = keyword_node.span.end;
    let mut children = vec![keyword_node];
    loop {
        let before = children.len();
        while next_element(s, &mut children, is_line_attr)? {
            children.push(attribute(s, Production::LinAttr, &|_| ValueKind::Plain)?);
            s.comma();
        }
        loop {
            let resume = s.pos();
            let comments = s.smcw()?;
            if s.at_end() || !is_node_start(s) {
                s.set_pos(resume);
                break;
            }
            let mut node = lin_node(s)?;
            if let Some(comments) = comments {
                node.children.insert(0, comments);
            }
            children.push(node);
        }
        if children.len() == before {
            break;
        }
    }
    if children.len() == 1 {
        return Err(s.error(start, "LINE record without attributes or nodes"));
    }
    Ok(ParseNode::new(
        Production::Line,
        span_of(start, &children, keyword_end),
        children,
    ))
}

fn link_value(name: &str) -> ValueKind {
    match name {
        "NODES" | "N" => ValueKind::NodePair,
        "MODES" => ValueKind::NumSeq,
        _ => ValueKind::Plain,
    }
}

fn pnr_value(name: &str) -> ValueKind {
    match name {
        "NODE" => ValueKind::NodeOrPair,
        "ZONES" => ValueKind::NumSeq,
        _ => ValueKind::Plain,
    }
}

fn zac_value(name: &str) -> ValueKind {
    match name {
        "LINK" => ValueKind::NodePair,
        _ => ValueKind::Plain,
    }
}

fn supplink_value(name: &str) -> ValueKind {
    match name {
        "N" => ValueKind::NodePair,
        _ => ValueKind::Plain,
    }
}

/// `nodeA nodeB [wnr|pnr] [number] [;comment]`, on a single physical line.
fn access_link(s: &mut Scanner<'_>) -> Result<ParseNode> {
    let start = s.pos();
    let mut children = Vec::new();
    match s.uint(Production::NodeNum) {
        Some(a) => children.push(a),
        None => return Err(s.error(start, "expected a node number")),
    }
    s.skip_spaces();
    match s.uint(Production::NodeNum) {
        Some(b) => children.push(b),
        None => return Err(s.error(s.pos(), "expected a second node number")),
    }
    s.skip_spaces();
    for tag in &["WNR", "PNR"] {
        if let Some(keyword) = s.keyword(tag) {
            children.push(ParseNode::leaf(
                Production::AccessTag,
                keyword.span.start,
                keyword.span.end,
            ));
            s.skip_spaces();
            break;
        }
    }
    if let Some(value) = s.number(Production::AccessValue) {
        children.push(value);
    }
    if let Some(comment) = s.trailing_comment() {
        children.push(comment);
    }
    Ok(ParseNode::new(
        Production::AccessLi,
        span_of(start, &children, start),
        children,
    ))
}

pub(super) fn transit_file(s: &mut Scanner<'_>) -> Result<Vec<ParseNode>> {
    let mut nodes = Vec::new();
    loop {
        nodes.extend(s.smcw()?);
        if s.at_end() {
            break;
        }
        let record = if s.peek_keyword("LINE") {
            line(s)?
        } else if s.peek_keyword("LINK") {
            attribute_record(s, "LINK", Production::Link, Production::LinkAttr, &link_value)?
        } else if s.peek_keyword("PNR") {
            attribute_record(s, "PNR", Production::Pnr, Production::PnrAttr, &pnr_value)?
        } else if s.peek_keyword("ZONEACCESS") {
            attribute_record(s, "ZONEACCESS", Production::Zac, Production::ZacAttr, &zac_value)?
        } else if s.peek_keyword("SUPPLINK") {
            attribute_record(
                s,
                "SUPPLINK",
                Production::Supplink,
                Production::SupplinkAttr,
                &supplink_value,
            )?
        } else if s.peek_int() {
            access_link(s)?
        } else {
            return Err(s.error(
                s.pos(),
                "expected LINE, LINK, PNR, ZONEACCESS, SUPPLINK or an access link",
            ));
        };
        nodes.push(record);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::super::parse_transit;
    use super::*;
    use pretty_assertions::assert_eq;

    fn productions(nodes: &[ParseNode]) -> Vec<Production> {
        nodes.iter().map(|n| n.production).collect()
    }

    #[test]
    fn line_with_attributes_and_nodes() {
        let src = "LINE NAME=\"10\", MODE=11, ONEWAY=T,\n N=1001, -1002, ACCESS=2, N=1003";
        let tree = parse_transit("test.lin", src).unwrap();
        assert_eq!(1, tree.nodes.len());
        let line = &tree.nodes[0];
        assert_eq!(Production::Line, line.production);
        assert_eq!(3, line.children_of(Production::LinAttr).count());
        let nodes: Vec<_> = line.children_of(Production::LinNode).collect();
        assert_eq!(3, nodes.len());
        assert!(nodes[0].child(Production::LinNodeStart).is_some());
        assert!(nodes[1].child(Production::LinNodeStart).is_none());
        assert_eq!(1, nodes[1].children_of(Production::LinNodeAttr).count());
        assert_eq!("-1002", tree.text(nodes[1].child(Production::NodeNum).unwrap()));
        assert_eq!(src.len(), line.span.end);
    }

    #[test]
    fn own_line_comment_after_record_stays_outside() {
        let src = "LINE NAME=\"A\", N=1, 2 ; end of A\n; about B\nline name=\"B\", n=3";
        let tree = parse_transit("test.lin", src).unwrap();
        assert_eq!(
            vec![Production::Line, Production::Smcw, Production::Line],
            productions(&tree.nodes)
        );
        let first_nodes: Vec<_> = tree.nodes[0].children_of(Production::LinNode).collect();
        assert!(first_nodes[1].child(Production::Smcw).is_some());
        assert_eq!("; about B", tree.text(&tree.nodes[1]));
    }

    #[test]
    fn name_after_nodes_returns_to_line_attributes() {
        let src = "LINE NAME=\"A\", N=1, 2 ; end of A\n ; before B\n NAME=\"B\", MODE=2,\n ; first of B\n N=3, 4";
        let tree = parse_transit("test.lin", src).unwrap();
        assert_eq!(1, tree.nodes.len());
        let line = &tree.nodes[0];
        assert_eq!(
            vec![
                Production::Keyword,
                Production::LinAttr,
                Production::LinNode,
                Production::LinNode,
                Production::Smcw,
                Production::LinAttr,
                Production::LinAttr,
                Production::LinNode,
                Production::LinNode
            ],
            productions(&line.children)
        );
        let b_first = &line.children[7];
        assert_eq!(Production::Smcw, b_first.children[0].production);
        assert_eq!(0, line.children[3].children_of(Production::LinNodeAttr).count());
    }

    #[test]
    fn link_records() {
        let src = "LINK NODES=1-2, DIST=50 ; walk\nPNR NODE=5, ZONES=1-3,7\nZONEACCESS LINK=4-1001, MODE=1\nSUPPLINK N=3-4, MODE=2, ONEWAY=T";
        let tree = parse_transit("test.link", src).unwrap();
        assert_eq!(
            vec![
                Production::Link,
                Production::Pnr,
                Production::Zac,
                Production::Supplink
            ],
            productions(&tree.nodes)
        );
        let pnr_zones = tree.nodes[1].children_of(Production::PnrAttr).nth(1).unwrap();
        assert_eq!("1-3,7", tree.text(pnr_zones.child(Production::NumSeq).unwrap()));
        assert!(tree.nodes[0].child(Production::Smcw).is_some());
    }

    #[test]
    fn access_lines() {
        let src = "1001 2002 wnr 1.5 ; walk\n1003 2004\n";
        let tree = parse_transit("test.access", src).unwrap();
        assert_eq!(
            vec![Production::AccessLi, Production::AccessLi],
            productions(&tree.nodes)
        );
        assert!(tree.nodes[0].child(Production::AccessTag).is_some());
        assert_eq!("1.5", tree.text(tree.nodes[0].child(Production::AccessValue).unwrap()));
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_transit("bad.lin", "LINE NAME=\"10\", MODE=").unwrap_err();
        assert_eq!("bad.lin:1:22: expected an attribute value", err.to_string());
    }

    #[test]
    fn empty_record_is_an_error() {
        let err = parse_transit("bad.lin", "LINE\n").unwrap_err();
        assert_eq!(
            "bad.lin:1:1: LINE record without attributes or nodes",
            err.to_string()
        );
    }

    #[test]
    fn unknown_production_is_an_error() {
        let err = parse_transit("bad.lin", "LINE NAME=\"10\", N=1\nBUS 12").unwrap_err();
        assert_eq!(
            "bad.lin:2:1: expected LINE, LINK, PNR, ZONEACCESS, SUPPLINK or an access link",
            err.to_string()
        );
    }
}
