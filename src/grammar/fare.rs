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
use super::transit::{attribute_record, ValueKind};
use super::{ParseNode, Production, Span};
use crate::error::Result;

fn farelinks_value(name: &str) -> ValueKind {
    match name {
        "L" => ValueKind::NodePairList,
        "MODES" => ValueKind::NumSeq,
        _ => ValueKind::Plain,
    }
}

fn costs(s: &mut Scanner<'_>, children: &mut Vec<ParseNode>) -> Result<()> {
    loop {
        match s.number(Production::Cost) {
            Some(cost) => children.push(cost),
            None => return Err(s.error(s.pos(), "expected a fare")),
        }
        let resume = s.pos();
        if !s.comma() {
            break;
        }
        s.skip_spaces();
        if s.peek().map_or(true, |c| !c.is_ascii_digit()) {
            s.set_pos(resume);
            break;
        }
    }
    Ok(())
}

fn finish(
    s: &mut Scanner<'_>,
    production: Production,
    start: usize,
    mut children: Vec<ParseNode>,
) -> ParseNode {
    children.extend(s.trailing_comment());
    let end = children.last().map_or(start, |c| c.span.end);
    ParseNode::new(production, Span { start, end }, children)
}

/// `XFARE[from][to]=cost` or `XFARE[from]=cost,cost,...`
fn xfare(s: &mut Scanner<'_>) -> Result<ParseNode> {
    let start = s.pos();
    let mut children: Vec<ParseNode> = s.keyword("XFARE").into_iter().collect();
    while s.peek() == Some(b'[') {
        s.expect_char(b'[', "'['")?;
        match s.uint(Production::XfareIndex) {
            Some(index) => children.push(index),
            None => return Err(s.error(s.pos(), "expected a mode number")),
        }
        s.expect_char(b']', "']'")?;
    }
    if children.len() < 2 {
        return Err(s.error(s.pos(), "expected '[' after XFARE"));
    }
    s.equals()?;
    costs(s, &mut children)?;
    Ok(finish(s, Production::Xfare, start, children))
}

/// `a-b=cost`
fn od_fare(s: &mut Scanner<'_>) -> Result<ParseNode> {
    let start = s.pos();
    let pair = match s.node_pair() {
        Some(pair) => pair,
        None => return Err(s.error(start, "expected an origin-destination node pair")),
    };
    s.equals()?;
    let mut children = vec![pair];
    costs(s, &mut children)?;
    if children.len() > 2 {
        return Err(s.error(children[2].span.start, "an origin-destination fare has one price"));
    }
    Ok(finish(s, Production::OdFare, start, children))
}

pub(super) fn fare_file(s: &mut Scanner<'_>) -> Result<Vec<ParseNode>> {
    let mut nodes = Vec::new();
    loop {
        nodes.extend(s.smcw()?);
        if s.at_end() {
            break;
        }
        let record = if s.peek_keyword("FARELINKS") {
            attribute_record(
                s,
                "FARELINKS",
                Production::Farelinks,
                Production::FarelinksAttr,
                &farelinks_value,
            )?
        } else if s.peek_keyword("XFARE") {
            xfare(s)?
        } else if s.peek_int() {
            od_fare(s)?
        } else {
            return Err(s.error(
                s.pos(),
                "expected FARELINKS, XFARE or an origin-destination fare",
            ));
        };
        nodes.push(record);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::super::parse_fares;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fare_records() {
        let src = "; fares\nFARELINKS FARE=250, L=1001-1002 1003-1004, MODES=11-12, ONEWAY=T\n\
                   XFARE[11][12]=50 ; bus to rail\nXFARE[21]=0,25,50\n1001-2002=300\n";
        let tree = parse_fares("test.fare", src).unwrap();
        let productions: Vec<_> = tree.nodes.iter().map(|n| n.production).collect();
        assert_eq!(
            vec![
                Production::Smcw,
                Production::Farelinks,
                Production::Xfare,
                Production::Xfare,
                Production::OdFare
            ],
            productions
        );
        let links = tree.nodes[1]
            .children_of(Production::FarelinksAttr)
            .nth(1)
            .unwrap();
        assert_eq!(
            2,
            links
                .child(Production::NodePairList)
                .unwrap()
                .children
                .len()
        );
        assert_eq!(2, tree.nodes[2].children_of(Production::XfareIndex).count());
        assert_eq!(3, tree.nodes[3].children_of(Production::Cost).count());
    }

    #[test]
    fn xfare_needs_an_index() {
        let err = parse_fares("bad.fare", "XFARE=5").unwrap_err();
        assert_eq!("bad.fare:1:6: expected '[' after XFARE", err.to_string());
    }
}
