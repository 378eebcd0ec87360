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

//! Grammar of the Cube transit network files.
//!
//! The text is turned into a tree of [`ParseNode`], each tagged with the
//! [`Production`] it matched and its exact byte span in the source. Records
//! are `KEYWORD ATTR=value, ATTR=value ...` sequences, line records also
//! carry a node list (`N=1001, -1002, ...`). Keywords are case-insensitive,
//! blanks and line breaks separate tokens freely, `;` starts a comment that
//! runs to the end of the line and `/* */` comments are skipped.
//!
//! ```text
//! transit_file := (smcw | line | link | pnr | zac | supplink | accessli)*
//! line         := "LINE" (lin_attr | smcw)* (lin_node | smcw)*
//! lin_attr     := attr_name "=" attr_value ","?
//! lin_node     := lin_nodestart? nodenum ","? (lin_nodeattr | smcw)*
//! lin_nodestart:= "N" "="
//! lin_nodeattr := attr_name "=" attr_value ","?
//! link         := "LINK" (link_attr | smcw)+
//! link_attr    := ("NODES" | "N") "=" nodepair | "MODES" "=" numseq
//!               | attr_name "=" attr_value
//! pnr          := "PNR" (pnr_attr | smcw)+
//! pnr_attr     := "NODE" "=" (nodepair | nodenum) | "ZONES" "=" numseq
//!               | attr_name "=" attr_value
//! zac          := "ZONEACCESS" (zac_attr | smcw)+
//! zac_attr     := "LINK" "=" nodepair | attr_name "=" attr_value
//! supplink     := "SUPPLINK" (supplink_attr | smcw)+
//! supplink_attr:= "N" "=" nodepair | attr_name "=" attr_value
//! accessli     := nodenum nodenum accesstag? number? ";comment"?
//!
//! fare_file    := (smcw | farelinks | xfare | odfare)*
//! farelinks    := "FARELINKS" (farelinks_attr | smcw)+
//! farelinks_attr := "L" "=" nodepair_list | "MODES" "=" numseq
//!               | attr_name "=" attr_value
//! xfare        := "XFARE" ("[" int "]")+ "=" cost ("," cost)*
//! odfare       := nodepair "=" cost
//!
//! nodepair     := nodenum ("-" | ",") nodenum
//! numseq       := int (("-" | ",") int)*
//! attr_value   := '"' [^"]* '"' | "'" [^']* "'" | [A-Za-z0-9._-]+
//! ```

mod fare;
mod scanner;
mod transit;

use crate::error::{Error, Result};
use std::fmt;

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First byte
    pub start: usize,
    /// One past the last byte
    pub end: usize,
}

/// Name of the production a [`ParseNode`] matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Production {
    Line,
    LinAttr,
    LinNode,
    LinNodeStart,
    LinNodeAttr,
    Link,
    LinkAttr,
    Pnr,
    PnrAttr,
    Zac,
    ZacAttr,
    Supplink,
    SupplinkAttr,
    AccessLi,
    AccessTag,
    AccessValue,
    Farelinks,
    FarelinksAttr,
    Xfare,
    XfareIndex,
    OdFare,
    Cost,
    Keyword,
    AttrName,
    AttrValue,
    NodeNum,
    NodePair,
    NodePairList,
    NumSeq,
    Smcw,
    SemicolonComment,
    CComment,
}

impl Production {
    /// Name of the production in the grammar.
    pub fn name(self) -> &'static str {
        use Production::*;
        match self {
            Line => "line",
            LinAttr => "lin_attr",
            LinNode => "lin_node",
            LinNodeStart => "lin_nodestart",
            LinNodeAttr => "lin_nodeattr",
            Link => "link",
            LinkAttr => "link_attr",
            Pnr => "pnr",
            PnrAttr => "pnr_attr",
            Zac => "zac",
            ZacAttr => "zac_attr",
            Supplink => "supplink",
            SupplinkAttr => "supplink_attr",
            AccessLi => "accessli",
            AccessTag => "accesstag",
            AccessValue => "access_value",
            Farelinks => "farelinks",
            FarelinksAttr => "farelinks_attr",
            Xfare => "xfare",
            XfareIndex => "xfare_index",
            OdFare => "odfare",
            Cost => "cost",
            Keyword => "keyword",
            AttrName => "attr_name",
            AttrValue => "attr_value",
            NodeNum => "nodenum",
            NodePair => "nodepair",
            NodePairList => "nodepair_list",
            NumSeq => "numseq",
            Smcw => "smcw",
            SemicolonComment => "semicolon_comment",
            CComment => "c_comment",
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matched production with its span and nested productions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    /// Production matched
    pub production: Production,
    /// Source span
    pub span: Span,
    /// Nested productions, in source order
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub(crate) fn new(production: Production, span: Span, children: Vec<ParseNode>) -> Self {
        ParseNode {
            production,
            span,
            children,
        }
    }

    pub(crate) fn leaf(production: Production, start: usize, end: usize) -> Self {
        Self::new(production, Span { start, end }, Vec::new())
    }

    /// First child matching `production`.
    pub fn child(&self, production: Production) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.production == production)
    }

    /// Children matching `production`.
    pub fn children_of(&self, production: Production) -> impl Iterator<Item = &ParseNode> {
        self.children
            .iter()
            .filter(move |c| c.production == production)
    }
}

/// The parse of one source text.
#[derive(Debug)]
pub struct ParseTree<'a> {
    source_name: String,
    source: &'a str,
    /// Top level productions, in source order
    pub nodes: Vec<ParseNode>,
}

impl<'a> ParseTree<'a> {
    /// File name or fragment identifier the text came from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Exact source text of a node.
    pub fn text(&self, node: &ParseNode) -> &'a str {
        let source = self.source;
        &source[node.span.start..node.span.end]
    }

    /// 1-based line and column of a node.
    pub fn position(&self, node: &ParseNode) -> (usize, usize) {
        line_column(self.source, node.span.start)
    }

    /// Parse error located at `node`.
    pub fn error_at(&self, node: &ParseNode, message: impl Into<String>) -> Error {
        let (line, column) = self.position(node);
        Error::Parse {
            source_name: self.source_name.clone(),
            line,
            column,
            message: message.into(),
        }
    }
}

pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

/// Parses line, link, park-and-ride, zone access, support link and
/// access/transfer link records.
pub fn parse_transit<'a>(source_name: &str, source: &'a str) -> Result<ParseTree<'a>> {
    let mut scanner = scanner::Scanner::new(source_name, source);
    let nodes = transit::transit_file(&mut scanner)?;
    Ok(ParseTree {
        source_name: source_name.to_string(),
        source,
        nodes,
    })
}

/// Parses `FARELINKS`, `XFARE` and origin/destination fare records.
pub fn parse_fares<'a>(source_name: &str, source: &'a str) -> Result<ParseTree<'a>> {
    let mut scanner = scanner::Scanner::new(source_name, source);
    let nodes = fare::fare_file(&mut scanner)?;
    Ok(ParseTree {
        source_name: source_name.to_string(),
        source,
        nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn positions_are_one_based() {
        let src = "LINE\n  NAME";
        assert_eq!((1, 1), line_column(src, 0));
        assert_eq!((2, 3), line_column(src, 7));
    }
}
