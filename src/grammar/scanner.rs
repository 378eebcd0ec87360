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

//! Character level scanning shared by the transit and fare grammars.

use super::{ParseNode, Production, Span};
use crate::error::{Error, Result};

pub(crate) struct Scanner<'a> {
    source_name: &'a str,
    src: &'a str,
    pos: usize,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_bare_value_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'.' || c == b'_'
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source_name: &'a str, src: &'a str) -> Self {
        Scanner {
            source_name,
            src,
            pos: 0,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn text(&self, node: &ParseNode) -> &'a str {
        let src = self.src;
        &src[node.span.start..node.span.end]
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    pub(crate) fn error(&self, at: usize, message: impl Into<String>) -> Error {
        let (line, column) = super::line_column(self.src, at);
        Error::Parse {
            source_name: self.source_name.to_string(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Blanks and tabs, never a line break.
    pub(crate) fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    /// Any run of blanks, tabs and line breaks.
    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn semicolon_comment(&mut self) -> ParseNode {
        let start = self.pos;
        while !matches!(self.peek(), None | Some(b'\n') | Some(b'\r')) {
            self.pos += 1;
        }
        ParseNode::leaf(Production::SemicolonComment, start, self.pos)
    }

    fn c_comment(&mut self) -> Result<ParseNode> {
        let start = self.pos;
        match self.src[start + 2..].find("*/") {
            Some(offset) => {
                self.pos = start + 2 + offset + 2;
                Ok(ParseNode::leaf(Production::CComment, start, self.pos))
            }
            None => Err(self.error(start, "unterminated block comment")),
        }
    }

    /// Whitespace interleaved with `;` and `/* */` comments. Pure whitespace
    /// is consumed without producing a node.
    pub(crate) fn smcw(&mut self) -> Result<Option<ParseNode>> {
        let mut children = Vec::new();
        let mut start = None;
        loop {
            self.skip_whitespace();
            match (self.peek(), self.peek_at(1)) {
                (Some(b';'), _) => {
                    start.get_or_insert(self.pos);
                    children.push(self.semicolon_comment());
                }
                (Some(b'/'), Some(b'*')) => {
                    start.get_or_insert(self.pos);
                    children.push(self.c_comment()?);
                }
                _ => break,
            }
        }
        Ok(start.map(|start| {
            let end = children.last().map_or(start, |c| c.span.end);
            ParseNode::new(Production::Smcw, Span { start, end }, children)
        }))
    }

    /// A `;` comment starting on the current physical line. The position is
    /// left untouched when there is none.
    pub(crate) fn trailing_comment(&mut self) -> Option<ParseNode> {
        let resume = self.pos;
        self.skip_spaces();
        if self.peek() == Some(b';') {
            let comment = self.semicolon_comment();
            let span = comment.span;
            Some(ParseNode::new(Production::Smcw, span, vec![comment]))
        } else {
            self.pos = resume;
            None
        }
    }

    fn keyword_end(&self, keyword: &str) -> Option<usize> {
        let end = self.pos + keyword.len();
        let candidate = self.src.get(self.pos..end)?;
        if !candidate.eq_ignore_ascii_case(keyword) {
            return None;
        }
        match self.src.as_bytes().get(end) {
            Some(c) if is_ident_char(*c) => None,
            _ => Some(end),
        }
    }

    pub(crate) fn peek_keyword(&self, keyword: &str) -> bool {
        self.keyword_end(keyword).is_some()
    }

    pub(crate) fn keyword(&mut self, keyword: &str) -> Option<ParseNode> {
        let end = self.keyword_end(keyword)?;
        let start = self.pos;
        self.pos = end;
        Some(ParseNode::leaf(Production::Keyword, start, end))
    }

    /// An attribute name, `MODE` or `FREQ[1]`.
    pub(crate) fn attr_name(&mut self) -> Option<ParseNode> {
        let start = self.pos;
        if !self.peek().map_or(false, is_ident_start) {
            return None;
        }
        while self.peek().map_or(false, is_ident_char) {
            self.pos += 1;
        }
        loop {
            let resume = self.pos;
            if self.peek() != Some(b'[') {
                break;
            }
            self.pos += 1;
            let digits = self.pos;
            while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.pos == digits || self.peek() != Some(b']') {
                self.pos = resume;
                break;
            }
            self.pos += 1;
        }
        Some(ParseNode::leaf(Production::AttrName, start, self.pos))
    }

    /// Text of the attribute name when the input continues with `NAME =`.
    pub(crate) fn peek_attr_name(&mut self) -> Option<&'a str> {
        let src = self.src;
        let resume = self.pos;
        let name = self.attr_name();
        let found = name.filter(|_| {
            self.skip_whitespace();
            self.peek() == Some(b'=')
        });
        self.pos = resume;
        found.map(|n| &src[n.span.start..n.span.end])
    }

    /// `=` with optional whitespace on both sides.
    pub(crate) fn equals(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(self.error(self.pos, "expected '='"));
        }
        self.pos += 1;
        self.skip_whitespace();
        Ok(())
    }

    /// Optional `,` possibly preceded by whitespace.
    pub(crate) fn comma(&mut self) -> bool {
        let resume = self.pos;
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            true
        } else {
            self.pos = resume;
            false
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    pub(crate) fn peek_int(&self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(c), _) if c.is_ascii_digit() => true,
            (Some(b'-'), Some(c)) => c.is_ascii_digit(),
            _ => false,
        }
    }

    /// Optionally signed integer not glued to an identifier.
    pub(crate) fn int(&mut self, production: Production) -> Option<ParseNode> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.digits() == 0 || self.peek().map_or(false, is_ident_start) {
            self.pos = start;
            return None;
        }
        Some(ParseNode::leaf(production, start, self.pos))
    }

    /// Unsigned integer.
    pub(crate) fn uint(&mut self, production: Production) -> Option<ParseNode> {
        if self.peek() == Some(b'-') {
            return None;
        }
        self.int(production)
    }

    /// Integer or decimal number.
    pub(crate) fn number(&mut self, production: Production) -> Option<ParseNode> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut count = self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            count += self.digits();
        }
        if count == 0 {
            self.pos = start;
            return None;
        }
        Some(ParseNode::leaf(production, start, self.pos))
    }

    /// A quoted or bare value.
    pub(crate) fn attr_value(&mut self) -> Result<ParseNode> {
        let start = self.pos;
        match self.peek() {
            Some(quote) if quote == b'"' || quote == b'\'' => {
                self.pos += 1;
                loop {
                    match self.peek() {
                        Some(c) if c == quote => {
                            self.pos += 1;
                            break;
                        }
                        None | Some(b'\n') | Some(b'\r') => {
                            return Err(self.error(start, "unterminated quoted string"));
                        }
                        Some(_) => self.pos += 1,
                    }
                }
            }
            _ => {
                if self.peek() == Some(b'-') {
                    self.pos += 1;
                }
                while self.peek().map_or(false, is_bare_value_char) {
                    self.pos += 1;
                }
                if self.pos == start || &self.src[start..self.pos] == "-" {
                    self.pos = start;
                    return Err(self.error(start, "expected an attribute value"));
                }
            }
        }
        Ok(ParseNode::leaf(Production::AttrValue, start, self.pos))
    }

    /// `a-b` or `a,b`.
    pub(crate) fn node_pair(&mut self) -> Option<ParseNode> {
        let start = self.pos;
        let a = self.uint(Production::NodeNum)?;
        self.skip_spaces();
        if !matches!(self.peek(), Some(b'-') | Some(b',')) {
            self.pos = start;
            return None;
        }
        self.pos += 1;
        self.skip_spaces();
        match self.uint(Production::NodeNum) {
            Some(b) => Some(ParseNode::new(
                Production::NodePair,
                Span {
                    start,
                    end: self.pos,
                },
                vec![a, b],
            )),
            None => {
                self.pos = start;
                None
            }
        }
    }

    /// `int ((-|,) int)*`, stopping before a separator that is not followed
    /// by another integer.
    pub(crate) fn num_seq(&mut self) -> Option<ParseNode> {
        let start = self.pos;
        self.uint(Production::NodeNum)?;
        loop {
            let resume = self.pos;
            self.skip_spaces();
            if !matches!(self.peek(), Some(b'-') | Some(b',')) {
                self.pos = resume;
                break;
            }
            self.pos += 1;
            self.skip_spaces();
            if self.uint(Production::NodeNum).is_none() {
                self.pos = resume;
                break;
            }
        }
        Some(ParseNode::leaf(Production::NumSeq, start, self.pos))
    }

    /// Node pairs separated by blanks or commas.
    pub(crate) fn node_pair_list(&mut self) -> Option<ParseNode> {
        let start = self.pos;
        let mut pairs = vec![self.node_pair()?];
        loop {
            let resume = self.pos;
            self.comma();
            self.skip_whitespace();
            match self.node_pair() {
                Some(pair) => pairs.push(pair),
                None => {
                    self.pos = resume;
                    break;
                }
            }
        }
        Some(ParseNode::new(
            Production::NodePairList,
            Span {
                start,
                end: self.pos,
            },
            pairs,
        ))
    }

    pub(crate) fn expect_char(&mut self, c: u8, what: &str) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(self.pos, format!("expected {}", what)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text<'a>(src: &'a str, node: &ParseNode) -> &'a str {
        &src[node.span.start..node.span.end]
    }

    #[test]
    fn keywords_are_case_insensitive() {
        for src in &["LINE NAME", "line NAME", "Line NAME"] {
            let mut scanner = Scanner::new("test", src);
            assert!(scanner.keyword("LINE").is_some());
        }
        let mut scanner = Scanner::new("test", "LINES");
        assert!(scanner.keyword("LINE").is_none());
    }

    #[test]
    fn attribute_names_with_index() {
        let src = "FREQ[1]=10";
        let mut scanner = Scanner::new("test", src);
        assert_eq!(Some("FREQ[1]"), scanner.peek_attr_name());
        let name = scanner.attr_name().unwrap();
        assert_eq!("FREQ[1]", text(src, &name));
    }

    #[test]
    fn unterminated_quote() {
        let mut scanner = Scanner::new("lines.lin", "\"abc\nN=1");
        let err = scanner.attr_value().unwrap_err();
        assert_eq!(
            "lines.lin:1:1: unterminated quoted string",
            err.to_string()
        );
    }

    #[test]
    fn comments_and_block_comments() {
        let src = "  ; first\n /* block */ ;second\nLINE";
        let mut scanner = Scanner::new("test", src);
        let smcw = scanner.smcw().unwrap().unwrap();
        assert_eq!(3, smcw.children.len());
        assert_eq!(Production::CComment, smcw.children[1].production);
        assert!(scanner.peek_keyword("LINE"));
    }

    #[test]
    fn unterminated_block_comment() {
        let mut scanner = Scanner::new("lines.lin", "; ok\n  /* no end\nLINE");
        let err = scanner.smcw().unwrap_err();
        assert_eq!("lines.lin:2:3: unterminated block comment", err.to_string());
    }

    #[test]
    fn sequences_stop_before_next_attribute() {
        let src = "1-5, 7, DIST=3";
        let mut scanner = Scanner::new("test", src);
        let seq = scanner.num_seq().unwrap();
        assert_eq!("1-5, 7", text(src, &seq));
    }
}
