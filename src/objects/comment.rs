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

//! Output of record comments. A comment read from several `;` comments keeps
//! one part per line. All parts but the last are written on lines of their
//! own inside the record, the last one ends the record.

/// Parts of a record comment, split for output.
pub(crate) struct CommentParts<'c> {
    leading: Vec<&'c str>,
    last: Option<&'c str>,
}

impl<'c> CommentParts<'c> {
    pub(crate) fn new(comment: Option<&'c str>) -> Self {
        let mut leading: Vec<&str> = comment.map(|c| c.split('\n').collect()).unwrap_or_default();
        let last = leading.pop();
        CommentParts { leading, last }
    }

    /// `keyword` followed by the leading parts, ready for the first
    /// attribute: `"LINK ; a\n ; b\n "`, or `"LINK "` without them.
    pub(crate) fn open(&self, keyword: &str) -> String {
        let mut repr = String::from(keyword);
        for (i, part) in self.leading.iter().enumerate() {
            if i > 0 {
                repr.push('\n');
            }
            repr.push_str(" ; ");
            repr.push_str(part);
        }
        if self.leading.is_empty() {
            repr.push(' ');
        } else {
            repr.push_str("\n ");
        }
        repr
    }

    /// Leading parts as own-line comments ahead of a line node.
    pub(crate) fn own_lines(&self) -> String {
        self.leading
            .iter()
            .map(|part| format!(" ; {}\n", part))
            .collect()
    }

    /// Appends the last part as the trailing comment.
    pub(crate) fn close(&self, repr: &mut String) {
        if let Some(last) = self.last {
            repr.push_str(" ; ");
            repr.push_str(last);
        }
    }
}

/// Trailing comment of a record that fits on a single physical line: the
/// parts are joined on that line.
pub(crate) fn push_inline_comment(repr: &mut String, comment: &str) {
    repr.push_str(" ; ");
    repr.push_str(&comment.replace('\n', " ; "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_part_stays_trailing() {
        let parts = CommentParts::new(Some("walk"));
        let mut repr = parts.open("LINK");
        repr.push_str("NODES=1-2");
        parts.close(&mut repr);
        assert_eq!("LINK NODES=1-2 ; walk", repr);
        assert_eq!("", parts.own_lines());
    }

    #[test]
    fn leading_parts_open_the_record() {
        let parts = CommentParts::new(Some("a\nb\nc"));
        let mut repr = parts.open("LINK");
        repr.push_str("NODES=1-2");
        parts.close(&mut repr);
        assert_eq!("LINK ; a\n ; b\n NODES=1-2 ; c", repr);
        assert_eq!(" ; a\n ; b\n", parts.own_lines());
    }

    #[test]
    fn inline_parts_are_joined() {
        let mut repr = String::from("1001 2002");
        push_inline_comment(&mut repr, "a\nb");
        assert_eq!("1001 2002 ; a ; b", repr);
    }
}
