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

//! The network container: every record family of a Cube network, with the
//! comments found between records, in file order.

use crate::error::{Error, Result};
use crate::objects::{
    AccessLink, Fare, LinkKind, Link, NodeNumber, PnrLink, Supplink, TransitLine, TransitLink,
    ZacLink,
};
use crate::report::{NetworkReportCategory, Report};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Report of merges and validations.
pub type NetworkReport = Report<NetworkReportCategory>;

/// Records which can be found back from a key.
pub trait Keyed {
    /// Kind of record, used in messages
    const KIND: &'static str;
    /// Key of the record; two records with the same key describe the same
    /// thing.
    fn key(&self) -> String;
}

impl Keyed for TransitLine {
    const KIND: &'static str = "line";
    fn key(&self) -> String {
        self.name().to_string()
    }
}

impl<K: LinkKind> Keyed for Link<K> {
    const KIND: &'static str = K::KIND;
    fn key(&self) -> String {
        self.id().to_string()
    }
}

impl Keyed for PnrLink {
    const KIND: &'static str = "park-and-ride";
    fn key(&self) -> String {
        self.id().to_string()
    }
}

impl Keyed for AccessLink {
    const KIND: &'static str = "access link";
    fn key(&self) -> String {
        self.id()
    }
}

impl Keyed for Fare {
    const KIND: &'static str = "fare";
    fn key(&self) -> String {
        Fare::key(self)
    }
}

/// Element of a record family: a raw comment line or a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// Comment line, `;` included
    Comment(String),
    /// Typed record
    Record(T),
}

/// Records of one family, interleaved with the comments written between
/// them.
#[derive(Debug, Clone)]
pub struct Records<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Records {
            entries: Vec::new(),
        }
    }
}

impl<T: Keyed> Records<T> {
    /// Appends a record.
    pub fn push(&mut self, record: T) {
        self.entries.push(Entry::Record(record));
    }

    /// Appends a comment line.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.entries.push(Entry::Comment(comment.into()));
    }

    /// Comments and records, in order.
    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    /// Records only, in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Comment(_) => None,
        })
    }

    /// Mutable records only, in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Comment(_) => None,
        })
    }

    /// Number of records, comments excluded.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether there is no record nor comment.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position in the entries of every record key; the first occurrence
    /// wins.
    pub fn index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (position, entry) in self.entries.iter().enumerate() {
            if let Entry::Record(record) = entry {
                index.entry(record.key()).or_insert(position);
            }
        }
        index
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| matches!(e, Entry::Record(r) if r.key() == key))
    }

    /// Record with key `key`.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.iter().find(|r| r.key() == key)
    }

    /// Record with key `key`, which must exist.
    pub fn lookup_by_name(&self, key: &str) -> Result<&T> {
        self.get(key).ok_or_else(|| Error::not_found(T::KIND, key))
    }

    /// Mutable record with key `key`, which must exist.
    pub fn lookup_by_name_mut(&mut self, key: &str) -> Result<&mut T> {
        self.iter_mut()
            .find(|r| r.key() == key)
            .ok_or_else(|| Error::not_found(T::KIND, key))
    }

    /// Records whose key matches `pattern`, in order.
    pub fn lookup_by_pattern(&self, pattern: &Regex) -> Vec<&T> {
        self.iter().filter(|r| pattern.is_match(&r.key())).collect()
    }

    /// Removes the records matching `predicate`, comments are kept. Returns
    /// the removed records.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match entry {
                Entry::Record(r) if predicate(&r) => removed.push(r),
                other => kept.push(other),
            }
        }
        self.entries = kept;
        removed
    }

    /// Inserts `record` right after the record with key `after`.
    pub fn insert_after(&mut self, after: &str, record: T) -> Result<()> {
        let position = self
            .position(after)
            .ok_or_else(|| Error::not_found(T::KIND, after))?;
        self.entries.insert(position + 1, Entry::Record(record));
        Ok(())
    }

    /// Merges the entries of a fragment.
    ///
    /// With `insert_or_replace`, a record whose key is already known
    /// replaces the known record where it stands and the comments just
    /// before it are dropped. Without it, the known records are removed and
    /// the whole fragment is appended. Appended entries are preceded by
    /// `marker`. `on_match` sees every (known, incoming) pair of records.
    /// Returns the number of known records replaced or removed.
    pub fn merge<F>(
        &mut self,
        fragment: Records<T>,
        insert_or_replace: bool,
        marker: &str,
        mut on_match: F,
    ) -> usize
    where
        F: FnMut(&T, &T),
    {
        if insert_or_replace {
            let mut index = self.index();
            let mut pending = Vec::new();
            let mut marked = false;
            let mut replaced = 0;
            for entry in fragment.entries {
                let record = match entry {
                    Entry::Comment(comment) => {
                        pending.push(Entry::Comment(comment));
                        continue;
                    }
                    Entry::Record(record) => record,
                };
                let key = record.key();
                if let Some(&position) = index.get(&key) {
                    if let Entry::Record(known) = &self.entries[position] {
                        on_match(known, &record);
                    }
                    self.entries[position] = Entry::Record(record);
                    pending.clear();
                    replaced += 1;
                } else {
                    if !marked {
                        self.push_comment(marker);
                        marked = true;
                    }
                    self.entries.append(&mut pending);
                    index.insert(key, self.entries.len());
                    self.entries.push(Entry::Record(record));
                }
            }
            if marked {
                self.entries.append(&mut pending);
            }
            replaced
        } else {
            let incoming: HashMap<String, &T> = fragment.iter().map(|r| (r.key(), r)).collect();
            let mut removed = 0;
            for entry in &self.entries {
                if let Entry::Record(known) = entry {
                    if let Some(record) = incoming.get(&known.key()) {
                        on_match(known, *record);
                        removed += 1;
                    }
                }
            }
            let keys: HashSet<String> = incoming.into_iter().map(|(k, _)| k).collect();
            self.remove_where(|r| keys.contains(&r.key()));
            if !fragment.entries.is_empty() {
                self.push_comment(marker);
                self.entries.extend(fragment.entries);
            }
            removed
        }
    }
}

impl<T: fmt::Display> fmt::Display for Records<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                Entry::Comment(comment) => writeln!(f, "{}", comment)?,
                Entry::Record(record) => writeln!(f, "{}", record)?,
            }
        }
        Ok(())
    }
}

/// File families of a Cube network, by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFamily {
    /// `.lin`, transit lines
    Lines,
    /// `.link`, off-street and support links
    Links,
    /// `.pnr`, park-and-ride records
    Pnr,
    /// `.zac`, zone access links
    Zac,
    /// `.access`, access links
    Access,
    /// `.xfer`, transfer links
    Xfer,
    /// `.fare`, fares
    Fares,
}

impl FileFamily {
    /// Every family, in writing order.
    pub const ALL: [FileFamily; 7] = [
        FileFamily::Lines,
        FileFamily::Links,
        FileFamily::Pnr,
        FileFamily::Zac,
        FileFamily::Access,
        FileFamily::Xfer,
        FileFamily::Fares,
    ];

    /// File suffix, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFamily::Lines => "lin",
            FileFamily::Links => "link",
            FileFamily::Pnr => "pnr",
            FileFamily::Zac => "zac",
            FileFamily::Access => "access",
            FileFamily::Xfer => "xfer",
            FileFamily::Fares => "fare",
        }
    }

    /// Family of a file, from its suffix whatever its case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        FileFamily::ALL
            .iter()
            .copied()
            .find(|family| family.extension() == extension)
    }
}

/// Provenance comment preceding the entries merged from a fragment.
pub fn provenance_marker(fragment_name: &str) -> String {
    format!(
        ";######################### From: {} #########################",
        fragment_name
    )
}

/// A Cube network, or a fragment of one parsed from a single file.
#[derive(Debug, Clone, Default)]
pub struct Network {
    /// File name or identifier of the network
    pub name: String,
    /// Transit lines
    pub lines: Records<TransitLine>,
    /// `LINK` records
    pub links: Records<TransitLink>,
    /// `SUPPLINK` records
    pub supplinks: Records<Supplink>,
    /// `PNR` records
    pub pnrs: Records<PnrLink>,
    /// `ZONEACCESS` records
    pub zacs: Records<ZacLink>,
    /// Access links
    pub access: Records<AccessLink>,
    /// Transfer links
    pub xfers: Records<AccessLink>,
    /// Fares
    pub fares: Records<Fare>,
}

fn record_replaced<'r, T: Keyed + 'r>(
    report: &'r mut NetworkReport,
    fragment: &str,
) -> impl FnMut(&T, &T) + 'r {
    let fragment = fragment.to_string();
    move |known: &T, _: &T| {
        let message = format!("{} '{}' replaced by '{}'", T::KIND, known.key(), fragment);
        debug!("{}", message);
        report.add_warning(message, NetworkReportCategory::RecordReplaced);
    }
}

impl Network {
    /// Empty network.
    pub fn new(name: &str) -> Self {
        Network {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Whether the network holds nothing.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.links.is_empty()
            && self.supplinks.is_empty()
            && self.pnrs.is_empty()
            && self.zacs.is_empty()
            && self.access.is_empty()
            && self.xfers.is_empty()
            && self.fares.is_empty()
    }

    /// Merges a fragment into the network family by family, see
    /// [`Records::merge`]. A replacing line with other frequencies than the
    /// line it replaces is reported.
    pub fn merge(&mut self, fragment: Network, insert_or_replace: bool) -> NetworkReport {
        let mut report = NetworkReport::default();
        let marker = provenance_marker(&fragment.name);
        let name = fragment.name.clone();
        {
            let mut conflicts = Vec::new();
            let mut replaced = Vec::new();
            self.lines.merge(fragment.lines, insert_or_replace, &marker, |known, line| {
                replaced.push(known.name().to_string());
                if known.freqs() != line.freqs() {
                    conflicts.push((known.name().to_string(), known.freqs(), line.freqs()));
                }
            });
            for line in replaced {
                let message = format!("line '{}' replaced by '{}'", line, name);
                debug!("{}", message);
                report.add_warning(message, NetworkReportCategory::RecordReplaced);
            }
            for (line, before, after) in conflicts {
                let message = format!(
                    "line '{}' from '{}' changes frequencies from {:?} to {:?}",
                    line, name, before, after
                );
                warn!("{}", message);
                report.add_warning(message, NetworkReportCategory::FrequencyConflict);
            }
        }
        self.links.merge(
            fragment.links,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.supplinks.merge(
            fragment.supplinks,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.pnrs.merge(
            fragment.pnrs,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.zacs.merge(
            fragment.zacs,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.access.merge(
            fragment.access,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.xfers.merge(
            fragment.xfers,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        self.fares.merge(
            fragment.fares,
            insert_or_replace,
            &marker,
            record_replaced(&mut report, &name),
        );
        report
    }

    /// Lines of the network, comments skipped.
    pub fn iterate(&self) -> impl Iterator<Item = &TransitLine> {
        self.lines.iter()
    }

    /// Line named `name`, which must exist.
    pub fn lookup_by_name(&self, name: &str) -> Result<&TransitLine> {
        self.lines.lookup_by_name(name)
    }

    /// Mutable line named `name`, which must exist.
    pub fn line_mut(&mut self, name: &str) -> Result<&mut TransitLine> {
        self.lines.lookup_by_name_mut(name)
    }

    /// Lines whose name matches the regular expression `pattern`, in order.
    pub fn lookup_by_pattern(&self, pattern: &str) -> Result<Vec<&TransitLine>> {
        let regex = compile(pattern)?;
        Ok(self.lines.lookup_by_pattern(&regex))
    }

    /// Deletes the lines whose name matches `pattern`, returning how many
    /// were deleted.
    pub fn delete_lines(&mut self, pattern: &str) -> Result<usize> {
        let regex = compile(pattern)?;
        let removed = self.lines.remove_where(|line| regex.is_match(line.name()));
        for line in &removed {
            debug!(line = %line.name(), "Deleting line");
        }
        Ok(removed.len())
    }

    /// Splits the link `a`-`b` with `new_node` in every line running through
    /// it. Returns the number of lines modified.
    pub fn split_link_in_lines(
        &mut self,
        a: i64,
        b: i64,
        new_node: NodeNumber,
        stop: bool,
    ) -> Result<usize> {
        let mut modified = 0;
        for line in self.lines.iter_mut().filter(|line| line.has_link(a, b)) {
            line.split_link(a, b, new_node, stop)?;
            modified += 1;
        }
        Ok(modified)
    }

    /// Adds the reverse direction of line `name` just after it, returning
    /// the name of the new line.
    pub fn add_reversed_copy(&mut self, name: &str) -> Result<String> {
        let mut reversed = self.lines.lookup_by_name(name)?.clone();
        reversed.reverse();
        let reversed_name = reversed.name().to_string();
        if self.lines.get(&reversed_name).is_some() {
            return Err(Error::edit(
                name,
                format!("reversed line '{}' already exists", reversed_name),
            ));
        }
        self.lines.insert_after(name, reversed)?;
        Ok(reversed_name)
    }

    /// Text of a file family. The `.link` family holds both `LINK` and
    /// `SUPPLINK` records.
    pub fn serialize(&self, family: FileFamily) -> String {
        match family {
            FileFamily::Lines => self.lines.to_string(),
            FileFamily::Links => format!("{}{}", self.links, self.supplinks),
            FileFamily::Pnr => self.pnrs.to_string(),
            FileFamily::Zac => self.zacs.to_string(),
            FileFamily::Access => self.access.to_string(),
            FileFamily::Xfer => self.xfers.to_string(),
            FileFamily::Fares => self.fares.to_string(),
        }
    }

    /// Whether a file family has nothing to write.
    pub fn is_family_empty(&self, family: FileFamily) -> bool {
        match family {
            FileFamily::Lines => self.lines.is_empty(),
            FileFamily::Links => self.links.is_empty() && self.supplinks.is_empty(),
            FileFamily::Pnr => self.pnrs.is_empty(),
            FileFamily::Zac => self.zacs.is_empty(),
            FileFamily::Access => self.access.is_empty(),
            FileFamily::Xfer => self.xfers.is_empty(),
            FileFamily::Fares => self.fares.is_empty(),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|_| Error::InvalidValue {
        what: "pattern",
        value: pattern.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(name: &str, freq: f64, nodes: &[i64]) -> TransitLine {
        let mut line = TransitLine::new(name);
        line.attributes.set("FREQ[1]", freq);
        line.nodes = nodes.iter().map(|n| crate::objects::Node::new(*n)).collect();
        line
    }

    fn names(network: &Network) -> Vec<&str> {
        network.iterate().map(TransitLine::name).collect()
    }

    #[test]
    fn replacing_merge_keeps_position() {
        let mut network = Network::new("base");
        network.lines.push_comment("; header");
        network.lines.push(line("10", 10.0, &[1, 2]));
        network.lines.push(line("20", 10.0, &[3, 4]));
        let mut fragment = Network::new("project.lin");
        fragment.lines.push_comment("; new headway");
        fragment.lines.push(line("10", 5.0, &[1, 2]));
        fragment.lines.push(line("30", 15.0, &[5, 6]));
        let report = network.merge(fragment, true);
        assert_eq!(vec!["10", "20", "30"], names(&network));
        assert_eq!(5.0, network.lookup_by_name("10").unwrap().freqs()[0]);
        let comments: Vec<_> = network
            .lines
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::Comment(c) => Some(c.as_str()),
                Entry::Record(_) => None,
            })
            .collect();
        assert_eq!(vec!["; header", &provenance_marker("project.lin")[..]], comments);
        assert_eq!(
            1,
            report
                .warnings()
                .filter(|(c, _)| **c == NetworkReportCategory::FrequencyConflict)
                .count()
        );
    }

    #[test]
    fn appending_merge_moves_lines_to_the_end() {
        let mut network = Network::new("base");
        network.lines.push(line("10", 10.0, &[1, 2]));
        network.lines.push(line("20", 10.0, &[3, 4]));
        let mut fragment = Network::new("project.lin");
        fragment.lines.push(line("10", 5.0, &[1, 2]));
        network.merge(fragment, false);
        assert_eq!(vec!["20", "10"], names(&network));
    }

    #[test]
    fn merging_twice_is_merging_once() {
        let mut fragment = Network::new("project.lin");
        fragment.lines.push(line("10", 5.0, &[1, 2]));
        fragment.lines.push(line("30", 15.0, &[5, 6]));
        let mut once = Network::new("base");
        once.lines.push(line("20", 10.0, &[3, 4]));
        once.merge(fragment.clone(), true);
        let mut twice = once.clone();
        twice.merge(fragment, true);
        assert_eq!(once.serialize(FileFamily::Lines), twice.serialize(FileFamily::Lines));
    }

    #[test]
    fn lookups() {
        let mut network = Network::new("base");
        network.lines.push(line("MUN14", 10.0, &[1, 2]));
        network.lines.push(line("MUN14R", 10.0, &[2, 1]));
        network.lines.push(line("BART1", 10.0, &[3, 4]));
        assert_eq!(2, network.lookup_by_pattern("^MUN").unwrap().len());
        assert!(network.lookup_by_pattern("^AC").unwrap().is_empty());
        let err = network.lookup_by_name("AC1").unwrap_err();
        assert_eq!("line 'AC1' not found", err.to_string());
        assert_eq!(2, network.delete_lines("^MUN14").unwrap());
        assert_eq!(vec!["BART1"], names(&network));
    }

    #[test]
    fn reversed_copy_follows_the_line() {
        let mut network = Network::new("base");
        network.lines.push(line("10", 10.0, &[1, 2, 3]));
        network.lines.push(line("20", 10.0, &[4, 5]));
        let name = network.add_reversed_copy("10").unwrap();
        assert_eq!("10R", name);
        assert_eq!(vec!["10", "10R", "20"], names(&network));
        assert_eq!(
            vec![3, 2, 1],
            network.lookup_by_name("10R").unwrap().node_ids()
        );
        assert!(network.add_reversed_copy("10").is_err());
    }

    #[test]
    fn split_link_everywhere() {
        let mut network = Network::new("base");
        network.lines.push(line("10", 10.0, &[1, 2, 3]));
        network.lines.push(line("20", 10.0, &[1, 2]));
        network.lines.push(line("30", 10.0, &[2, 1]));
        assert_eq!(2, network.split_link_in_lines(1, 2, 9, false).unwrap());
        assert_eq!(
            vec![1, 9, 2],
            network.lookup_by_name("20").unwrap().node_ids()
        );
    }

    #[test]
    fn families_by_suffix() {
        assert_eq!(
            Some(FileFamily::Lines),
            FileFamily::from_path(Path::new("dir/MUNI.LIN"))
        );
        assert_eq!(
            Some(FileFamily::Xfer),
            FileFamily::from_path(Path::new("transfer.xfer"))
        );
        assert_eq!(None, FileFamily::from_path(Path::new("notes.txt")));
    }
}
