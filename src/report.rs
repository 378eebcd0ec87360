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

//! Helpers to create a report for processes that go on after a problem.
use serde::Serialize;

/// Each report record will be categorized with a type implementing this
/// `ReportCategory` trait.
pub trait ReportCategory: Serialize + PartialEq {}

/// Type of the report of merges and validations of a network
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum NetworkReportCategory {
    /// A record of a fragment replaced a record with the same key
    RecordReplaced,
    /// A replacing line carries different frequencies
    FrequencyConflict,
    /// A line uses a link which is neither a support link nor a roadway link
    MissingLink,
    /// A line or link uses a node unknown to the highway network
    UnknownNode,
}

impl ReportCategory for NetworkReportCategory {}

/// A report record.
#[derive(Debug, Serialize, PartialEq)]
struct ReportRow<R: ReportCategory> {
    category: R,
    message: String,
}

/// A report is a list of warning records. Problems worth stopping for are
/// returned as errors instead.
#[derive(Debug, Serialize)]
pub struct Report<R: ReportCategory> {
    warnings: Vec<ReportRow<R>>,
}

impl<R: ReportCategory> Default for Report<R> {
    fn default() -> Self {
        Report {
            warnings: Vec::new(),
        }
    }
}

impl<R: ReportCategory> Report<R> {
    /// Add a warning report record.
    pub fn add_warning(&mut self, warning: String, warning_type: R) {
        let report_row = ReportRow {
            category: warning_type,
            message: warning,
        };
        if !self.warnings.contains(&report_row) {
            self.warnings.push(report_row);
        }
    }
    /// Warnings, in the order they were recorded.
    pub fn warnings(&self) -> impl Iterator<Item = (&R, &str)> {
        self.warnings.iter().map(|r| (&r.category, r.message.as_str()))
    }
    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
    /// Appends the records of `other`.
    pub fn extend(&mut self, other: Report<R>) {
        for row in other.warnings {
            self.add_warning(row.message, row.category);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicated_rows_are_recorded_once() {
        let mut report = Report::default();
        report.add_warning("line '10'".to_string(), NetworkReportCategory::RecordReplaced);
        report.add_warning("line '10'".to_string(), NetworkReportCategory::RecordReplaced);
        let mut other = Report::default();
        other.add_warning("line '10'".to_string(), NetworkReportCategory::RecordReplaced);
        other.add_warning("link 1-2".to_string(), NetworkReportCategory::MissingLink);
        report.extend(other);
        assert_eq!(
            vec![
                (&NetworkReportCategory::RecordReplaced, "line '10'"),
                (&NetworkReportCategory::MissingLink, "link 1-2")
            ],
            report.warnings().collect::<Vec<_>>()
        );
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            r#"{"warnings":[{"category":"RecordReplaced","message":"line '10'"},{"category":"MissingLink","message":"link 1-2"}]}"#,
            json
        );
    }
}
