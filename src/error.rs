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

//! Errors raised by the grammar, the converter and the edit operations.

use std::path::PathBuf;
use thiserror::Error;

/// The error type of the parsing and editing core.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed text: the input does not match any production of the grammar.
    #[error("{source_name}:{line}:{column}: {message}")]
    Parse {
        /// File name or fragment identifier
        source_name: String,
        /// 1-based line of the offending text
        line: usize,
        /// 1-based column of the offending text
        column: usize,
        /// What was expected or found
        message: String,
    },
    /// Well-formed tokens in an order the data model cannot accept.
    #[error("{source_name}:{line}:{column}: attribute '{attribute}' appears before any NAME=")]
    Structure {
        /// File name or fragment identifier
        source_name: String,
        /// 1-based line of the attribute
        line: usize,
        /// 1-based column of the attribute
        column: usize,
        /// Name of the offending attribute
        attribute: String,
    },
    /// A "must exist" accessor did not find its key.
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// Kind of record looked up
        kind: &'static str,
        /// Key of the missing record
        key: String,
    },
    /// A structural edit refers to a node or link the line does not carry.
    #[error("line '{line}': {message}")]
    Edit {
        /// Name of the edited line
        line: String,
        /// Description of the missing node or link
        message: String,
    },
    /// A value that cannot be read as what it stands for.
    #[error("invalid {what} '{value}'")]
    InvalidValue {
        /// What the value stands for
        what: &'static str,
        /// Offending text
        value: String,
    },
    /// Unknown time period name.
    #[error("'{0}' is not a time period (expected one of AM, MD, PM, EV, EA)")]
    TimePeriod(String),
    /// Inconsistent frequencies given to a line.
    #[error("{0}")]
    Frequencies(String),
    /// The target of a write already exists and the policy forbids touching it.
    #[error("file {0:?} already exists")]
    FileExists(PathBuf),
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Underlying CSV failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn edit(line: &str, message: impl Into<String>) -> Self {
        Error::Edit {
            line: line.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Result of the parsing and editing core.
pub type Result<T> = std::result::Result<T, Error>;
