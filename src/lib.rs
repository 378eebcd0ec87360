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

//! The `cube_network` crate reads, edits and writes transit networks in the
//! Cube line/link text format, and exports them as
//! [fast-trips](https://github.com/MetropolitanTransportationCommission/fast-trips)
//! tables.
//!
//! ```
//! use cube_network::{network::FileFamily, parser::TransitParser};
//!
//! let text = "LINE NAME=\"10\", MODE=11, FREQ[1]=10, N=1001, -1002, 1003";
//! let mut network = TransitParser::new()
//!     .parse("muni.lin", text, FileFamily::Lines)
//!     .unwrap();
//! let line = network.line_mut("10").unwrap();
//! line.split_link(1001, 1002, 9999, true).unwrap();
//! assert_eq!(vec![1001, 9999, 1002, 1003], line.node_ids());
//! ```

#![deny(missing_docs)]

pub mod attributes;
pub mod configuration;
mod error;
pub mod fasttrips;
pub mod file_handler;
pub mod grammar;
pub mod highway;
pub mod network;
pub mod node_names;
pub mod objects;
pub mod parser;
pub mod read;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod validation;
pub mod write;

pub use crate::error::{Error, Result};
pub use crate::network::Network;
