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

//! Records of a Cube network.

mod access;
mod comment;
mod fare;
mod line;
mod link;
mod node;
mod pnr;
mod time_period;

pub use access::{AccessLink, AccessTag};
pub use fare::{fare_class, Fare, FareRule, FarelinksFare, OdFare, TimeWindow, XfFare};
pub use line::{TransitLine, MAX_NAME_LENGTH};
pub use link::{
    Link, LinkKind, NodePair, Supplink, SupplinkKind, TransitLink, TransitLinkKind, ZacKind,
    ZacLink,
};
pub use node::{Node, NodeNumber};
pub use pnr::PnrLink;
pub use time_period::TimePeriod;
