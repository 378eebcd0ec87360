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

//! Fares of `.fare` files.

use super::link::NodePair;
use super::comment::{push_inline_comment, CommentParts};
use super::node::NodeNumber;
use super::time_period::TimePeriod;
use crate::attributes::{Attributes, Value};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Clock interval, wrapping over midnight when `end` is before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Included start
    pub start: NaiveTime,
    /// Excluded end
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Whether `time` falls in the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Fare between an origin and a destination node.
#[derive(Debug, Clone, PartialEq)]
pub struct OdFare {
    /// Boarding node
    pub origin: NodeNumber,
    /// Alighting node
    pub destination: NodeNumber,
}

/// Price of a transfer between two modes.
#[derive(Debug, Clone, PartialEq)]
pub struct XfFare {
    /// Mode transferred from
    pub from_mode: u32,
    /// Mode transferred to
    pub to_mode: u32,
}

/// Price of riding a set of links with a set of modes.
#[derive(Debug, Clone, PartialEq)]
pub struct FarelinksFare {
    /// Links charged
    pub links: Vec<NodePair>,
    /// Modes charged
    pub modes: Vec<u32>,
    /// `ONEWAY`; both directions are charged when false
    pub one_way: Option<bool>,
    /// Attributes other than `FARE`, `L`, `MODES` and `ONEWAY`
    pub attributes: Attributes,
}

impl FarelinksFare {
    /// Unique (link, mode) combinations, both directions of each link unless
    /// the fare is one-way.
    pub fn expand(&self) -> Vec<(NodePair, u32)> {
        let mut seen = BTreeSet::new();
        let mut combinations = Vec::new();
        let both_ways = self.one_way == Some(false);
        for link in &self.links {
            let directions = if both_ways {
                vec![*link, link.reversed()]
            } else {
                vec![*link]
            };
            for direction in directions {
                for mode in &self.modes {
                    if seen.insert((direction, *mode)) {
                        combinations.push((direction, *mode));
                    }
                }
            }
        }
        combinations
    }
}

/// What a fare applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum FareRule {
    /// Origin-destination fare, `a-b=cost`
    Od(OdFare),
    /// Mode transfer fare, `XFARE[a][b]=cost`
    Transfer(XfFare),
    /// Link set fare, `FARELINKS ...`
    Farelinks(FarelinksFare),
}

/// A fare. Prices are in cents.
#[derive(Debug, Clone, PartialEq)]
pub struct Fare {
    /// Identifier, derived from the rule
    pub fare_id: String,
    /// Price in cents
    pub price: u32,
    /// Number of transfers allowed
    pub transfers: Option<u32>,
    /// What the fare applies to
    pub rule: FareRule,
    /// Comment attached to the record
    pub comment: Option<String>,
}

impl Fare {
    fn with_rule(fare_id: String, price: u32, rule: FareRule) -> Self {
        Fare {
            fare_id,
            price,
            transfers: None,
            rule,
            comment: None,
        }
    }

    /// Origin-destination fare.
    pub fn od(origin: NodeNumber, destination: NodeNumber, price: u32) -> Self {
        Self::with_rule(
            format!("od_{}_{}", origin, destination),
            price,
            FareRule::Od(OdFare {
                origin,
                destination,
            }),
        )
    }

    /// Transfer fare between two modes.
    pub fn transfer(from_mode: u32, to_mode: u32, price: u32) -> Self {
        Self::with_rule(
            format!("xfer_{}_{}", from_mode, to_mode),
            price,
            FareRule::Transfer(XfFare { from_mode, to_mode }),
        )
    }

    /// Fare for riding `links` with `modes`.
    pub fn farelinks(farelinks: FarelinksFare, price: u32) -> Self {
        let modes: Vec<String> = farelinks.modes.iter().map(u32::to_string).collect();
        let links: Vec<String> = farelinks
            .links
            .iter()
            .map(|l| format!("{}_{}", l.a, l.b))
            .collect();
        Self::with_rule(
            format!("farelinks_{}_{}", modes.join("_"), links.join("_")),
            price,
            FareRule::Farelinks(farelinks),
        )
    }

    /// Key identifying the fare in a network: two fares with the same key
    /// price the same thing.
    pub fn key(&self) -> String {
        match &self.rule {
            FareRule::Od(od) => format!("OD {}-{}", od.origin, od.destination),
            FareRule::Transfer(xf) => format!("XFARE[{}][{}]", xf.from_mode, xf.to_mode),
            FareRule::Farelinks(_) => format!("FARELINKS {}", self.fare_id),
        }
    }

    /// Price in currency units.
    pub fn price_units(&self) -> f64 {
        f64::from(self.price) / 100.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut repr = match &self.rule {
            FareRule::Od(od) => format!("{}-{}={}", od.origin, od.destination, self.price),
            FareRule::Transfer(xf) => {
                format!("XFARE[{}][{}]={}", xf.from_mode, xf.to_mode, self.price)
            }
            FareRule::Farelinks(farelinks) => {
                let comment = CommentParts::new(self.comment.as_deref());
                let mut repr = comment.open("FARELINKS");
                repr.push_str(&self.farelinks_body(farelinks));
                comment.close(&mut repr);
                return f.write_str(&repr);
            }
        };
        if let Some(comment) = &self.comment {
            push_inline_comment(&mut repr, comment);
        }
        f.write_str(&repr)
    }
}

impl Fare {
    fn farelinks_body(&self, farelinks: &FarelinksFare) -> String {
        let links: Vec<String> = farelinks.links.iter().map(NodePair::to_string).collect();
        let mut attributes = farelinks.attributes.clone();
        attributes.set("FARE", self.price);
        if !farelinks.modes.is_empty() {
            let modes: Vec<String> = farelinks.modes.iter().map(u32::to_string).collect();
            attributes.set("MODES", Value::Sequence(modes.join(",")));
        }
        if let Some(one_way) = farelinks.one_way {
            let flag = if one_way { "T" } else { "F" };
            attributes.set("ONEWAY", Value::Text(flag.to_string()));
        }
        if let Some(transfers) = self.transfers {
            attributes.set("TRANSFERS", transfers);
        }
        format!("L={}, {}", links.join(","), attributes.render(|_, _| true))
    }
}

/// Fare class of a line for a time period, `"{operator}_{line}_{period}"`
/// with characters outside `[A-Za-z0-9_-]` replaced by `_`. The same inputs
/// always give the same class.
pub fn fare_class(operator: &str, line: &str, period: TimePeriod) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!("{}_{}_{}", sanitize(operator), sanitize(line), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expand_is_unique() {
        let farelinks = FarelinksFare {
            links: vec![NodePair::new(1, 2), NodePair::new(1, 2), NodePair::new(2, 3)],
            modes: vec![11, 12],
            one_way: Some(false),
            attributes: Attributes::new(),
        };
        let combinations = farelinks.expand();
        assert_eq!(8, combinations.len());
        assert_eq!((NodePair::new(2, 1), 11), combinations[2]);
    }

    #[test]
    fn window_over_midnight() {
        let window = TimeWindow {
            start: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            end: NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
        };
        assert!(window.contains(NaiveTime::from_hms_opt(23, 0, 0).unwrap()));
        assert!(window.contains(NaiveTime::from_hms_opt(1, 0, 0).unwrap()));
        assert!(!window.contains(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn fare_class_is_deterministic() {
        let class = fare_class("SF Muni", "MUN14", TimePeriod::AM);
        assert_eq!("SF_Muni_MUN14_AM", class);
        assert_eq!(class, fare_class("SF Muni", "MUN14", TimePeriod::AM));
    }

    #[test]
    fn display() {
        let mut od = Fare::od(1001, 2002, 300);
        od.comment = Some("airport".to_string());
        assert_eq!("1001-2002=300 ; airport", od.to_string());
        assert_eq!("XFARE[11][12]=50", Fare::transfer(11, 12, 50).to_string());
        let mut farelinks = Fare::farelinks(
            FarelinksFare {
                links: vec![NodePair::new(1, 2), NodePair::new(3, 4)],
                modes: vec![11],
                one_way: Some(true),
                attributes: Attributes::new(),
            },
            250,
        );
        assert_eq!("farelinks_11_1_2_3_4", farelinks.fare_id);
        assert_eq!(
            "FARELINKS L=1-2,3-4, FARE=250, MODES=11, ONEWAY=T",
            farelinks.to_string()
        );
        farelinks.comment = Some("downtown\npeak only".to_string());
        assert_eq!(
            "FARELINKS ; downtown\n L=1-2,3-4, FARE=250, MODES=11, ONEWAY=T ; peak only",
            farelinks.to_string()
        );
        od.comment = Some("airport\nexpress".to_string());
        assert_eq!("1001-2002=300 ; airport ; express", od.to_string());
    }
}
