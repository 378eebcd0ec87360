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

//! Cross-check of the lines of a network against the links they run on.

use crate::highway::RoadwayLinks;
use crate::network::{Network, NetworkReport};
use crate::report::NetworkReportCategory;
use std::collections::HashSet;
use tracing::warn;

/// Checks that every consecutive pair of nodes of every line is either a
/// support link of the network or a roadway link of the highway network, and
/// that every line node exists in the highway network. Problems are
/// reported, the network is left untouched.
pub fn validate_referential_integrity<R: RoadwayLinks>(
    network: &Network,
    roadway: &R,
) -> NetworkReport {
    let mut report = NetworkReport::default();
    for line in network.iterate() {
        let mut unknown_nodes = HashSet::new();
        for node in &line.nodes {
            if !roadway.has_node(node.id()) && unknown_nodes.insert(node.id()) {
                let message = format!(
                    "{}: line '{}' uses node {} unknown to the highway network",
                    network.name,
                    line.name(),
                    node.id()
                );
                warn!("{}", message);
                report.add_warning(message, NetworkReportCategory::UnknownNode);
            }
        }
        for pair in line.nodes.windows(2) {
            let (a, b) = (pair[0].id(), pair[1].id());
            let is_supplink = network.supplinks.iter().any(|link| link.connects(a, b))
                || network.links.iter().any(|link| link.connects(a, b));
            if !is_supplink && !roadway.has_roadway_link(a, b) {
                let message = format!(
                    "{}: line '{}' runs on link {}-{} which is neither a support link nor a roadway link",
                    network.name,
                    line.name(),
                    a,
                    b
                );
                warn!("{}", message);
                report.add_warning(message, NetworkReportCategory::MissingLink);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highway::HighwayNetwork;
    use crate::objects::{Node, Supplink, TransitLine};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_links_are_reported() {
        testing_logger::setup();
        let highway = HighwayNetwork::from_readers(
            "N,X,Y\n1,0,0\n2,0,1\n3,1,1\n4,2,2\n".as_bytes(),
            "A,B,DISTANCE,STREETNAME,TIME\n1,2,0.1,MAIN ST,1\n".as_bytes(),
        )
        .unwrap();
        let mut network = Network::new("muni.lin");
        let mut line = TransitLine::new("10");
        line.nodes = vec![Node::new(1), Node::new(-2), Node::new(3), Node::new(4), Node::new(5)];
        network.lines.push(line);
        let mut supplink = Supplink::new(3, 2);
        supplink.attributes.set("ONEWAY", "F");
        network.supplinks.push(supplink);

        let report = validate_referential_integrity(&network, &highway);
        let warnings: Vec<_> = report.warnings().map(|(c, _)| *c).collect();
        assert_eq!(
            vec![
                NetworkReportCategory::UnknownNode,
                NetworkReportCategory::MissingLink,
                NetworkReportCategory::MissingLink
            ],
            warnings
        );
        testing_logger::validate(|captured_logs| {
            assert_eq!(3, captured_logs.len());
            assert_eq!(
                "muni.lin: line '10' runs on link 3-4 which is neither a support link nor a roadway link",
                captured_logs[1].body
            );
            assert_eq!(captured_logs[1].level, log::Level::Warn);
        });
    }
}
