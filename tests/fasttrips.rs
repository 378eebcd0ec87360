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

use cube_network::{
    configuration::read_config, fasttrips, highway::HighwayNetwork, node_names::NodeNames, read,
    report::NetworkReportCategory, test_utils::*, validation::validate_referential_integrity,
};
use pretty_assertions::assert_eq;

const BASE: &str = "tests/fixtures/cube/base";
const HIGHWAY: &str = "tests/fixtures/cube/highway";

#[test]
fn referential_integrity_of_the_base_network() {
    let (mut network, _) = read::read(BASE, false, None).unwrap();
    let highway = HighwayNetwork::from_dir(HIGHWAY).unwrap();
    let report = validate_referential_integrity(&network, &highway);

    assert!(report.warnings().all(|(_, message)| !message.contains("'MUN14I'")));
    assert!(report.warnings().any(|(category, message)| {
        *category == NetworkReportCategory::MissingLink && message.contains("'BART1'")
    }));
    assert!(report.warnings().any(|(category, message)| {
        *category == NetworkReportCategory::UnknownNode && message.contains("node 2002")
    }));

    assert_eq!(5, highway.assign_coordinates(&mut network));
    let line = network.lookup_by_name("MUN14I").unwrap();
    assert_eq!(Some((6010000.5, 2110000.25)), line.nodes[0].coord);
}

#[test]
fn export_base_network() {
    test_in_tmp_dir(|path| {
        let names = NodeNames::from_path("tests/fixtures/cube/node_names.csv").unwrap();
        let (network, _) = read::read(BASE, false, Some(&names)).unwrap();
        let config = read_config(Some("tests/fixtures/cube/config.json")).unwrap();
        let highway = HighwayNetwork::from_dir(HIGHWAY).unwrap();
        fasttrips::write(&network, &config, Some(&highway), path).unwrap();

        assert_eq!(
            "route_id,route_short_name,route_type,mode,operator,fare_class\n\
             MUN14I,Mission Inbound,3,local_bus,SF Muni,SF_Muni_MUN14I_AM\n\
             MUN22,MUN22,3,local_bus,SF Muni,SF_Muni_MUN22_AM\n\
             BART1,BART1,1,heavy_rail,BART,BART_BART1_AM\n",
            get_file_content(path.join("routes_ft.txt"))
        );
        assert_eq!(
            "route_id,stop_sequence,stop_id,board_allowed\n\
             MUN14I,1,1001,1\n\
             MUN14I,2,1003,0\n\
             MUN14I,3,1004,1\n\
             MUN22,1,2001,1\n\
             MUN22,2,1003,1\n\
             MUN22,3,2003,1\n\
             BART1,1,3001,1\n\
             BART1,2,3002,1\n",
            get_file_content(path.join("stop_sequences_ft.txt"))
        );

        let stops = get_file_content(path.join("stops_ft.txt"));
        assert!(stops.starts_with("stop_id,stop_name,stop_x,stop_y\n"));
        assert!(stops.contains("\n1001,Mission & 16th,6010000.5,2110000.25\n"));
        assert!(stops.contains("\n2001,2001,,\n"));
        assert_eq!(8, stops.lines().count());

        let frequencies = get_file_content(path.join("frequencies_ft.txt"));
        assert!(frequencies.contains("\nMUN14I,AM,06:00:00,09:00:00,450\n"));
        assert!(frequencies.contains("\nMUN22,PM,15:30:00,18:30:00,720\n"));

        assert!(get_file_content(path.join("walk_access_ft.txt")).contains("\n4,1001,0.3\n"));
        assert_eq!(
            "lot_id,station_id,zones\n5001,3001,1 2 3\n",
            get_file_content(path.join("drive_access_points_ft.txt"))
        );
        assert!(get_file_content(path.join("fare_transfer_rules_ft.txt"))
            .contains("\nlocal_bus,heavy_rail,transfer_cost,0.5\n"));
        assert!(get_file_content(path.join("fare_attributes_ft.txt"))
            .contains("\nBART_BART1_AM,AM,4.0,USD,06:00:00,09:00:00\n"));
        assert!(get_file_content(path.join("od_fares_ft.txt")).starts_with(
            "origin_node,destination_node,price\n1001,3002,3.0\n"
        ));
        assert!(!path.join("fare_links_ft.txt").exists());
    });
}
