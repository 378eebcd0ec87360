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

//! [fast-trips](https://github.com/MetropolitanTransportationCommission/fast-trips)
//! export of a network: the tables are built from the records of the
//! network, the configuration and the highway network, then written as CSV.

mod write;

use crate::configuration::Configuration;
use crate::highway::HighwayNetwork;
use crate::network::Network;
use crate::objects::{fare_class, AccessTag, FareRule, NodeNumber, TimePeriod, TransitLine};
use anyhow::Result;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path;
use tracing::info;

lazy_static! {
    /// fast-trips mode of the GTFS route types, for the modes without a
    /// configured name
    static ref ROUTE_TYPE_MODES: HashMap<u32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0, "light_rail");
        m.insert(1, "heavy_rail");
        m.insert(2, "commuter_rail");
        m.insert(3, "local_bus");
        m.insert(4, "ferry");
        m.insert(5, "cable_car");
        m
    };
}

const TIME_FORMAT: &str = "%H:%M:%S";

/// A line of `routes_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Route {
    route_id: String,
    route_short_name: String,
    route_type: u32,
    mode: String,
    operator: String,
    fare_class: String,
}

/// A line of `stops_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Stop {
    stop_id: NodeNumber,
    stop_name: String,
    stop_x: Option<f64>,
    stop_y: Option<f64>,
}

/// A line of `stop_sequences_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct StopSequence {
    route_id: String,
    stop_sequence: u32,
    stop_id: NodeNumber,
    board_allowed: u8,
}

/// A line of `frequencies_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Frequency {
    route_id: String,
    time_period: TimePeriod,
    start_time: String,
    end_time: String,
    headway_secs: u32,
}

/// A line of `walk_access_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct WalkAccess {
    taz: NodeNumber,
    stop_id: NodeNumber,
    dist: Option<f64>,
}

/// A line of `drive_access_points_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct DriveAccessPoint {
    lot_id: NodeNumber,
    station_id: NodeNumber,
    zones: String,
}

/// A line of `fare_attributes_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct FareAttribute {
    fare_class: String,
    time_period: TimePeriod,
    price: f64,
    currency_type: String,
    start_time: String,
    end_time: String,
}

/// A line of `fare_transfer_rules_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct FareTransferRule {
    from_mode: String,
    to_mode: String,
    transfer_fare_type: &'static str,
    transfer_fare: f64,
}

/// A line of `fare_links_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct FareLink {
    from_node: NodeNumber,
    to_node: NodeNumber,
    mode: u32,
    price: f64,
}

/// A line of `od_fares_ft.txt`.
#[derive(Debug, Serialize, PartialEq)]
pub struct OdFare {
    origin_node: NodeNumber,
    destination_node: NodeNumber,
    price: f64,
}

fn cents_to_units(cents: u32) -> f64 {
    f64::from(cents) / 100.0
}

fn mode_name(config: &Configuration, mode: u32) -> String {
    match config.mode(mode) {
        Some(m) => m.name.clone(),
        None => ROUTE_TYPE_MODES
            .get(&config.route_type(mode))
            .map_or_else(|| mode.to_string(), |m| m.to_string()),
    }
}

fn operator(config: &Configuration, line: &TransitLine) -> String {
    config.operator(line.mode(), line.owner())
}

fn served_periods(line: &TransitLine) -> impl Iterator<Item = TimePeriod> + '_ {
    TimePeriod::ALL
        .iter()
        .copied()
        .filter(move |period| line.freq(*period) > 0.0)
}

/// One route per line, with the fare class of the first period served.
pub fn routes(network: &Network, config: &Configuration) -> Vec<Route> {
    network
        .iterate()
        .map(|line| {
            let mode = line.mode().unwrap_or_default();
            let operator = operator(config, line);
            let period = served_periods(line).next().unwrap_or(TimePeriod::AM);
            Route {
                route_id: line.name().to_string(),
                route_short_name: line
                    .attributes
                    .get("LONGNAME")
                    .map_or_else(|| line.name().to_string(), |v| v.as_str().into_owned()),
                route_type: config.route_type(mode),
                mode: mode_name(config, mode),
                fare_class: fare_class(&operator, line.name(), period),
                operator,
            }
        })
        .collect()
}

/// Every node where a line stops, by node number.
pub fn stops(network: &Network, highway: Option<&HighwayNetwork>) -> Vec<Stop> {
    let mut stops = BTreeMap::new();
    for node in network.iterate().flat_map(|line| line.stops()) {
        stops.entry(node.id()).or_insert_with(|| {
            let coord = highway
                .and_then(|highway| highway.coord(node.id()))
                .or(node.coord);
            Stop {
                stop_id: node.id(),
                stop_name: node
                    .description
                    .clone()
                    .unwrap_or_else(|| node.id().to_string()),
                stop_x: coord.map(|(x, _)| x),
                stop_y: coord.map(|(_, y)| y),
            }
        });
    }
    stops.into_iter().map(|(_, stop)| stop).collect()
}

/// Stops of every line, numbered from 1.
pub fn stop_sequences(network: &Network) -> Vec<StopSequence> {
    network
        .iterate()
        .flat_map(|line| {
            line.stops().enumerate().map(move |(i, node)| StopSequence {
                route_id: line.name().to_string(),
                stop_sequence: i as u32 + 1,
                stop_id: node.id(),
                board_allowed: u8::from(node.boarding_allowed()),
            })
        })
        .collect()
}

/// Headways of the periods each line serves.
pub fn frequencies(network: &Network, config: &Configuration) -> Vec<Frequency> {
    network
        .iterate()
        .flat_map(|line| {
            served_periods(line).map(move |period| {
                let window = config.time_periods.window(period);
                Frequency {
                    route_id: line.name().to_string(),
                    time_period: period,
                    start_time: window.start.format(TIME_FORMAT).to_string(),
                    end_time: window.end.format(TIME_FORMAT).to_string(),
                    headway_secs: (line.freq(period) * 60.0).round() as u32,
                }
            })
        })
        .collect()
}

/// Walk access from the zone access links and the walk access links. The
/// distance is the one of the record, or of the roadway link.
pub fn walk_access(network: &Network, highway: Option<&HighwayNetwork>) -> Vec<WalkAccess> {
    let roadway_distance = |a: NodeNumber, b: NodeNumber| {
        highway
            .and_then(|highway| highway.link(a, b))
            .map(|link| link.distance)
    };
    let zacs = network.zacs.iter().map(|zac| WalkAccess {
        taz: zac.zone(),
        stop_id: zac.node(),
        dist: zac
            .distance()
            .or_else(|| roadway_distance(zac.zone(), zac.node())),
    });
    let access = network
        .access
        .iter()
        .filter(|access| access.tag != Some(AccessTag::Pnr))
        .map(|access| WalkAccess {
            taz: access.nodes.a,
            stop_id: access.nodes.b,
            dist: access
                .value
                .or_else(|| roadway_distance(access.nodes.a, access.nodes.b)),
        });
    zacs.chain(access).collect()
}

/// Parking lots of the park-and-ride records.
pub fn drive_access_points(network: &Network) -> Vec<DriveAccessPoint> {
    network
        .pnrs
        .iter()
        .map(|pnr| DriveAccessPoint {
            lot_id: pnr.lot().unwrap_or_else(|| pnr.station()),
            station_id: pnr.station(),
            zones: pnr
                .zones()
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Fare of every fare class: the base fare of the line mode, for each
/// period the line serves. Lines of modes without fare are left out.
pub fn fare_attributes(network: &Network, config: &Configuration) -> Vec<FareAttribute> {
    let mut attributes = Vec::new();
    for line in network.iterate() {
        let fare = match line.mode().and_then(|m| config.mode(m)).and_then(|m| m.fare) {
            Some(fare) => fare,
            None => continue,
        };
        let operator = operator(config, line);
        for period in served_periods(line) {
            let window = config.time_periods.window(period);
            attributes.push(FareAttribute {
                fare_class: fare_class(&operator, line.name(), period),
                time_period: period,
                price: cents_to_units(fare),
                currency_type: config.currency.clone(),
                start_time: window.start.format(TIME_FORMAT).to_string(),
                end_time: window.end.format(TIME_FORMAT).to_string(),
            });
        }
    }
    attributes
}

/// The three other fare tables: transfers, link fares and
/// origin-destination fares.
pub fn fare_rules(
    network: &Network,
    config: &Configuration,
) -> (Vec<FareTransferRule>, Vec<FareLink>, Vec<OdFare>) {
    let mut transfers = Vec::new();
    let mut links = Vec::new();
    let mut ods = Vec::new();
    for fare in network.fares.iter() {
        let price = fare.price_units();
        match &fare.rule {
            FareRule::Transfer(xf) => transfers.push(FareTransferRule {
                from_mode: mode_name(config, xf.from_mode),
                to_mode: mode_name(config, xf.to_mode),
                transfer_fare_type: "transfer_cost",
                transfer_fare: price,
            }),
            FareRule::Farelinks(farelinks) => {
                links.extend(
                    farelinks
                        .expand()
                        .into_iter()
                        .map(|(link, mode)| FareLink {
                            from_node: link.a,
                            to_node: link.b,
                            mode,
                            price,
                        }),
                );
            }
            FareRule::Od(od) => ods.push(OdFare {
                origin_node: od.origin,
                destination_node: od.destination,
                price,
            }),
        }
    }
    (transfers, links, ods)
}

/// Exports the network as fast-trips tables into `path`, created when
/// needed. Existing files are handled per the configured policy.
pub fn write<P: AsRef<path::Path>>(
    network: &Network,
    config: &Configuration,
    highway: Option<&HighwayNetwork>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    info!("Writing fast-trips network to {:?}", path);
    std::fs::create_dir_all(path)?;
    let policy = config.on_existing_file;
    let routes = routes(network, config);
    let stops = stops(network, highway);
    let stop_sequences = stop_sequences(network);
    let frequencies = frequencies(network, config);
    let walk_access = walk_access(network, highway);
    let drive_access_points = drive_access_points(network);
    let fare_attributes = fare_attributes(network, config);
    let (transfers, links, ods) = fare_rules(network, config);
    let tables = [
        ("routes_ft.txt", routes.is_empty()),
        ("stops_ft.txt", stops.is_empty()),
        ("stop_sequences_ft.txt", stop_sequences.is_empty()),
        ("frequencies_ft.txt", frequencies.is_empty()),
        ("walk_access_ft.txt", walk_access.is_empty()),
        ("drive_access_points_ft.txt", drive_access_points.is_empty()),
        ("fare_attributes_ft.txt", fare_attributes.is_empty()),
        ("fare_transfer_rules_ft.txt", transfers.is_empty()),
        ("fare_links_ft.txt", links.is_empty()),
        ("od_fares_ft.txt", ods.is_empty()),
    ];
    crate::write::check_targets(
        tables
            .iter()
            .filter(|(_, empty)| !empty)
            .map(|(file, _)| path.join(file)),
        policy,
    )?;
    std::fs::create_dir_all(path)?;
    write::write_records(path, "routes_ft.txt", &routes, policy)?;
    write::write_records(path, "stops_ft.txt", &stops, policy)?;
    write::write_records(path, "stop_sequences_ft.txt", &stop_sequences, policy)?;
    write::write_records(path, "frequencies_ft.txt", &frequencies, policy)?;
    write::write_records(path, "walk_access_ft.txt", &walk_access, policy)?;
    write::write_records(
        path,
        "drive_access_points_ft.txt",
        &drive_access_points,
        policy,
    )?;
    write::write_records(path, "fare_attributes_ft.txt", &fare_attributes, policy)?;
    write::write_records(path, "fare_transfer_rules_ft.txt", &transfers, policy)?;
    write::write_records(path, "fare_links_ft.txt", &links, policy)?;
    write::write_records(path, "od_fares_ft.txt", &ods, policy)?;
    Ok(())
}
