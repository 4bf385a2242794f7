//! Shared scenario fixtures for unit tests.
//!
//! `small_scenario` is a five-node, six-link network:
//!
//! ```text
//! n1 -l1-> n2 -l2-> n3 -l3-> n4 -l4-> n5
//!          n2 ------------l6-------> n5
//! n5 -l5-> n1                            (car only)
//! ```
//!
//! Line `A` (route `A1`) serves sA, sB, sC along l1, l2, l3. Line `B`
//! (route `B1`) serves sC, sD along l3, l4. Stop sD is used by line `B` only,
//! and sE (on l6) is not served by any line.

use crate::domain::{Coord, TravelMode};

use super::{
    Departure, DepartureId, Link, LinkId, LineId, Network, Node, NodeId, RouteId, RouteStop,
    Scenario, StopFacility, StopId, TransitLine, TransitRoute, TransitSchedule, VehicleId,
};

pub fn node_id(s: &str) -> NodeId {
    NodeId::parse(s).unwrap()
}

pub fn link_id(s: &str) -> LinkId {
    LinkId::parse(s).unwrap()
}

pub fn stop_id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

pub fn line_id(s: &str) -> LineId {
    LineId::parse(s).unwrap()
}

pub fn route_id(s: &str) -> RouteId {
    RouteId::parse(s).unwrap()
}

pub fn vehicle_id(s: &str) -> VehicleId {
    VehicleId::parse(s).unwrap()
}

pub fn departure_id(s: &str) -> DepartureId {
    DepartureId::parse(s).unwrap()
}

fn rail(id: &str, from: &str, to: &str) -> Link {
    Link::new(link_id(id), node_id(from), node_id(to), 1000.0)
        .with_mode(TravelMode::Other("rail".into()))
}

/// Build a route whose stops are spaced five minutes apart.
pub fn route(
    id: &str,
    stops: &[&str],
    path: &[&str],
    departures: &[(&str, u32, &str)],
) -> TransitRoute {
    let last = stops.len().saturating_sub(1);
    TransitRoute {
        id: route_id(id),
        transport_mode: "rail".into(),
        path: path.iter().map(|l| link_id(l)).collect(),
        stops: stops
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let offset = i as u32 * 300;
                RouteStop::new(
                    stop_id(s),
                    (i > 0).then_some(offset),
                    (i < last).then_some(offset),
                )
            })
            .collect(),
        departures: departures
            .iter()
            .map(|(id, time_secs, vehicle)| Departure {
                id: departure_id(id),
                time_secs: *time_secs,
                vehicle: vehicle_id(vehicle),
            })
            .collect(),
    }
}

pub fn small_network() -> Network {
    let mut network = Network::new();
    for i in 0..5 {
        network
            .add_node(Node::new(
                node_id(&format!("n{}", i + 1)),
                Coord::new(i as f64 * 1000.0, 0.0),
            ))
            .unwrap();
    }
    for link in [
        rail("l1", "n1", "n2"),
        rail("l2", "n2", "n3"),
        rail("l3", "n3", "n4"),
        rail("l4", "n4", "n5"),
        Link::new(link_id("l5"), node_id("n5"), node_id("n1"), 4000.0)
            .with_mode(TravelMode::Other("car".into())),
        rail("l6", "n2", "n5"),
    ] {
        network.add_link(link).unwrap();
    }
    network
}

pub fn small_schedule() -> TransitSchedule {
    let mut schedule = TransitSchedule::new();
    for (stop, link, x) in [
        ("sA", "l1", 1000.0),
        ("sB", "l2", 2000.0),
        ("sC", "l3", 3000.0),
        ("sD", "l4", 4000.0),
        ("sE", "l6", 4000.0),
    ] {
        schedule
            .add_facility(StopFacility::new(
                stop_id(stop),
                Coord::new(x, 0.0),
                link_id(link),
            ))
            .unwrap();
    }

    let mut line_a = TransitLine::new(line_id("A"));
    line_a.routes.push(route(
        "A1",
        &["sA", "sB", "sC"],
        &["l1", "l2", "l3"],
        &[("A1_0800", 8 * 3600, "vA1"), ("A1_0900", 9 * 3600, "vA2")],
    ));
    schedule.add_line(line_a).unwrap();

    let mut line_b = TransitLine::new(line_id("B"));
    line_b.routes.push(route(
        "B1",
        &["sC", "sD"],
        &["l3", "l4"],
        &[("B1_0830", 8 * 3600 + 1800, "vB1")],
    ));
    schedule.add_line(line_b).unwrap();

    schedule.set_minimal_transfer_time(stop_id("sA"), stop_id("sC"), 60);
    schedule.set_minimal_transfer_time(stop_id("sC"), stop_id("sD"), 90);
    schedule.set_minimal_transfer_time(stop_id("sD"), stop_id("sA"), 120);
    schedule
}

pub fn small_scenario() -> Scenario {
    Scenario::new(small_network(), small_schedule())
}
