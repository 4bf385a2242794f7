//! The optimization request document handed to the rolling stock scheduler.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Costs;
use crate::domain::{Coord, TravelMode};
use crate::selection::Group;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub info: Info,
    pub parameters: Parameters,
    pub vehicle_categories: Vec<String>,
    pub locations: Vec<Location>,
    pub network: NetworkDto,
    pub routes: Vec<Route>,
    pub depots: Vec<Depot>,
    pub maintenance_slots: Vec<MaintenanceSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub run_id: String,
    pub instance_id: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub forbid_dead_head_trips: bool,
    pub dead_head_trip_speed_limit: f64,
    pub day_limit_threshold: u32,
    pub shunting: Shunting,
    pub maximal_distance_without_maintenance: u64,
    pub costs: Costs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shunting {
    pub maximal_formation_count: u32,
    pub minimal_duration: u32,
    pub dead_head_trip_duration: u32,
    pub coupling_duration: u32,
}

/// A stop facility of the masked schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coord: Coord,
    pub link: String,
    /// Formation changes are allowed here while on route.
    pub on_route_shunting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDto {
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub id: String,
    pub from: String,
    pub to: String,
    pub length: f64,
    pub modes: BTreeSet<TravelMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub line: String,
    pub route: String,
    pub vehicle_category: Group,
    pub stops: Vec<String>,
    pub departures: Vec<Departure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub id: String,
    pub time: u32,
    /// One entry per stop to stop segment of the route.
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub from: String,
    pub to: String,
    pub departure: u32,
    pub arrival: u32,
    pub passengers: f64,
    pub seated: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depot {
    pub id: String,
    pub location: String,
    pub capacity: u32,
    pub allowed_types: Vec<AllowedType>,
    /// Created at a terminal rather than configured.
    pub synthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedType {
    pub vehicle_type: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSlot {
    pub id: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub track_count: u32,
}
