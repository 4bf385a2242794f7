//! Public transit schedule.
//!
//! A `TransitSchedule` owns stop facilities, transit lines (each an ordered
//! list of routes) and the minimal transfer times between stop facilities.
//! Everything is addressed by id so that masking can remove entries without
//! pointer surgery.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::ScenarioError;
use super::network::LinkId;
use crate::domain::{Coord, Id};

pub type StopId = Id<StopFacility>;
pub type LineId = Id<TransitLine>;
pub type RouteId = Id<TransitRoute>;
pub type DepartureId = Id<Departure>;
pub type VehicleId = Id<Vehicle>;

/// Marker for transit vehicle ids.
#[derive(Debug)]
pub enum Vehicle {}

/// A place where transit vehicles stop, located on a network link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopFacility {
    pub id: StopId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coord: Coord,
    pub link: LinkId,
}

impl StopFacility {
    pub fn new(id: StopId, coord: Coord, link: LinkId) -> Self {
        Self {
            id,
            name: None,
            coord,
            link,
        }
    }
}

/// A stop on a route, with offsets from the departure at the first stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub stop: StopId,
    #[serde(default)]
    pub arrival_offset_secs: Option<u32>,
    #[serde(default)]
    pub departure_offset_secs: Option<u32>,
}

impl RouteStop {
    pub fn new(
        stop: StopId,
        arrival_offset_secs: Option<u32>,
        departure_offset_secs: Option<u32>,
    ) -> Self {
        Self {
            stop,
            arrival_offset_secs,
            departure_offset_secs,
        }
    }
}

/// A single vehicle run along a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub id: DepartureId,
    /// Departure time at the first stop, seconds after midnight.
    pub time_secs: u32,
    pub vehicle: VehicleId,
}

/// A sequence of stops served along a network path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitRoute {
    pub id: RouteId,
    #[serde(default)]
    pub transport_mode: String,
    /// Links traversed between the first and last stop, in order.
    #[serde(default)]
    pub path: Vec<LinkId>,
    pub stops: Vec<RouteStop>,
    #[serde(default)]
    pub departures: Vec<Departure>,
}

impl TransitRoute {
    pub fn first_stop(&self) -> Option<&RouteStop> {
        self.stops.first()
    }

    pub fn last_stop(&self) -> Option<&RouteStop> {
        self.stops.last()
    }
}

/// A transit line: an ordered collection of routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLine {
    pub id: LineId,
    #[serde(default)]
    pub routes: Vec<TransitRoute>,
}

impl TransitLine {
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            routes: Vec::new(),
        }
    }

    pub fn route(&self, id: &RouteId) -> Option<&TransitRoute> {
        self.routes.iter().find(|r| &r.id == id)
    }
}

/// On-disk form of a minimal transfer time entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferTimeEntry {
    from: StopId,
    to: StopId,
    seconds: u32,
}

/// On-disk form of a schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleFile {
    stop_facilities: Vec<StopFacility>,
    transit_lines: Vec<TransitLine>,
    #[serde(default)]
    minimal_transfer_times: Vec<TransferTimeEntry>,
}

/// The transit schedule of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleFile", into = "ScheduleFile")]
pub struct TransitSchedule {
    facilities: BTreeMap<StopId, StopFacility>,
    lines: BTreeMap<LineId, TransitLine>,
    /// Minimal transfer time in seconds, keyed by (from stop, to stop).
    minimal_transfer_times: BTreeMap<(StopId, StopId), u32>,
}

impl TransitSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop facility. Fails if the id is taken.
    pub fn add_facility(&mut self, facility: StopFacility) -> Result<(), ScenarioError> {
        if self.facilities.contains_key(&facility.id) {
            return Err(ScenarioError::DuplicateId {
                kind: "stop facility",
                id: facility.id.to_string(),
            });
        }
        self.facilities.insert(facility.id.clone(), facility);
        Ok(())
    }

    /// Add a transit line. Fails if the line id or one of its route ids is
    /// taken within the line.
    pub fn add_line(&mut self, line: TransitLine) -> Result<(), ScenarioError> {
        if self.lines.contains_key(&line.id) {
            return Err(ScenarioError::DuplicateId {
                kind: "transit line",
                id: line.id.to_string(),
            });
        }
        let mut route_ids = HashSet::new();
        for route in &line.routes {
            if !route_ids.insert(&route.id) {
                return Err(ScenarioError::DuplicateId {
                    kind: "transit route",
                    id: format!("{}/{}", line.id, route.id),
                });
            }
        }
        self.lines.insert(line.id.clone(), line);
        Ok(())
    }

    /// Set the minimal transfer time between two stop facilities.
    pub fn set_minimal_transfer_time(&mut self, from: StopId, to: StopId, seconds: u32) {
        self.minimal_transfer_times.insert((from, to), seconds);
    }

    pub fn minimal_transfer_time(&self, from: &StopId, to: &StopId) -> Option<u32> {
        self.minimal_transfer_times
            .get(&(from.clone(), to.clone()))
            .copied()
    }

    pub fn facility(&self, id: &StopId) -> Option<&StopFacility> {
        self.facilities.get(id)
    }

    pub fn contains_facility(&self, id: &StopId) -> bool {
        self.facilities.contains_key(id)
    }

    pub fn line(&self, id: &LineId) -> Option<&TransitLine> {
        self.lines.get(id)
    }

    pub fn facilities(&self) -> impl Iterator<Item = &StopFacility> {
        self.facilities.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &TransitLine> {
        self.lines.values()
    }

    /// Iterate minimal transfer times as `(from, to, seconds)`.
    pub fn minimal_transfer_times(&self) -> impl Iterator<Item = (&StopId, &StopId, u32)> {
        self.minimal_transfer_times
            .iter()
            .map(|((from, to), secs)| (from, to, *secs))
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn minimal_transfer_time_count(&self) -> usize {
        self.minimal_transfer_times.len()
    }

    /// Keep only lines for which `keep` returns true.
    pub fn retain_lines(&mut self, mut keep: impl FnMut(&TransitLine) -> bool) {
        self.lines.retain(|_, line| keep(line));
    }

    /// Keep only stop facilities for which `keep` returns true.
    pub fn retain_facilities(&mut self, mut keep: impl FnMut(&StopFacility) -> bool) {
        self.facilities.retain(|_, facility| keep(facility));
    }

    /// Keep only the transfer time entries for which `keep` returns true.
    pub fn retain_minimal_transfer_times(
        &mut self,
        mut keep: impl FnMut(&StopId, &StopId) -> bool,
    ) {
        self.minimal_transfer_times
            .retain(|(from, to), _| keep(from, to));
    }

    /// Ids of all stop facilities referenced by a route stop of any line.
    pub fn referenced_facility_ids(&self) -> BTreeSet<StopId> {
        self.lines
            .values()
            .flat_map(|line| line.routes.iter())
            .flat_map(|route| route.stops.iter())
            .map(|stop| stop.stop.clone())
            .collect()
    }

    /// Check internal references: every route has stops, every route stop
    /// and every transfer time endpoint names an existing facility.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for line in self.lines.values() {
            for route in &line.routes {
                if route.stops.is_empty() {
                    return Err(ScenarioError::EmptyRoute(route.id.to_string()));
                }
                for stop in &route.stops {
                    if !self.facilities.contains_key(&stop.stop) {
                        return Err(ScenarioError::MissingStopFacility {
                            route: route.id.to_string(),
                            stop: stop.stop.to_string(),
                        });
                    }
                }
            }
        }
        for (from, to) in self.minimal_transfer_times.keys() {
            for stop in [from, to] {
                if !self.facilities.contains_key(stop) {
                    return Err(ScenarioError::MissingTransferStop(stop.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<ScheduleFile> for TransitSchedule {
    type Error = ScenarioError;

    fn try_from(file: ScheduleFile) -> Result<Self, Self::Error> {
        let mut schedule = TransitSchedule::new();
        for facility in file.stop_facilities {
            schedule.add_facility(facility)?;
        }
        for line in file.transit_lines {
            schedule.add_line(line)?;
        }
        for entry in file.minimal_transfer_times {
            schedule.set_minimal_transfer_time(entry.from, entry.to, entry.seconds);
        }
        Ok(schedule)
    }
}

impl From<TransitSchedule> for ScheduleFile {
    fn from(schedule: TransitSchedule) -> Self {
        ScheduleFile {
            stop_facilities: schedule.facilities.into_values().collect(),
            transit_lines: schedule.lines.into_values().collect(),
            minimal_transfer_times: schedule
                .minimal_transfer_times
                .into_iter()
                .map(|((from, to), seconds)| TransferTimeEntry { from, to, seconds })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_id(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    fn facility(id: &str) -> StopFacility {
        StopFacility::new(stop_id(id), Coord::default(), LinkId::parse("l").unwrap())
    }

    fn route(id: &str, stops: &[&str]) -> TransitRoute {
        TransitRoute {
            id: RouteId::parse(id).unwrap(),
            transport_mode: "rail".into(),
            path: Vec::new(),
            stops: stops
                .iter()
                .map(|s| RouteStop::new(stop_id(s), None, Some(0)))
                .collect(),
            departures: Vec::new(),
        }
    }

    fn schedule() -> TransitSchedule {
        let mut schedule = TransitSchedule::new();
        for id in ["s1", "s2", "s3"] {
            schedule.add_facility(facility(id)).unwrap();
        }
        let mut line = TransitLine::new(LineId::parse("L1").unwrap());
        line.routes.push(route("r1", &["s1", "s2"]));
        schedule.add_line(line).unwrap();
        schedule.set_minimal_transfer_time(stop_id("s1"), stop_id("s3"), 120);
        schedule
    }

    #[test]
    fn lookups() {
        let schedule = schedule();
        assert_eq!(schedule.facility_count(), 3);
        assert_eq!(schedule.line_count(), 1);
        assert_eq!(
            schedule.minimal_transfer_time(&stop_id("s1"), &stop_id("s3")),
            Some(120)
        );
        assert!(
            schedule
                .minimal_transfer_time(&stop_id("s3"), &stop_id("s1"))
                .is_none()
        );
        let line = schedule.line(&LineId::parse("L1").unwrap()).unwrap();
        let route = line.route(&RouteId::parse("r1").unwrap()).unwrap();
        assert_eq!(route.first_stop().unwrap().stop, stop_id("s1"));
        assert_eq!(route.last_stop().unwrap().stop, stop_id("s2"));
    }

    #[test]
    fn referenced_facilities() {
        let referenced = schedule().referenced_facility_ids();
        assert_eq!(referenced.len(), 2);
        assert!(referenced.contains(&stop_id("s1")));
        assert!(!referenced.contains(&stop_id("s3")));
    }

    #[test]
    fn reject_duplicate_route_within_line() {
        let mut schedule = TransitSchedule::new();
        let mut line = TransitLine::new(LineId::parse("L1").unwrap());
        line.routes.push(route("r1", &["s1"]));
        line.routes.push(route("r1", &["s2"]));
        let err = schedule.add_line(line).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::DuplicateId {
                kind: "transit route",
                id: "L1/r1".into()
            }
        );
    }

    #[test]
    fn validate_detects_missing_facility() {
        let mut schedule = schedule();
        schedule.retain_facilities(|f| f.id.as_str() != "s2");
        assert_eq!(
            schedule.validate().unwrap_err(),
            ScenarioError::MissingStopFacility {
                route: "r1".into(),
                stop: "s2".into()
            }
        );
    }

    #[test]
    fn validate_detects_dangling_transfer() {
        let mut schedule = schedule();
        schedule.retain_facilities(|f| f.id.as_str() != "s3");
        assert_eq!(
            schedule.validate().unwrap_err(),
            ScenarioError::MissingTransferStop("s3".into())
        );
    }

    #[test]
    fn validate_rejects_empty_route() {
        let mut schedule = TransitSchedule::new();
        let mut line = TransitLine::new(LineId::parse("L1").unwrap());
        line.routes.push(route("r1", &[]));
        schedule.add_line(line).unwrap();
        assert_eq!(
            schedule.validate().unwrap_err(),
            ScenarioError::EmptyRoute("r1".into())
        );
    }

    #[test]
    fn serde_roundtrip_through_file_form() {
        let schedule = schedule();
        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.contains("\"minimalTransferTimes\""));
        let back: TransitSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
