//! Passenger demand from simulation events.
//!
//! Boardings and alightings are matched per person and vehicle, and every
//! ride is spread over the route segments between the two stops.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use super::PassengerPipe;
use crate::pipeline::{Filter, PipelineError};
use crate::scenario::{
    DepartureId, Event, LineId, PersonId, RouteId, StopId, TransitRoute, TransitSchedule,
    VehicleId,
};
use crate::selection::TransitLineSelection;

/// Identifies the segment between stop `index` and `index + 1` of one
/// departure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    pub line: LineId,
    pub route: RouteId,
    pub departure: DepartureId,
    pub index: usize,
}

/// Passenger load on a segment, already scaled to the full population.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLoad {
    pub from: StopId,
    pub to: StopId,
    pub passengers: f64,
    /// Passengers whose ride lasts at least the seat duration threshold.
    pub seated: f64,
}

/// Passenger loads per departure segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassengerCounts {
    segments: BTreeMap<SegmentKey, SegmentLoad>,
}

impl PassengerCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SegmentKey) -> Option<&SegmentLoad> {
        self.segments.get(key)
    }

    /// Loads ordered by line, route, departure and segment.
    pub fn iter(&self) -> impl Iterator<Item = (&SegmentKey, &SegmentLoad)> {
        self.segments.iter()
    }

    /// Loads of one departure, ordered by segment.
    pub fn departure<'a>(
        &'a self,
        line: &'a LineId,
        route: &'a RouteId,
        departure: &'a DepartureId,
    ) -> impl Iterator<Item = (usize, &'a SegmentLoad)> + 'a {
        let key = |index| SegmentKey {
            line: line.clone(),
            route: route.clone(),
            departure: departure.clone(),
            index,
        };
        self.segments
            .range(key(0)..=key(usize::MAX))
            .map(|(k, load)| (k.index, load))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn add(&mut self, key: SegmentKey, from: &StopId, to: &StopId, weight: f64, seated: bool) {
        let load = self.segments.entry(key).or_insert_with(|| SegmentLoad {
            from: from.clone(),
            to: to.clone(),
            passengers: 0.0,
            seated: 0.0,
        });
        load.passengers += weight;
        if seated {
            load.seated += weight;
        }
    }
}

/// Reconstructs passenger rides on selected routes and aggregates them per
/// departure segment.
#[derive(Debug, Clone)]
pub struct EventAnalysisFilter {
    sample_size: f64,
    seat_duration_threshold_secs: u32,
}

impl EventAnalysisFilter {
    /// `sample_size` is the simulated share of the population; every ride
    /// counts `1 / sample_size` passengers.
    pub fn new(sample_size: f64, seat_duration_threshold_secs: u32) -> Self {
        Self {
            sample_size,
            seat_duration_threshold_secs,
        }
    }

    pub fn analyse(
        &self,
        schedule: &TransitSchedule,
        selection: &TransitLineSelection,
        events: &[Event],
    ) -> PassengerCounts {
        let weight = 1.0 / self.sample_size;
        let mut counts = PassengerCounts::new();
        let mut vehicles: HashMap<&VehicleId, Trip<'_>> = HashMap::new();
        let mut drivers: HashSet<&PersonId> = HashSet::new();
        let mut boardings: HashMap<(&PersonId, &VehicleId), Boarding> = HashMap::new();
        let mut rides = 0usize;

        for event in events {
            match event {
                Event::TransitDriverStarts {
                    driver,
                    vehicle,
                    line,
                    route,
                    departure,
                    ..
                } => {
                    drivers.insert(driver);
                    // a vehicle serving an unselected route is no longer tracked
                    vehicles.remove(vehicle);
                    if !selection.contains_route(line, route) {
                        continue;
                    }
                    match schedule.line(line).and_then(|l| l.route(route)) {
                        Some(transit_route) => {
                            vehicles.insert(
                                vehicle,
                                Trip {
                                    line,
                                    route: transit_route,
                                    departure,
                                    stop_index: None,
                                },
                            );
                        }
                        None => warn!(
                            line = %line,
                            route = %route,
                            vehicle = %vehicle,
                            "Transit driver starts on a route missing from the schedule"
                        ),
                    }
                }
                Event::VehicleArrivesAtFacility {
                    vehicle, facility, ..
                } => {
                    if let Some(trip) = vehicles.get_mut(vehicle)
                        && !trip.arrive(facility)
                    {
                        warn!(
                            vehicle = %vehicle,
                            stop = %facility,
                            route = %trip.route.id,
                            "Vehicle arrives at a stop not on the remainder of its route"
                        );
                    }
                }
                Event::VehicleDepartsAtFacility { .. } => {}
                Event::PersonEntersVehicle {
                    time,
                    person,
                    vehicle,
                } => {
                    if drivers.contains(person) {
                        continue;
                    }
                    let Some(trip) = vehicles.get(vehicle) else {
                        continue;
                    };
                    match trip.stop_index {
                        Some(index) => {
                            boardings.insert((person, vehicle), Boarding { index, time: *time });
                        }
                        None => warn!(
                            person = %person,
                            vehicle = %vehicle,
                            "Person boards a vehicle that has not reached its first stop"
                        ),
                    }
                }
                Event::PersonLeavesVehicle {
                    time,
                    person,
                    vehicle,
                } => {
                    if drivers.contains(person) {
                        continue;
                    }
                    let Some(trip) = vehicles.get(vehicle) else {
                        continue;
                    };
                    let Some(boarding) = boardings.remove(&(person, vehicle)) else {
                        warn!(
                            person = %person,
                            vehicle = %vehicle,
                            "Person leaves a vehicle without boarding it"
                        );
                        continue;
                    };
                    let Some(alighting) = trip.stop_index else {
                        continue;
                    };

                    let seated =
                        time.saturating_sub(boarding.time) >= self.seat_duration_threshold_secs;
                    for index in boarding.index..alighting {
                        let stops = &trip.route.stops;
                        counts.add(
                            SegmentKey {
                                line: trip.line.clone(),
                                route: trip.route.id.clone(),
                                departure: trip.departure.clone(),
                                index,
                            },
                            &stops[index].stop,
                            &stops[index + 1].stop,
                            weight,
                            seated,
                        );
                    }
                    rides += 1;
                }
            }
        }

        if !boardings.is_empty() {
            debug!(open = boardings.len(), "Rides without alighting at end of events");
        }
        info!(rides, segments = counts.len(), "Analysed passenger events");
        counts
    }
}

impl Filter<PassengerPipe> for EventAnalysisFilter {
    fn apply(&self, pipe: &mut PassengerPipe) -> Result<(), PipelineError> {
        pipe.counts = self.analyse(&pipe.scenario.schedule, &pipe.selection, &pipe.events);
        Ok(())
    }
}

/// A vehicle serving a selected departure.
struct Trip<'a> {
    line: &'a LineId,
    route: &'a TransitRoute,
    departure: &'a DepartureId,
    /// Position of the last stop reached.
    stop_index: Option<usize>,
}

impl Trip<'_> {
    /// Advance to the next occurrence of `stop` on the route. Returns false
    /// if the remainder of the route does not call there.
    fn arrive(&mut self, stop: &StopId) -> bool {
        let start = self.stop_index.map_or(0, |i| i + 1);
        match self.route.stops[start.min(self.route.stops.len())..]
            .iter()
            .position(|s| &s.stop == stop)
        {
            Some(offset) => {
                self.stop_index = Some(start + offset);
                true
            }
            None => false,
        }
    }
}

struct Boarding {
    index: usize,
    time: u32,
}
