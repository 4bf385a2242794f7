//! Simulation events relevant to passenger demand.
//!
//! Only the event kinds needed to reconstruct who rode which transit vehicle
//! between which stops are modelled. Times are seconds after midnight.

use serde::{Deserialize, Serialize};

use super::schedule::{DepartureId, LineId, RouteId, StopId, VehicleId};
use crate::domain::Id;

pub type PersonId = Id<Person>;

/// Marker for agent (person) ids.
#[derive(Debug)]
pub enum Person {}

/// A single simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// A transit driver starts serving a departure with a vehicle.
    #[serde(rename_all = "camelCase")]
    TransitDriverStarts {
        time: u32,
        driver: PersonId,
        vehicle: VehicleId,
        line: LineId,
        route: RouteId,
        departure: DepartureId,
    },

    /// A vehicle arrives at a stop facility.
    #[serde(rename_all = "camelCase")]
    VehicleArrivesAtFacility {
        time: u32,
        vehicle: VehicleId,
        facility: StopId,
    },

    /// A vehicle departs from a stop facility.
    #[serde(rename_all = "camelCase")]
    VehicleDepartsAtFacility {
        time: u32,
        vehicle: VehicleId,
        facility: StopId,
    },

    /// A person boards a vehicle.
    #[serde(rename_all = "camelCase")]
    PersonEntersVehicle {
        time: u32,
        person: PersonId,
        vehicle: VehicleId,
    },

    /// A person alights from a vehicle.
    #[serde(rename_all = "camelCase")]
    PersonLeavesVehicle {
        time: u32,
        person: PersonId,
        vehicle: VehicleId,
    },
}

impl Event {
    /// Event time in seconds after midnight.
    pub fn time(&self) -> u32 {
        match self {
            Event::TransitDriverStarts { time, .. }
            | Event::VehicleArrivesAtFacility { time, .. }
            | Event::VehicleDepartsAtFacility { time, .. }
            | Event::PersonEntersVehicle { time, .. }
            | Event::PersonLeavesVehicle { time, .. } => *time,
        }
    }
}
