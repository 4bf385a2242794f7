//! Request configuration.
//!
//! Everything the request pipeline needs besides the scenario itself: where to
//! read and write, which lines to select, and the depot, shunting, maintenance
//! and cost parameters folded into the optimization request.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ConfigError, SelectionConfig};
use crate::domain::{Id, TravelMode};
use crate::pipeline::scenario::NetworkMaskPolicy;
use crate::scenario::StopId;
use crate::selection::VehicleTypeId;

pub type DepotId = Id<DepotFacility>;
pub type MaintenanceSlotId = Id<MaintenanceSlot>;

/// Configuration of one request pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    /// Id of the simulation run whose output is read.
    pub run_id: String,

    /// Id of the optimization request; names the output files.
    pub instance_id: String,

    /// Directory holding the simulation output.
    pub input_directory: PathBuf,

    /// Directory the request and derived files are written to.
    pub output_directory: PathBuf,

    #[serde(default)]
    pub global: Global,

    #[serde(default)]
    pub depot: DepotConfig,

    #[serde(default)]
    pub shunting: ShuntingConfig,

    #[serde(default)]
    pub maintenance: MaintenanceConfig,

    #[serde(default)]
    pub costs: Costs,
}

/// Parameters that apply to the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Global {
    /// Which transit lines are of interest.
    pub selection: SelectionConfig,

    /// Link modes usable for dead-head trips. Without it the network is
    /// masked to exactly the links used by the selected lines.
    pub allowed_modes: Option<BTreeSet<TravelMode>>,

    /// Speed limit used in the routing of dead-head trips.
    pub dead_head_trip_speed_limit: f64,

    /// Forbid dead-head trips altogether.
    pub forbid_dead_head_trips: bool,

    /// Vehicles stopping shorter than this (seconds) do not count into the
    /// day limit at stations.
    pub day_limit_threshold_secs: u32,

    /// Passengers travelling longer than this (seconds) are assigned a seat.
    pub seat_duration_threshold_secs: u32,

    /// Share of the population simulated, in (0, 1].
    pub sample_size: f64,

    /// Factor applied to passenger counts to reflect demand deviations.
    pub capacity_factor: f64,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            allowed_modes: None,
            dead_head_trip_speed_limit: 90.0 * 3.6,
            forbid_dead_head_trips: false,
            day_limit_threshold_secs: 0,
            seat_duration_threshold_secs: 15 * 60,
            sample_size: 1.0,
            capacity_factor: 1.0,
        }
    }
}

impl Global {
    /// The network masking policy implied by `allowed_modes`.
    pub fn network_mask_policy(&self) -> NetworkMaskPolicy {
        match &self.allowed_modes {
            Some(modes) => NetworkMaskPolicy::AllowedModes(modes.clone()),
            None => NetworkMaskPolicy::ServiceTripOnly,
        }
    }
}

/// Capacity for one vehicle type within a depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedType {
    pub vehicle_type: VehicleTypeId,
    pub capacity: u32,
}

/// A depot: vehicle storage at a stop facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotFacility {
    pub id: DepotId,
    pub location: StopId,
    pub capacity: u32,
    /// Optional per vehicle type capacities; empty means all types.
    #[serde(default)]
    pub allowed_types: Vec<AllowedType>,
}

impl DepotFacility {
    pub fn new(id: DepotId, location: StopId, capacity: u32) -> Self {
        Self {
            id,
            location,
            capacity,
            allowed_types: Vec::new(),
        }
    }
}

/// Depot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepotConfig {
    /// Explicitly configured depots.
    pub facilities: Vec<DepotFacility>,

    /// Capacity of depots created automatically at terminals.
    pub default_capacity: u32,

    /// Prefix prepended to the location id to name automatic depots.
    pub default_id_prefix: String,

    /// Create depots at the terminal stops of selected routes.
    pub create_at_terminal_locations: bool,
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            facilities: Vec::new(),
            default_capacity: 999,
            default_id_prefix: "dpt_".to_string(),
            create_at_terminal_locations: true,
        }
    }
}

/// Shunting rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShuntingConfig {
    /// Locations along a route where units can be added to or removed from a
    /// formation without changing the lead vehicle.
    pub on_route_locations: Vec<StopId>,

    /// Maximal number of units in a formation.
    pub default_maximal_formation_count: u32,

    /// Minimum time between two activities (seconds).
    pub minimal_duration_secs: u32,

    /// Time to change from a service trip to a dead-head trip (seconds).
    pub dead_head_trip_duration_secs: u32,

    /// Additional time to couple or uncouple and change route (seconds).
    pub coupling_duration_secs: u32,
}

impl Default for ShuntingConfig {
    fn default() -> Self {
        Self {
            on_route_locations: Vec::new(),
            default_maximal_formation_count: 3,
            minimal_duration_secs: 60,
            dead_head_trip_duration_secs: 2 * 60,
            coupling_duration_secs: 3 * 60,
        }
    }
}

/// A time window at a location reserved for vehicle servicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSlot {
    pub id: MaintenanceSlotId,
    pub location: StopId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub track_count: u32,
}

/// Maintenance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceConfig {
    pub slots: Vec<MaintenanceSlot>,

    /// Maximal distance a vehicle travels without maintenance (metres).
    pub maximal_distance_m: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            maximal_distance_m: 15_000 * 1000,
        }
    }
}

/// Cost coefficients, all per second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Costs {
    /// Paid by each formation on a service trip.
    pub staff: u32,
    /// Paid per vehicle while idle.
    pub idle: u32,
    /// Paid per vehicle on a service trip.
    pub service_trip: u32,
    /// Paid per vehicle on a dead-head trip.
    pub dead_head_trip: u32,
    /// Paid per vehicle in maintenance.
    pub maintenance: u32,
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            staff: 100,
            idle: 25,
            service_trip: 50,
            dead_head_trip: 75,
            maintenance: 200,
        }
    }
}

impl RequestConfig {
    /// Start building a configuration.
    pub fn builder() -> super::RequestConfigBuilder {
        super::RequestConfigBuilder::new()
    }

    /// Stop facilities that must survive schedule masking even when no
    /// selected line serves them: every depot and maintenance location.
    pub fn facilities_to_keep(&self) -> BTreeSet<StopId> {
        self.depot
            .facilities
            .iter()
            .map(|d| d.location.clone())
            .chain(self.maintenance.slots.iter().map(|s| s.location.clone()))
            .collect()
    }

    /// Check the configuration for conflicts.
    ///
    /// Applies the same rules as the builder, for configurations that were
    /// deserialized rather than built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run_id.is_empty() {
            return Err(ConfigError::MissingField("runId"));
        }
        if self.instance_id.is_empty() {
            return Err(ConfigError::MissingField("instanceId"));
        }
        if !(self.global.sample_size > 0.0 && self.global.sample_size <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "sampleSize",
                reason: "must be in (0, 1]",
            });
        }
        if self.global.capacity_factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "capacityFactor",
                reason: "must be positive",
            });
        }

        let mut depot_ids = HashSet::new();
        let mut depot_locations = HashSet::new();
        for depot in &self.depot.facilities {
            if !depot_ids.insert(&depot.id) {
                return Err(ConfigError::DuplicateDepot(depot.id.to_string()));
            }
            if !depot_locations.insert(&depot.location) {
                return Err(ConfigError::DuplicateDepotLocation(
                    depot.location.to_string(),
                ));
            }
        }

        let mut shunting = HashSet::new();
        for location in &self.shunting.on_route_locations {
            if !shunting.insert(location) {
                return Err(ConfigError::DuplicateShuntingLocation(location.to_string()));
            }
        }

        let mut slot_ids = HashSet::new();
        for slot in &self.maintenance.slots {
            if !slot_ids.insert(&slot.id) {
                return Err(ConfigError::DuplicateMaintenanceSlot(slot.id.to_string()));
            }
            if slot.end < slot.start {
                return Err(ConfigError::InvalidMaintenanceWindow(slot.id.to_string()));
            }
        }

        Ok(())
    }
}
