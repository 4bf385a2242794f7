//! Programmatic construction of a [`RequestConfig`].

use std::path::PathBuf;

use chrono::NaiveDateTime;

use super::request_config::{
    AllowedType, Costs, DepotConfig, DepotFacility, DepotId, Global, MaintenanceConfig,
    MaintenanceSlot, MaintenanceSlotId, ShuntingConfig,
};
use super::{ConfigError, RequestConfig, SelectionConfig};
use crate::scenario::StopId;
use crate::selection::VehicleTypeId;

/// Builder for [`RequestConfig`].
///
/// Sections not touched by the builder keep their defaults and can be adjusted
/// on the built config.
#[derive(Debug, Clone, Default)]
pub struct RequestConfigBuilder {
    run_id: Option<String>,
    instance_id: Option<String>,
    input_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    global: Global,
    depot: DepotConfig,
    shunting: ShuntingConfig,
    maintenance: MaintenanceConfig,
    costs: Costs,
}

impl RequestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Id of the request. Defaults to the run id.
    pub fn instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn input_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_directory = Some(dir.into());
        self
    }

    pub fn output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    pub fn selection(mut self, selection: SelectionConfig) -> Self {
        self.global.selection = selection;
        self
    }

    pub fn global(mut self, global: Global) -> Self {
        self.global = global;
        self
    }

    pub fn costs(mut self, costs: Costs) -> Self {
        self.costs = costs;
        self
    }

    /// Add a depot. Ids and locations must be unique.
    pub fn add_depot(
        mut self,
        id: DepotId,
        location: StopId,
        capacity: u32,
    ) -> Result<Self, ConfigError> {
        if self.depot.facilities.iter().any(|d| d.id == id) {
            return Err(ConfigError::DuplicateDepot(id.to_string()));
        }
        if self.depot.facilities.iter().any(|d| d.location == location) {
            return Err(ConfigError::DuplicateDepotLocation(location.to_string()));
        }
        self.depot
            .facilities
            .push(DepotFacility::new(id, location, capacity));
        Ok(self)
    }

    /// Restrict capacity for a vehicle type in an already added depot.
    pub fn add_allowed_type_to_depot(
        mut self,
        id: &DepotId,
        vehicle_type: VehicleTypeId,
        capacity: u32,
    ) -> Result<Self, ConfigError> {
        let depot = self
            .depot
            .facilities
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| ConfigError::UnknownDepot(id.to_string()))?;
        depot.allowed_types.push(AllowedType {
            vehicle_type,
            capacity,
        });
        Ok(self)
    }

    pub fn add_shunting_location(mut self, location: StopId) -> Result<Self, ConfigError> {
        if self.shunting.on_route_locations.contains(&location) {
            return Err(ConfigError::DuplicateShuntingLocation(location.to_string()));
        }
        self.shunting.on_route_locations.push(location);
        Ok(self)
    }

    /// Add a maintenance slot with a single track.
    pub fn add_maintenance_slot(
        mut self,
        id: MaintenanceSlotId,
        location: StopId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ConfigError> {
        if self.maintenance.slots.iter().any(|s| s.id == id) {
            return Err(ConfigError::DuplicateMaintenanceSlot(id.to_string()));
        }
        if end < start {
            return Err(ConfigError::InvalidMaintenanceWindow(id.to_string()));
        }
        self.maintenance.slots.push(MaintenanceSlot {
            id,
            location,
            start,
            end,
            track_count: 1,
        });
        Ok(self)
    }

    pub fn create_depots_at_terminals(mut self, enabled: bool) -> Self {
        self.depot.create_at_terminal_locations = enabled;
        self
    }

    /// Build the config with defaults for everything not set.
    ///
    /// Fails when the run id or either directory is missing.
    pub fn build(self) -> Result<RequestConfig, ConfigError> {
        let run_id = self.run_id.ok_or(ConfigError::MissingField("runId"))?;
        let input_directory = self
            .input_directory
            .ok_or(ConfigError::MissingField("inputDirectory"))?;
        let output_directory = self
            .output_directory
            .ok_or(ConfigError::MissingField("outputDirectory"))?;

        let config = RequestConfig {
            instance_id: self.instance_id.unwrap_or_else(|| run_id.clone()),
            run_id,
            input_directory,
            output_directory,
            global: self.global,
            depot: self.depot,
            shunting: self.shunting,
            maintenance: self.maintenance,
            costs: self.costs,
        };
        config.validate()?;
        Ok(config)
    }
}
