//! Strategies deciding which transit routes are of interest.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Group, SelectionError, TransitLineSelection};
use crate::domain::Id;
use crate::scenario::{LineId, StopId, TransitLine, TransitRoute, TransitSchedule};

pub type VehicleTypeId = Id<VehicleType>;

/// Marker for vehicle type ids.
#[derive(Debug)]
pub enum VehicleType {}

/// A named group of vehicle types, e.g. all regional rail units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCategory {
    pub group: String,
    pub vehicle_types: BTreeSet<VehicleTypeId>,
}

/// Trait for selecting the transit routes of interest from a schedule.
///
/// Strategies hold no state beyond their construction-time configuration, so
/// the same strategy yields the same selection for the same schedule.
pub trait FilterStrategy: Send + Sync {
    fn filter(&self, schedule: &TransitSchedule) -> Result<TransitLineSelection, SelectionError>;
}

/// Selects every route of every line, without a group.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilterStrategy;

impl FilterStrategy for NoFilterStrategy {
    fn filter(&self, schedule: &TransitSchedule) -> Result<TransitLineSelection, SelectionError> {
        let mut selection = TransitLineSelection::new();
        for line in schedule.lines() {
            for route in &line.routes {
                selection.add(Group::Ungrouped, line.id.clone(), route.id.clone())?;
            }
        }
        Ok(selection)
    }
}

/// Selects every route of the configured lines, grouped by the category of
/// the vehicle type allocated to each line.
#[derive(Debug, Clone)]
pub struct TransitLineIdFilterStrategy {
    allocations: BTreeMap<LineId, VehicleTypeId>,
    lookup: HashMap<VehicleTypeId, String>,
}

impl TransitLineIdFilterStrategy {
    /// Create the strategy from line → vehicle type allocations and the
    /// vehicle categories. A vehicle type may belong to one category only.
    pub fn new(
        allocations: BTreeMap<LineId, VehicleTypeId>,
        categories: impl IntoIterator<Item = VehicleCategory>,
    ) -> Result<Self, SelectionError> {
        let mut lookup: HashMap<VehicleTypeId, String> = HashMap::new();
        for category in categories {
            for vehicle_type in category.vehicle_types {
                if let Some(first) = lookup.get(&vehicle_type)
                    && *first != category.group
                {
                    return Err(SelectionError::AmbiguousVehicleType {
                        vehicle_type: vehicle_type.to_string(),
                        first: first.clone(),
                        second: category.group.clone(),
                    });
                }
                lookup.insert(vehicle_type, category.group.clone());
            }
        }
        Ok(Self {
            allocations,
            lookup,
        })
    }

    fn group_of(&self, line: &LineId, vehicle_type: &VehicleTypeId) -> Group {
        match self.lookup.get(vehicle_type) {
            Some(group) => Group::named(group.as_str()),
            None => {
                warn!(
                    line = %line,
                    vehicle_type = %vehicle_type,
                    "Vehicle type belongs to no category, selecting line without group"
                );
                Group::Ungrouped
            }
        }
    }
}

impl FilterStrategy for TransitLineIdFilterStrategy {
    fn filter(&self, schedule: &TransitSchedule) -> Result<TransitLineSelection, SelectionError> {
        let mut selection = TransitLineSelection::new();

        for (line_id, vehicle_type) in &self.allocations {
            let line = schedule
                .line(line_id)
                .ok_or_else(|| SelectionError::LineNotFound(line_id.to_string()))?;
            let group = self.group_of(line_id, vehicle_type);

            for route in &line.routes {
                selection.add(group.clone(), line.id.clone(), route.id.clone())?;
            }
        }

        debug!(
            lines = self.allocations.len(),
            routes = selection.len(),
            "Selected transit lines by id"
        );
        Ok(selection)
    }
}

type RoutePredicate = dyn Fn(&TransitLine, &TransitRoute) -> bool + Send + Sync;

/// Selects the routes accepted by a caller-supplied predicate.
///
/// The predicate is evaluated once per route.
pub struct PredicateFilterStrategy {
    group: Group,
    predicate: Box<RoutePredicate>,
}

impl PredicateFilterStrategy {
    /// Select routes for which `predicate` returns true, without a group.
    pub fn new(
        predicate: impl Fn(&TransitLine, &TransitRoute) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            group: Group::Ungrouped,
            predicate: Box::new(predicate),
        }
    }

    /// Select every route calling at at least one of the given stops, e.g.
    /// the stops inside a region of interest.
    pub fn serving_any_stop(stops: BTreeSet<StopId>) -> Self {
        Self::new(move |_, route| route.stops.iter().any(|s| stops.contains(&s.stop)))
    }

    /// Tag selected routes with `group`.
    pub fn with_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }
}

impl fmt::Debug for PredicateFilterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilterStrategy")
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl FilterStrategy for PredicateFilterStrategy {
    fn filter(&self, schedule: &TransitSchedule) -> Result<TransitLineSelection, SelectionError> {
        let mut selection = TransitLineSelection::new();
        for line in schedule.lines() {
            for route in &line.routes {
                if (self.predicate)(line, route) {
                    selection.add(self.group.clone(), line.id.clone(), route.id.clone())?;
                }
            }
        }
        Ok(selection)
    }
}
