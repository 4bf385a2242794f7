//! Simulation scenario model.
//!
//! A [`Scenario`] is an owned, mutable arena of a network graph and a transit
//! schedule. It is loaded fresh for every pipeline run, pruned in place by the
//! masking filters, and dropped once the sinks are done.

mod error;
mod events;
mod loader;
mod network;
mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ScenarioError;
pub use events::{Event, Person, PersonId};
pub use loader::{InMemoryScenario, LoadError, ScenarioLoader, ScenarioProvider};
pub use network::{Link, LinkId, Network, Node, NodeId};
pub use schedule::{
    Departure, DepartureId, LineId, RouteId, RouteStop, StopFacility, StopId, TransitLine,
    TransitRoute, TransitSchedule, Vehicle, VehicleId,
};

/// A network together with the transit schedule running on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub network: Network,
    pub schedule: TransitSchedule,
}

impl Scenario {
    pub fn new(network: Network, schedule: TransitSchedule) -> Self {
        Self { network, schedule }
    }

    /// Check referential integrity across network and schedule.
    ///
    /// Every link endpoint exists; every route stop names an existing stop
    /// facility; every link on a route path, and the link of every stop
    /// facility served by a route, exists in the network. Facilities that no
    /// route serves are not required to sit on a remaining link.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.network.validate()?;
        self.schedule.validate()?;

        for line in self.schedule.lines() {
            for route in &line.routes {
                for link in &route.path {
                    if !self.network.contains_link(link) {
                        return Err(ScenarioError::MissingLink {
                            referenced_by: format!("route {}", route.id),
                            link: link.to_string(),
                        });
                    }
                }
                for stop in &route.stops {
                    // presence checked by schedule.validate
                    let Some(facility) = self.schedule.facility(&stop.stop) else {
                        continue;
                    };
                    if !self.network.contains_link(&facility.link) {
                        return Err(ScenarioError::MissingLink {
                            referenced_by: format!("stop facility {}", facility.id),
                            link: facility.link.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
