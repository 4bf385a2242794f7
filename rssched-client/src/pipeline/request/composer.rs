//! Folds the masked scenario, passenger counts and configuration into one
//! [`Request`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::RequestPipe;
use super::dto::{
    self, Depot, Departure, Info, LinkDto, Location, NetworkDto, Parameters, Request, Route,
    Segment, Shunting,
};
use crate::config::{ConfigError, RequestConfig};
use crate::pipeline::passenger::PassengerCounts;
use crate::pipeline::{Filter, PipelineError};
use crate::scenario::{LineId, Scenario, StopId, TransitRoute};
use crate::selection::TransitLineSelection;

/// Builds the request document from the context and stores it there.
#[derive(Debug, Clone)]
pub struct RequestComposer {
    config: Arc<RequestConfig>,
}

impl RequestComposer {
    pub fn new(config: Arc<RequestConfig>) -> Self {
        Self { config }
    }

    pub fn compose(
        &self,
        scenario: &Scenario,
        selection: &TransitLineSelection,
        counts: &PassengerCounts,
    ) -> Result<Request, ConfigError> {
        let config = &*self.config;
        let routes = resolve_routes(scenario, selection);
        let depots = self.depots(&routes)?;

        let request = Request {
            info: Info {
                run_id: config.run_id.clone(),
                instance_id: config.instance_id.clone(),
                created: Utc::now(),
            },
            parameters: parameters(config),
            vehicle_categories: selection
                .groups()
                .into_iter()
                .filter_map(|g| g.label().map(str::to_string))
                .collect(),
            locations: self.locations(scenario),
            network: NetworkDto {
                links: scenario
                    .network
                    .links()
                    .map(|link| LinkDto {
                        id: link.id.to_string(),
                        from: link.from.to_string(),
                        to: link.to.to_string(),
                        length: link.length_m,
                        modes: link.modes.clone(),
                    })
                    .collect(),
            },
            routes: routes
                .iter()
                .map(|selected| route(selected, counts))
                .collect(),
            depots,
            maintenance_slots: config
                .maintenance
                .slots
                .iter()
                .map(|slot| dto::MaintenanceSlot {
                    id: slot.id.to_string(),
                    location: slot.location.to_string(),
                    start: slot.start,
                    end: slot.end,
                    track_count: slot.track_count,
                })
                .collect(),
        };

        info!(
            locations = request.locations.len(),
            routes = request.routes.len(),
            depots = request.depots.len(),
            maintenance_slots = request.maintenance_slots.len(),
            "Composed request"
        );
        Ok(request)
    }

    fn locations(&self, scenario: &Scenario) -> Vec<Location> {
        let shunting: BTreeSet<&StopId> = self.config.shunting.on_route_locations.iter().collect();
        scenario
            .schedule
            .facilities()
            .map(|facility| Location {
                id: facility.id.to_string(),
                name: facility.name.clone(),
                coord: facility.coord,
                link: facility.link.to_string(),
                on_route_shunting: shunting.contains(&facility.id),
            })
            .collect()
    }

    /// Configured depots, plus one per terminal stop when enabled.
    ///
    /// A configured depot at a terminal, or one whose id equals a depot that
    /// would be created, is a conflict.
    pub fn depots(&self, routes: &[ResolvedRoute<'_>]) -> Result<Vec<Depot>, ConfigError> {
        let config = &self.config.depot;
        let mut depots: Vec<Depot> = config
            .facilities
            .iter()
            .map(|facility| Depot {
                id: facility.id.to_string(),
                location: facility.location.to_string(),
                capacity: facility.capacity,
                allowed_types: facility
                    .allowed_types
                    .iter()
                    .map(|t| dto::AllowedType {
                        vehicle_type: t.vehicle_type.to_string(),
                        capacity: t.capacity,
                    })
                    .collect(),
                synthesized: false,
            })
            .collect();

        if !config.create_at_terminal_locations {
            return Ok(depots);
        }

        let terminals: BTreeSet<&StopId> = routes
            .iter()
            .flat_map(|r| [r.route.first_stop(), r.route.last_stop()])
            .flatten()
            .map(|stop| &stop.stop)
            .collect();

        for location in terminals {
            if let Some(explicit) = config.facilities.iter().find(|d| &d.location == location) {
                return Err(ConfigError::TerminalDepotCollision {
                    explicit: explicit.id.to_string(),
                    location: location.to_string(),
                });
            }
            let id = format!("{}{}", config.default_id_prefix, location);
            if config.facilities.iter().any(|d| d.id.as_str() == id) {
                return Err(ConfigError::TerminalDepotIdCollision(id));
            }
            debug!(depot = %id, location = %location, "Creating depot at terminal");
            depots.push(Depot {
                id,
                location: location.to_string(),
                capacity: config.default_capacity,
                allowed_types: Vec::new(),
                synthesized: true,
            });
        }
        Ok(depots)
    }
}

impl Filter<RequestPipe> for RequestComposer {
    fn apply(&self, pipe: &mut RequestPipe) -> Result<(), PipelineError> {
        let request = self.compose(&pipe.scenario, &pipe.selection, &pipe.counts)?;
        pipe.request = Some(request);
        Ok(())
    }
}

/// A selected route resolved against the masked schedule.
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'a> {
    pub line: &'a LineId,
    pub group: &'a crate::selection::Group,
    pub route: &'a TransitRoute,
}

/// Resolve every selected route still present in the schedule.
pub fn resolve_routes<'a>(
    scenario: &'a Scenario,
    selection: &'a TransitLineSelection,
) -> Vec<ResolvedRoute<'a>> {
    selection
        .routes()
        .filter_map(|selected| {
            let route = scenario
                .schedule
                .line(selected.line)
                .and_then(|line| line.route(selected.route));
            if route.is_none() {
                warn!(
                    line = %selected.line,
                    route = %selected.route,
                    "Selected route missing from masked schedule"
                );
            }
            route.map(|route| ResolvedRoute {
                line: selected.line,
                group: selected.group,
                route,
            })
        })
        .collect()
}

fn parameters(config: &RequestConfig) -> Parameters {
    Parameters {
        forbid_dead_head_trips: config.global.forbid_dead_head_trips,
        dead_head_trip_speed_limit: config.global.dead_head_trip_speed_limit,
        day_limit_threshold: config.global.day_limit_threshold_secs,
        shunting: Shunting {
            maximal_formation_count: config.shunting.default_maximal_formation_count,
            minimal_duration: config.shunting.minimal_duration_secs,
            dead_head_trip_duration: config.shunting.dead_head_trip_duration_secs,
            coupling_duration: config.shunting.coupling_duration_secs,
        },
        maximal_distance_without_maintenance: config.maintenance.maximal_distance_m,
        costs: config.costs.clone(),
    }
}

fn route(selected: &ResolvedRoute<'_>, counts: &PassengerCounts) -> Route {
    let route = selected.route;
    Route {
        line: selected.line.to_string(),
        route: route.id.to_string(),
        vehicle_category: selected.group.clone(),
        stops: route.stops.iter().map(|s| s.stop.to_string()).collect(),
        departures: route
            .departures
            .iter()
            .map(|departure| {
                let loads: BTreeMap<_, _> = counts
                    .departure(selected.line, &route.id, &departure.id)
                    .collect();
                let segments = route
                    .stops
                    .windows(2)
                    .enumerate()
                    .map(|(index, pair)| {
                        let load = loads.get(&index);
                        let departs = pair[0]
                            .departure_offset_secs
                            .or(pair[0].arrival_offset_secs)
                            .unwrap_or(0);
                        let arrives = pair[1]
                            .arrival_offset_secs
                            .or(pair[1].departure_offset_secs)
                            .unwrap_or(0);
                        Segment {
                            from: pair[0].stop.to_string(),
                            to: pair[1].stop.to_string(),
                            // offsets come from input files; clamp instead of overflowing
                            departure: departure.time_secs.saturating_add(departs),
                            arrival: departure.time_secs.saturating_add(arrives),
                            passengers: load.map_or(0.0, |l| l.passengers),
                            seated: load.map_or(0.0, |l| l.seated),
                        }
                    })
                    .collect();
                Departure {
                    id: departure.id.to_string(),
                    time: departure.time_secs,
                    segments,
                }
            })
            .collect(),
    }
}
