//! Network masking.
//!
//! Reduces the network to the links the rolling stock scheduler needs and
//! replaces simulation mode tags with [`TravelMode::ServiceTrip`] and
//! [`TravelMode::NonRevenueTrip`].

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::ScenarioPipe;
use crate::domain::TravelMode;
use crate::pipeline::{Filter, PipelineError};
use crate::scenario::{LinkId, Network, ScenarioError, TransitSchedule};
use crate::selection::{SelectionError, TransitLineSelection};

/// Errors from masking the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkMaskError {
    /// Links used by selected transit lines carry none of the allowed modes
    #[error(
        "transit line links are missing the allowed modes ({allowed}): {}",
        .links.join(", ")
    )]
    LinksMissingAllowedModes { allowed: String, links: Vec<String> },
}

/// How the network is reduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NetworkMaskPolicy {
    /// Keep exactly the links used by the selected lines, tagged as service
    /// trip links.
    #[default]
    ServiceTripOnly,

    /// Keep every link carrying one of the modes, tagged as non-revenue trip
    /// links; links used by selected lines are additionally tagged as service
    /// trip links. Every link used by a selected line must carry one of the
    /// modes.
    AllowedModes(BTreeSet<TravelMode>),
}

/// Masks the network of a [`ScenarioPipe`] to its selection.
#[derive(Debug, Clone, Default)]
pub struct NetworkMask {
    policy: NetworkMaskPolicy,
}

impl NetworkMask {
    pub fn new(policy: NetworkMaskPolicy) -> Self {
        Self { policy }
    }

    /// Mask `network` given the links used by the selected lines.
    ///
    /// Masking an already masked network with the same service trip links
    /// changes nothing.
    pub fn mask(
        &self,
        network: &mut Network,
        service_links: &BTreeSet<LinkId>,
    ) -> Result<(), NetworkMaskError> {
        info!(
            nodes = network.node_count(),
            links = network.link_count(),
            "Masking network"
        );

        match &self.policy {
            NetworkMaskPolicy::ServiceTripOnly => {
                retain_links(network, |id| service_links.contains(id));
                for link in network.links_mut() {
                    link.modes.clear();
                    link.modes.insert(TravelMode::ServiceTrip);
                }
            }
            NetworkMaskPolicy::AllowedModes(modes) => {
                // dead-head tags from an earlier pass count as allowed even
                // when that mode is not configured; re-masking is a no-op
                let allowed: BTreeSet<LinkId> = network
                    .links()
                    .filter(|link| {
                        link.has_any_mode(|m| {
                            modes.contains(m) || *m == TravelMode::NonRevenueTrip
                        })
                    })
                    .map(|link| link.id.clone())
                    .collect();
                ensure_service_links_allowed(network, modes, &allowed, service_links)?;

                retain_links(network, |id| allowed.contains(id));
                for link in network.links_mut() {
                    link.modes.clear();
                    link.modes.insert(TravelMode::NonRevenueTrip);
                    if service_links.contains(&link.id) {
                        link.modes.insert(TravelMode::ServiceTrip);
                    }
                }
            }
        }

        mask_nodes(network);
        info!(
            nodes = network.node_count(),
            links = network.link_count(),
            "Done masking network"
        );
        Ok(())
    }
}

impl Filter<ScenarioPipe> for NetworkMask {
    fn apply(&self, pipe: &mut ScenarioPipe) -> Result<(), PipelineError> {
        let service_links = service_trip_links(&pipe.scenario.schedule, &pipe.selection)?;
        self.mask(&mut pipe.scenario.network, &service_links)?;
        Ok(())
    }
}

/// Links used by the selected lines: every route's path plus the links of
/// the stop facilities it calls at.
///
/// All routes of a selected line count, as schedule masking keeps lines whole.
pub fn service_trip_links(
    schedule: &TransitSchedule,
    selection: &TransitLineSelection,
) -> Result<BTreeSet<LinkId>, PipelineError> {
    let mut links = BTreeSet::new();
    for line_id in selection.line_ids() {
        let line = schedule
            .line(&line_id)
            .ok_or_else(|| SelectionError::LineNotFound(line_id.to_string()))?;
        for route in &line.routes {
            links.extend(route.path.iter().cloned());
            // every stop's link, not only the terminals: kept facilities
            // must still resolve to a link after masking
            for stop in &route.stops {
                let facility = schedule.facility(&stop.stop).ok_or_else(|| {
                    ScenarioError::MissingStopFacility {
                        route: route.id.to_string(),
                        stop: stop.stop.to_string(),
                    }
                })?;
                links.insert(facility.link.clone());
            }
        }
    }
    debug!(links = links.len(), "Collected service trip links");
    Ok(links)
}

fn ensure_service_links_allowed(
    network: &Network,
    modes: &BTreeSet<TravelMode>,
    allowed: &BTreeSet<LinkId>,
    service_links: &BTreeSet<LinkId>,
) -> Result<(), NetworkMaskError> {
    let missing: Vec<String> = service_links
        .difference(allowed)
        .map(|id| match network.link(id) {
            Some(link) => format!("{} ({})", id, join(&link.modes)),
            None => format!("{id} (not in network)"),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(NetworkMaskError::LinksMissingAllowedModes {
            allowed: join(modes),
            links: missing,
        })
    }
}

fn join(modes: &BTreeSet<TravelMode>) -> String {
    modes
        .iter()
        .map(TravelMode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn retain_links(network: &mut Network, keep: impl Fn(&LinkId) -> bool) {
    let before = network.link_count();
    network.retain_links(|link| keep(&link.id));
    debug!(removed = before - network.link_count(), "Removed links");
}

/// Remove every node no remaining link starts or ends at.
fn mask_nodes(network: &mut Network) {
    let endpoints = network.endpoint_node_ids();
    let before = network.node_count();
    network.retain_nodes(|node| endpoints.contains(&node.id));
    debug!(removed = before - network.node_count(), "Removed nodes");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::test_support::{line_id, link_id, node_id, route_id, small_scenario};
    use crate::selection::Group;

    fn modes(tags: &[&str]) -> BTreeSet<TravelMode> {
        tags.iter().map(|t| TravelMode::parse(t)).collect()
    }

    fn links(ids: &[&str]) -> BTreeSet<LinkId> {
        ids.iter().map(|id| link_id(id)).collect()
    }

    fn select_a() -> TransitLineSelection {
        let mut selection = TransitLineSelection::new();
        selection
            .add(Group::Ungrouped, line_id("A"), route_id("A1"))
            .unwrap();
        selection
    }

    fn link_ids(network: &Network) -> BTreeSet<LinkId> {
        network.links().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn service_links_include_path_and_stop_links() {
        let scenario = small_scenario();
        let service = service_trip_links(&scenario.schedule, &select_a()).unwrap();
        assert_eq!(service, links(&["l1", "l2", "l3"]));
    }

    #[test]
    fn service_links_of_unknown_line_fail() {
        let scenario = small_scenario();
        let mut selection = TransitLineSelection::new();
        selection
            .add(Group::Ungrouped, line_id("Z"), route_id("Z1"))
            .unwrap();
        assert!(matches!(
            service_trip_links(&scenario.schedule, &selection),
            Err(PipelineError::Selection(SelectionError::LineNotFound(_)))
        ));
    }

    #[test]
    fn service_trip_only_keeps_exactly_service_links() {
        let mut network = small_scenario().network;
        NetworkMask::new(NetworkMaskPolicy::ServiceTripOnly)
            .mask(&mut network, &links(&["l1", "l2", "l3"]))
            .unwrap();

        assert_eq!(link_ids(&network), links(&["l1", "l2", "l3"]));
        assert_eq!(network.node_count(), 4);
        assert!(!network.contains_node(&node_id("n5")));
        assert!(
            network
                .links()
                .all(|l| l.modes == BTreeSet::from([TravelMode::ServiceTrip]))
        );
    }

    #[test]
    fn allowed_modes_keep_rail_and_retag() {
        let mut network = small_scenario().network;
        NetworkMask::new(NetworkMaskPolicy::AllowedModes(modes(&["rail"])))
            .mask(&mut network, &links(&["l1", "l2", "l3"]))
            .unwrap();

        // the car link goes, every rail link stays
        assert_eq!(link_ids(&network), links(&["l1", "l2", "l3", "l4", "l6"]));
        assert_eq!(network.node_count(), 5);

        let l1 = network.link(&link_id("l1")).unwrap();
        assert_eq!(
            l1.modes,
            BTreeSet::from([TravelMode::ServiceTrip, TravelMode::NonRevenueTrip])
        );
        let l4 = network.link(&link_id("l4")).unwrap();
        assert_eq!(l4.modes, BTreeSet::from([TravelMode::NonRevenueTrip]));
    }

    #[test]
    fn service_link_without_allowed_mode_fails() {
        let mut network = small_scenario().network;
        let err = NetworkMask::new(NetworkMaskPolicy::AllowedModes(modes(&["bus"])))
            .mask(&mut network, &links(&["l1", "l2"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "transit line links are missing the allowed modes (bus): l1 (rail), l2 (rail)"
        );
        // nothing was touched
        assert_eq!(network.link_count(), 6);
    }

    #[test]
    fn masking_twice_is_a_fixed_point() {
        for policy in [
            NetworkMaskPolicy::ServiceTripOnly,
            NetworkMaskPolicy::AllowedModes(modes(&["rail"])),
        ] {
            let mask = NetworkMask::new(policy);
            let service = links(&["l1", "l2", "l3"]);
            let mut network = small_scenario().network;
            mask.mask(&mut network, &service).unwrap();
            let once = network.clone();
            mask.mask(&mut network, &service).unwrap();
            assert_eq!(network, once);
        }
    }

    #[test]
    fn filter_masks_pipe() {
        let mut pipe = ScenarioPipe::new(small_scenario());
        pipe.selection = select_a();
        NetworkMask::default().apply(&mut pipe).unwrap();
        assert_eq!(link_ids(&pipe.scenario.network), links(&["l1", "l2", "l3"]));
    }
}
