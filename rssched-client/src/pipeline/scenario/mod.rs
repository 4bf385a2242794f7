//! Scenario pipeline: load a scenario, select lines and mask the network and
//! schedule down to the selection.

mod network_mask;
mod selection_filter;
mod transit_schedule_mask;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use network_mask::{NetworkMask, NetworkMaskError, NetworkMaskPolicy, service_trip_links};
pub use selection_filter::{SelectionContext, TransitLineFilter};
pub use transit_schedule_mask::TransitScheduleMask;

use super::{Pipeline, PipelineError, Source};
use crate::scenario::{Scenario, ScenarioProvider, StopId, TransitSchedule};
use crate::selection::{FilterStrategy, TransitLineSelection};

/// Context of the scenario pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioPipe {
    pub scenario: Scenario,
    /// Empty until [`TransitLineFilter`] has run.
    pub selection: TransitLineSelection,
}

impl ScenarioPipe {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            selection: TransitLineSelection::new(),
        }
    }
}

impl SelectionContext for ScenarioPipe {
    fn schedule(&self) -> &TransitSchedule {
        &self.scenario.schedule
    }

    fn set_selection(&mut self, selection: TransitLineSelection) {
        self.selection = selection;
    }
}

/// Loads the full scenario, network included.
pub struct ScenarioSource {
    provider: Arc<dyn ScenarioProvider>,
}

impl ScenarioSource {
    pub fn new(provider: Arc<dyn ScenarioProvider>) -> Self {
        Self { provider }
    }
}

impl Source<ScenarioPipe> for ScenarioSource {
    fn load(&self) -> Result<ScenarioPipe, PipelineError> {
        Ok(ScenarioPipe::new(self.provider.load_scenario(true)?))
    }
}

/// Build the scenario pipeline: select, mask the network, mask the schedule.
pub fn scenario_pipeline(
    provider: Arc<dyn ScenarioProvider>,
    strategy: Arc<dyn FilterStrategy>,
    policy: NetworkMaskPolicy,
    facilities_to_keep: BTreeSet<StopId>,
) -> Pipeline<ScenarioPipe> {
    let mut pipeline = Pipeline::new(ScenarioSource::new(provider));
    pipeline
        .add_filter(TransitLineFilter::new(strategy))
        .add_filter(NetworkMask::new(policy))
        .add_filter(TransitScheduleMask::new(facilities_to_keep));
    pipeline
}
