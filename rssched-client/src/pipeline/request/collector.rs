//! Source running the scenario and passenger pipelines.

use tracing::info;

use super::RequestPipe;
use crate::pipeline::passenger::PassengerPipe;
use crate::pipeline::scenario::ScenarioPipe;
use crate::pipeline::{Pipeline, PipelineError, Source};

/// Runs the nested scenario and passenger pipelines and merges their results
/// into a fresh [`RequestPipe`].
pub struct ScenarioPassengerCollector {
    run_id: String,
    scenario: Pipeline<ScenarioPipe>,
    passenger: Pipeline<PassengerPipe>,
}

impl ScenarioPassengerCollector {
    pub fn new(
        run_id: impl Into<String>,
        scenario: Pipeline<ScenarioPipe>,
        passenger: Pipeline<PassengerPipe>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            scenario,
            passenger,
        }
    }
}

impl Source<RequestPipe> for ScenarioPassengerCollector {
    fn load(&self) -> Result<RequestPipe, PipelineError> {
        info!(run_id = %self.run_id, "Collecting masked scenario");
        let scenario = self.scenario.process()?;
        info!(run_id = %self.run_id, "Collecting passenger counts");
        let passenger = self.passenger.process()?;

        Ok(RequestPipe {
            scenario: scenario.scenario,
            selection: scenario.selection,
            counts: passenger.counts,
            request: None,
        })
    }
}
