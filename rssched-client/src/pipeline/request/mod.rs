//! Request pipeline: collect the masked scenario and passenger counts,
//! compose the optimization request and write it out.

mod collector;
mod composer;
mod dto;
mod writers;

use std::sync::Arc;

pub use collector::ScenarioPassengerCollector;
pub use composer::{RequestComposer, ResolvedRoute, resolve_routes};
pub use dto::{
    AllowedType, Departure, Depot, Info, LinkDto, Location, MaintenanceSlot, NetworkDto,
    Parameters, Request, Route, Segment, Shunting,
};
pub use writers::{RequestConfigWriter, RequestJsonWriter};

use super::passenger::{PassengerCounts, passenger_pipeline};
use super::scenario::scenario_pipeline;
use super::{Pipeline, PipelineError};
use crate::config::RequestConfig;
use crate::scenario::{Scenario, ScenarioProvider};
use crate::selection::{FilterStrategy, TransitLineSelection};

/// Context of the request pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestPipe {
    /// Masked network and schedule.
    pub scenario: Scenario,
    pub selection: TransitLineSelection,
    pub counts: PassengerCounts,
    /// Set by [`RequestComposer`].
    pub request: Option<Request>,
}

/// Build the request pipeline with the strategy named in the configuration.
pub fn request_pipeline(
    config: RequestConfig,
    provider: Arc<dyn ScenarioProvider>,
) -> Result<Pipeline<RequestPipe>, PipelineError> {
    let strategy = config.global.selection.build()?;
    request_pipeline_with_strategy(config, provider, strategy)
}

/// Build the request pipeline with a caller supplied strategy, e.g. a
/// [`PredicateFilterStrategy`](crate::selection::PredicateFilterStrategy).
pub fn request_pipeline_with_strategy(
    config: RequestConfig,
    provider: Arc<dyn ScenarioProvider>,
    strategy: Arc<dyn FilterStrategy>,
) -> Result<Pipeline<RequestPipe>, PipelineError> {
    config.validate()?;
    let config = Arc::new(config);

    let scenario = scenario_pipeline(
        provider.clone(),
        strategy.clone(),
        config.global.network_mask_policy(),
        config.facilities_to_keep(),
    );
    let passenger = passenger_pipeline(&config, provider, strategy);

    let mut pipeline = Pipeline::new(ScenarioPassengerCollector::new(
        &config.run_id,
        scenario,
        passenger,
    ));
    pipeline
        .add_filter(RequestComposer::new(config.clone()))
        .add_sink(RequestConfigWriter::new(config.clone()))
        .add_sink(RequestJsonWriter::new(
            &config.output_directory,
            &config.instance_id,
        ));
    Ok(pipeline)
}
