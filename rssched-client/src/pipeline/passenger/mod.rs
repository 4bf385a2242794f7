//! Passenger pipeline: derive per segment passenger counts of the selected
//! lines from the simulation events.

mod csv_writer;
mod event_analysis;

use std::sync::Arc;

pub use csv_writer::PassengerCsvWriter;
pub use event_analysis::{EventAnalysisFilter, PassengerCounts, SegmentKey, SegmentLoad};

use super::scenario::{SelectionContext, TransitLineFilter};
use super::{Pipeline, PipelineError, Source};
use crate::config::RequestConfig;
use crate::scenario::{Event, Scenario, ScenarioProvider, TransitSchedule};
use crate::selection::{FilterStrategy, TransitLineSelection};

/// Context of the passenger pipeline.
#[derive(Debug, Clone, Default)]
pub struct PassengerPipe {
    /// Schedule only; the network is not loaded.
    pub scenario: Scenario,
    pub events: Vec<Event>,
    pub selection: TransitLineSelection,
    pub counts: PassengerCounts,
}

impl SelectionContext for PassengerPipe {
    fn schedule(&self) -> &TransitSchedule {
        &self.scenario.schedule
    }

    fn set_selection(&mut self, selection: TransitLineSelection) {
        self.selection = selection;
    }
}

/// Loads the schedule and the event log.
pub struct EventSource {
    provider: Arc<dyn ScenarioProvider>,
}

impl EventSource {
    pub fn new(provider: Arc<dyn ScenarioProvider>) -> Self {
        Self { provider }
    }
}

impl Source<PassengerPipe> for EventSource {
    fn load(&self) -> Result<PassengerPipe, PipelineError> {
        Ok(PassengerPipe {
            scenario: self.provider.load_scenario(false)?,
            events: self.provider.load_events()?,
            ..PassengerPipe::default()
        })
    }
}

/// Build the passenger pipeline for a request configuration.
pub fn passenger_pipeline(
    config: &RequestConfig,
    provider: Arc<dyn ScenarioProvider>,
    strategy: Arc<dyn FilterStrategy>,
) -> Pipeline<PassengerPipe> {
    let global = &config.global;
    let mut pipeline = Pipeline::new(EventSource::new(provider));
    pipeline
        .add_filter(TransitLineFilter::new(strategy))
        .add_filter(EventAnalysisFilter::new(
            global.sample_size,
            global.seat_duration_threshold_secs,
        ))
        .add_sink(PassengerCsvWriter::new(
            &config.output_directory,
            &config.instance_id,
            global.capacity_factor,
        ));
    pipeline
}
