//! Applies a filter strategy to the schedule held by a pipeline context.

use std::sync::Arc;

use tracing::info;

use crate::pipeline::{Filter, PipelineError};
use crate::scenario::TransitSchedule;
use crate::selection::{FilterStrategy, TransitLineSelection};

/// A pipeline context carrying a schedule and the selection made on it.
pub trait SelectionContext {
    fn schedule(&self) -> &TransitSchedule;
    fn set_selection(&mut self, selection: TransitLineSelection);
}

/// Computes the line selection and stores it on the context.
#[derive(Clone)]
pub struct TransitLineFilter {
    strategy: Arc<dyn FilterStrategy>,
}

impl TransitLineFilter {
    pub fn new(strategy: Arc<dyn FilterStrategy>) -> Self {
        Self { strategy }
    }
}

impl<C: SelectionContext> Filter<C> for TransitLineFilter {
    fn apply(&self, context: &mut C) -> Result<(), PipelineError> {
        let selection = self.strategy.filter(context.schedule())?;
        info!(
            lines = selection.line_ids().len(),
            routes = selection.len(),
            groups = selection.groups().len(),
            "Selected transit lines"
        );
        context.set_selection(selection);
        Ok(())
    }
}
