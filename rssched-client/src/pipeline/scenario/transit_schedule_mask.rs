//! Transit schedule masking.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::ScenarioPipe;
use crate::pipeline::{Filter, PipelineError};
use crate::scenario::{LineId, StopId, TransitSchedule};

/// Shrinks the schedule to the selected lines.
///
/// Stop facilities no remaining route calls at are removed, unless they are
/// listed as facilities to keep (depot and maintenance locations). Transfer
/// times touching a removed facility go with it.
#[derive(Debug, Clone, Default)]
pub struct TransitScheduleMask {
    facilities_to_keep: BTreeSet<StopId>,
}

impl TransitScheduleMask {
    pub fn new(facilities_to_keep: BTreeSet<StopId>) -> Self {
        Self { facilities_to_keep }
    }

    pub fn mask(&self, schedule: &mut TransitSchedule, line_ids: &BTreeSet<LineId>) {
        info!(
            lines = schedule.line_count(),
            stops = schedule.facility_count(),
            "Masking transit schedule"
        );

        schedule.retain_lines(|line| line_ids.contains(&line.id));

        let served = schedule.referenced_facility_ids();
        schedule.retain_facilities(|facility| {
            if served.contains(&facility.id) {
                true
            } else if self.facilities_to_keep.contains(&facility.id) {
                info!(
                    stop = %facility.id,
                    "Keeping stop facility not served by any transit route as it is a depot or maintenance location"
                );
                true
            } else {
                false
            }
        });

        let before = schedule.minimal_transfer_time_count();
        let remaining: BTreeSet<StopId> = schedule.facilities().map(|f| f.id.clone()).collect();
        schedule.retain_minimal_transfer_times(|from, to| {
            remaining.contains(from) && remaining.contains(to)
        });
        debug!(
            removed = before - schedule.minimal_transfer_time_count(),
            "Removed minimal transfer times"
        );

        info!(
            lines = schedule.line_count(),
            stops = schedule.facility_count(),
            "Done masking transit schedule"
        );
    }
}

impl Filter<ScenarioPipe> for TransitScheduleMask {
    fn apply(&self, pipe: &mut ScenarioPipe) -> Result<(), PipelineError> {
        self.mask(&mut pipe.scenario.schedule, &pipe.selection.line_ids());
        Ok(())
    }
}
