//! Serializable choice of transit line filter strategy.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scenario::LineId;
use crate::selection::{
    FilterStrategy, NoFilterStrategy, SelectionError, TransitLineIdFilterStrategy,
    VehicleCategory, VehicleTypeId,
};

/// Which lines a run selects.
///
/// Predicate based strategies cannot be expressed in a config file; pass them
/// to the request pipeline directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionConfig {
    /// Every route of every line.
    #[default]
    NoFilter,
    /// The listed lines, grouped by the category of their vehicle type.
    #[serde(rename_all = "camelCase")]
    VehicleCategories {
        allocations: BTreeMap<LineId, VehicleTypeId>,
        categories: Vec<VehicleCategory>,
    },
}

impl SelectionConfig {
    /// Instantiate the configured strategy.
    pub fn build(&self) -> Result<Arc<dyn FilterStrategy>, SelectionError> {
        Ok(match self {
            SelectionConfig::NoFilter => Arc::new(NoFilterStrategy),
            SelectionConfig::VehicleCategories {
                allocations,
                categories,
            } => Arc::new(TransitLineIdFilterStrategy::new(
                allocations.clone(),
                categories.iter().cloned(),
            )?),
        })
    }
}
