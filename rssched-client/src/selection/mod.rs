//! Transit line selection.
//!
//! A [`FilterStrategy`] looks at the full schedule and decides which routes
//! are of interest; the result is a [`TransitLineSelection`] that drives
//! masking and request composition.

mod error;
mod line_selection;
mod strategy;

pub use error::SelectionError;
pub use line_selection::{Group, SelectedRoute, TransitLineSelection};
pub use strategy::{
    FilterStrategy, NoFilterStrategy, PredicateFilterStrategy, TransitLineIdFilterStrategy,
    VehicleCategory, VehicleType, VehicleTypeId,
};
