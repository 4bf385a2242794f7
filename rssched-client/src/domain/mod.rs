//! Domain types shared by the scenario model, the configuration and the
//! pipelines.
//!
//! Identifiers enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod coord;
mod id;
mod mode;

pub use coord::Coord;
pub use id::{Id, InvalidId};
pub use mode::TravelMode;
