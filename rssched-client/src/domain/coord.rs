//! Planar coordinates.

use serde::{Deserialize, Serialize};

/// A point in the scenario's projected coordinate system (metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    /// Create a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
