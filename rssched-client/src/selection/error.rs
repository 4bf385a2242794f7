//! Selection error types.

/// Errors from building a transit line selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A configured line does not exist in the schedule
    #[error("no transit line found in scenario with id {0}")]
    LineNotFound(String),

    /// The same route was selected twice
    #[error("route {route} of line {line} is already selected (group {existing}, new group {new})")]
    DuplicateRoute {
        line: String,
        route: String,
        existing: String,
        new: String,
    },

    /// A vehicle type is listed in more than one category
    #[error("vehicle type {vehicle_type} belongs to both groups {first} and {second}")]
    AmbiguousVehicleType {
        vehicle_type: String,
        first: String,
        second: String,
    },
}
