//! Scenario error types.
//!
//! These errors represent referential integrity violations in a loaded
//! scenario. They are distinct from IO/parse errors.

/// Scenario-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// Two entities of the same kind share an id
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// A link endpoint is not a node of the network
    #[error("link {link} references missing node {node}")]
    MissingNode { link: String, node: String },

    /// A link referenced by the schedule is not part of the network
    #[error("{referenced_by} references missing link {link}")]
    MissingLink { referenced_by: String, link: String },

    /// A route stop references a stop facility that does not exist
    #[error("route {route} references missing stop facility {stop}")]
    MissingStopFacility { route: String, stop: String },

    /// A minimal transfer time references a stop facility that does not exist
    #[error("minimal transfer time references missing stop facility {0}")]
    MissingTransferStop(String),

    /// A route without stops has no terminals
    #[error("route {0} has no stops")]
    EmptyRoute(String),
}
