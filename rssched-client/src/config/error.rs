//! Configuration error types.

/// Errors from building or validating a request configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A mandatory field was never set
    #[error("mandatory field {0} must be set")]
    MissingField(&'static str),

    /// A field holds a value outside its domain
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },

    /// Two depots share an id
    #[error("depot {0} already exists")]
    DuplicateDepot(String),

    /// Two depots share a location
    #[error("depot already exists at location {0}")]
    DuplicateDepotLocation(String),

    /// An allowed vehicle type names a depot that was never added
    #[error("depot {0} does not exist")]
    UnknownDepot(String),

    /// A shunting location is listed twice
    #[error("shunting location {0} already exists")]
    DuplicateShuntingLocation(String),

    /// Two maintenance slots share an id
    #[error("maintenance slot {0} already exists")]
    DuplicateMaintenanceSlot(String),

    /// A maintenance slot ends before it starts
    #[error("maintenance slot {0} ends before it starts")]
    InvalidMaintenanceWindow(String),

    /// A depot created at a terminal would sit where a configured depot is
    #[error("depot {explicit} is configured at terminal location {location} where a depot would be created automatically")]
    TerminalDepotCollision { explicit: String, location: String },

    /// A depot created at a terminal would reuse a configured depot's id
    #[error("automatically created depot id {0} is already used by a configured depot")]
    TerminalDepotIdCollision(String),
}
