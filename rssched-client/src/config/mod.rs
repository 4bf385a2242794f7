//! Request configuration: global parameters, depots, shunting, maintenance
//! and costs, plus the line selection to apply.

mod builder;
mod error;
mod request_config;
mod selection_config;

pub use builder::RequestConfigBuilder;
pub use error::ConfigError;
pub use request_config::{
    AllowedType, Costs, DepotConfig, DepotFacility, DepotId, Global, MaintenanceConfig,
    MaintenanceSlot, MaintenanceSlotId, RequestConfig, ShuntingConfig,
};
pub use selection_config::SelectionConfig;
