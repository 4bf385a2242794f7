//! Rolling stock scheduling request client.
//!
//! Turns the output of a transport simulation (network, transit schedule and
//! events) into a compact, self-consistent request for a rolling stock
//! scheduler: select the transit lines of interest, mask the network and
//! schedule down to them, derive passenger demand and fold in depot,
//! shunting, maintenance and cost configuration.

pub mod config;
pub mod domain;
pub mod pipeline;
pub mod scenario;
pub mod selection;
