// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The input model of the generator: which networks a router has, how its uplinks are grouped
//! and which tunnels it terminates. A [`RouterConfig`] is read from YAML and validated before
//! anything gets generated from it.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod networks;
pub mod router;
pub mod tunnel;

pub use errors::{ConfigError, ConfigResult}; // re-export
pub use networks::{BaseNetworks, NamedNetwork, Networks, VpnClients}; // re-export
pub use router::{RouterConfig, RouterConfigBuilder}; // re-export
pub use tunnel::Tunnel; // re-export

use tracectl::trace_target;
trace_target!("config", LevelFilter::INFO, &["config"]);
