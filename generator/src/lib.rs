// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Script generation: turns a [`config::RouterConfig`] into one RouterOS script.
//!
//! Every part of the router renders its own fragment. The fragments are merged in a fixed
//! order (base configuration, networks, tunnels, link groups) and the result is shortened.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

mod base;
mod errors;
mod generate;
mod lan;
mod tunnel;

pub use base::{LAN_LIST, LOCAL_ADDRESS_LIST, WAN_LIST}; // re-export
pub use errors::GenError; // re-export
pub use generate::{Generated, generate}; // re-export

use tracectl::trace_target;
trace_target!("generator", LevelFilter::INFO, &["generator"]);
