// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Address derivation from CIDR subnets.
//!
//! Every builder that refers to a subnet (LAN bridge, DHCP, address lists, tunnel pools)
//! derives its addresses through [`Subnet`], so that independently built fragments agree on
//! the gateway and pools without talking to each other.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod range;
pub mod subnet;

pub use range::AddressRange; // re-export
pub use subnet::{DEFAULT_PREFIX_LEN, Subnet, SubnetError, TunnelAddressing}; // re-export

use tracectl::trace_target;
trace_target!("subnet", LevelFilter::INFO, &["generator"]);
