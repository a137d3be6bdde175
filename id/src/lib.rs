// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of the logical networks of a router: VLAN ids and routing-table names.
//!
//! Every network category owns a disjoint band of VLAN ids with a fixed starting offset, and
//! ids are handed out in list order from that offset. The bands are part of the generated
//! configuration's compatibility surface: changing an offset renumbers running VLANs.
//!
//! Allocation state lives in an [`IdAllocator`] value owned by one generation pass. There is
//! no process-wide counter.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod allocator;
pub mod category;
pub mod table;
pub mod vid;

pub use allocator::{IdAllocator, IdError, NetworkId, OVERFLOW_START}; // re-export
pub use category::{BaseNetwork, Category, VpnProtocol, network_name}; // re-export
pub use table::RoutingTable; // re-export
pub use vid::{InvalidVid, Vid}; // re-export

use tracectl::trace_target;
trace_target!("id", LevelFilter::INFO, &["generator"]);
