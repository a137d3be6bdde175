// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Multi-link routing policy.
//!
//! A [`LinkGroup`] is a set of uplinks that together provide the default route of one routing
//! table. Its [`MultiLinkConfig`] selects how traffic is spread over the links, and rendering
//! the group produces the routes, routing tables and mangle rules that implement it.

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
pub mod group;
pub mod health;
pub mod link;
pub mod strategy;

pub use errors::RoutingError; // re-export
pub use group::{LinkGroup, LinkGroupBuilder, LinkGroupBuilderError}; // re-export
pub use health::{CHECK_TARGETS, CheckTargets}; // re-export
pub use link::{Endpoint, Link}; // re-export
pub use strategy::{LbMethod, Marker, MultiLinkConfig, Plan, Strategy}; // re-export

use tracectl::trace_target;
trace_target!("multilink", LevelFilter::INFO, &["generator"]);
