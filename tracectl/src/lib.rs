// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logging control for the generator crates.
//!
//! Every crate declares its tracing target with [`trace_target!`]. Targets are
//! collected at link time and their levels can be tuned from the command line
//! with a `tag=level,...` string before any configuration is generated.

pub mod control;
pub mod display;
pub mod targets;

// re-exports
pub use control::TracingControl;
pub use control::get_trace_ctl;
pub use tracing_subscriber::filter::LevelFilter;
