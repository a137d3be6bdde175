// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! RouterOS script model.
//!
//! A [`Document`] maps a menu path (a *section*, e.g. `/ip route`) to the ordered list of
//! command lines to replay under it. Producers build small documents out of [`Command`]s and
//! the generator merges them into one. Merging is a pure concatenation per section that keeps
//! the first-seen order of sections; [`shorten`] is the only pass that removes lines, and it
//! only removes lines with no meaning to the router.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod command;
pub mod document;
pub mod render;
pub mod sections;
pub mod shorten;

pub use command::{Command, Value, quote, yes_no}; // re-export
pub use document::{Document, merge}; // re-export
pub use render::Render; // re-export
pub use shorten::shorten; // re-export

use tracectl::trace_target;
trace_target!("script", LevelFilter::INFO, &["generator"]);
