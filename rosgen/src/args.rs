// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub use args::{CmdArgs, Parser};
