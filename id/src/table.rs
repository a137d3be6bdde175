// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routing table names

use std::fmt::Display;

/// The name of a routing table.
///
/// Every network gets the table `to-<network name>`. The main table is the only one that
/// does not follow the pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutingTable(String);

impl RoutingTable {
    pub const PREFIX: &'static str = "to-";
    pub const MAIN: &'static str = "main";

    /// The table that traffic of network `name` is routed through
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self(format!("{}{name}", Self::PREFIX))
    }

    #[must_use]
    pub fn main() -> Self {
        Self(Self::MAIN.to_owned())
    }

    #[must_use]
    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoutingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
