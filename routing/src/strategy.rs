// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Strategies and the plan they resolve to

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How a link group uses its links
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Ordered default routes. The first reachable link carries everything.
    #[default]
    Failover,
    /// Spread new connections over the links with the configured method
    #[serde(alias = "loadbalance")]
    LoadBalance,
    /// Successive new connections go to successive links
    #[serde(alias = "roundrobin")]
    RoundRobin,
    /// Load balancing, with every other link as ordered fallback of each link
    Both,
}

/// Load balancing method
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LbMethod {
    /// Per-connection classifier: a connection hash picks the link
    #[default]
    #[serde(alias = "pcc")]
    Pcc,
    /// Connection counter
    #[serde(alias = "nth")]
    Nth,
    /// Behaves as [`LbMethod::Pcc`]
    #[serde(alias = "ecmp")]
    Ecmp,
}

/// The multi-link settings of a group
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLinkConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub method: LbMethod,
}

/// Mangle matcher used to spread connections
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    Pcc,
    Nth,
}

impl Marker {
    /// The matcher that sends a connection to link `index` of `count`
    #[must_use]
    pub fn matcher(self, count: usize, index: usize) -> (&'static str, String) {
        match self {
            Marker::Pcc => (
                "per-connection-classifier",
                format!("both-addresses-and-ports:{count}/{index}"),
            ),
            Marker::Nth => ("nth", format!("{count},{}", index + 1)),
        }
    }
}

/// What a group actually renders to, once the number of links is known
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Nothing to do
    Empty,
    /// One direct default route
    Single,
    Failover,
    Balance { marker: Marker, full_backstop: bool },
}

impl MultiLinkConfig {
    #[must_use]
    pub fn new(strategy: Strategy, method: LbMethod) -> Self {
        Self { strategy, method }
    }

    /// Resolve the strategy for a group of `links` links. Never fails: balancing over a single
    /// link degrades to the direct route.
    #[must_use]
    pub fn effective(&self, links: usize) -> Plan {
        let marker = match self.method {
            LbMethod::Pcc | LbMethod::Ecmp => Marker::Pcc,
            LbMethod::Nth => Marker::Nth,
        };
        match (links, self.strategy) {
            (0, _) => Plan::Empty,
            (1, _) => Plan::Single,
            (_, Strategy::Failover) => Plan::Failover,
            (_, Strategy::LoadBalance) => Plan::Balance {
                marker,
                full_backstop: false,
            },
            (_, Strategy::RoundRobin) => Plan::Balance {
                marker: Marker::Nth,
                full_backstop: false,
            },
            (_, Strategy::Both) => Plan::Balance {
                marker,
                full_backstop: true,
            },
        }
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Empty => write!(f, "empty"),
            Plan::Single => write!(f, "single link"),
            Plan::Failover => write!(f, "failover"),
            Plan::Balance {
                marker,
                full_backstop,
            } => {
                write!(f, "balance ({marker:?})")?;
                if *full_backstop {
                    write!(f, " with full backstop")?;
                }
                Ok(())
            }
        }
    }
}
