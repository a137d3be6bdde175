// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link health check targets

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::group::LinkGroup;
use crate::strategy::Plan;

/// Public resolvers pinged through a link to tell whether it is up
pub const CHECK_TARGETS: [Ipv4Addr; 8] = [
    Ipv4Addr::new(1, 1, 1, 1),
    Ipv4Addr::new(8, 8, 8, 8),
    Ipv4Addr::new(9, 9, 9, 9),
    Ipv4Addr::new(208, 67, 222, 222),
    Ipv4Addr::new(1, 0, 0, 1),
    Ipv4Addr::new(8, 8, 4, 4),
    Ipv4Addr::new(149, 112, 112, 112),
    Ipv4Addr::new(208, 67, 220, 220),
];

/// The check targets of every link of a router.
///
/// A target gets a host route in the main table through exactly one link, so targets are
/// unique across all the groups rendered in one pass. Pre-assigned targets are reserved first,
/// then the links that need one get the next unused entry of [`CHECK_TARGETS`], in group order
/// and link order. Built once per pass and handed to every group as its render context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckTargets {
    by_group: BTreeMap<String, Vec<Option<Ipv4Addr>>>,
}

impl CheckTargets {
    #[must_use]
    pub fn assign(groups: &[LinkGroup]) -> Self {
        let taken: BTreeSet<Ipv4Addr> = groups
            .iter()
            .flat_map(|group| &group.links)
            .filter_map(|link| link.check_ip)
            .collect();
        let mut free = CHECK_TARGETS.iter().filter(|ip| !taken.contains(*ip));

        let mut by_group = BTreeMap::new();
        for group in groups {
            let needed = matches!(group.plan(), Plan::Failover | Plan::Balance { .. });
            let targets = group
                .links
                .iter()
                .map(|link| {
                    if !needed {
                        return link.check_ip;
                    }
                    link.check_ip.or_else(|| {
                        let target = free.next().copied();
                        if target.is_none() {
                            debug!("No check target left for link {}", link.name);
                        }
                        target
                    })
                })
                .collect();
            by_group.insert(group.name.clone(), targets);
        }
        Self { by_group }
    }

    /// The check target of link `index` of `group`
    #[must_use]
    pub fn get(&self, group: &str, index: usize) -> Option<Ipv4Addr> {
        self.by_group
            .get(group)
            .and_then(|targets| targets.get(index).copied().flatten())
    }
}
