// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN id and routing table allocation

use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::category::{BaseNetwork, Category, network_name};
use crate::table::RoutingTable;
use crate::vid::Vid;

/// First id of the band shared by all categories once their own band is full
pub const OVERFLOW_START: u16 = 1000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("No VLAN id left for network '{name}' ({category})")]
    Exhausted { category: String, name: String },
}

/// The identity of a logical network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkId {
    pub category: Category,
    pub name: String,
    pub vid: Vid,
    pub table: RoutingTable,
}

/// Hands out VLAN ids and routing tables for one generation pass.
///
/// Within a category, ids follow list order from the category offset, and a category that is
/// allocated several times continues where it stopped. Ids past the width of a band come from
/// the overflow band in allocation order. The same inputs in the same order always produce the
/// same ids, and no id is ever handed out twice.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: BTreeSet<Vid>,
    next_index: HashMap<Category, u16>,
    overflow_next: u16,
    tables: HashSet<RoutingTable>,
    assigned: Vec<NetworkId>,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overflow_next: OVERFLOW_START,
            ..Self::default()
        }
    }

    fn from_overflow(&mut self) -> Option<Vid> {
        while self.overflow_next <= Vid::MAX.as_u16() {
            let candidate = Vid::new(self.overflow_next).ok();
            self.overflow_next += 1;
            if let Some(vid) = candidate.filter(|vid| !self.used.contains(vid)) {
                return Some(vid);
            }
        }
        None
    }

    fn next_vid(&mut self, category: Category) -> Option<Vid> {
        let index = self.next_index.entry(category).or_insert(0);
        let in_band = if *index < category.width() {
            Vid::new(category.offset() + *index)
                .ok()
                .filter(|vid| !self.used.contains(vid))
        } else {
            None
        };
        *index = index.saturating_add(1);
        let vid = match in_band {
            Some(vid) => Some(vid),
            None => self.from_overflow(),
        };
        if let Some(vid) = vid {
            self.used.insert(vid);
        }
        vid
    }

    fn assign(&mut self, category: Category, name: String) -> Result<NetworkId, IdError> {
        let Some(vid) = self.next_vid(category) else {
            return Err(IdError::Exhausted {
                category: category.to_string(),
                name,
            });
        };
        let table = RoutingTable::for_name(&name);
        if !self.tables.insert(table.clone()) {
            warn!("Routing table '{table}' is shared by more than one network");
        }
        debug!("Network '{name}' ({category}): vlan {vid}, table {table}");
        let id = NetworkId {
            category,
            name,
            vid,
            table,
        };
        self.assigned.push(id.clone());
        Ok(id)
    }

    /// Allocate the id of a base network, named by the user or by its fixed name.
    ///
    /// # Errors
    ///
    /// Fails only if every VLAN id is taken.
    pub fn allocate_base(
        &mut self,
        base: BaseNetwork,
        user_name: Option<&str>,
    ) -> Result<NetworkId, IdError> {
        let category = Category::Base(base);
        self.assign(category, network_name(category, 0, user_name))
    }

    /// Allocate ids for a list of networks of one category, in list order. `None` or blank
    /// entries get an auto-generated name.
    ///
    /// # Errors
    ///
    /// Fails if the VLAN id space runs out.
    pub fn allocate<S: AsRef<str>>(
        &mut self,
        category: Category,
        names: &[Option<S>],
    ) -> Result<Vec<NetworkId>, IdError> {
        let start = usize::from(self.next_index.get(&category).copied().unwrap_or(0));
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = network_name(category, start + i, name.as_ref().map(AsRef::as_ref));
                self.assign(category, name)
            })
            .collect()
    }

    /// Everything allocated so far, in allocation order
    #[must_use]
    pub fn assigned(&self) -> &[NetworkId] {
        &self.assigned
    }

    #[must_use]
    pub fn into_assigned(self) -> Vec<NetworkId> {
        self.assigned
    }
}
