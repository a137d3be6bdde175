// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Point-to-point tunnels terminated on the router

use serde::{Deserialize, Serialize};
use subnet::{Subnet, TunnelAddressing};

use crate::errors::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tunnel {
    pub name: String,
    pub interface: String,
    pub subnet: Subnet,
}

impl Tunnel {
    /// The addressing of the tunnel
    ///
    /// # Errors
    ///
    /// Fails if the subnet can't hold the tunnel hosts.
    pub fn addressing(&self) -> Result<TunnelAddressing, ConfigError> {
        self.subnet
            .tunnel()
            .map_err(|source| ConfigError::InvalidSubnet {
                name: self.name.clone(),
                source,
            })
    }
}
