// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The configuration of one router

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

use routing::{LinkGroup, Plan};

use crate::errors::{ConfigError, ConfigResult};
use crate::networks::Networks;
use crate::tunnel::Tunnel;

fn default_name() -> String {
    "router".to_owned()
}

/// Everything the generator needs to know about a router
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    #[builder(setter(into), default = "default_name()")]
    #[serde(default = "default_name")]
    pub name: String,

    #[builder(default)]
    #[serde(default)]
    pub networks: Networks,

    #[builder(default)]
    #[serde(default)]
    pub link_groups: Vec<LinkGroup>,

    #[builder(default)]
    #[serde(default)]
    pub tunnels: Vec<Tunnel>,
}

/// Insert `name` in `seen`, failing with `err` if it was already there
fn unique(seen: &mut BTreeSet<String>, name: &str, err: fn(String) -> ConfigError) -> ConfigResult {
    if seen.insert(name.to_owned()) {
        Ok(())
    } else {
        Err(err(name.to_owned()))
    }
}

impl RouterConfig {
    /// Parse a configuration from YAML text. The result is not validated.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_yaml(&text)?;
        config.validate()?;
        info!("Loaded configuration of router '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// The names of all the networks, which must be unique
    fn validate_networks(&self) -> Result<BTreeSet<String>, ConfigError> {
        let mut seen = BTreeSet::new();
        for (name, subnet) in self.networks.named() {
            debug!("Network {name}: {subnet}");
            unique(&mut seen, &name, ConfigError::DuplicateNetwork)?;
        }
        Ok(seen)
    }

    fn validate_link_groups(&self, networks: &BTreeSet<String>) -> ConfigResult {
        let mut groups = BTreeSet::new();
        for group in &self.link_groups {
            if group.name.trim().is_empty() {
                return Err(ConfigError::MissingParameter("link group name"));
            }
            unique(&mut groups, &group.name, ConfigError::DuplicateLinkGroup)?;
            if group.links.is_empty() {
                warn!("Link group '{}' has no links: it won't route anything", group.name);
            }
            // balancing marks new connections: without a scope it would take everyone's
            if matches!(group.plan(), Plan::Balance { .. })
                && group.source_list.is_none()
                && !networks.contains(&group.name)
            {
                return Err(ConfigError::UnscopedBalance(group.name.clone()));
            }
            group.validate().map_err(|source| ConfigError::InvalidLink {
                group: group.name.clone(),
                source,
            })?;
        }
        self.validate_links(networks, &groups)
    }

    /// Link names share the `to-` table namespace with networks and groups, and every check
    /// address is routed through a single link.
    fn validate_links(
        &self,
        networks: &BTreeSet<String>,
        groups: &BTreeSet<String>,
    ) -> ConfigResult {
        let mut links = BTreeSet::new();
        let mut checks = BTreeSet::new();
        for link in self.link_groups.iter().flat_map(|group| &group.links) {
            if link.name.trim().is_empty() {
                return Err(ConfigError::MissingParameter("link name"));
            }
            unique(&mut links, &link.name, ConfigError::DuplicateLink)?;
            if networks.contains(&link.name) || groups.contains(&link.name) {
                return Err(ConfigError::TableClash(link.name.clone()));
            }
            if let Some(ip) = link.check_ip
                && !checks.insert(ip)
            {
                return Err(ConfigError::DuplicateCheckIp(ip));
            }
        }
        Ok(())
    }

    fn validate_tunnels(&self) -> ConfigResult {
        let mut seen = BTreeSet::new();
        for tunnel in &self.tunnels {
            unique(&mut seen, &tunnel.name, ConfigError::DuplicateTunnel)?;
            tunnel.addressing()?;
        }
        Ok(())
    }

    /// Check the configuration for anything that would produce a wrong script.
    /// Empty lists are fine: they just produce nothing.
    pub fn validate(&self) -> ConfigResult {
        let networks = self.validate_networks()?;
        self.validate_link_groups(&networks)?;
        self.validate_tunnels()?;
        debug!("Configuration of router '{}' is valid", self.name);
        Ok(())
    }
}
