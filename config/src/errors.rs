// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for configuration loading / validation failures

use routing::RoutingError;
use std::net::Ipv4Addr;
use subnet::SubnetError;
use thiserror::Error;

/// The reasons why we may reject a configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Could not read '{path}': {reason}")]
    Io { path: String, reason: String },
    #[error("Malformed configuration: {0}")]
    Parse(String),
    #[error("Bad subnet for '{name}': {source}")]
    InvalidSubnet { name: String, source: SubnetError },
    #[error("A network with name '{0}' already exists")]
    DuplicateNetwork(String),
    #[error("A link group with name '{0}' already exists")]
    DuplicateLinkGroup(String),
    #[error("A link with name '{0}' already exists")]
    DuplicateLink(String),
    #[error("Link '{0}' would declare table 'to-{0}', already used by a network or link group")]
    TableClash(String),
    #[error("Check address {0} is used by more than one link")]
    DuplicateCheckIp(Ipv4Addr),
    #[error("Link group '{0}' balances traffic but has no source list and no network of that name")]
    UnscopedBalance(String),
    #[error("A tunnel with name '{0}' already exists")]
    DuplicateTunnel(String),
    #[error("Bad link in group '{group}': {source}")]
    InvalidLink { group: String, source: RoutingError },
    #[error("Missing mandatory parameter: {0}")]
    MissingParameter(&'static str),
}

/// Result-like type for configurations
pub type ConfigResult = Result<(), ConfigError>;

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
