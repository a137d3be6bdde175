// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Subnet descriptor and the addresses derived from it

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::range::AddressRange;

/// Prefix length assumed when a subnet string has none, or an unusable one
pub const DEFAULT_PREFIX_LEN: u8 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubnetError {
    #[error("Invalid subnet '{0}': bad network address")]
    InvalidAddress(String),
    #[error("Subnet {subnet} is too small: it must be /{max_len} or larger")]
    TooSmall { subnet: Ipv4Net, max_len: u8 },
}

/// Addresses of a point-to-point tunnel subnet.
///
/// Tunnels keep hosts 1 to 3 for infrastructure: the gateway is host 4 and the pool starts at
/// host 5, so tunnel addressing never lands on the LAN gateway of the same block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunnelAddressing {
    pub gateway: Ipv4Addr,
    pub range: AddressRange,
}

/// An IPv4 subnet, optionally named.
///
/// All derivations are pure functions of the network and prefix length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subnet {
    net: Ipv4Net,
    name: Option<String>,
}

impl Subnet {
    /// Host offset of the tunnel gateway
    pub const TUNNEL_GATEWAY_HOST: u32 = 4;
    /// Longest prefix that still leaves room for the tunnel hosts and a broadcast address
    pub const TUNNEL_MAX_PREFIX_LEN: u8 = 29;

    #[must_use]
    pub fn new(network: Ipv4Addr, prefix_len: u8) -> Self {
        let prefix_len = if prefix_len > 32 {
            DEFAULT_PREFIX_LEN
        } else {
            prefix_len
        };
        let net = Ipv4Net::new(network, prefix_len)
            .unwrap_or_default()
            .trunc();
        Self { net, name: None }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn cidr(&self) -> Ipv4Net {
        self.net
    }

    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    #[must_use]
    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.net.contains(&addr)
    }

    /// The n-th address of the block, counting the network address as host 0.
    /// Blocks too small for `n` are not special-cased.
    #[must_use]
    pub fn host(&self, n: u32) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.network().to_bits().wrapping_add(n))
    }

    /// The address before the broadcast address
    #[must_use]
    pub fn last_host(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.broadcast().to_bits().wrapping_sub(1))
    }

    /// The first usable host, reserved for the router
    #[must_use]
    pub fn gateway(&self) -> Ipv4Addr {
        self.host(1)
    }

    /// The gateway with the subnet prefix length, as configured on an interface
    #[must_use]
    pub fn gateway_cidr(&self) -> String {
        format!("{}/{}", self.gateway(), self.prefix_len())
    }

    /// DHCP pool: from the second host to the address before broadcast
    #[must_use]
    pub fn dhcp_range(&self) -> AddressRange {
        AddressRange::new(self.host(2), self.last_host())
    }

    /// Tunnel addressing for this subnet.
    ///
    /// # Errors
    ///
    /// Fails if the block is too small to hold the reserved tunnel hosts and at least one
    /// pool address, that is if the prefix is longer than /29.
    pub fn tunnel(&self) -> Result<TunnelAddressing, SubnetError> {
        if self.prefix_len() > Self::TUNNEL_MAX_PREFIX_LEN {
            return Err(SubnetError::TooSmall {
                subnet: self.net,
                max_len: Self::TUNNEL_MAX_PREFIX_LEN,
            });
        }
        Ok(TunnelAddressing {
            gateway: self.host(Self::TUNNEL_GATEWAY_HOST),
            range: AddressRange::new(
                self.host(Self::TUNNEL_GATEWAY_HOST + 1),
                self.last_host(),
            ),
        })
    }
}

fn parse_prefix_len(text: &str) -> u8 {
    match text.trim().parse::<u8>() {
        Ok(len) if len <= 32 => len,
        _ => {
            debug!("Bad prefix length '{text}', using /{DEFAULT_PREFIX_LEN}");
            DEFAULT_PREFIX_LEN
        }
    }
}

/// Parse `a.b.c.d[/len]`. A missing or unusable length means /24; a bad address is an error.
impl FromStr for Subnet {
    type Err = SubnetError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (address, prefix_len) = match s.split_once('/') {
            Some((address, len)) => (address, parse_prefix_len(len)),
            None => (s, DEFAULT_PREFIX_LEN),
        };
        let address = Ipv4Addr::from_str(address.trim())
            .map_err(|_| SubnetError::InvalidAddress(s.to_owned()))?;
        Ok(Subnet::new(address, prefix_len))
    }
}

impl TryFrom<String> for Subnet {
    type Error = SubnetError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Subnet::from_str(&value)
    }
}
impl From<Subnet> for String {
    fn from(value: Subnet) -> Self {
        value.to_string()
    }
}
impl From<Ipv4Net> for Subnet {
    fn from(net: Ipv4Net) -> Self {
        Subnet::new(net.network(), net.prefix_len())
    }
}

impl Display for Subnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.net)
    }
}
