// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The logical networks of a router

use serde::{Deserialize, Serialize};

use id::{BaseNetwork, Category, VpnProtocol, network_name};
use subnet::Subnet;

/// Subnets of the base networks. A base network without a subnet is not configured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseNetworks {
    #[serde(default)]
    pub split: Option<Subnet>,
    #[serde(default)]
    pub domestic: Option<Subnet>,
    #[serde(default)]
    pub foreign: Option<Subnet>,
    #[serde(default)]
    pub vpn: Option<Subnet>,
}

impl BaseNetworks {
    #[must_use]
    pub fn get(&self, base: BaseNetwork) -> Option<&Subnet> {
        match base {
            BaseNetwork::Split => self.split.as_ref(),
            BaseNetwork::Domestic => self.domestic.as_ref(),
            BaseNetwork::Foreign => self.foreign.as_ref(),
            BaseNetwork::Vpn => self.vpn.as_ref(),
        }
    }

    /// The configured base networks, in allocation order
    pub fn configured(&self) -> impl Iterator<Item = (BaseNetwork, &Subnet)> {
        BaseNetwork::ALL
            .into_iter()
            .filter_map(|base| self.get(base).map(|subnet| (base, subnet)))
    }
}

/// A network of a list category. Unnamed ones are named after their position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedNetwork {
    #[serde(default)]
    pub name: Option<String>,
    pub subnet: Subnet,
}

impl NamedNetwork {
    #[must_use]
    pub fn new(name: Option<&str>, subnet: Subnet) -> Self {
        Self {
            name: name.map(str::to_owned),
            subnet,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VpnClients {
    #[serde(default)]
    pub wireguard: Vec<NamedNetwork>,
    #[serde(default)]
    pub openvpn: Vec<NamedNetwork>,
    #[serde(default)]
    pub pptp: Vec<NamedNetwork>,
    #[serde(default)]
    pub l2tp: Vec<NamedNetwork>,
    #[serde(default)]
    pub sstp: Vec<NamedNetwork>,
    #[serde(default)]
    pub ikev2: Vec<NamedNetwork>,
}

impl VpnClients {
    #[must_use]
    pub fn get(&self, proto: VpnProtocol) -> &[NamedNetwork] {
        match proto {
            VpnProtocol::Wireguard => &self.wireguard,
            VpnProtocol::OpenVpn => &self.openvpn,
            VpnProtocol::Pptp => &self.pptp,
            VpnProtocol::L2tp => &self.l2tp,
            VpnProtocol::Sstp => &self.sstp,
            VpnProtocol::Ikev2 => &self.ikev2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Networks {
    #[serde(default)]
    pub base: BaseNetworks,
    /// Additional foreign networks
    #[serde(default)]
    pub foreign: Vec<NamedNetwork>,
    /// Additional domestic networks
    #[serde(default)]
    pub domestic: Vec<NamedNetwork>,
    #[serde(default)]
    pub vpn_clients: VpnClients,
}

impl Networks {
    /// The list categories with their networks, in allocation order
    pub fn lists(&self) -> impl Iterator<Item = (Category, &[NamedNetwork])> {
        [
            (Category::Foreign, self.foreign.as_slice()),
            (Category::Domestic, self.domestic.as_slice()),
        ]
        .into_iter()
        .chain(
            VpnProtocol::ALL
                .into_iter()
                .map(|proto| (Category::VpnClient(proto), self.vpn_clients.get(proto))),
        )
    }

    /// Every network with its effective name and subnet, in allocation order
    #[must_use]
    pub fn named(&self) -> Vec<(String, &Subnet)> {
        let base = self
            .base
            .configured()
            .map(|(base, subnet)| (base.name().to_owned(), subnet));
        let lists = self.lists().flat_map(|(category, networks)| {
            networks.iter().enumerate().map(move |(i, net)| {
                (network_name(category, i, net.name.as_deref()), &net.subnet)
            })
        });
        base.chain(lists).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.configured().next().is_none() && self.lists().all(|(_, nets)| nets.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_named_in_allocation_order() {
        let yaml = "
base:
  domestic: 192.168.20.0/24
  split: 192.168.10.0/24
foreign:
  - subnet: 192.168.100.0/24
  - name: Games
    subnet: 192.168.101.0/24
vpn_clients:
  wireguard:
    - subnet: 10.66.0.0/24
";
        let nets: Networks = serde_yaml_ng::from_str(yaml).unwrap();
        let names: Vec<_> = nets.named().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["Split", "Domestic", "Foreign-1", "Games", "WG-Client-1"]
        );
        assert!(!nets.is_empty());
        assert!(Networks::default().is_empty());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_yaml_ng::from_str::<Networks>("base:\n  lan: 10.0.0.0/24").is_err());
    }
}
