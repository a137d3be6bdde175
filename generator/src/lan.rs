// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The LAN side of a network: bridge, addressing, DHCP and policy routing hooks

use id::NetworkId;
use script::sections::{
    INTERFACE_BRIDGE, INTERFACE_LIST_MEMBER, IP_ADDRESS, IP_DHCP_SERVER, IP_DHCP_SERVER_NETWORK,
    IP_FIREWALL_ADDRESS_LIST, IP_FIREWALL_MANGLE, IP_POOL, ROUTING_TABLE,
};
use script::{Command, Document, Render};
use subnet::Subnet;

use crate::base::LAN_LIST;

/// Name of the address list holding the subnet of network `name`
pub(crate) fn lan_address_list(name: &str) -> String {
    format!("{name}-LAN")
}

pub(crate) struct Lan<'a> {
    pub(crate) id: NetworkId,
    pub(crate) subnet: &'a Subnet,
    /// A link group serves the network table, so its traffic is marked into it
    pub(crate) routed: bool,
}

impl<'a> Lan<'a> {
    pub(crate) fn new(id: NetworkId, subnet: &'a Subnet) -> Self {
        Self {
            id,
            subnet,
            routed: false,
        }
    }

    fn bridge(&self) -> String {
        format!("LANBridge-{}", self.id.name)
    }

    fn pool(&self) -> String {
        format!("DHCP-pool-{}", self.id.name)
    }
}

impl Render for Lan<'_> {
    type Context = ();
    type Output = Document;
    fn render(&self, _: &Self::Context) -> Self::Output {
        let name = self.id.name.as_str();
        let bridge = self.bridge();
        let pool = self.pool();
        let list = lan_address_list(name);
        let mut doc = Document::new();

        doc.push_cmd(
            INTERFACE_BRIDGE,
            &Command::add()
                .str("name", &bridge)
                .num("pvid", self.id.vid.as_u16())
                .str("comment", name),
        );
        doc.push_cmd(
            IP_ADDRESS,
            &Command::add()
                .token("address", self.subnet.gateway_cidr())
                .str("interface", &bridge)
                .token("network", self.subnet.network())
                .str("comment", name),
        );
        doc.push_cmd(
            IP_POOL,
            &Command::add()
                .str("name", &pool)
                .token("ranges", self.subnet.dhcp_range())
                .str("comment", name),
        );
        doc.push_cmd(
            IP_DHCP_SERVER,
            &Command::add()
                .str("name", format!("DHCP-{name}"))
                .str("interface", &bridge)
                .str("address-pool", &pool)
                .str("comment", name),
        );
        doc.push_cmd(
            IP_DHCP_SERVER_NETWORK,
            &Command::add()
                .token("address", self.subnet)
                .token("gateway", self.subnet.gateway())
                .token("dns-server", self.subnet.gateway())
                .str("comment", name),
        );
        doc.push_cmd(
            IP_FIREWALL_ADDRESS_LIST,
            &Command::add()
                .token("address", self.subnet)
                .str("list", &list)
                .str("comment", name),
        );
        doc.push_cmd(
            ROUTING_TABLE,
            &Command::add()
                .flag("fib")
                .str("name", self.id.table.as_str())
                .str("comment", name),
        );
        doc.push_cmd(
            INTERFACE_LIST_MEMBER,
            &Command::add()
                .str("interface", &bridge)
                .str("list", LAN_LIST)
                .str("comment", name),
        );
        if self.routed {
            doc.push_cmd(
                IP_FIREWALL_MANGLE,
                &Command::add()
                    .token("action", "mark-routing")
                    .token("chain", "prerouting")
                    .str("src-address-list", &list)
                    .token("dst-address-type", "!local")
                    .str("new-routing-mark", self.id.table.as_str())
                    .bool("passthrough", true)
                    .str("comment", name),
            );
        }
        doc
    }
}
