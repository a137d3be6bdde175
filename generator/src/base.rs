// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration every router gets, whatever its networks

use script::sections::{
    INTERFACE_LIST, IP_FIREWALL_ADDRESS_LIST, IP_FIREWALL_MANGLE, IP_FIREWALL_NAT,
};
use script::{Command, Document, Render};

pub const WAN_LIST: &str = "WAN";
pub const LAN_LIST: &str = "LAN";
/// Address list of the private ranges. Traffic between them is never policy routed.
pub const LOCAL_ADDRESS_LIST: &str = "LOCAL-IP";

const LOCAL_RANGES: [&str; 3] = ["192.168.0.0/16", "172.16.0.0/12", "10.0.0.0/8"];
const MANGLE_CHAINS: [&str; 5] = ["prerouting", "postrouting", "output", "input", "forward"];

pub(crate) struct BaseConfig;

impl Render for BaseConfig {
    type Context = ();
    type Output = Document;
    fn render(&self, _: &Self::Context) -> Self::Output {
        let mut doc = Document::new();
        for list in [WAN_LIST, LAN_LIST] {
            doc.push_cmd(INTERFACE_LIST, &Command::add().str("name", list));
        }
        for range in LOCAL_RANGES {
            doc.push_cmd(
                IP_FIREWALL_ADDRESS_LIST,
                &Command::add()
                    .token("address", range)
                    .str("list", LOCAL_ADDRESS_LIST),
            );
        }
        for chain in MANGLE_CHAINS {
            doc.push_cmd(
                IP_FIREWALL_MANGLE,
                &Command::add()
                    .token("action", "accept")
                    .token("chain", chain)
                    .str("src-address-list", LOCAL_ADDRESS_LIST)
                    .str("dst-address-list", LOCAL_ADDRESS_LIST)
                    .str("comment", "local traffic"),
            );
        }
        doc.push_cmd(
            IP_FIREWALL_NAT,
            &Command::add()
                .token("action", "masquerade")
                .token("chain", "srcnat")
                .str("out-interface-list", WAN_LIST),
        );
        doc
    }
}
