// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tunnel addressing

use config::Tunnel;
use script::sections::{IP_ADDRESS, IP_POOL};
use script::{Command, Document, Render};
use subnet::TunnelAddressing;

pub(crate) struct TunnelLan<'a> {
    pub(crate) tunnel: &'a Tunnel,
    pub(crate) addressing: TunnelAddressing,
}

impl Render for TunnelLan<'_> {
    type Context = ();
    type Output = Document;
    fn render(&self, _: &Self::Context) -> Self::Output {
        let name = self.tunnel.name.as_str();
        let mut doc = Document::new();
        doc.push_cmd(
            IP_ADDRESS,
            &Command::add()
                .token(
                    "address",
                    format!("{}/{}", self.addressing.gateway, self.tunnel.subnet.prefix_len()),
                )
                .str("interface", &self.tunnel.interface)
                .token("network", self.tunnel.subnet.network())
                .str("comment", name),
        );
        doc.push_cmd(
            IP_POOL,
            &Command::add()
                .str("name", format!("{name}-pool"))
                .token("ranges", self.addressing.range)
                .str("comment", name),
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tunnel_fragment() {
        let tunnel = Tunnel {
            name: "site-b".to_owned(),
            interface: "wg-site-b".to_owned(),
            subnet: "172.16.10.0/24".parse().unwrap(),
        };
        let addressing = tunnel.addressing().unwrap();
        let doc = TunnelLan {
            tunnel: &tunnel,
            addressing,
        }
        .render(&());
        assert_eq!(
            doc.to_string(),
            concat!(
                "/ip address\n",
                r#"add address=172.16.10.4/24 interface="wg-site-b" network=172.16.10.0 comment="site-b""#,
                "\n/ip pool\n",
                r#"add name="site-b-pool" ranges=172.16.10.5-172.16.10.254 comment="site-b""#,
                "\n"
            )
        );
    }
}
