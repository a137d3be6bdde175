// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Composition of all the fragments of a router

use std::collections::BTreeSet;
use tracing::{debug, info};

use config::RouterConfig;
use id::{IdAllocator, NetworkId};
use routing::{CheckTargets, LinkGroup};
use script::sections::INTERFACE_LIST_MEMBER;
use script::{Command, Document, Render, merge, shorten};

use crate::base::{BaseConfig, WAN_LIST};
use crate::errors::GenError;
use crate::lan::{Lan, lan_address_list};
use crate::tunnel::TunnelLan;

/// The result of a generation pass
#[derive(Debug)]
pub struct Generated {
    /// The script
    pub document: Document,
    /// The identifiers of every network, in allocation order
    pub networks: Vec<NetworkId>,
}

/// Allocate the identifiers of every configured network, in allocation order
fn allocate<'a>(config: &'a RouterConfig) -> Result<Vec<Lan<'a>>, GenError> {
    let mut alloc = IdAllocator::new();
    let mut lans = Vec::new();
    for (base, subnet) in config.networks.base.configured() {
        lans.push(Lan::new(alloc.allocate_base(base, None)?, subnet));
    }
    for (category, networks) in config.networks.lists() {
        let names: Vec<Option<&str>> = networks.iter().map(|n| n.name.as_deref()).collect();
        let ids = alloc.allocate(category, &names)?;
        lans.extend(
            ids.into_iter()
                .zip(networks)
                .map(|(id, network)| Lan::new(id, &network.subnet)),
        );
    }
    Ok(lans)
}

/// Adjust a link group to the networks of the router. A group named after a network routes
/// that network: the table is already declared by the network, and only its traffic is balanced
/// unless the group says otherwise.
fn attach(group: &LinkGroup, networks: &BTreeSet<&str>) -> LinkGroup {
    let mut group = group.clone();
    if networks.contains(group.name.as_str()) {
        group.declare_table = false;
        if group.source_list.is_none() {
            group.source_list = Some(lan_address_list(&group.name));
        }
    }
    group
}

fn wan_members(group: &LinkGroup) -> Document {
    let mut doc = Document::new();
    for link in &group.links {
        doc.push_cmd(
            INTERFACE_LIST_MEMBER,
            &Command::add()
                .str("interface", &link.interface)
                .str("list", WAN_LIST)
                .str("comment", &link.name),
        );
    }
    doc
}

/// Generate the script of a router.
///
/// The configuration is validated first. The same configuration always produces the same
/// script, byte for byte.
pub fn generate(config: &RouterConfig) -> Result<Generated, GenError> {
    config.validate()?;

    let mut lans = allocate(config)?;
    let routed: BTreeSet<&str> = config
        .link_groups
        .iter()
        .filter(|group| !group.links.is_empty())
        .map(|group| group.name.as_str())
        .collect();
    for lan in &mut lans {
        lan.routed = routed.contains(lan.id.name.as_str());
    }

    let mut fragments = vec![BaseConfig.render(&())];
    fragments.extend(lans.iter().map(|lan| lan.render(&())));
    for tunnel in &config.tunnels {
        let addressing = tunnel.addressing()?;
        fragments.push(TunnelLan { tunnel, addressing }.render(&()));
    }
    let names: BTreeSet<&str> = lans.iter().map(|lan| lan.id.name.as_str()).collect();
    let groups: Vec<LinkGroup> = config
        .link_groups
        .iter()
        .map(|group| attach(group, &names))
        .collect();
    let checks = CheckTargets::assign(&groups);
    for group in &groups {
        fragments.push(wan_members(group));
        fragments.push(group.render(&checks));
    }

    let document = shorten(&merge(&fragments));
    info!(
        "Generated router '{}': {} networks, {} link groups, {} lines",
        config.name,
        lans.len(),
        config.link_groups.len(),
        document.num_lines()
    );
    for lan in &lans {
        debug!("{}: vlan {} table {}", lan.id.name, lan.id.vid, lan.id.table);
    }
    Ok(Generated {
        document,
        networks: lans.into_iter().map(|lan| lan.id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::RouterConfigBuilder;
    use pretty_assertions::assert_eq;
    use routing::{Endpoint, Link, LinkGroupBuilder};
    use tracing_test::traced_test;

    fn group(name: &str) -> LinkGroup {
        LinkGroupBuilder::default()
            .name(name)
            .links(vec![
                Link::new("wan1", "ether1", Endpoint::Address("203.0.113.1".parse().unwrap()))
                    .set_gateway("10.0.1.1".parse().unwrap()),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_attach_to_network() {
        let names: BTreeSet<&str> = ["Foreign"].into();
        let attached = attach(&group("Foreign"), &names);
        assert!(!attached.declare_table);
        assert_eq!(attached.source_list.as_deref(), Some("Foreign-LAN"));

        let standalone = attach(&group("Backup"), &names);
        assert!(standalone.declare_table);
        assert_eq!(standalone.source_list, None);
    }

    #[test]
    fn test_wan_members() {
        let doc = wan_members(&group("Foreign"));
        assert_eq!(
            doc.section(INTERFACE_LIST_MEMBER),
            Some(
                [r#"add interface="ether1" list="WAN" comment="wan1""#]
                    .map(String::from)
                    .as_slice()
            )
        );
    }

    #[traced_test]
    #[test]
    fn test_generate_logs_summary() {
        let config = RouterConfigBuilder::default()
            .name("edge")
            .link_groups(vec![group("Backup")])
            .build()
            .unwrap();
        let generated = generate(&config).unwrap();
        assert!(generated.networks.is_empty());
        assert!(logs_contain("Generated router 'edge': 0 networks, 1 link groups"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut bad = group("Foreign");
        bad.links.push(bad.links[0].clone());
        let config = RouterConfigBuilder::default()
            .link_groups(vec![bad])
            .build()
            .unwrap();
        assert!(matches!(generate(&config), Err(GenError::Config(_))));
    }
}
