// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link groups and their rendering into routes, routing tables and mangle rules

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

use id::RoutingTable;
use script::sections::{IP_FIREWALL_ADDRESS_LIST, IP_FIREWALL_MANGLE, IP_ROUTE, ROUTING_TABLE};
use script::{Command, Document, Render, merge};

use crate::errors::RoutingError;
use crate::health::CheckTargets;
use crate::link::Link;
use crate::strategy::{Marker, MultiLinkConfig, Plan};

/// Any destination
const DEFAULT_DST: &str = "0.0.0.0/0";
/// Scope of the host routes to the check targets
const CHECK_ROUTE_SCOPE: i64 = 10;
/// Target scope of the default routes that resolve recursively through a check target
const CHECK_TARGET_SCOPE: i64 = 11;

fn yes() -> bool {
    true
}

/// A set of uplinks sharing one routing table, `to-<name>`.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkGroup {
    #[builder(setter(into))]
    pub name: String,

    #[builder(default)]
    #[serde(default)]
    pub links: Vec<Link>,

    #[builder(default)]
    #[serde(default)]
    pub multilink: MultiLinkConfig,

    /// Also install the group routes in the main table
    #[builder(default = false)]
    #[serde(default)]
    pub mirror_to_main: bool,

    /// Send replies to connections that came in through a link back out through it
    #[builder(default = false)]
    #[serde(default)]
    pub reply_marking: bool,

    /// Declare the group table. Off when something else already declares it.
    #[builder(default = true)]
    #[serde(default = "yes")]
    pub declare_table: bool,

    /// Address list of the sources whose connections are balanced. All sources if unset.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub source_list: Option<String>,
}

impl LinkGroup {
    #[must_use]
    pub fn table(&self) -> RoutingTable {
        RoutingTable::for_name(&self.name)
    }

    /// Address list holding the literal endpoints of the links
    #[must_use]
    pub fn endpoint_list(&self) -> String {
        format!("{}-endpoints", self.name)
    }

    #[must_use]
    pub fn plan(&self) -> Plan {
        self.multilink.effective(self.links.len())
    }

    /// # Errors
    ///
    /// Fails on the first link that can't be routed through.
    pub fn validate(&self) -> Result<(), RoutingError> {
        self.links.iter().try_for_each(Link::validate)
    }

    fn reply_marking_active(&self) -> bool {
        self.reply_marking && self.links.len() >= 2
    }

    /// Whether every link gets a table of its own
    fn has_link_tables(&self, plan: Plan) -> bool {
        matches!(plan, Plan::Balance { .. }) || self.reply_marking_active()
    }

    /// Push a route into the group table, and into main if mirrored
    fn push_group_route(&self, doc: &mut Document, route: impl Fn(&RoutingTable) -> Command) {
        doc.push_cmd(IP_ROUTE, &route(&self.table()));
        if self.mirror_to_main {
            doc.push_cmd(IP_ROUTE, &route(&RoutingTable::main()));
        }
    }

    fn render_declaration(&self) -> Document {
        let mut doc = Document::new();
        if self.declare_table {
            doc.push_cmd(ROUTING_TABLE, &declare_table(&self.table(), &self.name));
        }
        doc
    }

    fn render_endpoint(&self, doc: &mut Document, link: &Link) {
        if let Some(IpAddr::V4(addr)) = link.endpoint.address() {
            doc.push_cmd(
                IP_FIREWALL_ADDRESS_LIST,
                &Command::add()
                    .token("address", addr)
                    .str("list", self.endpoint_list())
                    .str("comment", &link.name),
            );
        } else {
            debug!("Endpoint of link {} is not an IPv4 address, not listed", link.name);
        }
    }

    /// Distance-ordered default route of link `index` in the group table
    fn render_failover(
        &self,
        doc: &mut Document,
        index: usize,
        link: &Link,
        check: Option<Ipv4Addr>,
    ) {
        let distance = distance(index);
        let gateway = link.route_gateway();
        match check {
            Some(target) => {
                doc.push_cmd(
                    IP_ROUTE,
                    &Command::add()
                        .token("dst-address", format!("{target}/32"))
                        .token("gateway", &gateway)
                        .num("scope", CHECK_ROUTE_SCOPE)
                        .str("routing-table", RoutingTable::MAIN)
                        .str("comment", format!("{} check", link.name)),
                );
                self.push_group_route(doc, |table| {
                    default_route(&target.to_string(), table)
                        .num("distance", distance)
                        .num("target-scope", CHECK_TARGET_SCOPE)
                        .token("check-gateway", "ping")
                        .str("comment", &link.name)
                });
            }
            None => self.push_group_route(doc, |table| {
                default_route(&gateway, table)
                    .num("distance", distance)
                    .token("check-gateway", "ping")
                    .str("comment", &link.name)
            }),
        }
    }

    /// The table of link `index`: its own route first, then the other links if backstopped
    fn render_link_table(
        &self,
        doc: &mut Document,
        index: usize,
        link: &Link,
        full_backstop: bool,
    ) {
        let table = RoutingTable::for_name(&link.name);
        doc.push_cmd(ROUTING_TABLE, &declare_table(&table, &link.name));
        doc.push_cmd(
            IP_ROUTE,
            &default_route(&link.route_gateway(), &table)
                .num("distance", 1)
                .token("check-gateway", "ping")
                .str("comment", &link.name),
        );
        if full_backstop {
            let others = self
                .links
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, other)| other);
            for (k, other) in others.enumerate() {
                doc.push_cmd(
                    IP_ROUTE,
                    &default_route(&other.route_gateway(), &table)
                        .num("distance", distance(k + 1))
                        .token("check-gateway", "ping")
                        .str("comment", format!("{} backup", other.name)),
                );
            }
        }
    }

    fn render_balance(&self, doc: &mut Document, index: usize, link: &Link, marker: Marker) {
        let (key, value) = marker.matcher(self.links.len(), index);
        let conn_mark = format!("conn-{}", link.name);
        doc.push_cmd(
            IP_FIREWALL_MANGLE,
            &Command::add()
                .token("chain", "prerouting")
                .opt_str("src-address-list", self.source_list.as_deref())
                .token("dst-address-type", "!local")
                .token("connection-state", "new")
                .token("connection-mark", "no-mark")
                .token(key, value)
                .token("action", "mark-connection")
                .str("new-connection-mark", &conn_mark)
                .bool("passthrough", true)
                .str("comment", &link.name),
        );
        doc.push_cmd(
            IP_FIREWALL_MANGLE,
            &Command::add()
                .token("chain", "prerouting")
                .opt_str("src-address-list", self.source_list.as_deref())
                .str("connection-mark", &conn_mark)
                .token("action", "mark-routing")
                .str("new-routing-mark", RoutingTable::for_name(&link.name).as_str())
                .bool("passthrough", false)
                .str("comment", &link.name),
        );
    }

    fn render_reply_marking(doc: &mut Document, link: &Link) {
        let reply_mark = format!("reply-{}", link.name);
        doc.push_cmd(
            IP_FIREWALL_MANGLE,
            &Command::add()
                .token("chain", "input")
                .str("in-interface", &link.interface)
                .token("connection-mark", "no-mark")
                .token("action", "mark-connection")
                .str("new-connection-mark", &reply_mark)
                .bool("passthrough", true)
                .str("comment", format!("{} replies", link.name)),
        );
        doc.push_cmd(
            IP_FIREWALL_MANGLE,
            &Command::add()
                .token("chain", "output")
                .str("connection-mark", &reply_mark)
                .token("action", "mark-routing")
                .str("new-routing-mark", RoutingTable::for_name(&link.name).as_str())
                .bool("passthrough", false)
                .str("comment", format!("{} replies", link.name)),
        );
    }

    /// The fragment of link `index`
    fn render_link(
        &self,
        plan: Plan,
        index: usize,
        link: &Link,
        check: Option<Ipv4Addr>,
    ) -> Document {
        let mut doc = Document::new();
        self.render_endpoint(&mut doc, link);
        if self.has_link_tables(plan) {
            let full_backstop = matches!(
                plan,
                Plan::Balance {
                    full_backstop: true,
                    ..
                }
            );
            self.render_link_table(&mut doc, index, link, full_backstop);
        }
        match plan {
            Plan::Empty => {}
            Plan::Single => self.push_group_route(&mut doc, |table| {
                default_route(&link.route_gateway(), table).str("comment", &link.name)
            }),
            Plan::Failover => self.render_failover(&mut doc, index, link, check),
            Plan::Balance { marker, .. } => {
                self.render_balance(&mut doc, index, link, marker);
                self.render_failover(&mut doc, index, link, check);
            }
        }
        if self.reply_marking_active() {
            Self::render_reply_marking(&mut doc, link);
        }
        doc
    }
}

fn distance(index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1))
}

fn default_route(gateway: &str, table: &RoutingTable) -> Command {
    Command::add()
        .token("dst-address", DEFAULT_DST)
        .token("gateway", gateway)
        .str("routing-table", table.as_str())
}

fn declare_table(table: &RoutingTable, owner: &str) -> Command {
    Command::add()
        .flag("fib")
        .str("name", table.as_str())
        .str("comment", owner)
}

/// Renders one fragment per link and merges them, after the group table declaration.
/// A group with no links renders to nothing. The context holds the check targets of the pass.
impl Render for LinkGroup {
    type Context = CheckTargets;
    type Output = Document;
    fn render(&self, checks: &Self::Context) -> Self::Output {
        let plan = self.plan();
        if plan == Plan::Empty {
            debug!("Link group '{}' has no links, nothing to render", self.name);
            return Document::new();
        }
        let mut fragments = Vec::with_capacity(self.links.len() + 1);
        fragments.push(self.render_declaration());
        for (index, link) in self.links.iter().enumerate() {
            let check = checks.get(&self.name, index);
            fragments.push(self.render_link(plan, index, link, check));
        }
        let doc = merge(&fragments);
        debug!(
            "Link group '{}': {plan} over {} links, {} lines",
            self.name,
            self.links.len(),
            doc.num_lines()
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Endpoint;
    use crate::strategy::{LbMethod, Strategy};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use tracing_test::traced_test;

    fn link(name: &str, endpoint: &str, gateway: &str) -> Link {
        Link::new(name, &format!("{name}-if"), Endpoint::from_str(endpoint).unwrap())
            .set_gateway(gateway.parse().unwrap())
    }

    fn links(n: usize) -> Vec<Link> {
        (1..=n)
            .map(|i| link(&format!("wan{i}"), &format!("203.0.113.{i}"), &format!("10.0.{i}.1")))
            .collect()
    }

    fn group(links: Vec<Link>, strategy: Strategy, method: LbMethod) -> LinkGroup {
        LinkGroupBuilder::default()
            .name("Foreign")
            .links(links)
            .multilink(MultiLinkConfig::new(strategy, method))
            .build()
            .unwrap()
    }

    fn render(g: &LinkGroup) -> Document {
        g.render(&CheckTargets::assign(std::slice::from_ref(g)))
    }

    fn lines<'a>(doc: &'a Document, section: &str) -> Vec<&'a str> {
        doc.section(section)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Default routes in the group table
    fn group_defaults(doc: &Document) -> Vec<&str> {
        lines(doc, IP_ROUTE)
            .into_iter()
            .filter(|l| {
                l.contains("dst-address=0.0.0.0/0") && l.contains("routing-table=\"to-Foreign\"")
            })
            .collect()
    }

    const CHECK_TARGET_COUNT: usize = crate::CHECK_TARGETS.len();

    const ALL_STRATEGIES: [Strategy; 4] = [
        Strategy::Failover,
        Strategy::LoadBalance,
        Strategy::RoundRobin,
        Strategy::Both,
    ];

    #[test]
    fn test_zero_links_render_nothing() {
        for strategy in ALL_STRATEGIES {
            let mut g = group(vec![], strategy, LbMethod::Pcc);
            g.reply_marking = true;
            g.mirror_to_main = true;
            assert_eq!(render(&g).num_sections(), 0);
        }
    }

    #[test]
    fn test_single_link_fast_path() {
        for strategy in ALL_STRATEGIES {
            let mut g = group(links(1), strategy, LbMethod::Nth);
            g.reply_marking = true;
            let doc = render(&g);
            assert_eq!(
                group_defaults(&doc),
                vec![r#"add dst-address=0.0.0.0/0 gateway=10.0.1.1 routing-table="to-Foreign" comment="wan1""#]
            );
            assert_eq!(lines(&doc, IP_ROUTE).len(), 1);
            assert!(!doc.contains_section(IP_FIREWALL_MANGLE));
            assert_eq!(
                lines(&doc, IP_FIREWALL_ADDRESS_LIST),
                vec![r#"add address=203.0.113.1 list="Foreign-endpoints" comment="wan1""#]
            );
            assert_eq!(
                lines(&doc, ROUTING_TABLE),
                vec![r#"add fib name="to-Foreign" comment="Foreign""#]
            );
        }
    }

    #[test]
    fn test_single_link_mirror() {
        let mut g = group(links(1), Strategy::Failover, LbMethod::Pcc);
        g.mirror_to_main = true;
        let doc = render(&g);
        assert_eq!(
            lines(&doc, IP_ROUTE),
            vec![
                r#"add dst-address=0.0.0.0/0 gateway=10.0.1.1 routing-table="to-Foreign" comment="wan1""#,
                r#"add dst-address=0.0.0.0/0 gateway=10.0.1.1 routing-table="main" comment="wan1""#,
            ]
        );
    }

    #[test]
    fn test_failover_distances() {
        let doc = render(&group(links(3), Strategy::Failover, LbMethod::Pcc));
        let defaults = group_defaults(&doc);
        assert_eq!(
            defaults,
            vec![
                r#"add dst-address=0.0.0.0/0 gateway=1.1.1.1 routing-table="to-Foreign" distance=1 target-scope=11 check-gateway=ping comment="wan1""#,
                r#"add dst-address=0.0.0.0/0 gateway=8.8.8.8 routing-table="to-Foreign" distance=2 target-scope=11 check-gateway=ping comment="wan2""#,
                r#"add dst-address=0.0.0.0/0 gateway=9.9.9.9 routing-table="to-Foreign" distance=3 target-scope=11 check-gateway=ping comment="wan3""#,
            ]
        );
        assert!(lines(&doc, IP_ROUTE).contains(
            &r#"add dst-address=1.1.1.1/32 gateway=10.0.1.1 scope=10 routing-table="main" comment="wan1 check""#
        ));
        assert!(!doc.contains_section(IP_FIREWALL_MANGLE));
        assert_eq!(lines(&doc, ROUTING_TABLE).len(), 1);
    }

    #[test]
    fn test_groups_share_check_targets() {
        let wan = group(links(2), Strategy::Failover, LbMethod::Pcc);
        let mut vpn = group(
            vec![
                link("vpn1", "198.51.100.1", "10.8.1.1"),
                link("vpn2", "198.51.100.2", "10.8.2.1"),
            ],
            Strategy::Failover,
            LbMethod::Pcc,
        );
        vpn.name = "VPN".to_owned();
        let groups = [wan, vpn];
        let checks = CheckTargets::assign(&groups);
        let docs: Vec<_> = groups.iter().map(|g| g.render(&checks)).collect();
        let hosts: Vec<_> = docs
            .iter()
            .flat_map(|doc| lines(doc, IP_ROUTE))
            .filter(|l| l.contains("/32 "))
            .collect();
        assert_eq!(
            hosts,
            vec![
                r#"add dst-address=1.1.1.1/32 gateway=10.0.1.1 scope=10 routing-table="main" comment="wan1 check""#,
                r#"add dst-address=8.8.8.8/32 gateway=10.0.2.1 scope=10 routing-table="main" comment="wan2 check""#,
                r#"add dst-address=9.9.9.9/32 gateway=10.8.1.1 scope=10 routing-table="main" comment="vpn1 check""#,
                r#"add dst-address=208.67.222.222/32 gateway=10.8.2.1 scope=10 routing-table="main" comment="vpn2 check""#,
            ]
        );
    }

    #[test]
    fn test_failover_without_check_target() {
        let all = links(CHECK_TARGET_COUNT + 1);
        let doc = render(&group(all, Strategy::Failover, LbMethod::Pcc));
        let defaults = group_defaults(&doc);
        assert_eq!(defaults.len(), CHECK_TARGET_COUNT + 1);
        assert_eq!(
            defaults.last().copied(),
            Some(r#"add dst-address=0.0.0.0/0 gateway=10.0.9.1 routing-table="to-Foreign" distance=9 check-gateway=ping comment="wan9""#)
        );
    }

    #[test]
    fn test_ecmp_is_pcc() {
        let ecmp = render(&group(links(3), Strategy::LoadBalance, LbMethod::Ecmp));
        let pcc = render(&group(links(3), Strategy::LoadBalance, LbMethod::Pcc));
        assert_eq!(ecmp, pcc);
        assert_eq!(ecmp.to_string(), pcc.to_string());
    }

    #[test]
    fn test_pcc_balance() {
        let mut g = group(links(2), Strategy::LoadBalance, LbMethod::Pcc);
        g.source_list = Some("Foreign-LAN".to_owned());
        let doc = render(&g);
        assert_eq!(
            lines(&doc, IP_FIREWALL_MANGLE),
            vec![
                r#"add chain=prerouting src-address-list="Foreign-LAN" dst-address-type=!local connection-state=new connection-mark=no-mark per-connection-classifier=both-addresses-and-ports:2/0 action=mark-connection new-connection-mark="conn-wan1" passthrough=yes comment="wan1""#,
                r#"add chain=prerouting src-address-list="Foreign-LAN" connection-mark="conn-wan1" action=mark-routing new-routing-mark="to-wan1" passthrough=no comment="wan1""#,
                r#"add chain=prerouting src-address-list="Foreign-LAN" dst-address-type=!local connection-state=new connection-mark=no-mark per-connection-classifier=both-addresses-and-ports:2/1 action=mark-connection new-connection-mark="conn-wan2" passthrough=yes comment="wan2""#,
                r#"add chain=prerouting src-address-list="Foreign-LAN" connection-mark="conn-wan2" action=mark-routing new-routing-mark="to-wan2" passthrough=no comment="wan2""#,
            ]
        );
        assert_eq!(
            lines(&doc, ROUTING_TABLE),
            vec![
                r#"add fib name="to-Foreign" comment="Foreign""#,
                r#"add fib name="to-wan1" comment="wan1""#,
                r#"add fib name="to-wan2" comment="wan2""#,
            ]
        );
        // failover backstop in the group table
        assert_eq!(group_defaults(&doc).len(), 2);
        assert!(lines(&doc, IP_ROUTE).contains(
            &r#"add dst-address=0.0.0.0/0 gateway=10.0.2.1 routing-table="to-wan2" distance=1 check-gateway=ping comment="wan2""#
        ));
    }

    #[test]
    fn test_nth_and_round_robin() {
        let nth = render(&group(links(3), Strategy::LoadBalance, LbMethod::Nth));
        let rr = render(&group(links(3), Strategy::RoundRobin, LbMethod::Pcc));
        assert_eq!(nth, rr);
        let counters: Vec<_> = lines(&nth, IP_FIREWALL_MANGLE)
            .into_iter()
            .filter_map(|l| l.split(' ').find(|w| w.starts_with("nth=")))
            .collect();
        assert_eq!(counters, vec!["nth=3,1", "nth=3,2", "nth=3,3"]);
    }

    #[test]
    fn test_both_backstops_every_link_table() {
        let doc = render(&group(links(3), Strategy::Both, LbMethod::Pcc));
        let wan2: Vec<_> = lines(&doc, IP_ROUTE)
            .into_iter()
            .filter(|l| l.contains("routing-table=\"to-wan2\""))
            .collect();
        assert_eq!(
            wan2,
            vec![
                r#"add dst-address=0.0.0.0/0 gateway=10.0.2.1 routing-table="to-wan2" distance=1 check-gateway=ping comment="wan2""#,
                r#"add dst-address=0.0.0.0/0 gateway=10.0.1.1 routing-table="to-wan2" distance=2 check-gateway=ping comment="wan1 backup""#,
                r#"add dst-address=0.0.0.0/0 gateway=10.0.3.1 routing-table="to-wan2" distance=3 check-gateway=ping comment="wan3 backup""#,
            ]
        );
        let plain = render(&group(links(3), Strategy::LoadBalance, LbMethod::Pcc));
        assert_eq!(
            lines(&doc, IP_FIREWALL_MANGLE),
            lines(&plain, IP_FIREWALL_MANGLE)
        );
    }

    #[test]
    fn test_reply_marking() {
        let mut g = group(links(2), Strategy::Failover, LbMethod::Pcc);
        g.reply_marking = true;
        let doc = render(&g);
        assert_eq!(
            lines(&doc, IP_FIREWALL_MANGLE),
            vec![
                r#"add chain=input in-interface="wan1-if" connection-mark=no-mark action=mark-connection new-connection-mark="reply-wan1" passthrough=yes comment="wan1 replies""#,
                r#"add chain=output connection-mark="reply-wan1" action=mark-routing new-routing-mark="to-wan1" passthrough=no comment="wan1 replies""#,
                r#"add chain=input in-interface="wan2-if" connection-mark=no-mark action=mark-connection new-connection-mark="reply-wan2" passthrough=yes comment="wan2 replies""#,
                r#"add chain=output connection-mark="reply-wan2" action=mark-routing new-routing-mark="to-wan2" passthrough=no comment="wan2 replies""#,
            ]
        );
        // replies need the per-link tables
        assert_eq!(lines(&doc, ROUTING_TABLE).len(), 3);
    }

    #[test]
    fn test_domain_endpoints_are_not_listed() {
        let all = vec![
            link("wan1", "isp.example.net", "10.0.1.1"),
            link("wan2", "203.0.113.2", "10.0.2.1"),
        ];
        let doc = render(&group(all, Strategy::Failover, LbMethod::Pcc));
        assert_eq!(
            lines(&doc, IP_FIREWALL_ADDRESS_LIST),
            vec![r#"add address=203.0.113.2 list="Foreign-endpoints" comment="wan2""#]
        );
    }

    #[test]
    fn test_no_table_declaration() {
        let mut g = group(links(2), Strategy::Failover, LbMethod::Pcc);
        g.declare_table = false;
        assert!(!render(&g).contains_section(ROUTING_TABLE));
    }

    #[test]
    fn test_interface_gateway() {
        let ptp = Link::new("lte", "lte1", Endpoint::from_str("lte.example.net").unwrap());
        let doc = render(&group(vec![ptp], Strategy::Failover, LbMethod::Pcc));
        assert_eq!(
            group_defaults(&doc),
            vec![r#"add dst-address=0.0.0.0/0 gateway=lte1 routing-table="to-Foreign" comment="lte""#]
        );
    }

    #[traced_test]
    #[test]
    fn test_render_logs_plan() {
        render(&group(links(2), Strategy::Both, LbMethod::Nth));
        assert!(logs_contain("balance (Nth) with full backstop over 2 links"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let yaml = "
name: Foreign
links:
  - name: wan1
    interface: ether1
    endpoint: 203.0.113.1
    gateway: 10.0.1.1
multilink:
  strategy: both
";
        let g: LinkGroup = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(g.declare_table);
        assert!(!g.mirror_to_main);
        assert_eq!(g.multilink.method, LbMethod::Pcc);
        assert_eq!(g.plan(), Plan::Single);
    }
}
