// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! RouterOS menu paths used as section keys

pub const INTERFACE_BRIDGE: &str = "/interface bridge";
pub const INTERFACE_LIST: &str = "/interface list";
pub const INTERFACE_LIST_MEMBER: &str = "/interface list member";
pub const IP_ADDRESS: &str = "/ip address";
pub const IP_POOL: &str = "/ip pool";
pub const IP_DHCP_SERVER: &str = "/ip dhcp-server";
pub const IP_DHCP_SERVER_NETWORK: &str = "/ip dhcp-server network";
pub const IP_FIREWALL_ADDRESS_LIST: &str = "/ip firewall address-list";
pub const IP_FIREWALL_MANGLE: &str = "/ip firewall mangle";
pub const IP_FIREWALL_NAT: &str = "/ip firewall nat";
pub const IP_ROUTE: &str = "/ip route";
pub const ROUTING_TABLE: &str = "/routing table";
