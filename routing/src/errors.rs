// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors of the multi-link model

use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Invalid endpoint '{0}': neither an address nor a domain name")]
    InvalidEndpoint(String),
    #[error("Link '{link}' has neither a gateway nor an interface to route through")]
    NoGateway { link: String },
    #[error("Link '{link}' uses {address}: only IPv4 endpoints and gateways can be routed")]
    NotIpv4 { link: String, address: IpAddr },
}
