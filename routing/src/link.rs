// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Uplinks

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::errors::RoutingError;

/// Where the far end of a link is
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Endpoint {
    Address(IpAddr),
    Domain(String),
}

impl Endpoint {
    /// The endpoint address, if it is a literal one
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            Endpoint::Address(addr) => Some(*addr),
            Endpoint::Domain(_) => None,
        }
    }
}

fn is_domain_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

impl FromStr for Endpoint {
    type Err = RoutingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(addr) = IpAddr::from_str(s) {
            return Ok(Endpoint::Address(addr));
        }
        if is_domain_name(s) {
            Ok(Endpoint::Domain(s.to_ascii_lowercase()))
        } else {
            Err(RoutingError::InvalidEndpoint(s.to_owned()))
        }
    }
}

impl TryFrom<String> for Endpoint {
    type Error = RoutingError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Endpoint::from_str(&value)
    }
}
impl From<Endpoint> for String {
    fn from(value: Endpoint) -> Self {
        value.to_string()
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Address(addr) => write!(f, "{addr}"),
            Endpoint::Domain(name) => write!(f, "{name}"),
        }
    }
}

/// One uplink of a link group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    /// Interface the link leaves through
    pub interface: String,
    pub endpoint: Endpoint,
    /// Next hop. Point-to-point links may leave it out and route through the interface.
    #[serde(default)]
    pub gateway: Option<IpAddr>,
    /// Address pinged to tell whether the link is up
    #[serde(default)]
    pub check_ip: Option<Ipv4Addr>,
}

impl Link {
    #[must_use]
    pub fn new(name: &str, interface: &str, endpoint: Endpoint) -> Self {
        Self {
            name: name.to_owned(),
            interface: interface.to_owned(),
            endpoint,
            gateway: None,
            check_ip: None,
        }
    }
    #[must_use]
    pub fn set_gateway(mut self, gateway: IpAddr) -> Self {
        self.gateway = Some(gateway);
        self
    }
    #[must_use]
    pub fn set_check_ip(mut self, check_ip: Ipv4Addr) -> Self {
        self.check_ip = Some(check_ip);
        self
    }

    /// The `gateway=` value of the routes through this link
    #[must_use]
    pub fn route_gateway(&self) -> String {
        match self.gateway {
            Some(addr) => addr.to_string(),
            None => self.interface.clone(),
        }
    }

    /// # Errors
    ///
    /// Fails if the link can't be routed through.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.gateway.is_none() && self.interface.trim().is_empty() {
            return Err(RoutingError::NoGateway {
                link: self.name.clone(),
            });
        }
        // address lists and routes of the script are IPv4 only
        let mut addresses = self.endpoint.address().into_iter().chain(self.gateway);
        if let Some(address) = addresses.find(IpAddr::is_ipv6) {
            return Err(RoutingError::NotIpv4 {
                link: self.name.clone(),
                address,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(
            Endpoint::from_str("203.0.113.7"),
            Ok(Endpoint::Address(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))))
        );
        assert_eq!(
            Endpoint::from_str(" VPN.Example.net "),
            Ok(Endpoint::Domain("vpn.example.net".to_owned()))
        );
        assert!(Endpoint::from_str("2001:db8::1").unwrap().address().is_some());
        assert!(Endpoint::from_str("vpn.example.net").unwrap().address().is_none());
        assert!(Endpoint::from_str("not a host").is_err());
        assert!(Endpoint::from_str("").is_err());
        assert!(Endpoint::from_str("-bad.example").is_err());
    }

    #[test]
    fn test_route_gateway() {
        let link = Link::new("wan1", "ether1", Endpoint::from_str("203.0.113.7").unwrap());
        assert_eq!(link.route_gateway(), "ether1");
        let link = link.set_gateway("198.51.100.1".parse().unwrap());
        assert_eq!(link.route_gateway(), "198.51.100.1");
        assert!(link.validate().is_ok());

        let link = Link::new("wan2", " ", Endpoint::Domain("x.example".to_owned()));
        assert_eq!(
            link.validate(),
            Err(RoutingError::NoGateway {
                link: "wan2".to_owned()
            })
        );
    }

    #[test]
    fn test_ipv6_is_rejected() {
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        let link = Link::new("wan1", "ether1", Endpoint::Address(v6));
        assert_eq!(
            link.validate(),
            Err(RoutingError::NotIpv4 {
                link: "wan1".to_owned(),
                address: v6
            })
        );
        let link = Link::new("wan2", "ether2", Endpoint::from_str("203.0.113.7").unwrap())
            .set_gateway(v6);
        assert!(matches!(link.validate(), Err(RoutingError::NotIpv4 { .. })));
    }

    #[test]
    fn test_link_deserialize() {
        let yaml = "
name: wan1
interface: ether1
endpoint: isp.example.com
gateway: 198.51.100.1
";
        let link: Link = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(link.endpoint, Endpoint::Domain("isp.example.com".to_owned()));
        assert_eq!(link.check_ip, None);
        assert!(serde_yaml_ng::from_str::<Link>("name: x\ninterface: e\nendpoint: 'a b'").is_err());
    }
}
