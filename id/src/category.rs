// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network categories and the VLAN id band each of them owns

use std::fmt::Display;

/// The four fixed networks every router gets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseNetwork {
    Split,
    Domestic,
    Foreign,
    Vpn,
}

impl BaseNetwork {
    /// Allocation order
    pub const ALL: [BaseNetwork; 4] = [
        BaseNetwork::Split,
        BaseNetwork::Domestic,
        BaseNetwork::Foreign,
        BaseNetwork::Vpn,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BaseNetwork::Split => "Split",
            BaseNetwork::Domestic => "Domestic",
            BaseNetwork::Foreign => "Foreign",
            BaseNetwork::Vpn => "VPN",
        }
    }

    /// The fixed VLAN id of the network
    #[must_use]
    pub const fn vid(self) -> u16 {
        match self {
            BaseNetwork::Split => 10,
            BaseNetwork::Domestic => 20,
            BaseNetwork::Foreign => 30,
            BaseNetwork::Vpn => 40,
        }
    }
}

/// VPN client protocols. Each one gets its own band of client networks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VpnProtocol {
    Wireguard,
    OpenVpn,
    Pptp,
    L2tp,
    Sstp,
    Ikev2,
}

impl VpnProtocol {
    /// Allocation order
    pub const ALL: [VpnProtocol; 6] = [
        VpnProtocol::Wireguard,
        VpnProtocol::OpenVpn,
        VpnProtocol::Pptp,
        VpnProtocol::L2tp,
        VpnProtocol::Sstp,
        VpnProtocol::Ikev2,
    ];

    /// Prefix of auto-generated client network names
    #[must_use]
    pub const fn name_prefix(self) -> &'static str {
        match self {
            VpnProtocol::Wireguard => "WG-Client",
            VpnProtocol::OpenVpn => "OVPN-Client",
            VpnProtocol::Pptp => "PPTP-Client",
            VpnProtocol::L2tp => "L2TP-Client",
            VpnProtocol::Sstp => "SSTP-Client",
            VpnProtocol::Ikev2 => "IKEv2-Client",
        }
    }

    const fn offset(self) -> u16 {
        match self {
            VpnProtocol::Wireguard => 300,
            VpnProtocol::OpenVpn => 400,
            VpnProtocol::Pptp => 500,
            VpnProtocol::L2tp => 600,
            VpnProtocol::Sstp => 700,
            VpnProtocol::Ikev2 => 800,
        }
    }
}

/// A network category. Every category owns a band `[offset, offset + width)` of VLAN ids, and
/// the bands of distinct categories never overlap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Base(BaseNetwork),
    /// Additional foreign networks
    Foreign,
    /// Additional domestic networks
    Domestic,
    VpnClient(VpnProtocol),
}

impl Category {
    /// Width of the band of every non-base category
    pub const BAND_WIDTH: u16 = 100;

    /// First VLAN id of the band
    #[must_use]
    pub const fn offset(self) -> u16 {
        match self {
            Category::Base(base) => base.vid(),
            Category::Foreign => 100,
            Category::Domestic => 200,
            Category::VpnClient(proto) => proto.offset(),
        }
    }

    /// Number of ids in the band
    #[must_use]
    pub const fn width(self) -> u16 {
        match self {
            Category::Base(_) => 1,
            _ => Self::BAND_WIDTH,
        }
    }

    #[must_use]
    pub const fn name_prefix(self) -> &'static str {
        match self {
            Category::Base(base) => base.name(),
            Category::Foreign => "Foreign",
            Category::Domestic => "Domestic",
            Category::VpnClient(proto) => proto.name_prefix(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Base(base) => write!(f, "base {}", base.name()),
            Category::Foreign => write!(f, "additional foreign"),
            Category::Domestic => write!(f, "additional domestic"),
            Category::VpnClient(proto) => write!(f, "{proto:?} clients"),
        }
    }
}

/// The name of the `index`-th (0-based) network of a category.
///
/// A non-blank user-given name wins. Otherwise base networks use their fixed name and the
/// others are numbered from 1 after the category prefix (`Foreign-1`, `WG-Client-2`).
#[must_use]
pub fn network_name(category: Category, index: usize, user: Option<&str>) -> String {
    match user.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => match category {
            Category::Base(base) => base.name().to_owned(),
            _ => format!("{}-{}", category.name_prefix(), index + 1),
        },
    }
}
