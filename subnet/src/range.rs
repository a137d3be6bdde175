// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Inclusive address ranges, as used by RouterOS pools

use std::fmt::Display;
use std::net::Ipv4Addr;

/// An inclusive range of IPv4 addresses. Renders as `start-end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl AddressRange {
    #[must_use]
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Self {
        Self { start, end }
    }
    /// Number of addresses in the range. Zero if the range is inverted.
    #[must_use]
    pub fn len(&self) -> u32 {
        let (start, end) = (self.start.to_bits(), self.end.to_bits());
        if end < start { 0 } else { end - start + 1 }
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        (self.start..=self.end).contains(&addr)
    }
}

impl Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
