// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN identifiers

use core::num::NonZero;

/// A VLAN Identifier (1..=4094).
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vid(NonZero<u16>);

/// Errors which can occur when converting a `u16` to a validated [`Vid`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVid {
    /// 0 means "untagged" and can't name a network.
    #[error("Zero is a reserved Vid")]
    Zero,
    #[error("4095 is a reserved Vid")]
    Reserved,
    #[error("{0} is too large to be a legal Vid ({MAX} is max legal value)", MAX = Vid::MAX)]
    TooLarge(u16),
}

impl InvalidVid {
    /// The raw `u16` value of the reserved (4095) [`Vid`]
    pub const RESERVED: u16 = 4095;
}

impl Vid {
    /// The minimum legal [`Vid`] value (1).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MIN: Vid = Vid(NonZero::new(1).unwrap());

    /// The maximum legal [`Vid`] value (2^12 - 2).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MAX: Vid = Vid(NonZero::new(4094).unwrap());

    /// Create a new [`Vid`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0, 4095 (reserved), or greater than [`Vid::MAX`].
    pub fn new(vid: u16) -> Result<Self, InvalidVid> {
        match NonZero::new(vid) {
            None => Err(InvalidVid::Zero),
            Some(val) if val.get() == InvalidVid::RESERVED => Err(InvalidVid::Reserved),
            Some(val) if val.get() > InvalidVid::RESERVED => Err(InvalidVid::TooLarge(val.get())),
            Some(val) => Ok(Vid(val)),
        }
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl From<Vid> for u16 {
    fn from(vid: Vid) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for Vid {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<Vid, Self::Error> {
        Vid::new(vid)
    }
}

impl core::fmt::Display for Vid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vid_bounds() {
        assert_eq!(Vid::new(0), Err(InvalidVid::Zero));
        assert_eq!(Vid::new(InvalidVid::RESERVED), Err(InvalidVid::Reserved));
        assert_eq!(Vid::new(5000), Err(InvalidVid::TooLarge(5000)));
        assert_eq!(Vid::new(1), Ok(Vid::MIN));
        assert_eq!(Vid::new(4094), Ok(Vid::MAX));
        assert_eq!(Vid::new(10).map(u16::from), Ok(10));
    }
}
