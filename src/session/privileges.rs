//! Privilege bitmask attached to every user.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct Privileges: u32 {
        const UNRESTRICTED = 1 << 0;
        const VERIFIED = 1 << 1;
        const SUPPORTER = 1 << 4;
        const PREMIUM = 1 << 5;

        /// Baseline for a registered, unrestricted account
        const NORMAL = Self::UNRESTRICTED.bits() | Self::VERIFIED.bits();
        /// Every bit granted by a paid subscription
        const DONATOR = Self::SUPPORTER.bits() | Self::PREMIUM.bits();
    }
}
