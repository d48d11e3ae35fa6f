/*++

Licensed under the Apache-2.0 license.

File Name:

    guard.rs

Abstract:

    File contains the secure region membership predicate.

--*/

use super::config::SecureRegionConfig;
use smz_emu_types::RvAddr;

/// Decides whether an access falls inside the secure region.
pub struct AddressRangeGuard;

impl AddressRangeGuard {
    /// Returns true if `addr` lies in `[cfg.base, cfg.base + cfg.size)` and
    /// the region is enabled.
    ///
    /// The upper bound is computed as an offset from `base`, so a region
    /// reaching past the top of the address space is clipped instead of
    /// wrapping around to low addresses.
    #[inline]
    pub fn contains(addr: RvAddr, cfg: &SecureRegionConfig) -> bool {
        cfg.enabled && addr >= cfg.base && addr - cfg.base < cfg.size
    }
}
