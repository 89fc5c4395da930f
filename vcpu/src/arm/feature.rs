// SPDX-License-Identifier: MIT OR Apache-2.0
use bitflags::bitflags;

bitflags! {
    /// Optional architectural behaviors exposed by a CPU model.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArmFeatures: u32 {
        const V8 = 1 << 0;
        const NEON = 1 << 1;
        const GENERIC_TIMER = 1 << 2;
        /// AArch64 execution state.
        const AARCH64 = 1 << 3;
        /// `CBAR` is read-only.
        const CBAR_RO = 1 << 4;
        const EL2 = 1 << 5;
        const EL3 = 1 << 6;
        const PMU = 1 << 7;
    }
}

impl ArmFeatures {
    /// Features every ARMv8-A model built by this crate starts with.
    pub const V8_BASE: Self = Self::V8
        .union(Self::NEON)
        .union(Self::GENERIC_TIMER)
        .union(Self::AARCH64);
}
