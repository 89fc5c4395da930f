// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Represents a value of `ID_AA64PFR0_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Pfr0 {
    /// - `0b0001`: EL0 can be executed in AArch64 state only.
    /// - `0b0010`: EL0 can be executed in either AArch64 or AArch32 state.
    #[bits(4)]
    pub el0: u8,
    #[bits(4)]
    pub el1: u8,
    /// `0b0000` means EL2 is not implemented.
    #[bits(4)]
    pub el2: u8,
    /// `0b0000` means EL3 is not implemented.
    #[bits(4)]
    pub el3: u8,
    /// `0b0000` means floating-point is implemented and `0b0001` adds half-precision support.
    /// `0b1111` means not implemented.
    #[bits(4)]
    pub fp: u8,
    /// Same encoding as `fp`.
    #[bits(4)]
    pub adv_simd: u8,
    #[bits(4)]
    pub gic: u8,
    #[bits(4)]
    pub ras: u8,
    #[bits(4)]
    pub sve: u8,
    #[bits(4)]
    pub sel2: u8,
    #[bits(4)]
    pub mpam: u8,
    #[bits(4)]
    pub amu: u8,
    #[bits(4)]
    pub dit: u8,
    #[bits(4)]
    pub rme: u8,
    #[bits(4)]
    pub csv2: u8,
    #[bits(4)]
    pub csv3: u8,
}

/// Represents a value of `ID_AA64PFR1_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Pfr1 {
    /// Branch target identification.
    #[bits(4)]
    pub bt: u8,
    #[bits(4)]
    pub ssbs: u8,
    /// - `0b0001`: Instruction-only memory tagging.
    /// - `0b0010`: Full memory tagging.
    #[bits(4)]
    pub mte: u8,
    #[bits(4)]
    pub ras_frac: u8,
    #[bits(4)]
    pub mpam_frac: u8,
    #[bits(4)]
    __: u8,
    #[bits(4)]
    pub sme: u8,
    #[bits(4)]
    pub rndr_trap: u8,
    #[bits(4)]
    pub csv2_frac: u8,
    #[bits(4)]
    pub nmi: u8,
    #[bits(24)]
    __: u32,
}

/// Represents a value of `ID_PFR0`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdPfr0 {
    #[bits(4)]
    pub state0: u8,
    #[bits(4)]
    pub state1: u8,
    #[bits(4)]
    pub state2: u8,
    #[bits(4)]
    pub state3: u8,
    #[bits(4)]
    pub csv2: u8,
    #[bits(4)]
    pub amu: u8,
    #[bits(4)]
    pub dit: u8,
    #[bits(4)]
    pub ras: u8,
}

/// Represents a value of `ID_PFR2`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdPfr2 {
    #[bits(4)]
    pub csv3: u8,
    #[bits(4)]
    pub ssbs: u8,
    #[bits(4)]
    pub ras_frac: u8,
    #[bits(20)]
    __: u32,
}
