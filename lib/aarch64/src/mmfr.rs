// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Represents a value of `ID_AA64MMFR0_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Mmfr0 {
    /// Physical Address range supported.
    ///
    /// - `0b0000`: 32 bits, 4GB.
    /// - `0b0001`: 36 bits, 64GB.
    /// - `0b0010`: 40 bits, 1TB.
    /// - `0b0011`: 42 bits, 4TB.
    /// - `0b0100`: 44 bits, 16TB.
    /// - `0b0101`: 48 bits, 256TB.
    /// - `0b0110`: 52 bits, 4PB.
    #[bits(4)]
    pub pa_range: u8,
    /// - `0b0000`: 8 bits.
    /// - `0b0010`: 16 bits.
    #[bits(4)]
    pub asid_bits: u8,
    #[bits(4)]
    pub big_end: u8,
    #[bits(4)]
    pub sns_mem: u8,
    #[bits(4)]
    pub big_end_el0: u8,
    #[bits(4)]
    pub t_gran16: u8,
    /// `0b0000` means supported and `0b1111` means not supported.
    #[bits(4)]
    pub t_gran64: u8,
    /// `0b0000` means supported and `0b1111` means not supported.
    #[bits(4)]
    pub t_gran4: u8,
    #[bits(4)]
    pub t_gran16_2: u8,
    #[bits(4)]
    pub t_gran64_2: u8,
    #[bits(4)]
    pub t_gran4_2: u8,
    #[bits(4)]
    pub exs: u8,
    __: u8,
    #[bits(4)]
    pub fgt: u8,
    #[bits(4)]
    pub ecv: u8,
}

/// Represents a value of `ID_AA64MMFR1_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Mmfr1 {
    #[bits(4)]
    pub hafdbs: u8,
    /// `0b0010` means 16 bits.
    #[bits(4)]
    pub vmid_bits: u8,
    /// Virtualization Host Extensions.
    #[bits(4)]
    pub vh: u8,
    /// Hierarchical Permission Disables.
    #[bits(4)]
    pub hpds: u8,
    /// LORegions.
    #[bits(4)]
    pub lo: u8,
    /// `0b0010` adds AT S1E1RP and AT S1E1WP.
    #[bits(4)]
    pub pan: u8,
    #[bits(4)]
    pub spec_sei: u8,
    /// Stage 2 control of execute-never for EL0 and EL1 independently.
    #[bits(4)]
    pub xnx: u8,
    #[bits(4)]
    pub twed: u8,
    #[bits(4)]
    pub ets: u8,
    #[bits(4)]
    pub hcx: u8,
    #[bits(4)]
    pub afp: u8,
    #[bits(4)]
    pub n_tlbpa: u8,
    #[bits(4)]
    pub tidcp1: u8,
    #[bits(4)]
    pub cmow: u8,
    #[bits(4)]
    pub ecbhb: u8,
}

/// Represents a value of `ID_AA64MMFR2_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Mmfr2 {
    /// Common not Private translations.
    #[bits(4)]
    pub cnp: u8,
    /// User Access Override.
    #[bits(4)]
    pub uao: u8,
    #[bits(4)]
    pub lsm: u8,
    #[bits(4)]
    pub iesb: u8,
    #[bits(4)]
    pub va_range: u8,
    #[bits(4)]
    pub ccidx: u8,
    #[bits(4)]
    pub nv: u8,
    /// Small translation tables.
    #[bits(4)]
    pub st: u8,
    #[bits(4)]
    pub at: u8,
    #[bits(4)]
    pub ids: u8,
    #[bits(4)]
    pub fwb: u8,
    #[bits(4)]
    __: u8,
    #[bits(4)]
    pub ttl: u8,
    #[bits(4)]
    pub bbm: u8,
    #[bits(4)]
    pub evt: u8,
    #[bits(4)]
    pub e0pd: u8,
}

/// Represents a value of `ID_MMFR3`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdMmfr3 {
    #[bits(4)]
    pub cmaint_va: u8,
    #[bits(4)]
    pub cmaint_sw: u8,
    #[bits(4)]
    pub bp_maint: u8,
    #[bits(4)]
    pub maint_bcst: u8,
    #[bits(4)]
    pub pan: u8,
    #[bits(4)]
    pub coh_walk: u8,
    #[bits(4)]
    pub cmem_sz: u8,
    #[bits(4)]
    pub supersec: u8,
}

/// Represents a value of `ID_MMFR4`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdMmfr4 {
    #[bits(4)]
    pub spec_sei: u8,
    /// `ACTLR2` and `HACTLR2`.
    #[bits(4)]
    pub ac2: u8,
    #[bits(4)]
    pub xnx: u8,
    #[bits(4)]
    pub cnp: u8,
    #[bits(4)]
    pub hpds: u8,
    #[bits(4)]
    pub lsm: u8,
    #[bits(4)]
    pub ccidx: u8,
    #[bits(4)]
    pub evt: u8,
}
