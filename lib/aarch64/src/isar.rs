// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Represents a value of `ID_AA64ISAR0_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Isar0 {
    #[bits(4)]
    __: u8,
    /// - `0b0001`: AESE, AESD, AESMC and AESIMC.
    /// - `0b0010`: As `0b0001` plus PMULL and PMULL2 on 64-bit data.
    #[bits(4)]
    pub aes: u8,
    #[bits(4)]
    pub sha1: u8,
    /// `0b0010` adds the SHA512 instructions.
    #[bits(4)]
    pub sha2: u8,
    #[bits(4)]
    pub crc32: u8,
    /// `0b0010` means FEAT_LSE.
    #[bits(4)]
    pub atomic: u8,
    #[bits(4)]
    pub tme: u8,
    #[bits(4)]
    pub rdm: u8,
    #[bits(4)]
    pub sha3: u8,
    #[bits(4)]
    pub sm3: u8,
    #[bits(4)]
    pub sm4: u8,
    #[bits(4)]
    pub dp: u8,
    #[bits(4)]
    pub fhm: u8,
    /// `0b0010` means FEAT_FlagM2.
    #[bits(4)]
    pub ts: u8,
    #[bits(4)]
    pub tlb: u8,
    #[bits(4)]
    pub rndr: u8,
}

/// Represents a value of `ID_AA64ISAR1_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Isar1 {
    /// `0b0010` adds DC CVADP.
    #[bits(4)]
    pub dpb: u8,
    /// Address authentication using the QARMA algorithm.
    #[bits(4)]
    pub apa: u8,
    /// Address authentication using an IMPLEMENTATION DEFINED algorithm.
    #[bits(4)]
    pub api: u8,
    #[bits(4)]
    pub jscvt: u8,
    #[bits(4)]
    pub fcma: u8,
    /// `0b0010` means FEAT_LRCPC2.
    #[bits(4)]
    pub lrcpc: u8,
    /// Generic authentication using the QARMA algorithm.
    #[bits(4)]
    pub gpa: u8,
    /// Generic authentication using an IMPLEMENTATION DEFINED algorithm.
    #[bits(4)]
    pub gpi: u8,
    #[bits(4)]
    pub frintts: u8,
    #[bits(4)]
    pub sb: u8,
    #[bits(4)]
    pub specres: u8,
    #[bits(4)]
    pub bf16: u8,
    #[bits(4)]
    pub dgh: u8,
    #[bits(4)]
    pub i8mm: u8,
    #[bits(4)]
    pub xs: u8,
    #[bits(4)]
    pub ls64: u8,
}

/// Represents a value of `ID_ISAR5`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdIsar5 {
    #[bits(4)]
    pub sevl: u8,
    #[bits(4)]
    pub aes: u8,
    #[bits(4)]
    pub sha1: u8,
    #[bits(4)]
    pub sha2: u8,
    #[bits(4)]
    pub crc32: u8,
    #[bits(4)]
    __: u8,
    #[bits(4)]
    pub rdm: u8,
    #[bits(4)]
    pub vcma: u8,
}

/// Represents a value of `ID_ISAR6`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdIsar6 {
    #[bits(4)]
    pub jscvt: u8,
    #[bits(4)]
    pub dp: u8,
    #[bits(4)]
    pub fhm: u8,
    #[bits(4)]
    pub sb: u8,
    #[bits(4)]
    pub specres: u8,
    #[bits(4)]
    pub bf16: u8,
    #[bits(4)]
    pub i8mm: u8,
    #[bits(4)]
    __: u8,
}

/// Represents a value of `MVFR1`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct Mvfr1 {
    #[bits(4)]
    pub fpftz: u8,
    #[bits(4)]
    pub fpdnan: u8,
    #[bits(4)]
    pub simdls: u8,
    #[bits(4)]
    pub simdint: u8,
    #[bits(4)]
    pub simdsp: u8,
    #[bits(4)]
    pub simdhp: u8,
    /// `0b0011` adds half-precision data-processing instructions.
    #[bits(4)]
    pub fphp: u8,
    #[bits(4)]
    pub simdfmac: u8,
}
