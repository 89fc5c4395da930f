// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Represents a value of `MIDR_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Midr {
    #[bits(4)]
    pub revision: u8,
    #[bits(12)]
    pub part_num: u16,
    /// `0b1111` means the architecture is defined by the ID registers.
    #[bits(4)]
    pub architecture: u8,
    #[bits(4)]
    pub variant: u8,
    pub implementer: u8,
    #[bits(32)]
    __: u32,
}
