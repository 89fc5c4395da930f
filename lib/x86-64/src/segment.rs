// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Attributes half of a Segment Descriptor.
///
/// This is the upper 32 bits of the legacy descriptor and is also the form kept in the hidden part
/// of a segment register. See Legacy Segment Descriptors section on AMD64 Architecture
/// Programmer's Manual Volume 2 for more details.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct SegmentAttrs {
    pub base1: u8,
    /// Accessed.
    pub a: bool,
    /// Readable for code segments and writable for data segments.
    pub rw: bool,
    /// Conforming for code segments and expand-down for data segments.
    pub ce: bool,
    /// Code segment.
    pub code: bool,
    /// Set for code or data segments and clear for system segments.
    pub s: bool,
    #[bits(2)]
    pub dpl: Dpl,
    /// Present.
    pub p: bool,
    #[bits(4)]
    pub limit2: u8,
    pub avl: bool,
    /// 64-bit code segment.
    pub l: bool,
    /// Default operand size for code segments and big flag for stack segments.
    pub db: bool,
    /// Limit granularity of 4KB.
    pub g: bool,
    pub base2: u8,
}

/// Raw value of a Segment Selector (e.g. `CS` and `DS` register).
///
/// See Segment Selectors section on AMD64 Architecture Programmer's Manual Volume 2 for more
/// details.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct SegmentSelector {
    #[bits(2)]
    pub rpl: Dpl,
    #[bits(1)]
    pub ti: Ti,
    #[bits(13)]
    pub si: u16,
}

/// Raw value of Descriptor Privilege-Level field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpl {
    Ring0,
    Ring1,
    Ring2,
    Ring3,
}

impl Dpl {
    /// # Panics
    /// If `v` is greater than 3.
    pub const fn from_bits(v: u8) -> Self {
        match v {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            3 => Self::Ring3,
            _ => panic!("invalid value"),
        }
    }

    pub const fn into_bits(self) -> u8 {
        self as _
    }
}

/// Raw value of Table Indicator field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ti {
    Gdt,
    Ldt,
}

impl Ti {
    /// # Panics
    /// If `v` is greater than 1.
    pub const fn from_bits(v: u8) -> Self {
        match v {
            0 => Self::Gdt,
            1 => Self::Ldt,
            _ => panic!("invalid value"),
        }
    }

    pub const fn into_bits(self) -> u8 {
        self as _
    }
}
