// SPDX-License-Identifier: MIT OR Apache-2.0
#![no_std]

pub use self::msr::*;
pub use self::segment::*;
pub use self::svm::*;

use bitfield_struct::bitfield;

mod msr;
mod segment;
mod svm;

/// Represents a value of `RFLAGS`.
///
/// See RFLAGS Register section on AMD64 Architecture Programmer's Manual Volume 2 for more details.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Rflags {
    pub cf: bool,
    /// Always reads as one.
    pub reserved: bool,
    pub pf: bool,
    __: bool,
    pub af: bool,
    __: bool,
    pub zf: bool,
    pub sf: bool,
    pub tf: bool,
    pub r#if: bool,
    pub df: bool,
    pub of: bool,
    #[bits(2)]
    pub iopl: u8,
    pub nt: bool,
    __: bool,
    pub rf: bool,
    pub vm: bool,
    pub ac: bool,
    pub vif: bool,
    pub vip: bool,
    pub id: bool,
    #[bits(42)]
    __: u64,
}

impl Rflags {
    pub const RF: u64 = 1 << 16;
    pub const VM: u64 = 1 << 17;
    pub const IF: u64 = 1 << 9;
}

/// Represents a value of `CR0`.
///
/// See CR0 Register section on AMD64 Architecture Programmer's Manual Volume 2 for more details.
#[bitfield(u64)]
pub struct Cr0 {
    /// Protected mode enable.
    pub pe: bool,
    pub mp: bool,
    pub em: bool,
    pub ts: bool,
    pub et: bool,
    pub ne: bool,
    #[bits(10)]
    __: u16,
    pub wp: bool,
    __: bool,
    pub am: bool,
    #[bits(10)]
    __: u16,
    pub nw: bool,
    pub cd: bool,
    pub pg: bool,
    __: u32,
}
