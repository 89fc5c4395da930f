// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::SegmentSelector;
use bitfield_struct::bitfield;

/// Raw value of `EFER` register.
///
/// See Extended Feature Enable Register (EFER) section on AMD64 Architecture Programmer's Manual
/// Volume 2 for more details.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Efer {
    /// System call extensions. `SYSCALL` raises `#UD` when this is clear.
    pub sce: bool,
    #[bits(7)]
    __: u8,
    pub lme: bool,
    __: bool,
    /// Long mode active. Read-only from the guest point of view.
    pub lma: bool,
    pub nxe: bool,
    pub svme: bool,
    pub lmsle: bool,
    pub ffxsr: bool,
    pub tce: bool,
    __: bool,
    pub mcommit: bool,
    pub intwb: bool,
    __: bool,
    pub uaie: bool,
    pub aibrse: bool,
    #[bits(42)]
    __: u64,
}

/// Raw value of `STAR` register.
///
/// See SYSCALL and SYSRET section on AMD64 Architecture Programmer's Manual Volume 2 for more
/// details.
#[bitfield(u64)]
pub struct Star {
    /// Target of `SYSCALL` in legacy mode.
    pub syscall_eip: u32,
    /// `CS` selector to load on `SYSCALL`. `SS` is this value plus 8.
    #[bits(16)]
    pub syscall_sel: SegmentSelector,
    #[bits(16)]
    pub sysret_sel: SegmentSelector,
}
