// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Offset of `EVENTINJ` within the VMCB.
pub const VMCB_EVENT_INJ: u64 = 0xa8;

/// Offset of the error code half of `EVENTINJ` within the VMCB.
pub const VMCB_EVENT_INJ_ERR: u64 = 0xac;

/// `#VMEXIT` code for an intercepted exception. The vector is added to this value.
pub const SVM_EXIT_EXCP_BASE: u32 = 0x40;

/// `#VMEXIT` code for an intercepted `INTn` instruction.
pub const SVM_EXIT_SWINT: u32 = 0x75;

/// `#VMEXIT` code for a shutdown condition (e.g. triple fault).
pub const SVM_EXIT_SHUTDOWN: u32 = 0x7f;

/// Raw value of the low half of `EVENTINJ`.
///
/// See Event Injection section on AMD64 Architecture Programmer's Manual Volume 2 for more
/// details.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct EventInj {
    pub vector: u8,
    #[bits(3)]
    pub ty: EventType,
    /// The error code in [`VMCB_EVENT_INJ_ERR`] is valid.
    pub ev: bool,
    #[bits(19)]
    __: u32,
    /// The event is pending injection.
    pub v: bool,
}

/// Type of injected event.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Intr,
    Reserved1,
    Nmi,
    Exception,
    Soft,
    Reserved5,
    Reserved6,
    Reserved7,
}

impl EventType {
    /// # Panics
    /// If `v` is greater than 7.
    pub const fn from_bits(v: u8) -> Self {
        match v {
            0 => Self::Intr,
            1 => Self::Reserved1,
            2 => Self::Nmi,
            3 => Self::Exception,
            4 => Self::Soft,
            5 => Self::Reserved5,
            6 => Self::Reserved6,
            7 => Self::Reserved7,
            _ => panic!("invalid value"),
        }
    }

    pub const fn into_bits(self) -> u8 {
        self as _
    }
}
