// SPDX-License-Identifier: MIT OR Apache-2.0
//! Delivery of system calls, exceptions and interrupts on x86.
//!
//! Only the architectural state that delivery touches is modeled here. Building the actual IDT
//! frame and the `#VMEXIT` world switch are left to an [`InterruptHandler`].
pub use self::excp::*;
pub use self::gdb::*;
pub use self::interrupt::*;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use x86_64::{Cr0, Dpl, Efer, Rflags, SegmentAttrs, SegmentSelector, Star};

mod excp;
mod gdb;
mod interrupt;
mod seg;
mod syscall;

/// Architectural state of an x86 PE.
#[derive(Debug, Clone)]
pub struct X86Cpu {
    /// General purpose registers indexed by [`Gpr`].
    pub regs: [u64; 16],
    pub eip: u64,
    pub eflags: Rflags,
    pub hflags: HiddenFlags,
    pub cpl: Dpl,
    pub cr0: Cr0,
    efer: Efer,
    pub star: Star,
    pub lstar: u64,
    pub cstar: u64,
    pub fmask: u64,
    /// Hidden part of segment registers indexed by [`SegReg`].
    pub segs: [SegmentCache; 6],
    /// Event to be delivered with [`Event::Exception`].
    pub pending: Option<PendingEvent>,
    /// Exception being delivered when another one was raised. Used to detect double faults.
    pub old_exception: Option<u8>,
    /// Present when running a nested guest.
    pub nested: Option<NestedGuest>,
    /// Triple fault outside of a nested guest.
    pub shutdown: bool,
}

impl X86Cpu {
    /// Creates a PE in the state after `RESET`.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: [0; 16],
            eip: 0xfff0,
            eflags: Rflags::new().with_reserved(true),
            hflags: HiddenFlags::empty(),
            cpl: Dpl::Ring0,
            cr0: Cr0::new().with_et(true).with_nw(true).with_cd(true),
            efer: Efer::new(),
            star: Star::new(),
            lstar: 0,
            cstar: 0,
            fmask: 0,
            segs: [SegmentCache::default(); 6],
            pending: None,
            old_exception: None,
            nested: None,
            shutdown: false,
        };

        // Data segments: present, writable and accessed.
        let data = SegmentAttrs::new()
            .with_a(true)
            .with_rw(true)
            .with_s(true)
            .with_p(true);

        for seg in [SegReg::Es, SegReg::Ss, SegReg::Ds, SegReg::Fs, SegReg::Gs] {
            cpu.load_seg_cache(seg, SegmentSelector::new(), 0, 0xffff, data);
        }

        cpu.load_seg_cache(
            SegReg::Cs,
            SegmentSelector::from_bits(0xf000),
            0xffff0000,
            0xffff,
            data.with_code(true),
        );

        cpu
    }

    pub fn reg(&self, r: Gpr) -> u64 {
        self.regs[usize::from(r)]
    }

    pub fn set_reg(&mut self, r: Gpr, v: u64) {
        self.regs[usize::from(r)] = v;
    }

    pub fn seg(&self, r: SegReg) -> &SegmentCache {
        &self.segs[usize::from(r)]
    }

    pub fn efer(&self) -> Efer {
        self.efer
    }

    /// Also updates [`HiddenFlags::LMA`].
    pub fn set_efer(&mut self, v: Efer) {
        self.efer = v;
        self.hflags.set(HiddenFlags::LMA, v.lma());
    }

    pub fn in_nested_guest(&self) -> bool {
        self.nested.is_some()
    }
}

impl Default for X86Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// General purpose register.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum Gpr {
    Rax,
    Rcx,
    Rdx,
    Rbx,
    Rsp,
    Rbp,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

/// Segment register.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum SegReg {
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
}

/// Hidden part of a segment register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCache {
    pub selector: SegmentSelector,
    pub base: u64,
    pub limit: u32,
    pub flags: SegmentAttrs,
}

bitflags! {
    /// State derived from other registers that the translator keys on.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct HiddenFlags: u32 {
        /// 32-bit code segment.
        const CS32 = 1 << 4;
        /// 32-bit stack segment.
        const SS32 = 1 << 5;
        /// At least one of `DS`, `ES` or `SS` has a non-zero base.
        const ADDSEG = 1 << 6;
        /// Long mode active.
        const LMA = 1 << 14;
        /// 64-bit code segment.
        const CS64 = 1 << 15;
    }
}

/// Architectural exception vector.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum Vector {
    DivideError = 0,
    DebugException = 1,
    Nmi = 2,
    Breakpoint = 3,
    Overflow = 4,
    BoundRange = 5,
    InvalidOpcode = 6,
    DeviceNotAvailable = 7,
    DoubleFault = 8,
    CoprocessorSegmentOverrun = 9,
    InvalidTss = 10,
    SegmentNotPresent = 11,
    StackFault = 12,
    GeneralProtection = 13,
    PageFault = 14,
    X87FloatingPoint = 16,
    AlignmentCheck = 17,
    MachineCheck = 18,
    SimdFloatingPoint = 19,
}

impl Vector {
    /// Returns `true` if an exception with vector `v` pushes an error code.
    pub fn has_error_code(v: u8) -> bool {
        matches!(
            Self::try_from(v),
            Ok(Self::DoubleFault
                | Self::InvalidTss
                | Self::SegmentNotPresent
                | Self::StackFault
                | Self::GeneralProtection
                | Self::PageFault
                | Self::AlignmentCheck)
        )
    }

    /// Returns `true` if this vector is a contributory exception.
    fn is_contributory(v: u8) -> bool {
        matches!(
            Self::try_from(v),
            Ok(Self::DivideError
                | Self::InvalidTss
                | Self::SegmentNotPresent
                | Self::StackFault
                | Self::GeneralProtection)
        )
    }
}

/// Event recorded for the next [`Event::Exception`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEvent {
    /// Vector or [`VMEXIT_BASE`] plus the exit code.
    pub index: u32,
    /// Raised by `INTn`, `INT3` or `INTO`.
    pub is_int: bool,
    /// Error code of the exception or `EXITINFO1` of the `#VMEXIT`.
    pub error_code: u32,
    /// Address of the instruction following the one that raised the event.
    pub next_eip: u64,
}

impl PendingEvent {
    pub fn is_vmexit(&self) -> bool {
        self.index >= VMEXIT_BASE
    }
}

/// Nested guest that is currently running.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NestedGuest {
    /// Guest physical address of the VMCB.
    pub vmcb: u64,
    /// Bit `n` set means exception vector `n` causes `#VMEXIT`.
    pub intercept_exceptions: u32,
    /// `INTn` causes `#VMEXIT`.
    pub intercept_intn: bool,
}
