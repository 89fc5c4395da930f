// SPDX-License-Identifier: MIT OR Apache-2.0
#![no_std]

pub use self::dfr::*;
pub use self::isar::*;
pub use self::midr::*;
pub use self::mmfr::*;
pub use self::pfr::*;

use bitfield_struct::bitfield;

mod dfr;
mod isar;
mod midr;
mod mmfr;
mod pfr;

/// Identification registers of a PE.
///
/// Registers that are never adjusted field by field are kept as raw values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdRegisters {
    pub id_isar0: u32,
    pub id_isar1: u32,
    pub id_isar2: u32,
    pub id_isar3: u32,
    pub id_isar4: u32,
    pub id_isar5: IdIsar5,
    pub id_isar6: IdIsar6,
    pub id_mmfr0: u32,
    pub id_mmfr1: u32,
    pub id_mmfr2: u32,
    pub id_mmfr3: IdMmfr3,
    pub id_mmfr4: IdMmfr4,
    pub id_pfr0: IdPfr0,
    pub id_pfr1: u32,
    pub id_pfr2: IdPfr2,
    pub id_dfr0: IdDfr0,
    pub mvfr0: u32,
    pub mvfr1: Mvfr1,
    pub mvfr2: u32,
    pub id_aa64isar0: Aa64Isar0,
    pub id_aa64isar1: Aa64Isar1,
    pub id_aa64pfr0: Aa64Pfr0,
    pub id_aa64pfr1: Aa64Pfr1,
    pub id_aa64mmfr0: Aa64Mmfr0,
    pub id_aa64mmfr1: Aa64Mmfr1,
    pub id_aa64mmfr2: Aa64Mmfr2,
    pub id_aa64dfr0: Aa64Dfr0,
    pub dbgdidr: u32,
}

impl IdRegisters {
    /// Returns every register together with its architectural name.
    pub fn entries(&self) -> [(&'static str, u64); 28] {
        [
            ("ID_ISAR0", self.id_isar0.into()),
            ("ID_ISAR1", self.id_isar1.into()),
            ("ID_ISAR2", self.id_isar2.into()),
            ("ID_ISAR3", self.id_isar3.into()),
            ("ID_ISAR4", self.id_isar4.into()),
            ("ID_ISAR5", self.id_isar5.into_bits().into()),
            ("ID_ISAR6", self.id_isar6.into_bits().into()),
            ("ID_MMFR0", self.id_mmfr0.into()),
            ("ID_MMFR1", self.id_mmfr1.into()),
            ("ID_MMFR2", self.id_mmfr2.into()),
            ("ID_MMFR3", self.id_mmfr3.into_bits().into()),
            ("ID_MMFR4", self.id_mmfr4.into_bits().into()),
            ("ID_PFR0", self.id_pfr0.into_bits().into()),
            ("ID_PFR1", self.id_pfr1.into()),
            ("ID_PFR2", self.id_pfr2.into_bits().into()),
            ("ID_DFR0", self.id_dfr0.into_bits().into()),
            ("MVFR0", self.mvfr0.into()),
            ("MVFR1", self.mvfr1.into_bits().into()),
            ("MVFR2", self.mvfr2.into()),
            ("ID_AA64ISAR0_EL1", self.id_aa64isar0.into_bits()),
            ("ID_AA64ISAR1_EL1", self.id_aa64isar1.into_bits()),
            ("ID_AA64PFR0_EL1", self.id_aa64pfr0.into_bits()),
            ("ID_AA64PFR1_EL1", self.id_aa64pfr1.into_bits()),
            ("ID_AA64MMFR0_EL1", self.id_aa64mmfr0.into_bits()),
            ("ID_AA64MMFR1_EL1", self.id_aa64mmfr1.into_bits()),
            ("ID_AA64MMFR2_EL1", self.id_aa64mmfr2.into_bits()),
            ("ID_AA64DFR0_EL1", self.id_aa64dfr0.into_bits()),
            ("DBGDIDR", self.dbgdidr.into()),
        ]
    }
}

/// Represents a value of `PSTATE`.
///
/// This has the same structure as `SPSR_EL1` when exception taken from AArch64 state.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Pstate {
    /// Bit 0 selects `SP_ELx` over `SP_EL0` and bits 3:2 hold the current EL.
    #[bits(4)]
    pub m: u8,
    /// Set when the PE is in AArch32 state.
    pub nrw: bool,
    __: bool,
    pub f: bool,
    pub i: bool,
    pub a: bool,
    pub d: bool,
    #[bits(2)]
    pub btype: u8,
    pub ssbs: bool,
    pub allint: bool,
    #[bits(6)]
    __: u8,
    pub il: bool,
    pub ss: bool,
    pub pan: bool,
    pub uao: bool,
    pub dit: bool,
    pub tco: bool,
    #[bits(2)]
    __: u8,
    pub v: bool,
    pub c: bool,
    pub z: bool,
    pub n: bool,
    #[bits(32)]
    __: u32,
}

impl Pstate {
    pub fn el(&self) -> u8 {
        self.m() >> 2
    }

    /// Returns `true` if the stack pointer of the current EL is selected.
    pub fn sp_elx(&self) -> bool {
        self.m() & 1 != 0
    }
}

/// Represents a value of `CPACR_EL1`.
#[bitfield(u64)]
pub struct Cpacr {
    #[bits(16)]
    __: u16,
    /// SVE trap control. `0b11` means no instructions are trapped.
    #[bits(2)]
    pub zen: u8,
    #[bits(2)]
    __: u8,
    /// Advanced SIMD and floating-point trap control.
    #[bits(2)]
    pub fpen: u8,
    #[bits(6)]
    __: u8,
    pub tta: bool,
    #[bits(35)]
    __: u64,
}

/// Represents a value of `SCR_EL3`.
#[bitfield(u64)]
pub struct Scr {
    pub ns: bool,
    pub irq: bool,
    pub fiq: bool,
    pub ea: bool,
    #[bits(3)]
    __: u8,
    pub smd: bool,
    pub hce: bool,
    pub sif: bool,
    pub rw: bool,
    pub st: bool,
    pub twi: bool,
    pub twe: bool,
    #[bits(50)]
    __: u64,
}
