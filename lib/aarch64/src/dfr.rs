// SPDX-License-Identifier: MIT OR Apache-2.0
use bitfield_struct::bitfield;

/// Represents a value of `ID_AA64DFR0_EL1`.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct Aa64Dfr0 {
    #[bits(4)]
    pub debug_ver: u8,
    #[bits(4)]
    pub trace_ver: u8,
    /// - `0b0001`: PMUv3.
    /// - `0b0100`: PMUv3 for Armv8.1.
    /// - `0b0101`: PMUv3 for Armv8.4.
    /// - `0b1111`: IMPLEMENTATION DEFINED form of performance monitors.
    #[bits(4)]
    pub pmu_ver: u8,
    /// Number of breakpoints minus 1.
    #[bits(4)]
    pub brps: u8,
    #[bits(4)]
    __: u8,
    /// Number of watchpoints minus 1.
    #[bits(4)]
    pub wrps: u8,
    #[bits(4)]
    __: u8,
    #[bits(4)]
    pub ctx_cmps: u8,
    #[bits(4)]
    pub pms_ver: u8,
    #[bits(4)]
    pub double_lock: u8,
    #[bits(4)]
    pub trace_filt: u8,
    #[bits(4)]
    pub trbe: u8,
    #[bits(4)]
    pub mtpmu: u8,
    #[bits(12)]
    __: u16,
}

/// Represents a value of `ID_DFR0`.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct IdDfr0 {
    #[bits(4)]
    pub cop_dbg: u8,
    #[bits(4)]
    pub cop_sdbg: u8,
    #[bits(4)]
    pub mmap_dbg: u8,
    #[bits(4)]
    pub cop_trc: u8,
    #[bits(4)]
    pub mmap_trc: u8,
    #[bits(4)]
    pub mprof_dbg: u8,
    /// Same encoding as `ID_AA64DFR0_EL1.PMUVer`.
    #[bits(4)]
    pub perf_mon: u8,
    #[bits(4)]
    pub trace_filt: u8,
}
