// SPDX-License-Identifier: MIT OR Apache-2.0
use aarch64::{IdRegisters, Midr};

/// Features available on a host PE.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CpuFeats {
    /// Target type the backend will create vCPUs with (e.g. `KVM_ARM_TARGET_GENERIC_V8`).
    pub target: Option<u32>,
    /// Device tree `compatible` of the host PE.
    pub dtb_compatible: &'static str,
    pub midr: Midr,
    /// Raw value of `REVIDR_EL1`.
    pub revidr: u64,
    pub isar: IdRegisters,
    pub el2: bool,
    pub el3: bool,
    pub pmu: bool,
}
