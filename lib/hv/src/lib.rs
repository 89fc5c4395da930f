// SPDX-License-Identifier: MIT OR Apache-2.0
pub use self::cpu::*;

use std::io::Error;
use thiserror::Error;

mod cpu;

/// Underlying hardware virtualization backend (e.g. KVM on Linux).
///
/// Only the parts that a CPU model needs are exposed here. Creating VMs and running vCPUs is the
/// job of the VMM.
pub trait Hypervisor {
    /// Reads identification state of the host PE as seen by a guest.
    fn cpu_features(&self) -> Result<CpuFeats, HostError>;

    /// Returns `true` if the host can run EL1 in AArch32 state.
    fn aarch32_el1_supported(&self) -> bool;
}

/// Physical memory of a guest.
///
/// All accesses are little-endian. Writes must become visible to the guest in the same order they
/// were issued.
pub trait GuestMemory {
    fn read_u32(&self, addr: u64) -> u32;
    fn write_u32(&mut self, addr: u64, v: u32);
}

/// Represents an error when [`Hypervisor::cpu_features()`] fails.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("couldn't read {0}")]
    ReadRegisterFailed(&'static str, #[source] Error),

    #[error("host PE does not support AArch64 guests")]
    NoAarch64,
}
