// SPDX-License-Identifier: MIT OR Apache-2.0
//! Architectural state of emulated CPUs.
//!
//! [`arm`] contains the catalog of AArch64 CPU models and [`x86`] contains delivery of
//! interrupts, exceptions and system calls on x86.
pub use self::accel::*;

mod accel;
pub mod arm;
pub mod x86;
