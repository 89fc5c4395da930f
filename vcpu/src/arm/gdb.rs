// SPDX-License-Identifier: MIT OR Apache-2.0
use super::ArmCpu;
use aarch64::Pstate;

pub type GdbRegs = gdbstub_arch::aarch64::reg::AArch64CoreRegs;

impl ArmCpu {
    /// Returns the registers described by `aarch64-core.xml` and the FP/SIMD registers.
    pub fn gdb_regs(&self) -> GdbRegs {
        let mut regs = GdbRegs::default();

        regs.x.copy_from_slice(&self.xregs[..31]);
        regs.sp = self.xregs[31];
        regs.pc = self.pc;
        regs.cpsr = self.pstate.into_bits() as u32;
        regs.fpcr = self.fpcr;
        regs.fpsr = self.fpsr;

        for (v, z) in regs.v.iter_mut().zip(&self.zregs) {
            *v = u128::from(z[0]) | (u128::from(z[1]) << 64);
        }

        regs
    }

    pub fn set_gdb_regs(&mut self, regs: &GdbRegs) {
        self.xregs[..31].copy_from_slice(&regs.x);
        self.xregs[31] = regs.sp;
        self.pc = regs.pc;
        self.set_pstate(regs.cpsr);
        self.fpcr = regs.fpcr;
        self.fpsr = regs.fpsr;

        for (z, v) in self.zregs.iter_mut().zip(regs.v) {
            z[0] = v as u64;
            z[1] = (v >> 64) as u64;
        }
    }

    /// Appends core register `n` to `buf` in target byte order.
    ///
    /// Returns the number of bytes appended, which is zero if `n` is not a core register.
    pub fn gdb_read_register(&self, buf: &mut Vec<u8>, n: usize) -> usize {
        match n {
            0..32 => buf.extend_from_slice(&self.xregs[n].to_le_bytes()),
            32 => buf.extend_from_slice(&self.pc.to_le_bytes()),
            33 => buf.extend_from_slice(&(self.pstate.into_bits() as u32).to_le_bytes()),
            _ => return 0,
        }

        if n == 33 { 4 } else { 8 }
    }

    /// Returns the number of bytes consumed from `buf` or zero if `n` is not a core register.
    pub fn gdb_write_register(&mut self, buf: &[u8], n: usize) -> usize {
        let Some(len) = Self::gdb_reg_len(n) else {
            return 0;
        };
        let Some(bytes) = buf.get(..len) else {
            return 0;
        };
        let mut raw = [0; 8];

        raw[..len].copy_from_slice(bytes);

        let v = u64::from_le_bytes(raw);

        match n {
            0..32 => self.xregs[n] = v,
            32 => self.pc = v,
            _ => self.set_pstate(v as u32),
        }

        len
    }

    fn gdb_reg_len(n: usize) -> Option<usize> {
        match n {
            0..33 => Some(8),
            33 => Some(4),
            _ => None,
        }
    }

    /// Only the low 32 bits of `PSTATE` are visible through `CPSR`.
    fn set_pstate(&mut self, cpsr: u32) {
        let high = self.pstate.into_bits() & !u64::from(u32::MAX);

        self.pstate = Pstate::from_bits(high | u64::from(cpsr));
    }
}
