// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{SegReg, X86Cpu};
use x86_64::{Rflags, SegmentSelector};

pub type GdbRegs = gdbstub_arch::x86::reg::X86_64CoreRegs;

/// Index into [`X86Cpu::regs`] for each GPR in the order of `64bit-core.xml`.
const GPR_MAP: [usize; 16] = [0, 3, 1, 2, 6, 7, 5, 4, 8, 9, 10, 11, 12, 13, 14, 15];

impl X86Cpu {
    pub fn gdb_regs(&self) -> GdbRegs {
        let mut regs = GdbRegs::default();
        let sel = |r| u32::from(self.seg(r).selector.into_bits());

        for (dst, &src) in regs.regs.iter_mut().zip(&GPR_MAP) {
            *dst = self.regs[src];
        }

        regs.eflags = self.eflags.into_bits() as u32;
        regs.rip = self.eip;
        regs.segments.cs = sel(SegReg::Cs);
        regs.segments.ss = sel(SegReg::Ss);
        regs.segments.ds = sel(SegReg::Ds);
        regs.segments.es = sel(SegReg::Es);
        regs.segments.fs = sel(SegReg::Fs);
        regs.segments.gs = sel(SegReg::Gs);

        regs
    }

    /// Segment selectors are written as is without reloading the hidden part.
    pub fn set_gdb_regs(&mut self, regs: &GdbRegs) {
        for (&src, &dst) in regs.regs.iter().zip(&GPR_MAP) {
            self.regs[dst] = src;
        }

        self.eflags = Rflags::from_bits(regs.eflags.into()).with_reserved(true);
        self.eip = regs.rip;

        let s = &regs.segments;

        for (r, v) in [
            (SegReg::Cs, s.cs),
            (SegReg::Ss, s.ss),
            (SegReg::Ds, s.ds),
            (SegReg::Es, s.es),
            (SegReg::Fs, s.fs),
            (SegReg::Gs, s.gs),
        ] {
            self.segs[usize::from(r)].selector = SegmentSelector::from_bits(v as u16);
        }
    }
}
