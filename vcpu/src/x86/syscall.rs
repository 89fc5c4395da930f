// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{Gpr, HiddenFlags, SegReg, Vector, X86Cpu};
use tracing::trace;
use x86_64::{Dpl, Rflags, SegmentAttrs, SegmentSelector};

/// `CS` loaded by `SYSCALL` in long mode.
pub const SYSCALL_CS64: SegmentAttrs = SegmentAttrs::new()
    .with_a(true)
    .with_rw(true)
    .with_code(true)
    .with_s(true)
    .with_p(true)
    .with_l(true)
    .with_g(true);

/// `CS` loaded by `SYSCALL` in legacy mode.
pub const SYSCALL_CS32: SegmentAttrs = SegmentAttrs::new()
    .with_a(true)
    .with_rw(true)
    .with_code(true)
    .with_s(true)
    .with_p(true)
    .with_db(true)
    .with_g(true);

/// `SS` loaded by `SYSCALL` in both modes.
pub const SYSCALL_SS: SegmentAttrs = SegmentAttrs::new()
    .with_a(true)
    .with_rw(true)
    .with_s(true)
    .with_p(true)
    .with_db(true)
    .with_g(true);

impl X86Cpu {
    /// Executes `SYSCALL` that is `next_eip_addend` bytes long.
    ///
    /// Queues `#UD` without touching any other state when `EFER.SCE` is clear.
    pub(super) fn syscall(&mut self, next_eip_addend: u64) {
        if !self.efer().sce() {
            self.raise_exception_err(Vector::InvalidOpcode, 0);
            return;
        }

        let sel = self.star.syscall_sel();
        let cs = sel.with_rpl(Dpl::Ring0);
        let ss = SegmentSelector::from_bits(sel.into_bits().wrapping_add(8) & 0xfffc);
        let ret = self.eip.wrapping_add(next_eip_addend);

        if self.hflags.contains(HiddenFlags::LMA) {
            // Target depends on the mode of the caller.
            let code64 = self.hflags.contains(HiddenFlags::CS64);
            let rflags = self.eflags.into_bits();

            self.set_reg(Gpr::Rcx, ret);
            self.set_reg(Gpr::R11, rflags & !Rflags::RF);
            self.eflags =
                Rflags::from_bits(rflags & !(self.fmask | Rflags::RF)).with_reserved(true);
            self.load_seg_cache(SegReg::Cs, cs, 0, u32::MAX, SYSCALL_CS64);
            self.load_seg_cache(SegReg::Ss, ss, 0, u32::MAX, SYSCALL_SS);
            self.eip = if code64 { self.lstar } else { self.cstar };
        } else {
            let rflags = self.eflags.into_bits();

            self.set_reg(Gpr::Rcx, ret as u32 as u64);
            self.eflags = Rflags::from_bits(rflags & !(Rflags::IF | Rflags::RF | Rflags::VM));
            self.load_seg_cache(SegReg::Cs, cs, 0, u32::MAX, SYSCALL_CS32);
            self.load_seg_cache(SegReg::Ss, ss, 0, u32::MAX, SYSCALL_SS);
            self.eip = self.star.syscall_eip().into();
        }

        trace!(eip = self.eip, cs = cs.into_bits(), "SYSCALL");
    }
}
