// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{HiddenFlags, SegReg, SegmentCache, X86Cpu};
use x86_64::{SegmentAttrs, SegmentSelector};

impl X86Cpu {
    /// Loads the hidden part of segment register `seg` and updates the flags derived from it.
    ///
    /// Loading `SS` also sets CPL to the DPL of the new stack segment.
    pub fn load_seg_cache(
        &mut self,
        seg: SegReg,
        selector: SegmentSelector,
        base: u64,
        limit: u32,
        flags: SegmentAttrs,
    ) {
        self.segs[usize::from(seg)] = SegmentCache {
            selector,
            base,
            limit,
            flags,
        };

        match seg {
            SegReg::Cs if self.hflags.contains(HiddenFlags::LMA) && flags.l() => {
                self.hflags |= HiddenFlags::CS32 | HiddenFlags::SS32 | HiddenFlags::CS64;
            }
            SegReg::Cs => {
                self.hflags.remove(HiddenFlags::CS64);
                self.hflags.set(HiddenFlags::CS32, flags.db());
            }
            SegReg::Ss => self.cpl = flags.dpl(),
            _ => {}
        }

        let ss32 = self.seg(SegReg::Ss).flags.db();
        let addseg = if self.hflags.contains(HiddenFlags::CS64) {
            // Base of DS, ES and SS is always zero in 64-bit mode.
            false
        } else if !self.cr0.pe() || self.eflags.vm() || !self.hflags.contains(HiddenFlags::CS32) {
            // Real mode and virtual-8086 mode only update base and selector.
            true
        } else {
            let base = |r| self.seg(r).base;

            base(SegReg::Ds) | base(SegReg::Es) | base(SegReg::Ss) != 0
        };

        self.hflags.set(HiddenFlags::SS32, ss32);
        self.hflags.set(HiddenFlags::ADDSEG, addseg);
    }
}
