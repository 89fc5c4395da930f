// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{ArmCpu, ArmFeatures};
use bitflags::bitflags;
use std::fmt::{Result, Write};

bitflags! {
    /// Optional parts of [`ArmCpu::dump_state()`].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct DumpFlags: u32 {
        /// Include FP/SIMD and SVE registers.
        const FPU = 1 << 1;
    }
}

impl ArmCpu {
    /// Writes a human-readable snapshot of the AArch64 registers to `f`.
    ///
    /// Vector and predicate registers are printed with the vector length in effect at the current
    /// EL.
    pub fn dump_state(&self, f: &mut impl Write, flags: DumpFlags) -> Result {
        let psr = self.pstate.into_bits() as u32;
        let el = self.current_el();

        write!(f, " PC={:016x} ", self.pc)?;

        for (i, v) in self.xregs.iter().enumerate() {
            if i == 31 {
                writeln!(f, " SP={v:016x}")?;
            } else {
                let sep = if (i + 2) % 3 != 0 { " " } else { "\n" };

                write!(f, "X{i:02}={v:016x}{sep}")?;
            }
        }

        let secure = self.features.contains(ArmFeatures::EL3) && el != 3;
        let ns = match (secure, self.scr_el3.ns()) {
            (true, true) => "NS ",
            (true, false) => "S ",
            (false, _) => "",
        };

        write!(
            f,
            "PSTATE={psr:08x} {}{}{}{} {ns}EL{el}{}",
            if self.pstate.n() { 'N' } else { '-' },
            if self.pstate.z() { 'Z' } else { '-' },
            if self.pstate.c() { 'C' } else { '-' },
            if self.pstate.v() { 'V' } else { '-' },
            if self.pstate.sp_elx() { 'h' } else { 't' },
        )?;

        if self.isar.id_aa64pfr1.bt() != 0 {
            write!(f, "  BTYPE={}", self.pstate.btype())?;
        }

        if !flags.contains(DumpFlags::FPU) {
            return writeln!(f);
        }

        if self.fp_trapped(el) {
            return writeln!(f, "    FPU disabled");
        }

        writeln!(f, "     FPCR={:08x} FPSR={:08x}", self.fpcr, self.fpsr)?;

        if self.isar.id_aa64pfr0.sve() != 0 && !self.sve_trapped(el) {
            self.dump_sve(f, self.sve_zcr_len(el) as usize)
        } else {
            self.dump_simd(f)
        }
    }

    fn dump_sve(&self, f: &mut impl Write, zcr_len: usize) -> Result {
        for (i, p) in self.pregs.iter().enumerate() {
            let eol = if i == Self::FFR {
                // It's last, so end the line.
                write!(f, "FFR=")?;
                true
            } else {
                write!(f, "P{i:02}=")?;

                match zcr_len {
                    0 => i % 8 == 7,
                    1 => i % 6 == 5,
                    2 | 3 => i % 3 == 2,
                    _ => true, // More than one quadword per predicate.
                }
            };

            for j in (0..=zcr_len / 4).rev() {
                let digits = if j * 4 + 4 <= zcr_len + 1 {
                    16
                } else {
                    (zcr_len % 4 + 1) * 4
                };
                let sep = match (j, eol) {
                    (0, true) => "\n",
                    (0, false) => " ",
                    _ => ":",
                };

                write!(f, "{:0digits$x}{sep}", p[j])?;
            }
        }

        for (i, z) in self.zregs.iter().enumerate() {
            match zcr_len {
                0 => {
                    let sep = if i & 1 != 0 { "\n" } else { " " };

                    write!(f, "Z{i:02}={:016x}:{:016x}{sep}", z[1], z[0])?;
                }
                1 => writeln!(
                    f,
                    "Z{i:02}={:016x}:{:016x}:{:016x}:{:016x}",
                    z[3], z[2], z[1], z[0]
                )?,
                _ => {
                    for j in (0..=zcr_len).rev() {
                        let odd = (zcr_len - j) % 2 != 0;

                        if j == zcr_len {
                            write!(f, "Z{i:02}[{:x}-{:x}]=", j, j - 1)?;
                        } else if !odd {
                            if j > 0 {
                                write!(f, "   [{:x}-{:x}]=", j, j - 1)?;
                            } else {
                                write!(f, "     [{j:x}]=")?;
                            }
                        }

                        let sep = if odd || j == 0 { "\n" } else { ":" };

                        write!(f, "{:016x}:{:016x}{sep}", z[j * 2 + 1], z[j * 2])?;
                    }
                }
            }
        }

        Ok(())
    }

    fn dump_simd(&self, f: &mut impl Write) -> Result {
        for (i, q) in self.zregs.iter().enumerate() {
            let sep = if i & 1 != 0 { "\n" } else { " " };

            write!(f, "Q{i:02}={:016x}:{:016x}{sep}", q[1], q[0])?;
        }

        Ok(())
    }
}
