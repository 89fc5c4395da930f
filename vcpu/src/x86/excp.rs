// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{PendingEvent, Vector, X86Cpu};
use tracing::{trace, warn};
use x86_64::{SVM_EXIT_EXCP_BASE, SVM_EXIT_SHUTDOWN, SVM_EXIT_SWINT};

/// [`PendingEvent::index`] at or above this value is a `#VMEXIT` from the nested guest.
pub const VMEXIT_BASE: u32 = 0x100;

impl X86Cpu {
    /// Records exception `vector` to be delivered with [`super::Event::Exception`].
    ///
    /// The exception may turn into a `#VMEXIT` if the nested guest intercepts it, or into a
    /// double fault if it was raised while delivering another exception.
    pub fn raise_exception_err(&mut self, vector: Vector, error_code: u32) {
        self.raise_interrupt2(vector.into(), false, error_code, 0);
    }

    /// Records software interrupt `intno` raised by an instruction that is `next_eip_addend` bytes
    /// long.
    pub fn raise_interrupt(&mut self, intno: u8, next_eip_addend: u64) {
        self.raise_interrupt2(intno, true, 0, next_eip_addend);
    }

    /// Records `#VMEXIT` with `exit_code` to be performed by the next
    /// [`super::Event::Exception`].
    pub fn vmexit(&mut self, exit_code: u32, exit_info_1: u32) {
        trace!(exit_code, exit_info_1, "#VMEXIT pending");

        self.pending = Some(PendingEvent {
            index: VMEXIT_BASE + exit_code,
            is_int: false,
            error_code: exit_info_1,
            next_eip: self.eip,
        });

        // Nothing is being delivered anymore.
        self.old_exception = None;
    }

    fn raise_interrupt2(&mut self, intno: u8, is_int: bool, error_code: u32, next_eip_addend: u64) {
        let (intno, error_code) = if is_int {
            if self.nested.is_some_and(|n| n.intercept_intn) {
                return self.vmexit(SVM_EXIT_SWINT, 0);
            }

            (intno, error_code)
        } else {
            let bit = 1u32.checked_shl(intno.into()).unwrap_or(0);

            if self.nested.is_some_and(|n| n.intercept_exceptions & bit != 0) {
                return self.vmexit(SVM_EXIT_EXCP_BASE + u32::from(intno), error_code);
            }

            match self.check_exception(intno, error_code) {
                Some(v) => v,
                None => return,
            }
        };

        trace!(intno, is_int, error_code, "event pending");

        self.pending = Some(PendingEvent {
            index: intno.into(),
            is_int,
            error_code,
            next_eip: self.eip.wrapping_add(next_eip_addend),
        });
    }

    /// Applies the double fault rules. Returns [`None`] if the PE shut down or the nested guest
    /// exited because of a triple fault.
    fn check_exception(&mut self, intno: u8, error_code: u32) -> Option<(u8, u32)> {
        let df = u8::from(Vector::DoubleFault);
        let pf = u8::from(Vector::PageFault);
        let first_contributory = self.old_exception.is_some_and(Vector::is_contributory);
        let second_contributory = Vector::is_contributory(intno);

        if self.old_exception == Some(df) {
            if self.nested.is_some() {
                self.vmexit(SVM_EXIT_SHUTDOWN, 0);
            } else {
                warn!(intno, "triple fault");

                self.pending = None;
                self.old_exception = None;
                self.shutdown = true;
            }

            return None;
        }

        let (intno, error_code) = if (first_contributory && second_contributory)
            || (self.old_exception == Some(pf) && (second_contributory || intno == pf))
        {
            (df, 0)
        } else {
            (intno, error_code)
        };

        if second_contributory || intno == pf || intno == df {
            self.old_exception = Some(intno);
        }

        Some((intno, error_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::NestedGuest;

    fn pending(cpu: &X86Cpu) -> PendingEvent {
        cpu.pending.unwrap()
    }

    #[test]
    fn exception_without_nested_guest() {
        let mut cpu = X86Cpu::new();

        cpu.eip = 0x1000;
        cpu.raise_exception_err(Vector::GeneralProtection, 0x18);

        assert_eq!(
            pending(&cpu),
            PendingEvent {
                index: 13,
                is_int: false,
                error_code: 0x18,
                next_eip: 0x1000,
            }
        );
        assert_eq!(cpu.old_exception, Some(13));
    }

    #[test]
    fn software_interrupt() {
        let mut cpu = X86Cpu::new();

        cpu.eip = 0x1000;
        cpu.raise_interrupt(0x80, 2);

        let ev = pending(&cpu);

        assert_eq!(ev.index, 0x80);
        assert!(ev.is_int);
        assert_eq!(ev.next_eip, 0x1002);
        assert_eq!(cpu.old_exception, None);
    }

    #[test]
    fn benign_exceptions_are_not_recorded() {
        let mut cpu = X86Cpu::new();

        cpu.raise_exception_err(Vector::InvalidOpcode, 0);

        assert_eq!(pending(&cpu).index, 6);
        assert_eq!(cpu.old_exception, None);
    }

    #[test]
    fn double_fault() {
        let mut cpu = X86Cpu::new();

        cpu.raise_exception_err(Vector::PageFault, 2);
        cpu.raise_exception_err(Vector::GeneralProtection, 0);

        assert_eq!(pending(&cpu).index, 8);
        assert_eq!(pending(&cpu).error_code, 0);
        assert_eq!(cpu.old_exception, Some(8));

        cpu.raise_exception_err(Vector::StackFault, 0);

        assert!(cpu.shutdown);
        assert_eq!(cpu.pending, None);
    }

    #[test]
    fn contributory_after_contributory() {
        let mut cpu = X86Cpu::new();

        cpu.raise_exception_err(Vector::DivideError, 0);
        cpu.raise_exception_err(Vector::SegmentNotPresent, 0x20);

        assert_eq!(pending(&cpu).index, 8);

        // A page fault after a contributory exception is delivered as is.
        let mut cpu = X86Cpu::new();

        cpu.raise_exception_err(Vector::InvalidTss, 0);
        cpu.raise_exception_err(Vector::PageFault, 4);

        assert_eq!(pending(&cpu).index, 14);
        assert_eq!(pending(&cpu).error_code, 4);
    }

    #[test]
    fn intercepted_exception() {
        let mut cpu = X86Cpu::new();

        cpu.nested = Some(NestedGuest {
            vmcb: 0x8000,
            intercept_exceptions: 1 << 14,
            intercept_intn: false,
        });
        cpu.old_exception = Some(13);
        cpu.raise_exception_err(Vector::PageFault, 7);

        let ev = pending(&cpu);

        assert!(ev.is_vmexit());
        assert_eq!(ev.index, VMEXIT_BASE + SVM_EXIT_EXCP_BASE + 14);
        assert_eq!(ev.error_code, 7);
        assert_eq!(cpu.old_exception, None);

        cpu.raise_exception_err(Vector::GeneralProtection, 0);

        assert_eq!(pending(&cpu).index, 13);
    }

    #[test]
    fn intercepted_software_interrupt() {
        let mut cpu = X86Cpu::new();

        cpu.nested = Some(NestedGuest {
            vmcb: 0x8000,
            intercept_exceptions: 0,
            intercept_intn: true,
        });
        cpu.raise_interrupt(0x21, 2);

        assert_eq!(pending(&cpu).index, VMEXIT_BASE + SVM_EXIT_SWINT);
    }

    #[test]
    fn triple_fault_in_nested_guest() {
        let mut cpu = X86Cpu::new();

        cpu.nested = Some(NestedGuest::default());
        cpu.old_exception = Some(8);
        cpu.raise_exception_err(Vector::GeneralProtection, 0);

        assert_eq!(pending(&cpu).index, VMEXIT_BASE + SVM_EXIT_SHUTDOWN);
        assert!(!cpu.shutdown);
    }
}
