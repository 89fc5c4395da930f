// SPDX-License-Identifier: MIT OR Apache-2.0
use super::{VMEXIT_BASE, Vector, X86Cpu};
use hv::GuestMemory;
use tracing::{debug, trace};
use x86_64::{EventInj, EventType, VMCB_EVENT_INJ, VMCB_EVENT_INJ_ERR};

/// Event to deliver to a PE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `SYSCALL` instruction that is `next_eip_addend` bytes long.
    Syscall { next_eip_addend: u64 },
    /// The event in [`X86Cpu::pending`].
    Exception,
    /// External interrupt with the vector acknowledged from the interrupt controller.
    HardwareInterrupt(u8),
}

/// Arguments to [`InterruptHandler::do_interrupt()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptRequest {
    pub vector: u8,
    /// Raised by `INTn`, `INT3` or `INTO`.
    pub is_int: bool,
    pub error_code: u32,
    /// Return address for software interrupts.
    pub next_eip: u64,
    /// External interrupt.
    pub is_hw: bool,
}

/// Performs the control transfers that delivery ends with.
pub trait InterruptHandler {
    /// Transfers control through the IDT, or the IVT in real mode.
    fn do_interrupt(&mut self, cpu: &mut X86Cpu, req: &InterruptRequest);

    /// Exits from the nested guest to its hypervisor.
    fn do_vmexit(&mut self, cpu: &mut X86Cpu, exit_code: u32, exit_info_1: u64);
}

/// Delivers `event` to `cpu`.
///
/// Faults raised by `handler` are recorded in [`X86Cpu::pending`] for the next
/// [`Event::Exception`]. Such a fault leaves [`X86Cpu::old_exception`] and `EVENTINJ` of the
/// nested guest as they are so the next delivery can detect a double fault.
///
/// # Panics
/// If `event` is [`Event::Exception`] without a pending event or a `#VMEXIT` is pending while
/// another exception is still being delivered.
pub fn deliver<H, M>(cpu: &mut X86Cpu, event: Event, handler: &mut H, mem: &mut M)
where
    H: InterruptHandler + ?Sized,
    M: GuestMemory + ?Sized,
{
    trace!(?event, eip = cpu.eip, "delivering event");

    match event {
        Event::Syscall { next_eip_addend } => cpu.syscall(next_eip_addend),
        Event::Exception => {
            let Some(ev) = cpu.pending.take() else {
                panic!("no pending event to deliver");
            };

            if ev.is_vmexit() {
                assert_eq!(cpu.old_exception, None);

                handler.do_vmexit(cpu, ev.index - VMEXIT_BASE, ev.error_code.into());
            } else {
                let vector = u8::try_from(ev.index).unwrap_or_else(|_| {
                    panic!("invalid exception index {:#x}", ev.index);
                });
                let req = InterruptRequest {
                    vector,
                    is_int: ev.is_int,
                    error_code: ev.error_code,
                    next_eip: ev.next_eip,
                    is_hw: false,
                };

                if do_interrupt_all(cpu, &req, handler, mem) {
                    cpu.old_exception = None;
                }
            }
        }
        Event::HardwareInterrupt(vector) => {
            let req = InterruptRequest {
                vector,
                is_int: false,
                error_code: 0,
                next_eip: 0,
                is_hw: true,
            };

            do_interrupt_all(cpu, &req, handler, mem);
        }
    }
}

/// Returns `false` if `handler` raised a fault, which aborts the delivery.
fn do_interrupt_all<H, M>(
    cpu: &mut X86Cpu,
    req: &InterruptRequest,
    handler: &mut H,
    mem: &mut M,
) -> bool
where
    H: InterruptHandler + ?Sized,
    M: GuestMemory + ?Sized,
{
    // The nested hypervisor sees the event as being injected while it is delivered.
    if let Some(n) = cpu.nested {
        handle_event_inj(mem, n.vmcb, req, !cpu.cr0.pe());
    }

    handler.do_interrupt(cpu, req);

    if cpu.pending.is_some() {
        debug!(vector = req.vector, "fault while delivering");
        return false;
    }

    if let Some(n) = cpu.nested {
        let addr = n.vmcb + VMCB_EVENT_INJ;
        let inj = EventInj::from_bits(mem.read_u32(addr));

        mem.write_u32(addr, inj.with_v(false).into_bits());
    }

    true
}

/// Records `req` in `EVENTINJ` of the VMCB at `vmcb` unless an injection is already pending.
///
/// `rm` is `true` when the event is delivered in real mode, which has no error codes. The error
/// code is written before `EVENTINJ` is marked valid.
pub fn handle_event_inj<M>(mem: &mut M, vmcb: u64, req: &InterruptRequest, rm: bool)
where
    M: GuestMemory + ?Sized,
{
    let cur = EventInj::from_bits(mem.read_u32(vmcb + VMCB_EVENT_INJ));

    if cur.v() {
        return;
    }

    let ty = if req.is_int {
        EventType::Soft
    } else {
        EventType::Exception
    };
    let mut inj = EventInj::new()
        .with_vector(req.vector)
        .with_ty(ty)
        .with_v(true);

    if !rm && !req.is_int && Vector::has_error_code(req.vector) {
        inj.set_ev(true);
        mem.write_u32(vmcb + VMCB_EVENT_INJ_ERR, req.error_code);
    }

    mem.write_u32(vmcb + VMCB_EVENT_INJ, inj.into_bits());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86::NestedGuest;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct Memory {
        words: FxHashMap<u64, u32>,
        writes: Vec<(u64, u32)>,
    }

    impl GuestMemory for Memory {
        fn read_u32(&self, addr: u64) -> u32 {
            self.words.get(&addr).copied().unwrap_or(0)
        }

        fn write_u32(&mut self, addr: u64, v: u32) {
            self.words.insert(addr, v);
            self.writes.push((addr, v));
        }
    }

    #[derive(Default)]
    struct Handler {
        interrupts: Vec<InterruptRequest>,
        exits: Vec<(u32, u64)>,
    }

    impl InterruptHandler for Handler {
        fn do_interrupt(&mut self, _: &mut X86Cpu, req: &InterruptRequest) {
            self.interrupts.push(*req);
        }

        fn do_vmexit(&mut self, cpu: &mut X86Cpu, exit_code: u32, exit_info_1: u64) {
            cpu.nested = None;
            self.exits.push((exit_code, exit_info_1));
        }
    }

    fn req(vector: u8, is_int: bool, error_code: u32) -> InterruptRequest {
        InterruptRequest {
            vector,
            is_int,
            error_code,
            next_eip: 0,
            is_hw: false,
        }
    }

    #[test]
    fn inject_with_error_code() {
        let mut mem = Memory::default();

        handle_event_inj(&mut mem, 0x1000, &req(13, false, 0x28), false);

        let inj = EventInj::from_bits(mem.read_u32(0x10a8));

        assert_eq!(mem.writes, [(0x10ac, 0x28), (0x10a8, 0x80000b0d)]);
        assert_eq!(inj.vector(), 13);
        assert_eq!(inj.ty(), EventType::Exception);
        assert!(inj.ev());
    }

    #[test]
    fn inject_without_error_code() {
        let mut mem = Memory::default();

        // Real mode.
        handle_event_inj(&mut mem, 0, &req(13, false, 0x28), true);

        assert_eq!(mem.writes, [(0xa8, 0x8000030d)]);

        // Software interrupt.
        let mut mem = Memory::default();

        handle_event_inj(&mut mem, 0, &req(8, true, 0), false);

        assert_eq!(mem.writes, [(0xa8, 0x80000408)]);
    }

    #[test]
    fn inject_is_idempotent() {
        let mut mem = Memory::default();

        mem.words.insert(0xa8, 0x80000300 | 14);
        handle_event_inj(&mut mem, 0, &req(13, false, 0x28), false);

        assert!(mem.writes.is_empty());
    }

    #[test]
    fn nested_guest_delivery() {
        let mut cpu = X86Cpu::new();
        let mut mem = Memory::default();
        let mut handler = Handler::default();

        cpu.cr0 = cpu.cr0.with_pe(true);
        cpu.nested = Some(NestedGuest {
            vmcb: 0x2000,
            ..Default::default()
        });
        cpu.raise_exception_err(Vector::GeneralProtection, 4);

        deliver(&mut cpu, Event::Exception, &mut handler, &mut mem);

        // Faults return to the faulting instruction.
        assert_eq!(
            handler.interrupts,
            [InterruptRequest {
                next_eip: 0xfff0,
                ..req(13, false, 4)
            }]
        );
        assert_eq!(
            mem.writes,
            [(0x20ac, 4), (0x20a8, 0x80000b0d), (0x20a8, 0x00000b0d)]
        );
        assert_eq!(cpu.old_exception, None);
        assert_eq!(cpu.pending, None);
    }

    #[test]
    fn hardware_interrupt() {
        let mut cpu = X86Cpu::new();
        let mut mem = Memory::default();
        let mut handler = Handler::default();

        cpu.old_exception = Some(14);

        deliver(&mut cpu, Event::HardwareInterrupt(0x20), &mut handler, &mut mem);

        assert_eq!(
            handler.interrupts,
            [InterruptRequest {
                vector: 0x20,
                is_int: false,
                error_code: 0,
                next_eip: 0,
                is_hw: true,
            }]
        );
        assert!(mem.writes.is_empty());
        assert_eq!(cpu.old_exception, Some(14));
    }

    #[test]
    fn vmexit() {
        let mut cpu = X86Cpu::new();
        let mut mem = Memory::default();
        let mut handler = Handler::default();

        cpu.nested = Some(NestedGuest::default());
        cpu.vmexit(0x7b, 0x60);

        deliver(&mut cpu, Event::Exception, &mut handler, &mut mem);

        assert_eq!(handler.exits, [(0x7b, 0x60)]);
        assert!(handler.interrupts.is_empty());
        assert!(mem.writes.is_empty());
    }

    #[test]
    #[should_panic]
    fn vmexit_while_delivering() {
        let mut cpu = X86Cpu::new();

        cpu.vmexit(0x7b, 0);
        cpu.old_exception = Some(13);

        deliver(
            &mut cpu,
            Event::Exception,
            &mut Handler::default(),
            &mut Memory::default(),
        );
    }

    #[test]
    #[should_panic]
    fn nothing_pending() {
        deliver(
            &mut X86Cpu::new(),
            Event::Exception,
            &mut Handler::default(),
            &mut Memory::default(),
        );
    }
}
