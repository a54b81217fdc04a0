//! The instruction micro-sequencer.
//!
//! Ties the opcode table, addressing-mode ticker, and operation bodies
//! together into the tick-by-tick state machine described by the data
//! model: opcode fetch, then an addressing phase, then (for write and RMW
//! accesses) one or two write-back ticks.

use super::addressing::{self, AddrOutcome};
use super::opcode::{AccessKind, AddressingMode, Mnemonic, OPCODE_TABLE};
use super::operations;
use super::status::Status;
use super::{Cpu, InterruptKind};
use crate::bus::Bus;

/// Write-back state carried across ticks for `Write` and `Rmw` accesses,
/// since the addressing phase resolves the address/value one tick before
/// the actual store can happen.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WriteBack {
    None,
    PendingStore,
    PendingRmwFirst,
    PendingRmwSecond(u8),
}

pub(crate) fn tick(cpu: &mut Cpu, bus: &mut Bus) {
    if cpu.step == 0 {
        fetch_opcode(cpu, bus);
        cpu.step = 1;
        return;
    }
    let sub_step = cpu.step - 1;
    let complete = dispatch(cpu, bus, sub_step);
    if complete {
        cpu.step = 0;
    } else {
        cpu.step += 1;
    }
}

fn fetch_opcode(cpu: &mut Cpu, bus: &mut Bus) {
    if let Some(kind) = cpu.pending_interrupt() {
        cpu.servicing = Some(kind);
        bus.read(cpu.pc);
        cpu.opcode = 0x00;
    } else {
        cpu.servicing = None;
        cpu.opcode = bus.read(cpu.pc);
        cpu.pc = cpu.pc.wrapping_add(1);
    }
    cpu.entry = OPCODE_TABLE[cpu.opcode as usize];
    cpu.last_p = cpu.p;
    cpu.addr = 0;
    cpu.buf = 0;
    cpu.val = 0;
    cpu.page_crossed = false;
    cpu.wb = WriteBack::None;
}

fn dispatch(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.entry.access {
        AccessKind::Read => dispatch_read(cpu, bus, sub_step),
        AccessKind::Write => dispatch_write(cpu, bus, sub_step),
        AccessKind::Rmw => dispatch_rmw(cpu, bus, sub_step),
        AccessKind::Branch => dispatch_branch(cpu, bus, sub_step),
        AccessKind::Stack => dispatch_stack(cpu, bus, sub_step),
        AccessKind::Control => dispatch_control(cpu, bus, sub_step),
    }
}

fn dispatch_read(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.entry.mode {
        AddressingMode::Implied => {
            if sub_step != 0 {
                unreachable!("Implied read access has exactly one tick");
            }
            bus.read(cpu.pc);
            operations::implied_op(cpu, cpu.entry.mnemonic);
            true
        }
        AddressingMode::Accumulator => {
            if sub_step != 0 {
                unreachable!("Accumulator read access has exactly one tick");
            }
            bus.read(cpu.pc);
            operations::accumulator_op(cpu, cpu.entry.mnemonic);
            true
        }
        mode => match addressing::tick(cpu, bus, mode, sub_step, false, false) {
            AddrOutcome::Pending => false,
            AddrOutcome::Value(v) => {
                operations::read_op(cpu, cpu.entry.mnemonic, v);
                true
            }
            AddrOutcome::Address(_) => unreachable!("read access resolves to a value, not an address"),
        },
    }
}

fn store_value(cpu: &Cpu, mnemonic: Mnemonic) -> u8 {
    match mnemonic {
        Mnemonic::STA => cpu.a,
        Mnemonic::STX => cpu.x,
        Mnemonic::STY => cpu.y,
        Mnemonic::SAX => cpu.a & cpu.x,
        other => unreachable!("{other:?} is not a store mnemonic"),
    }
}

fn dispatch_write(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.wb {
        WriteBack::PendingStore => {
            let byte = store_value(cpu, cpu.entry.mnemonic);
            bus.write(cpu.addr, byte);
            cpu.wb = WriteBack::None;
            true
        }
        WriteBack::None => match addressing::tick(cpu, bus, cpu.entry.mode, sub_step, true, false) {
            AddrOutcome::Pending => false,
            AddrOutcome::Address(_) => {
                cpu.wb = WriteBack::PendingStore;
                false
            }
            AddrOutcome::Value(_) => unreachable!("write access never resolves to a bare value"),
        },
        _ => unreachable!("unexpected write-back state for Write access"),
    }
}

fn dispatch_rmw(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.wb {
        WriteBack::None => match addressing::tick(cpu, bus, cpu.entry.mode, sub_step, false, true) {
            AddrOutcome::Pending => false,
            AddrOutcome::Value(v) => {
                cpu.val = v;
                cpu.wb = WriteBack::PendingRmwFirst;
                false
            }
            AddrOutcome::Address(_) => unreachable!("RMW addressing resolves to a value"),
        },
        WriteBack::PendingRmwFirst => {
            bus.write(cpu.addr, cpu.val); // unmodified value, written back unchanged
            let result = operations::rmw_op(cpu, cpu.entry.mnemonic, cpu.val);
            cpu.wb = WriteBack::PendingRmwSecond(result);
            false
        }
        WriteBack::PendingRmwSecond(result) => {
            bus.write(cpu.addr, result);
            cpu.wb = WriteBack::None;
            true
        }
        WriteBack::PendingStore => unreachable!("unexpected write-back state for Rmw access"),
    }
}

fn dispatch_branch(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match sub_step {
        0 => {
            let offset = bus.read(cpu.pc) as i8;
            cpu.pc = cpu.pc.wrapping_add(1);
            cpu.buf = offset as u16;
            !operations::branch_condition(cpu, cpu.entry.mnemonic)
        }
        1 => {
            bus.read(cpu.pc);
            let offset = cpu.buf as i8;
            let target = (cpu.pc as i32 + offset as i32) as u16;
            cpu.page_crossed = (target & 0xFF00) != (cpu.pc & 0xFF00);
            if cpu.page_crossed {
                cpu.addr = target;
                false
            } else {
                cpu.pc = target;
                true
            }
        }
        2 => {
            let uncorrected = (cpu.pc & 0xFF00) | (cpu.addr & 0x00FF);
            bus.read(uncorrected);
            cpu.pc = cpu.addr;
            true
        }
        _ => unreachable!("branch access has at most 3 ticks"),
    }
}

fn dispatch_stack(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.entry.mnemonic {
        Mnemonic::PHA | Mnemonic::PHP => match sub_step {
            0 => {
                bus.read(cpu.pc);
                false
            }
            1 => {
                let byte = if cpu.entry.mnemonic == Mnemonic::PHP {
                    cpu.p.to_pushed_byte(true)
                } else {
                    cpu.a
                };
                bus.write(0x0100 | cpu.s as u16, byte);
                cpu.s = cpu.s.wrapping_sub(1);
                true
            }
            _ => unreachable!("push has exactly 2 ticks"),
        },
        Mnemonic::PLA | Mnemonic::PLP => match sub_step {
            0 => {
                bus.read(cpu.pc);
                false
            }
            1 => {
                bus.read(0x0100 | cpu.s as u16);
                cpu.s = cpu.s.wrapping_add(1);
                false
            }
            2 => {
                let byte = bus.read(0x0100 | cpu.s as u16);
                if cpu.entry.mnemonic == Mnemonic::PLA {
                    cpu.a = byte;
                    cpu.p.set_nz(cpu.a);
                } else {
                    cpu.p = Status::from_pulled_byte(byte);
                }
                true
            }
            _ => unreachable!("pull has exactly 3 ticks"),
        },
        other => unreachable!("{other:?} is not a stack mnemonic"),
    }
}

fn dispatch_control(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match cpu.entry.mnemonic {
        Mnemonic::JMP => match addressing::tick(cpu, bus, cpu.entry.mode, sub_step, true, false) {
            AddrOutcome::Pending => false,
            AddrOutcome::Address(addr) => {
                cpu.pc = addr;
                true
            }
            AddrOutcome::Value(_) => unreachable!("JMP addressing resolves to an address"),
        },
        Mnemonic::JSR => control_jsr(cpu, bus, sub_step),
        Mnemonic::RTS => control_rts(cpu, bus, sub_step),
        Mnemonic::RTI => control_rti(cpu, bus, sub_step),
        Mnemonic::BRK => control_brk(cpu, bus, sub_step),
        other => unreachable!("{other:?} is not a control mnemonic"),
    }
}

fn control_jsr(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match sub_step {
        0 => {
            cpu.buf = bus.read(cpu.pc) as u16;
            cpu.pc = cpu.pc.wrapping_add(1);
            false
        }
        1 => {
            bus.read(0x0100 | cpu.s as u16);
            false
        }
        2 => {
            let hi = (cpu.pc >> 8) as u8;
            bus.write(0x0100 | cpu.s as u16, hi);
            cpu.s = cpu.s.wrapping_sub(1);
            false
        }
        3 => {
            let lo = cpu.pc as u8;
            bus.write(0x0100 | cpu.s as u16, lo);
            cpu.s = cpu.s.wrapping_sub(1);
            false
        }
        4 => {
            let hi = bus.read(cpu.pc) as u16;
            cpu.pc = (hi << 8) | cpu.buf;
            true
        }
        _ => unreachable!("JSR has exactly 5 control ticks"),
    }
}

fn control_rts(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match sub_step {
        0 => {
            bus.read(cpu.pc);
            false
        }
        1 => {
            bus.read(0x0100 | cpu.s as u16);
            false
        }
        2 => {
            cpu.s = cpu.s.wrapping_add(1);
            cpu.buf = bus.read(0x0100 | cpu.s as u16) as u16;
            false
        }
        3 => {
            cpu.s = cpu.s.wrapping_add(1);
            let hi = bus.read(0x0100 | cpu.s as u16) as u16;
            cpu.addr = (hi << 8) | cpu.buf;
            false
        }
        4 => {
            bus.read(cpu.addr);
            cpu.pc = cpu.addr.wrapping_add(1);
            true
        }
        _ => unreachable!("RTS has exactly 5 control ticks"),
    }
}

fn control_rti(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    match sub_step {
        0 => {
            bus.read(cpu.pc);
            false
        }
        1 => {
            bus.read(0x0100 | cpu.s as u16);
            false
        }
        2 => {
            cpu.s = cpu.s.wrapping_add(1);
            let byte = bus.read(0x0100 | cpu.s as u16);
            cpu.p = Status::from_pulled_byte(byte);
            false
        }
        3 => {
            cpu.s = cpu.s.wrapping_add(1);
            cpu.buf = bus.read(0x0100 | cpu.s as u16) as u16;
            false
        }
        4 => {
            cpu.s = cpu.s.wrapping_add(1);
            let hi = bus.read(0x0100 | cpu.s as u16) as u16;
            cpu.pc = (hi << 8) | cpu.buf;
            true
        }
        _ => unreachable!("RTI has exactly 5 control ticks"),
    }
}

fn push_or_dummy(cpu: &mut Cpu, bus: &mut Bus, byte: u8, suppress_write: bool) {
    let addr = 0x0100 | cpu.s as u16;
    if suppress_write {
        bus.read(addr);
    } else {
        bus.write(addr, byte);
    }
    cpu.s = cpu.s.wrapping_sub(1);
}

/// Shared by a genuine BRK and by the RESET/NMI/IRQ hijack: the only
/// differences are whether the operand-discard cycle advances `PC`,
/// whether the pushes are real writes or (RESET only) suppressed into
/// reads, what `B` gets pushed as, and which vector is read.
fn control_brk(cpu: &mut Cpu, bus: &mut Bus, sub_step: u8) -> bool {
    let servicing = cpu.servicing;
    let suppress_writes = servicing == Some(InterruptKind::Reset);
    match sub_step {
        0 => {
            bus.read(cpu.pc);
            if servicing.is_none() {
                cpu.pc = cpu.pc.wrapping_add(1);
            }
            false
        }
        1 => {
            let hi = (cpu.pc >> 8) as u8;
            push_or_dummy(cpu, bus, hi, suppress_writes);
            false
        }
        2 => {
            let lo = cpu.pc as u8;
            push_or_dummy(cpu, bus, lo, suppress_writes);
            false
        }
        3 => {
            let brk = servicing.is_none();
            let byte = cpu.p.to_pushed_byte(brk);
            push_or_dummy(cpu, bus, byte, suppress_writes);
            cpu.p.insert(Status::INTERRUPT_DISABLE);
            false
        }
        4 => {
            let vector_lo = match servicing {
                Some(InterruptKind::Reset) => 0xFFFC,
                Some(InterruptKind::Nmi) => 0xFFFA,
                Some(InterruptKind::Irq) | None => 0xFFFE,
            };
            cpu.buf = bus.read(vector_lo) as u16;
            false
        }
        5 => {
            let vector_hi = match servicing {
                Some(InterruptKind::Reset) => 0xFFFD,
                Some(InterruptKind::Nmi) => 0xFFFB,
                Some(InterruptKind::Irq) | None => 0xFFFF,
            };
            let hi = bus.read(vector_hi) as u16;
            cpu.pc = (hi << 8) | cpu.buf;
            cpu.servicing = None;
            true
        }
        _ => unreachable!("BRK/interrupt control sequence has exactly 6 ticks"),
    }
}
