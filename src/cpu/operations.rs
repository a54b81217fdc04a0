//! Pure-ish operation bodies: what each mnemonic does to registers and
//! flags, independent of how its operand was fetched.
//!
//! `last_p` (the status snapshotted at opcode fetch) supplies the carry-in
//! for ADC/SBC/ROL/ROR, matching the 6502's behavior of reading the carry
//! before the instruction's own write-back can change it.

use super::opcode::Mnemonic;
use super::status::Status;
use super::Cpu;

fn adc(cpu: &mut Cpu, operand: u8) {
    let carry_in = cpu.last_p.contains(Status::CARRY) as u16;
    let a = cpu.a;
    let sum = a as u16 + operand as u16 + carry_in;
    let result = sum as u8;
    cpu.p.set(Status::CARRY, sum > 0xFF);
    cpu.p
        .set(Status::OVERFLOW, (a ^ result) & (operand ^ result) & 0x80 != 0);
    cpu.p.set_nz(result);
    cpu.a = result;
}

fn sbc(cpu: &mut Cpu, operand: u8) {
    adc(cpu, !operand);
}

/// Read-access operations: the instruction reads a byte, computes, and
/// never writes memory again. Covers official loads/ALU/compare/BIT plus
/// the unofficial immediate-mode combo opcodes.
pub(crate) fn read_op(cpu: &mut Cpu, mnemonic: Mnemonic, operand: u8) {
    match mnemonic {
        Mnemonic::ADC => adc(cpu, operand),
        Mnemonic::SBC => sbc(cpu, operand),
        Mnemonic::AND => {
            cpu.a &= operand;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::ORA => {
            cpu.a |= operand;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::EOR => {
            cpu.a ^= operand;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::LDA => {
            cpu.a = operand;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::LDX => {
            cpu.x = operand;
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::LDY => {
            cpu.y = operand;
            cpu.p.set_nz(cpu.y);
        }
        Mnemonic::LAX => {
            cpu.a = operand;
            cpu.x = operand;
            cpu.p.set_nz(operand);
        }
        Mnemonic::CMP => compare(cpu, cpu.a, operand),
        Mnemonic::CPX => compare(cpu, cpu.x, operand),
        Mnemonic::CPY => compare(cpu, cpu.y, operand),
        Mnemonic::BIT => {
            cpu.p.set(Status::NEGATIVE, operand & 0x80 != 0);
            cpu.p.set(Status::OVERFLOW, operand & 0x40 != 0);
            cpu.p.set(Status::ZERO, cpu.a & operand == 0);
        }
        Mnemonic::AAC => {
            cpu.a &= operand;
            cpu.p.set_nz(cpu.a);
            cpu.p.set(Status::CARRY, cpu.a & 0x80 != 0);
        }
        Mnemonic::ASR => {
            cpu.a &= operand;
            cpu.p.set(Status::CARRY, cpu.a & 0x01 != 0);
            cpu.a >>= 1;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::ARR => {
            cpu.a &= operand;
            let carry_in = cpu.last_p.contains(Status::CARRY) as u8;
            cpu.a = (cpu.a >> 1) | (carry_in << 7);
            cpu.p.set_nz(cpu.a);
            cpu.p.set(Status::CARRY, cpu.a & 0x40 != 0);
            cpu.p
                .set(Status::OVERFLOW, ((cpu.a >> 6) ^ (cpu.a >> 5)) & 0x01 != 0);
        }
        Mnemonic::ATX => {
            cpu.a |= 0xEE;
            cpu.a &= operand;
            cpu.x = cpu.a;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::AXS => {
            let r = (cpu.a & cpu.x) as i16 - operand as i16;
            cpu.p.set(Status::CARRY, r >= 0);
            cpu.x = r as u8;
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::XAA => {
            cpu.a = cpu.x & operand;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::NOP | Mnemonic::DOP | Mnemonic::TOP | Mnemonic::KIL => {}
        other => unreachable!("{other:?} is not a read-access operation"),
    }
}

fn compare(cpu: &mut Cpu, reg: u8, operand: u8) {
    let result = reg.wrapping_sub(operand);
    cpu.p.set(Status::CARRY, reg >= operand);
    cpu.p.set(Status::ZERO, reg == operand);
    cpu.p.set(Status::NEGATIVE, result & 0x80 != 0);
}

/// Shift/rotate/increment-decrement transform shared by memory RMWs and
/// accumulator-mode ASL/LSR/ROL/ROR. Returns the value to write back;
/// updates flags on `cpu.p` and, for the unofficial combo opcodes, folds in
/// the accumulator merge they perform alongside the memory write.
pub(crate) fn rmw_op(cpu: &mut Cpu, mnemonic: Mnemonic, operand: u8) -> u8 {
    match mnemonic {
        Mnemonic::ASL => {
            cpu.p.set(Status::CARRY, operand & 0x80 != 0);
            let result = operand << 1;
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::LSR => {
            cpu.p.set(Status::CARRY, operand & 0x01 != 0);
            let result = operand >> 1;
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::ROL => {
            let carry_in = cpu.last_p.contains(Status::CARRY) as u8;
            cpu.p.set(Status::CARRY, operand & 0x80 != 0);
            let result = (operand << 1) | carry_in;
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::ROR => {
            let carry_in = cpu.last_p.contains(Status::CARRY) as u8;
            cpu.p.set(Status::CARRY, operand & 0x01 != 0);
            let result = (operand >> 1) | (carry_in << 7);
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::INC => {
            let result = operand.wrapping_add(1);
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::DEC => {
            let result = operand.wrapping_sub(1);
            cpu.p.set_nz(result);
            result
        }
        Mnemonic::SLO => {
            let shifted = rmw_op(cpu, Mnemonic::ASL, operand);
            cpu.a |= shifted;
            cpu.p.set_nz(cpu.a);
            shifted
        }
        Mnemonic::SRE => {
            let shifted = rmw_op(cpu, Mnemonic::LSR, operand);
            cpu.a ^= shifted;
            cpu.p.set_nz(cpu.a);
            shifted
        }
        Mnemonic::RLA => {
            let rotated = rmw_op(cpu, Mnemonic::ROL, operand);
            cpu.a &= rotated;
            cpu.p.set_nz(cpu.a);
            rotated
        }
        Mnemonic::RRA => {
            let rotated = rmw_op(cpu, Mnemonic::ROR, operand);
            adc(cpu, rotated);
            rotated
        }
        Mnemonic::DCP => {
            let decremented = rmw_op(cpu, Mnemonic::DEC, operand);
            compare(cpu, cpu.a, decremented);
            decremented
        }
        Mnemonic::ISC => {
            let incremented = rmw_op(cpu, Mnemonic::INC, operand);
            sbc(cpu, incremented);
            incremented
        }
        other => unreachable!("{other:?} is not a read-modify-write operation"),
    }
}

/// Implied-addressing operations: no memory operand, act on registers.
pub(crate) fn implied_op(cpu: &mut Cpu, mnemonic: Mnemonic) {
    match mnemonic {
        Mnemonic::CLC => cpu.p.remove(Status::CARRY),
        Mnemonic::SEC => cpu.p.insert(Status::CARRY),
        Mnemonic::CLI => cpu.p.remove(Status::INTERRUPT_DISABLE),
        Mnemonic::SEI => cpu.p.insert(Status::INTERRUPT_DISABLE),
        Mnemonic::CLD => cpu.p.remove(Status::DECIMAL),
        Mnemonic::SED => cpu.p.insert(Status::DECIMAL),
        Mnemonic::CLV => cpu.p.remove(Status::OVERFLOW),
        Mnemonic::TAX => {
            cpu.x = cpu.a;
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::TAY => {
            cpu.y = cpu.a;
            cpu.p.set_nz(cpu.y);
        }
        Mnemonic::TXA => {
            cpu.a = cpu.x;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::TYA => {
            cpu.a = cpu.y;
            cpu.p.set_nz(cpu.a);
        }
        Mnemonic::TSX => {
            cpu.x = cpu.s;
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::TXS => cpu.s = cpu.x,
        Mnemonic::INX => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::INY => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.p.set_nz(cpu.y);
        }
        Mnemonic::DEX => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.p.set_nz(cpu.x);
        }
        Mnemonic::DEY => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.p.set_nz(cpu.y);
        }
        Mnemonic::NOP | Mnemonic::KIL => {}
        other => unreachable!("{other:?} is not an implied-addressing operation"),
    }
}

/// Accumulator-mode ASL/LSR/ROL/ROR: operand and destination are both `A`.
pub(crate) fn accumulator_op(cpu: &mut Cpu, mnemonic: Mnemonic) {
    cpu.a = rmw_op(cpu, mnemonic, cpu.a);
}

pub(crate) fn branch_condition(cpu: &Cpu, mnemonic: Mnemonic) -> bool {
    match mnemonic {
        Mnemonic::BCC => !cpu.p.contains(Status::CARRY),
        Mnemonic::BCS => cpu.p.contains(Status::CARRY),
        Mnemonic::BEQ => cpu.p.contains(Status::ZERO),
        Mnemonic::BNE => !cpu.p.contains(Status::ZERO),
        Mnemonic::BMI => cpu.p.contains(Status::NEGATIVE),
        Mnemonic::BPL => !cpu.p.contains(Status::NEGATIVE),
        Mnemonic::BVC => !cpu.p.contains(Status::OVERFLOW),
        Mnemonic::BVS => cpu.p.contains(Status::OVERFLOW),
        other => unreachable!("{other:?} is not a branch mnemonic"),
    }
}
