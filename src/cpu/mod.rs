// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The SM83 instruction interpreter: fetch/decode/execute, flags, HALT/STOP,
//! and interrupt service (`spec.md` §4.1, §4.4).

pub mod alu;
pub mod cb;
pub mod decode;
pub mod registers;

use std::collections::HashSet;

use log::warn;

use self::alu::AluOp;
use self::cb::ShiftOp;
use self::decode::{Condition, Opcode, Operand8, RegisterPair, StackPair};
use self::registers::{Flags, Registers};

use crate::bus::interrupts::Interrupt;
use crate::bus::SystemBus;
use crate::config::{Config, HardwareModel};

/// The processor: registers plus the handful of booleans that track
/// HALT/STOP/interrupt-enable state (`spec.md` §3).
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cpu {
    regs: Registers,
    model: HardwareModel,
    ime: bool,
    ime_pending: bool,
    halted: bool,
    stopped: bool,
    halt_bug: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    logged_undefined: HashSet<u8>,
}

impl Cpu {
    /// Builds a processor in its post-boot-ROM register state for the given
    /// hardware model.
    pub fn new(config: &Config) -> Self {
        Cpu {
            regs: Registers::reset(config.model),
            model: config.model,
            ime: false,
            ime_pending: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            logged_undefined: HashSet::new(),
        }
    }

    /// Resets every register and control flag to the documented boot state.
    pub fn reset(&mut self) {
        self.regs = Registers::reset(self.model);
        self.ime = false;
        self.ime_pending = false;
        self.halted = false;
        self.stopped = false;
        self.halt_bug = false;
    }

    /// Read-only access to the registers, for save-states and debuggers.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Mutable access to the registers, for save-state restore.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Whether the processor is idling in `HALT`.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether the processor is idling in `STOP`.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The interrupt-master-enable flag.
    pub fn ime(&self) -> bool {
        self.ime
    }

    /// Executes one instruction, one HALT/STOP idle tick, or one interrupt
    /// service sequence, whichever applies. Returns the T-cycles consumed.
    pub fn step(&mut self, bus: &mut SystemBus) -> u32 {
        let halted_before = self.halted;

        if let Some(cycles) = self.service_interrupt(bus) {
            return cycles;
        }

        if halted_before && !self.halted {
            // Woke this step because a pending interrupt was observed while
            // IME was 0: the wake itself consumes a tick without servicing
            // or running the next instruction (`spec.md` §8, scenario 3).
            bus.tick_idle(4);
            return 4;
        }

        if self.stopped {
            if bus.interrupts().pending_raw() & Interrupt::Joypad.mask() != 0 {
                self.stopped = false;
            }
            bus.tick_idle(4);
            return 4;
        }

        if self.halted {
            bus.tick_idle(4);
            return 4;
        }

        let ime_was_pending = self.ime_pending;
        let cycles = self.execute_one(bus);
        if ime_was_pending {
            self.ime = true;
            self.ime_pending = false;
        }
        cycles
    }

    /// Checks for and services a pending interrupt. Returns `Some(20)` if
    /// one was serviced; clears `halted` even when IME is 0, per `spec.md`
    /// §4.4.
    fn service_interrupt(&mut self, bus: &mut SystemBus) -> Option<u32> {
        let wake = bus.interrupts().any_pending();
        if self.halted && wake {
            self.halted = false;
        }
        if !self.ime {
            return None;
        }
        let interrupt = bus.interrupts().highest_priority()?;
        bus.interrupts_mut().acknowledge(interrupt);
        self.ime = false;

        bus.tick_idle(4);
        bus.tick_idle(4);
        let pc = self.regs.pc;
        self.push_byte(bus, (pc >> 8) as u8);
        self.push_byte(bus, pc as u8);
        self.regs.pc = interrupt.vector();
        bus.tick_idle(4);

        Some(20)
    }

    fn fetch_byte(&mut self, bus: &mut SystemBus) -> u8 {
        let pc = self.regs.pc;
        let byte = bus.tick_read(pc);
        if self.halt_bug {
            self.halt_bug = false;
        } else {
            self.regs.pc = pc.wrapping_add(1);
        }
        byte
    }

    fn fetch_word(&mut self, bus: &mut SystemBus) -> u16 {
        let lo = self.fetch_byte(bus) as u16;
        let hi = self.fetch_byte(bus) as u16;
        (hi << 8) | lo
    }

    fn fetch_signed(&mut self, bus: &mut SystemBus) -> i8 {
        self.fetch_byte(bus) as i8
    }

    fn push_byte(&mut self, bus: &mut SystemBus, value: u8) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.tick_write(self.regs.sp, value);
    }

    fn pop_byte(&mut self, bus: &mut SystemBus) -> u8 {
        let value = bus.tick_read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        value
    }

    fn push_word(&mut self, bus: &mut SystemBus, value: u16) {
        self.push_byte(bus, (value >> 8) as u8);
        self.push_byte(bus, value as u8);
    }

    fn pop_word(&mut self, bus: &mut SystemBus) -> u16 {
        let lo = self.pop_byte(bus) as u16;
        let hi = self.pop_byte(bus) as u16;
        (hi << 8) | lo
    }

    fn read_operand8(&mut self, bus: &mut SystemBus, operand: Operand8) -> u8 {
        match operand {
            Operand8::B => self.regs.b,
            Operand8::C => self.regs.c,
            Operand8::D => self.regs.d,
            Operand8::E => self.regs.e,
            Operand8::H => self.regs.h,
            Operand8::L => self.regs.l,
            Operand8::IndirectHl => bus.tick_read(self.regs.hl()),
            Operand8::A => self.regs.a,
        }
    }

    fn write_operand8(&mut self, bus: &mut SystemBus, operand: Operand8, value: u8) {
        match operand {
            Operand8::B => self.regs.b = value,
            Operand8::C => self.regs.c = value,
            Operand8::D => self.regs.d = value,
            Operand8::E => self.regs.e = value,
            Operand8::H => self.regs.h = value,
            Operand8::L => self.regs.l = value,
            Operand8::IndirectHl => bus.tick_write(self.regs.hl(), value),
            Operand8::A => self.regs.a = value,
        }
    }

    fn read_pair(&self, pair: RegisterPair) -> u16 {
        match pair {
            RegisterPair::Bc => self.regs.bc(),
            RegisterPair::De => self.regs.de(),
            RegisterPair::Hl => self.regs.hl(),
            RegisterPair::Sp => self.regs.sp,
        }
    }

    fn write_pair(&mut self, pair: RegisterPair, value: u16) {
        match pair {
            RegisterPair::Bc => self.regs.set_bc(value),
            RegisterPair::De => self.regs.set_de(value),
            RegisterPair::Hl => self.regs.set_hl(value),
            RegisterPair::Sp => self.regs.sp = value,
        }
    }

    fn read_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::Bc => self.regs.bc(),
            StackPair::De => self.regs.de(),
            StackPair::Hl => self.regs.hl(),
            StackPair::Af => self.regs.af(),
        }
    }

    fn write_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::Bc => self.regs.set_bc(value),
            StackPair::De => self.regs.set_de(value),
            StackPair::Hl => self.regs.set_hl(value),
            StackPair::Af => self.regs.set_af(value),
        }
    }

    fn condition_met(&self, condition: Condition) -> bool {
        match condition {
            Condition::NotZero => !self.regs.f.contains(Flags::ZERO),
            Condition::Zero => self.regs.f.contains(Flags::ZERO),
            Condition::NotCarry => !self.regs.f.contains(Flags::CARRY),
            Condition::Carry => self.regs.f.contains(Flags::CARRY),
        }
    }

    /// Executes `HALT` (`0x76`), per `spec.md` §4.1.
    fn op_halt(&mut self, bus: &mut SystemBus) {
        if self.ime {
            self.halted = true;
        } else if bus.interrupts().any_pending() {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    /// Executes `STOP` (`0x10 0x00`): resets DIV, marks the CPU stopped
    /// until a joypad interrupt. The second byte is read and discarded.
    fn op_stop(&mut self, bus: &mut SystemBus) {
        let _discarded = self.fetch_byte(bus);
        bus.stop_timer_divider();
        self.stopped = true;
    }

    fn execute_one(&mut self, bus: &mut SystemBus) -> u32 {
        let pc = self.regs.pc;
        let byte = self.fetch_byte(bus);

        if byte == 0xCB {
            return 4 + self.execute_cb(bus);
        }

        let op = Opcode::decode(byte);
        match op.x {
            0 => self.execute_block0(bus, op),
            1 => self.execute_block1(bus, op),
            2 => self.execute_block2(bus, op),
            _ => self.execute_block3(bus, op, pc, byte),
        }
    }

    fn execute_block0(&mut self, bus: &mut SystemBus, op: Opcode) -> u32 {
        match op.z {
            0 => match op.y {
                0 => 4, // NOP
                1 => {
                    // LD (nn),SP
                    let addr = self.fetch_word(bus);
                    let sp = self.regs.sp;
                    bus.tick_write(addr, sp as u8);
                    bus.tick_write(addr.wrapping_add(1), (sp >> 8) as u8);
                    20
                }
                2 => {
                    self.op_stop(bus);
                    4
                }
                3 => {
                    let offset = self.fetch_signed(bus);
                    self.jump_relative(bus, offset);
                    12
                }
                _ => {
                    let condition = Condition::from_index(op.y - 4);
                    let offset = self.fetch_signed(bus);
                    if self.condition_met(condition) {
                        self.jump_relative(bus, offset);
                        12
                    } else {
                        8
                    }
                }
            },
            1 => {
                let pair = RegisterPair::from_index(op.p);
                if op.q == 0 {
                    let value = self.fetch_word(bus);
                    self.write_pair(pair, value);
                    12
                } else {
                    let hl = self.regs.hl();
                    let rp = self.read_pair(pair);
                    let result = alu::add16(hl, rp, &mut self.regs.f);
                    self.regs.set_hl(result);
                    8
                }
            }
            2 => {
                let addr = match op.p {
                    0 => self.regs.bc(),
                    1 => self.regs.de(),
                    _ => self.regs.hl(),
                };
                if op.q == 0 {
                    bus.tick_write(addr, self.regs.a);
                } else {
                    self.regs.a = bus.tick_read(addr);
                }
                match op.p {
                    2 => self.regs.set_hl(addr.wrapping_add(1)),
                    3 => self.regs.set_hl(addr.wrapping_sub(1)),
                    _ => {}
                }
                8
            }
            3 => {
                let pair = RegisterPair::from_index(op.p);
                let value = self.read_pair(pair);
                let result = if op.q == 0 {
                    value.wrapping_add(1)
                } else {
                    value.wrapping_sub(1)
                };
                self.write_pair(pair, result);
                8
            }
            4 => {
                let operand = Operand8::from_index(op.y);
                let value = self.read_operand8(bus, operand);
                let result = alu::inc8(value, &mut self.regs.f);
                self.write_operand8(bus, operand, result);
                if operand == Operand8::IndirectHl {
                    12
                } else {
                    4
                }
            }
            5 => {
                let operand = Operand8::from_index(op.y);
                let value = self.read_operand8(bus, operand);
                let result = alu::dec8(value, &mut self.regs.f);
                self.write_operand8(bus, operand, result);
                if operand == Operand8::IndirectHl {
                    12
                } else {
                    4
                }
            }
            6 => {
                let operand = Operand8::from_index(op.y);
                let value = self.fetch_byte(bus);
                self.write_operand8(bus, operand, value);
                if operand == Operand8::IndirectHl {
                    12
                } else {
                    8
                }
            }
            _ => self.execute_accumulator_op(op.y),
        }
    }

    fn execute_accumulator_op(&mut self, y: u8) -> u32 {
        match y {
            0 => {
                let result = alu::rlc(self.regs.a, &mut self.regs.f);
                self.regs.a = result;
                self.regs.f.set(Flags::ZERO, false);
            }
            1 => {
                let result = alu::rrc(self.regs.a, &mut self.regs.f);
                self.regs.a = result;
                self.regs.f.set(Flags::ZERO, false);
            }
            2 => {
                let result = alu::rl(self.regs.a, &mut self.regs.f);
                self.regs.a = result;
                self.regs.f.set(Flags::ZERO, false);
            }
            3 => {
                let result = alu::rr(self.regs.a, &mut self.regs.f);
                self.regs.a = result;
                self.regs.f.set(Flags::ZERO, false);
            }
            4 => self.regs.a = alu::daa(self.regs.a, &mut self.regs.f),
            5 => self.regs.a = alu::cpl(self.regs.a, &mut self.regs.f),
            6 => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.insert(Flags::CARRY);
            }
            _ => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.toggle(Flags::CARRY);
            }
        }
        4
    }

    fn jump_relative(&mut self, bus: &mut SystemBus, offset: i8) {
        let _ = bus; // the internal delay is charged by the caller's cycle count
        self.regs.pc = (self.regs.pc as i32 + offset as i32) as u16;
    }

    fn execute_block1(&mut self, bus: &mut SystemBus, op: Opcode) -> u32 {
        if op.z == 6 && op.y == 6 {
            self.op_halt(bus);
            return 4;
        }
        let dst = Operand8::from_index(op.y);
        let src = Operand8::from_index(op.z);
        let value = self.read_operand8(bus, src);
        self.write_operand8(bus, dst, value);
        if dst == Operand8::IndirectHl || src == Operand8::IndirectHl {
            8
        } else {
            4
        }
    }

    fn execute_block2(&mut self, bus: &mut SystemBus, op: Opcode) -> u32 {
        let operand = Operand8::from_index(op.z);
        let value = self.read_operand8(bus, operand);
        let alu_op = AluOp::from_index(op.y);
        let result = alu_op.apply(self.regs.a, value, &mut self.regs.f);
        if alu_op != AluOp::Cp {
            self.regs.a = result;
        }
        if operand == Operand8::IndirectHl {
            8
        } else {
            4
        }
    }

    fn execute_block3(&mut self, bus: &mut SystemBus, op: Opcode, pc: u16, byte: u8) -> u32 {
        match op.z {
            0 => match op.y {
                0..=3 => {
                    let condition = Condition::from_index(op.y);
                    bus.tick_idle(4);
                    if self.condition_met(condition) {
                        self.regs.pc = self.pop_word(bus);
                        20
                    } else {
                        8
                    }
                }
                4 => {
                    let offset = self.fetch_byte(bus);
                    bus.tick_write(0xFF00 + offset as u16, self.regs.a);
                    12
                }
                5 => {
                    let offset = self.fetch_signed(bus);
                    bus.tick_idle(4);
                    self.regs.sp = alu::add_sp_signed(self.regs.sp, offset, &mut self.regs.f);
                    16
                }
                6 => {
                    let offset = self.fetch_byte(bus);
                    self.regs.a = bus.tick_read(0xFF00 + offset as u16);
                    12
                }
                _ => {
                    let offset = self.fetch_signed(bus);
                    bus.tick_idle(4);
                    let result = alu::add_sp_signed(self.regs.sp, offset, &mut self.regs.f);
                    self.regs.set_hl(result);
                    12
                }
            },
            1 => {
                if op.q == 0 {
                    let pair = StackPair::from_index(op.p);
                    let value = self.pop_word(bus);
                    self.write_stack_pair(pair, value);
                    12
                } else {
                    match op.p {
                        0 => {
                            self.regs.pc = self.pop_word(bus);
                            16
                        }
                        1 => {
                            self.regs.pc = self.pop_word(bus);
                            self.ime = true;
                            self.ime_pending = false;
                            16
                        }
                        2 => {
                            self.regs.pc = self.regs.hl();
                            4
                        }
                        _ => {
                            self.regs.sp = self.regs.hl();
                            bus.tick_idle(4);
                            8
                        }
                    }
                }
            }
            2 => match op.y {
                0..=3 => {
                    let condition = Condition::from_index(op.y);
                    let addr = self.fetch_word(bus);
                    if self.condition_met(condition) {
                        bus.tick_idle(4);
                        self.regs.pc = addr;
                        16
                    } else {
                        12
                    }
                }
                4 => {
                    bus.tick_write(0xFF00 + self.regs.c as u16, self.regs.a);
                    8
                }
                5 => {
                    let addr = self.fetch_word(bus);
                    bus.tick_write(addr, self.regs.a);
                    16
                }
                6 => {
                    self.regs.a = bus.tick_read(0xFF00 + self.regs.c as u16);
                    8
                }
                _ => {
                    let addr = self.fetch_word(bus);
                    self.regs.a = bus.tick_read(addr);
                    16
                }
            },
            3 => match op.y {
                0 => {
                    let addr = self.fetch_word(bus);
                    bus.tick_idle(4);
                    self.regs.pc = addr;
                    16
                }
                6 => {
                    self.ime = false;
                    self.ime_pending = false;
                    4
                }
                7 => {
                    self.ime_pending = true;
                    4
                }
                _ => self.execute_undefined(pc, byte),
            },
            4 => match op.y {
                0..=3 => {
                    let condition = Condition::from_index(op.y);
                    let addr = self.fetch_word(bus);
                    if self.condition_met(condition) {
                        bus.tick_idle(4);
                        let pc = self.regs.pc;
                        self.push_word(bus, pc);
                        self.regs.pc = addr;
                        24
                    } else {
                        12
                    }
                }
                _ => self.execute_undefined(pc, byte),
            },
            5 => {
                if op.q == 0 {
                    let pair = StackPair::from_index(op.p);
                    let value = self.read_stack_pair(pair);
                    bus.tick_idle(4);
                    self.push_word(bus, value);
                    16
                } else if op.p == 0 {
                    let addr = self.fetch_word(bus);
                    bus.tick_idle(4);
                    let pc = self.regs.pc;
                    self.push_word(bus, pc);
                    self.regs.pc = addr;
                    24
                } else {
                    self.execute_undefined(pc, byte)
                }
            }
            6 => {
                let value = self.fetch_byte(bus);
                let alu_op = AluOp::from_index(op.y);
                let result = alu_op.apply(self.regs.a, value, &mut self.regs.f);
                if alu_op != AluOp::Cp {
                    self.regs.a = result;
                }
                8
            }
            _ => {
                bus.tick_idle(4);
                let pc = self.regs.pc;
                self.push_word(bus, pc);
                self.regs.pc = (op.y as u16) * 8;
                16
            }
        }
    }

    /// Treats an unmapped opcode as a 4-T-cycle no-op, logging the first
    /// time each distinct byte is hit (`spec.md` §7, "Undefined opcode").
    fn execute_undefined(&mut self, pc: u16, byte: u8) -> u32 {
        if self.logged_undefined.insert(byte) {
            warn!("undefined opcode 0x{byte:02x} at 0x{pc:04x}");
        }
        4
    }

    fn execute_cb(&mut self, bus: &mut SystemBus) -> u32 {
        let byte = self.fetch_byte(bus);
        let op = Opcode::decode(byte);
        let operand = Operand8::from_index(op.z);
        let indirect = operand == Operand8::IndirectHl;
        let value = self.read_operand8(bus, operand);

        match op.x {
            0 => {
                let shift = ShiftOp::from_index(op.y);
                let result = shift.apply(value, &mut self.regs.f);
                self.write_operand8(bus, operand, result);
            }
            1 => {
                alu::bit(value, op.y, &mut self.regs.f);
                return if indirect { 12 } else { 8 };
            }
            2 => {
                let result = alu::res(value, op.y);
                self.write_operand8(bus, operand, result);
            }
            _ => {
                let result = alu::set_bit(value, op.y);
                self.write_operand8(bus, operand, result);
            }
        }

        if indirect {
            16
        } else {
            8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::cartridge::Cartridge;
    use crate::bus::Memory;

    fn test_machine() -> (Cpu, SystemBus) {
        let config = Config::default();
        let rom = vec![0u8; 0x8000];
        let cartridge = Cartridge::load(rom).unwrap();
        (Cpu::new(&config), SystemBus::new(&config, cartridge))
    }

    #[test]
    fn add_sets_documented_flags() {
        let (mut cpu, mut bus) = test_machine();
        cpu.regs.a = 0x0F;
        cpu.regs.b = 0x01;
        cpu.regs.pc = 0xC000;
        bus.write_all(0xC000, &[0x80]); // ADD A,B

        let cycles = cpu.step(&mut bus);

        assert_eq!(4, cycles);
        assert_eq!(0x10, cpu.regs.a);
        assert!(!cpu.regs.f.contains(Flags::ZERO));
        assert!(!cpu.regs.f.contains(Flags::SUBTRACT));
        assert!(cpu.regs.f.contains(Flags::HALF_CARRY));
        assert!(!cpu.regs.f.contains(Flags::CARRY));
    }

    #[test]
    fn halt_with_ime_disabled_and_pending_irq_sets_halt_bug() {
        let (mut cpu, mut bus) = test_machine();
        cpu.ime = false;
        bus.interrupts_mut().write(crate::bus::interrupts::IO_IE, 0x01);
        bus.interrupts_mut().write(crate::bus::interrupts::IO_IF, 0x01);
        cpu.regs.pc = 0xC000;
        bus.write_all(0xC000, &[0x76, 0x00]);

        cpu.step(&mut bus);

        assert!(cpu.halt_bug);
        assert!(!cpu.halted);
    }

    #[test]
    fn halt_wakes_without_servicing_when_ime_clear() {
        let (mut cpu, mut bus) = test_machine();
        cpu.ime = false;
        bus.interrupts_mut().write(crate::bus::interrupts::IO_IE, 0x01);
        cpu.regs.pc = 0xC000;
        bus.write_all(0xC000, &[0x76]);

        cpu.step(&mut bus); // executes HALT, halted=true
        assert!(cpu.halted);

        bus.interrupts_mut().write(crate::bus::interrupts::IO_IF, 0x01);
        let cycles = cpu.step(&mut bus);

        assert_eq!(4, cycles);
        assert!(!cpu.halted);
        assert_eq!(0xC001, cpu.regs.pc);
    }

    #[test]
    fn ei_enables_interrupts_after_the_following_instruction() {
        let (mut cpu, mut bus) = test_machine();
        cpu.regs.pc = 0xC000;
        bus.write_all(0xC000, &[0xFB, 0x00, 0x00]); // EI, NOP, NOP

        cpu.step(&mut bus); // EI
        assert!(!cpu.ime);
        cpu.step(&mut bus); // NOP immediately after EI still runs with IME=0
        assert!(cpu.ime);
    }

    #[test]
    fn push_pop_round_trips_through_the_stack() {
        let (mut cpu, mut bus) = test_machine();
        cpu.regs.set_bc(0x1234);
        cpu.regs.sp = 0xFFFE;
        cpu.regs.pc = 0xC000;
        bus.write_all(0xC000, &[0xC5, 0xD1]); // PUSH BC, POP DE

        cpu.step(&mut bus);
        cpu.step(&mut bus);

        assert_eq!(0x1234, cpu.regs.de());
        assert_eq!(0xFFFE, cpu.regs.sp);
    }

    #[test]
    fn interrupt_service_clears_ime_and_jumps_to_vector() {
        let (mut cpu, mut bus) = test_machine();
        cpu.ime = true;
        cpu.regs.pc = 0xC000;
        cpu.regs.sp = 0xFFFE;
        bus.interrupts_mut().write(crate::bus::interrupts::IO_IE, 0x01);
        bus.interrupts_mut().write(crate::bus::interrupts::IO_IF, 0x01);

        let cycles = cpu.step(&mut bus);

        assert_eq!(20, cycles);
        assert!(!cpu.ime);
        assert_eq!(0x0040, cpu.regs.pc);
        assert_eq!(0, bus.interrupts().pending_raw() & 0x01);
    }
}
