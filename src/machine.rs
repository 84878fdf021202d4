// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The top-level machine: a CPU wired to a bus, stepped one frame at a time
//! (`spec.md` §5, "Scheduling").

use crate::bus::cartridge::Cartridge;
use crate::bus::joypad::Button;
use crate::bus::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::bus::SystemBus;
use crate::config::Config;
use crate::cpu::Cpu;
use crate::error::CartridgeError;
use crate::serial::SerialSink;
use crate::time::TimeSource;

/// A complete, runnable Game Boy: CPU, bus, and the cartridge it's loaded
/// with. The type a frontend constructs and drives.
///
/// Not itself `Serialize`/`Deserialize` even with the `serde` feature: the
/// bus owns the cartridge ROM and the frontend-supplied `SerialSink`/
/// `TimeSource` trait objects, none of which round-trip through a snapshot.
/// A frontend that wants save-states serializes `cpu.registers()` and the
/// individual bus peripherals (timer, interrupts, joypad, PPU registers,
/// cartridge RAM/RTC) directly.
pub struct Machine {
    cpu: Cpu,
    bus: SystemBus,
}

impl Machine {
    /// Parses `rom` and builds a machine ready to run from the cartridge's
    /// entry point.
    pub fn new(config: &Config, rom: Vec<u8>) -> Result<Self, CartridgeError> {
        let cartridge = Cartridge::load(rom)?;
        Ok(Machine {
            cpu: Cpu::new(config),
            bus: SystemBus::new(config, cartridge),
        })
    }

    /// The CPU's registers and control flags, for save-state serialization.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable access to the CPU, for save-state restore.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The underlying bus, for inspecting or snapshotting individual
    /// peripherals.
    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    /// Mutable access to the bus.
    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    /// Installs the sink that receives bytes transmitted over the serial
    /// port's debug-output path.
    pub fn set_serial_sink(&mut self, sink: Box<dyn SerialSink>) {
        self.bus.set_serial_sink(sink);
    }

    /// Installs the time source driving the MBC3 real-time clock.
    pub fn set_time_source(&mut self, time_source: Box<dyn TimeSource>) {
        self.bus.set_time_source(time_source);
    }

    /// Executes a single instruction, idle tick, or interrupt service,
    /// returning the T-cycles consumed.
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.bus)
    }

    /// Executes CPU steps until a frame completes, returning the total
    /// T-cycles consumed. Exactly 70224 T-cycles elapse between consecutive
    /// calls under normal operation (`spec.md` §8).
    pub fn step_until_frame(&mut self) -> u32 {
        let mut total = 0;
        loop {
            total += self.step();
            if self.bus.ppu_mut().take_frame_ready() {
                return total;
            }
        }
    }

    /// The current 160x144 ARGB framebuffer.
    pub fn framebuffer(&self) -> &[u32; SCREEN_WIDTH * SCREEN_HEIGHT] {
        self.bus.ppu().framebuffer()
    }

    /// Marks `button` pressed.
    pub fn press(&mut self, button: Button) {
        self.bus.press_button(button);
    }

    /// Marks `button` released.
    pub fn release(&mut self, button: Button) {
        self.bus.release_button(button);
    }

    /// The cartridge's battery-backed RAM, for persisting a save file.
    pub fn cartridge_ram(&self) -> &[u8] {
        self.bus.cartridge().ram()
    }

    /// Restores cartridge RAM from a previously saved battery-backed image.
    pub fn load_cartridge_ram(&mut self, data: &[u8]) {
        self.bus.cartridge_mut().load_ram(data);
    }

    /// The loaded cartridge's title, from the ROM header.
    pub fn cartridge_title(&self) -> &str {
        self.bus.cartridge().title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_header(cartridge_type: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = cartridge_type;
        rom
    }

    #[test]
    fn a_frame_is_exactly_70224_t_cycles() {
        let mut machine = Machine::new(&Config::default(), rom_with_header(0x00)).unwrap();
        // The first edge from reset (LY 0 -> 144) is short: 144*456 T-cycles.
        // 70224 is the period between *consecutive* edges (154*456).
        machine.step_until_frame();
        let cycles = machine.step_until_frame();
        assert_eq!(70224, cycles);
    }

    #[test]
    fn press_and_release_round_trip() {
        let mut machine = Machine::new(&Config::default(), rom_with_header(0x00)).unwrap();
        machine.press(Button::A);
        machine.release(Button::A);
    }
}
