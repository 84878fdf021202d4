// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The memory bus: region dispatch, MMIO routing, OAM-DMA contention and the
//! boot-ROM overlay (`spec.md` §4.2).

#[macro_use]
pub mod memory_range;
pub mod cartridge;
pub mod dma;
pub mod interrupts;
pub mod joypad;
pub mod ppu;
pub mod ram;
pub mod timer;

use log::warn;

use self::cartridge::Cartridge;
use self::dma::OamDma;
use self::interrupts::{Interrupt, InterruptController};
use self::joypad::Joypad;
use self::memory_range::MemoryRange;
use self::ppu::Ppu;
use self::ram::{HighRam, WorkRam};
use self::timer::Timer;

use crate::config::Config;
use crate::serial::{NullSink, SerialSink};
use crate::time::{SystemTimeSource, TimeSource};

/// A device reachable through the bus's flat 16-bit address space.
pub trait Memory {
    /// Writes a byte to the device at the given absolute address.
    fn write(&mut self, address: u16, value: u8);
    /// Reads a byte from the device at the given absolute address.
    fn read(&self, address: u16) -> u8;
}

/// Bus location constants used by the region-dispatch macros below.
#[allow(missing_docs)]
pub mod consts {
    use super::*;

    pub const MMAP_ROM: MemoryRange = make_range!(0x0000, 0x7FFF);
    pub const MMAP_VIDEO_RAM: MemoryRange = make_range!(0x8000, 0x9FFF);
    pub const MMAP_CARTRIDGE_RAM: MemoryRange = make_range!(0xA000, 0xBFFF);
    pub const MMAP_WORK_RAM: MemoryRange = make_range!(0xC000, 0xDFFF);
    pub const MMAP_ECHO_RAM: MemoryRange = make_range!(0xE000, 0xFDFF);
    pub const MMAP_OAM: MemoryRange = make_range!(0xFE00, 0xFE9F);
    pub const MMAP_UNUSABLE: MemoryRange = make_range!(0xFEA0, 0xFEFF);
    pub const MMAP_TIMER: MemoryRange = make_range!(0xFF04, 0xFF07);
    pub const MMAP_PPU: MemoryRange = make_range!(0xFF40, 0xFF4B);
    pub const MMAP_HIGH_RAM: MemoryRange = make_range!(0xFF80, 0xFFFE);

    pub const IO_P1: u16 = 0xFF00;
    pub const IO_SB: u16 = 0xFF01;
    pub const IO_SC: u16 = 0xFF02;
    pub const IO_IF: u16 = 0xFF0F;
    pub const IO_BOOT_DISABLE: u16 = 0xFF50;
    pub const IO_IE: u16 = 0xFFFF;
}

use consts::*;

/// The Game Boy's 16-bit address space: cartridge, VRAM/OAM, RAM, and the
/// peripheral register pages, with OAM-DMA contention and the post-boot ROM
/// overlay enforced at dispatch time.
pub struct SystemBus {
    cartridge: Cartridge,
    ppu: Ppu,
    timer: Timer,
    joypad: Joypad,
    interrupts: InterruptController,
    work_ram: WorkRam,
    high_ram: HighRam,
    oam_dma: OamDma,

    boot_rom: Option<[u8; 256]>,
    boot_rom_active: bool,

    serial_data: u8,
    serial_control: u8,
    serial_sink: Box<dyn SerialSink>,

    time_source: Box<dyn TimeSource>,
}

impl SystemBus {
    /// Builds a bus around an already-loaded cartridge, applying the given
    /// configuration's palette and optional boot ROM.
    pub fn new(config: &Config, cartridge: Cartridge) -> Self {
        let mut ppu = Ppu::default();
        ppu.set_palette(config.palette);

        SystemBus {
            cartridge,
            ppu,
            timer: Timer::default(),
            joypad: Joypad::default(),
            interrupts: InterruptController::default(),
            work_ram: WorkRam::default(),
            high_ram: HighRam::default(),
            oam_dma: OamDma::default(),
            boot_rom_active: config.boot_rom.is_some(),
            boot_rom: config.boot_rom,
            serial_data: 0,
            serial_control: 0,
            serial_sink: Box::new(NullSink),
            time_source: Box::new(SystemTimeSource),
        }
    }

    /// Installs the sink that receives bytes transmitted over the serial
    /// port's debug-output path.
    pub fn set_serial_sink(&mut self, sink: Box<dyn SerialSink>) {
        self.serial_sink = sink;
    }

    /// Installs the time source driving the MBC3 real-time clock.
    pub fn set_time_source(&mut self, time_source: Box<dyn TimeSource>) {
        self.time_source = time_source;
    }

    /// The loaded cartridge.
    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Mutable access to the loaded cartridge, e.g. for restoring save RAM.
    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cartridge
    }

    /// The picture processing unit.
    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    /// Mutable access to the picture processing unit.
    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    /// Mutable access to the joypad, for input backends that bypass
    /// [`press_button`](Self::press_button)/[`release_button`](Self::release_button).
    pub fn joypad_mut(&mut self) -> &mut Joypad {
        &mut self.joypad
    }

    /// Marks `button` pressed, raising the Joypad interrupt on the press
    /// edge (`spec.md` §4.6).
    pub fn press_button(&mut self, button: joypad::Button) {
        self.joypad.press(button, &mut self.interrupts);
    }

    /// Marks `button` released.
    pub fn release_button(&mut self, button: joypad::Button) {
        self.joypad.release(button);
    }

    /// The interrupt controller.
    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    /// Mutable access to the interrupt controller; the CPU uses this to
    /// acknowledge a serviced interrupt.
    pub fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    /// Reads a byte, first advancing every device by 4 T-cycles. This is the
    /// only read path the CPU should use: it realizes the ordering guarantee
    /// that every memory access ticks timers/PPU/DMA before the CPU observes
    /// the result (`spec.md` §5).
    pub fn tick_read(&mut self, address: u16) -> u8 {
        self.advance_devices(4);
        self.gated_read(address)
    }

    /// Writes a byte, first advancing every device by 4 T-cycles.
    pub fn tick_write(&mut self, address: u16, value: u8) {
        self.advance_devices(4);
        self.gated_write(address, value);
    }

    /// Advances devices without performing any CPU-visible bus access, for
    /// internal delay cycles (e.g. branch-not-taken padding).
    pub fn tick_idle(&mut self, cycles: u32) {
        self.advance_devices(cycles);
    }

    /// Reads without advancing devices or applying DMA contention. Intended
    /// for frontend/debug inspection, not CPU execution.
    pub fn peek(&mut self, address: u16) -> u8 {
        self.raw_read(address)
    }

    /// Resets the DIV counter to 0, as `STOP` does (`spec.md` §4.5).
    pub fn stop_timer_divider(&mut self) {
        self.timer.write(timer::IO_DIV, 0);
    }

    fn advance_devices(&mut self, cycles: u32) {
        self.timer.tick(cycles, &mut self.interrupts);

        let dma_active = self.oam_dma.is_active();
        self.ppu.tick(cycles, &mut self.interrupts, dma_active);

        if dma_active {
            for step in self.oam_dma.tick(cycles) {
                let byte = self.raw_read(step.source);
                self.ppu.dma_write(step.oam_index, byte);
            }
        }
    }

    fn gated_read(&mut self, address: u16) -> u8 {
        if self.oam_dma.is_active() && !memory_offset_range!(MMAP_HIGH_RAM).contains(&(address as usize)) {
            return 0xFF;
        }
        self.raw_read(address)
    }

    fn gated_write(&mut self, address: u16, value: u8) {
        if self.oam_dma.is_active() && !memory_offset_range!(MMAP_HIGH_RAM).contains(&(address as usize)) {
            return;
        }
        self.raw_write(address, value);
    }

    fn raw_read(&mut self, address: u16) -> u8 {
        match address {
            0x0000..=0x00FF if self.boot_rom_active => {
                self.boot_rom.map(|rom| rom[address as usize]).unwrap_or(0xFF)
            }
            memory_range!(MMAP_ROM) => self.cartridge.read_rom(address),
            // Checked ahead of MMAP_PPU: 0xFF46 falls inside that range but
            // is the DMA trigger register, not a PPU register.
            dma::IO_DMA => self.oam_dma.source_register(),
            memory_range!(MMAP_VIDEO_RAM) | memory_range!(MMAP_OAM) | memory_range!(MMAP_PPU) => {
                self.ppu.read(address)
            }
            memory_range!(MMAP_CARTRIDGE_RAM) => {
                self.cartridge.read_ram(address, self.time_source.as_ref())
            }
            memory_range!(MMAP_WORK_RAM) => self.work_ram.read(address),
            memory_range!(MMAP_ECHO_RAM) => self.work_ram.read(address - 0x2000),
            memory_range!(MMAP_UNUSABLE) => 0xFF,
            IO_P1 => self.joypad.read(address),
            IO_SB => self.serial_data,
            IO_SC => 0x7E | self.serial_control,
            memory_range!(MMAP_TIMER) => self.timer.read(address),
            IO_IF => self.interrupts.read(address),
            IO_BOOT_DISABLE => 0xFF,
            IO_IE => self.interrupts.read(address),
            memory_range!(MMAP_HIGH_RAM) => self.high_ram.read(address),
            _ => 0xFF,
        }
    }

    fn raw_write(&mut self, address: u16, value: u8) {
        match address {
            memory_range!(MMAP_ROM) => self.cartridge.write_rom(address, value),
            // Checked ahead of MMAP_PPU: 0xFF46 falls inside that range but
            // is the DMA trigger register, not a PPU register.
            dma::IO_DMA => self.oam_dma.trigger(value),
            memory_range!(MMAP_VIDEO_RAM) | memory_range!(MMAP_OAM) | memory_range!(MMAP_PPU) => {
                self.ppu.write(address, value)
            }
            memory_range!(MMAP_CARTRIDGE_RAM) => {
                self.cartridge.write_ram(address, value, self.time_source.as_ref())
            }
            memory_range!(MMAP_WORK_RAM) => self.work_ram.write(address, value),
            memory_range!(MMAP_ECHO_RAM) => self.work_ram.write(address - 0x2000, value),
            memory_range!(MMAP_UNUSABLE) => {}
            IO_P1 => self.joypad.write(address, value),
            IO_SB => self.serial_data = value,
            IO_SC => self.write_serial_control(value),
            memory_range!(MMAP_TIMER) => self.timer.write(address, value),
            IO_IF => self.interrupts.write(address, value),
            IO_BOOT_DISABLE => self.boot_rom_active = false,
            IO_IE => self.interrupts.write(address, value),
            memory_range!(MMAP_HIGH_RAM) => self.high_ram.write(address, value),
            _ => warn!("write to unmapped I/O register 0x{address:04x} (value 0x{value:02x})"),
        }
    }

    /// Writing SC with bit 7 set instantly "transmits" SB to the attached
    /// sink and raises the Serial interrupt; real hardware shifts bits out
    /// over ~8 internal-clock periods, a simplification `spec.md` §4.2
    /// explicitly sanctions.
    fn write_serial_control(&mut self, value: u8) {
        self.serial_control = value & 0x7F;
        if value & 0x80 != 0 {
            self.serial_sink.write_byte(self.serial_data);
            self.interrupts.request(Interrupt::Serial);
        }
    }
}

#[cfg(test)]
impl SystemBus {
    /// Writes each byte of `data` at sequential addresses, advancing devices
    /// between each write, for building test fixtures.
    pub fn write_all(&mut self, address: u16, data: &[u8]) {
        for (offset, byte) in data.iter().enumerate() {
            self.tick_write(address + offset as u16, *byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::cartridge::Cartridge;

    fn rom_with_header(cartridge_type: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = cartridge_type;
        rom
    }

    fn test_bus() -> SystemBus {
        let cartridge = Cartridge::load(rom_with_header(0x00)).unwrap();
        SystemBus::new(&Config::default(), cartridge)
    }

    #[test]
    fn echo_ram_mirrors_work_ram() {
        let mut bus = test_bus();
        bus.tick_write(0xC010, 0x42);
        assert_eq!(0x42, bus.tick_read(0xE010));

        bus.tick_write(0xE020, 0x55);
        assert_eq!(0x55, bus.tick_read(0xC020));
    }

    #[test]
    fn dma_blocks_non_hram_access_during_transfer() {
        let mut bus = test_bus();
        bus.tick_write(0xC000, 0xAB);
        bus.tick_write(dma::IO_DMA, 0x80);

        assert_eq!(0xFF, bus.tick_read(0xC000));
        bus.tick_write(0xFF81, 0x12);
        assert_eq!(0x12, bus.tick_read(0xFF81));
    }

    #[test]
    fn boot_rom_overlays_cartridge_until_disabled() {
        let mut config = Config::default();
        let mut boot = [0u8; 256];
        boot[0] = 0xAA;
        config.boot_rom = Some(boot);
        let cartridge = Cartridge::load(rom_with_header(0x00)).unwrap();
        let mut bus = SystemBus::new(&config, cartridge);

        assert_eq!(0xAA, bus.tick_read(0x0000));
        bus.tick_write(IO_BOOT_DISABLE, 1);
        assert_ne!(0xAA, bus.tick_read(0x0000));
    }

    #[test]
    fn serial_transfer_requests_interrupt_and_reaches_sink() {
        use crate::serial::BufferSink;

        let mut bus = test_bus();
        bus.set_serial_sink(Box::new(BufferSink::new()));
        bus.tick_write(IO_SB, b'A');
        bus.tick_write(IO_SC, 0x81);

        assert_ne!(0, bus.interrupts().pending_raw() & Interrupt::Serial.mask());
    }
}
