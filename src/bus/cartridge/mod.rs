// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Cartridge header parsing and memory bank controller dispatch
//! (`spec.md` §4.3).

pub mod mbc0;
pub mod mbc1;
pub mod mbc3;
pub mod mbc5;
pub mod rtc;

use log::{info, warn};

use self::mbc0::Mbc0;
use self::mbc1::Mbc1;
use self::mbc3::Mbc3;
use self::mbc5::Mbc5;
use crate::error::CartridgeError;
use crate::time::TimeSource;

const HEADER_TITLE: std::ops::Range<usize> = 0x134..0x144;
const HEADER_CARTRIDGE_TYPE: usize = 0x147;
const HEADER_ROM_SIZE: usize = 0x148;
const HEADER_RAM_SIZE: usize = 0x149;
const HEADER_LEN: usize = 0x150;

/// The memory bank controller driving a loaded cartridge.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Mbc {
    Mbc0(Mbc0),
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

fn mbc_kind(cartridge_type: u8) -> Result<fn() -> Mbc, CartridgeError> {
    match cartridge_type {
        0x00 => Ok(|| Mbc::Mbc0(Mbc0::default())),
        0x01..=0x03 => Ok(|| Mbc::Mbc1(Mbc1::default())),
        0x0F..=0x13 => Ok(|| Mbc::Mbc3(Mbc3::default())),
        0x19..=0x1B => Ok(|| Mbc::Mbc5(Mbc5::default())),
        other => Err(CartridgeError::UnsupportedMbc(other)),
    }
}

fn rom_size_bytes(code: u8) -> Result<usize, CartridgeError> {
    match code {
        0x00..=0x08 => Ok(0x8000 << code),
        0x52 => Ok(1152 * 1024),
        0x53 => Ok(1280 * 1024),
        0x54 => Ok(1536 * 1024),
        other => Err(CartridgeError::BadRomSize(other)),
    }
}

fn ram_size_bytes(code: u8) -> Result<usize, CartridgeError> {
    match code {
        0x00 => Ok(0),
        0x01 => Ok(2 * 1024),
        0x02 => Ok(8 * 1024),
        0x03 => Ok(32 * 1024),
        0x04 => Ok(128 * 1024),
        0x05 => Ok(64 * 1024),
        other => Err(CartridgeError::BadRamSize(other)),
    }
}

/// A loaded Game Boy cartridge: the ROM image, cartridge RAM, and the MBC
/// that banks them into the CPU's address space.
#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
    ram: Vec<u8>,
    mbc: Mbc,
    title: String,
}

impl Cartridge {
    /// Parses the header and constructs a cartridge from a raw ROM image.
    pub fn load(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        if rom.len() < HEADER_LEN {
            return Err(CartridgeError::TooShort(rom.len()));
        }

        let cartridge_type = rom[HEADER_CARTRIDGE_TYPE];
        let make_mbc = mbc_kind(cartridge_type)?;
        let ram_size = ram_size_bytes(rom[HEADER_RAM_SIZE])?;
        let declared_rom_size = rom_size_bytes(rom[HEADER_ROM_SIZE])?;

        if declared_rom_size != rom.len() {
            warn!(
                "cartridge header declares {declared_rom_size} byte ROM but image is {} bytes",
                rom.len()
            );
        }

        let title = String::from_utf8_lossy(&rom[HEADER_TITLE])
            .trim_end_matches('\0')
            .to_string();

        info!(
            "loaded cartridge \"{title}\" type=0x{cartridge_type:02x} rom={} ram={ram_size}",
            rom.len()
        );

        Ok(Cartridge {
            rom,
            ram: vec![0; ram_size],
            mbc: make_mbc(),
            title,
        })
    }

    /// The cartridge title from the header's ASCII title field.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The persisted cartridge RAM contents, suitable for battery-backed
    /// save files.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Overwrites cartridge RAM, e.g. when restoring a battery save.
    pub fn load_ram(&mut self, data: &[u8]) {
        let len = self.ram.len().min(data.len());
        self.ram[..len].copy_from_slice(&data[..len]);
    }

    /// Reads a byte through the ROM window (`0x0000..=0x7FFF`), banked
    /// according to the active MBC's current register state.
    pub fn read_rom(&self, address: u16) -> u8 {
        match &self.mbc {
            Mbc::Mbc0(_) => Mbc0::read_rom(&self.rom, address),
            Mbc::Mbc1(mbc) => mbc.read_rom(&self.rom, address),
            Mbc::Mbc3(mbc) => mbc.read_rom(&self.rom, address),
            Mbc::Mbc5(mbc) => mbc.read_rom(&self.rom, address),
        }
    }

    /// Writes to the ROM window; on every MBC this updates banking
    /// registers rather than the ROM image itself.
    pub fn write_rom(&mut self, address: u16, value: u8) {
        match &mut self.mbc {
            Mbc::Mbc0(mbc) => mbc.write_rom(address, value),
            Mbc::Mbc1(mbc) => mbc.write_rom(address, value),
            Mbc::Mbc3(mbc) => mbc.write_rom(address, value),
            Mbc::Mbc5(mbc) => mbc.write_rom(address, value),
        }
    }

    /// Reads a byte from cartridge RAM (`0xA000..=0xBFFF`), or `0xFF` if RAM
    /// is disabled, absent, or (on MBC3) the RTC register latch is selected.
    pub fn read_ram(&mut self, address: u16, time: &dyn TimeSource) -> u8 {
        match &mut self.mbc {
            Mbc::Mbc0(mbc) => mbc.read_ram(&self.ram, address),
            Mbc::Mbc1(mbc) => mbc.read_ram(&self.rom, &self.ram, address),
            Mbc::Mbc3(mbc) => mbc.read_ram(&self.ram, address, time),
            Mbc::Mbc5(mbc) => mbc.read_ram(&self.ram, address),
        }
    }

    /// Writes a byte to cartridge RAM, a no-op if RAM is disabled or absent.
    pub fn write_ram(&mut self, address: u16, value: u8, time: &dyn TimeSource) {
        match &mut self.mbc {
            Mbc::Mbc0(mbc) => mbc.write_ram(&mut self.ram, address, value),
            Mbc::Mbc1(mbc) => mbc.write_ram(&self.rom, &mut self.ram, address, value),
            Mbc::Mbc3(mbc) => mbc.write_ram(&mut self.ram, address, value, time),
            Mbc::Mbc5(mbc) => mbc.write_ram(&mut self.ram, address, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TestClock;

    fn rom_with_header(cartridge_type: u8, rom_size_code: u8, ram_size_code: u8) -> Vec<u8> {
        let size = rom_size_bytes(rom_size_code).unwrap();
        let mut rom = vec![0u8; size.max(HEADER_LEN)];
        rom[HEADER_CARTRIDGE_TYPE] = cartridge_type;
        rom[HEADER_ROM_SIZE] = rom_size_code;
        rom[HEADER_RAM_SIZE] = ram_size_code;
        rom
    }

    #[test]
    fn rejects_too_short_rom() {
        let err = Cartridge::load(vec![0u8; 10]).unwrap_err();
        assert_eq!(CartridgeError::TooShort(10), err);
    }

    #[test]
    fn rejects_unsupported_mbc() {
        let rom = rom_with_header(0xFE, 0x00, 0x00);
        assert!(matches!(
            Cartridge::load(rom),
            Err(CartridgeError::UnsupportedMbc(0xFE))
        ));
    }

    #[test]
    fn mbc0_round_trips_ram() {
        let rom = rom_with_header(0x00, 0x00, 0x02);
        let mut cart = Cartridge::load(rom).unwrap();
        let clock = TestClock::new(0);
        cart.write_ram(0xA000, 0x42, &clock);
        assert_eq!(0x42, cart.read_ram(0xA000, &clock));
    }

    #[test]
    fn oversize_rom_codes_are_accepted() {
        assert_eq!(1152 * 1024, rom_size_bytes(0x52).unwrap());
        assert_eq!(1280 * 1024, rom_size_bytes(0x53).unwrap());
        assert_eq!(1536 * 1024, rom_size_bytes(0x54).unwrap());
    }
}
