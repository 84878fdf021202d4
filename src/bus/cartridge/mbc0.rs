// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! MBC0: a bare 32 KiB ROM with no banking and no controller logic.

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Unbanked cartridge controller: the whole ROM and RAM image is exposed
/// directly through the standard windows.
pub struct Mbc0;

impl Mbc0 {
    /// Reads directly from the flat ROM image; no banking applies.
    pub fn read_rom(rom: &[u8], address: u16) -> u8 {
        rom.get(address as usize).copied().unwrap_or(0xFF)
    }

    /// No-op: MBC0 has no bank-select registers to write.
    pub fn write_rom(&mut self, _address: u16, _value: u8) {
        // No bank-select registers to write.
    }

    /// Reads directly from cartridge RAM; no banking applies.
    pub fn read_ram(&self, ram: &[u8], address: u16) -> u8 {
        ram.get((address - 0xA000) as usize).copied().unwrap_or(0xFF)
    }

    /// Writes directly to cartridge RAM; no banking applies.
    pub fn write_ram(&mut self, ram: &mut [u8], address: u16, value: u8) {
        if let Some(slot) = ram.get_mut((address - 0xA000) as usize) {
            *slot = value;
        }
    }
}
