// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced at the crate's boundary.
//!
//! `step` itself never fails: undefined opcodes, out-of-range bank accesses
//! and unmapped MMIO are handled by returning a documented sentinel value and
//! logging, not by propagating an error. The only fallible entry points are
//! cartridge loading and (with the `serde` feature) save-state restore.

/// Failure loading a cartridge image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    /// The buffer is too short to contain a header.
    #[error("ROM is too short to contain a header: {0} bytes")]
    TooShort(usize),
    /// The cartridge type byte at 0x0147 does not map to a supported MBC.
    #[error("unsupported cartridge type byte: 0x{0:02x}")]
    UnsupportedMbc(u8),
    /// The ROM size byte at 0x0148 is not a recognized value.
    #[error("unrecognized ROM size byte: 0x{0:02x}")]
    BadRomSize(u8),
    /// The RAM size byte at 0x0149 is not a recognized value.
    #[error("unrecognized RAM size byte: 0x{0:02x}")]
    BadRamSize(u8),
}
