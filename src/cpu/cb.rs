// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The CB-prefixed rotate/shift/bit/res/set operations (`spec.md` §4.1,
//! "Rotates and shifts (CB prefix)").

use super::alu;
use super::registers::Flags;

/// The eight rotate/shift kinds selected by `y` when `x == 0` in a CB
/// opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    /// `RLC`.
    Rlc,
    /// `RRC`.
    Rrc,
    /// `RL`.
    Rl,
    /// `RR`.
    Rr,
    /// `SLA`.
    Sla,
    /// `SRA`.
    Sra,
    /// `SWAP`.
    Swap,
    /// `SRL`.
    Srl,
}

impl ShiftOp {
    /// Maps a 3-bit `y` field to its rotate/shift kind.
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }

    /// Applies the operation to `v`, updating `flags` as the opcode would.
    pub fn apply(self, v: u8, flags: &mut Flags) -> u8 {
        match self {
            ShiftOp::Rlc => alu::rlc(v, flags),
            ShiftOp::Rrc => alu::rrc(v, flags),
            ShiftOp::Rl => alu::rl(v, flags),
            ShiftOp::Rr => alu::rr(v, flags),
            ShiftOp::Sla => alu::sla(v, flags),
            ShiftOp::Sra => alu::sra(v, flags),
            ShiftOp::Swap => alu::swap(v, flags),
            ShiftOp::Srl => alu::srl(v, flags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_nibbles_and_clears_carry() {
        let mut flags = Flags::CARRY;
        let result = ShiftOp::Swap.apply(0xA5, &mut flags);
        assert_eq!(0x5A, result);
        assert!(!flags.contains(Flags::CARRY));
    }

    #[test]
    fn sra_preserves_sign_bit() {
        let mut flags = Flags::empty();
        let result = ShiftOp::Sra.apply(0b1000_0001, &mut flags);
        assert_eq!(0b1100_0000, result);
        assert!(flags.contains(Flags::CARRY));
    }

    #[test]
    fn srl_injects_zero() {
        let mut flags = Flags::empty();
        let result = ShiftOp::Srl.apply(0b1000_0001, &mut flags);
        assert_eq!(0b0100_0000, result);
        assert!(flags.contains(Flags::CARRY));
    }
}
