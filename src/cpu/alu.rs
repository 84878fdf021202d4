// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Pure arithmetic and logic helpers, each computing a result and setting
//! `Flags` the way a single SM83 instruction would (`spec.md` §4.1, "Flag
//! semantics (full)").

use super::registers::Flags;

/// The eight operations selected by the `y` field of `0x80..=0xBF` and
/// `0xC6`/`0xCE`/.../`0xFE` (`spec.md` §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    /// `ADD A,r`.
    Add,
    /// `ADC A,r`.
    Adc,
    /// `SUB r`.
    Sub,
    /// `SBC A,r`.
    Sbc,
    /// `AND r`.
    And,
    /// `XOR r`.
    Xor,
    /// `OR r`.
    Or,
    /// `CP r`.
    Cp,
}

impl AluOp {
    /// Maps a 3-bit `y` field to its ALU operation.
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    /// Applies the operation to `a` and `operand`, updating `flags`.
    /// Returns the result; for `Cp` the caller discards it and keeps `a`.
    pub fn apply(self, a: u8, operand: u8, flags: &mut Flags) -> u8 {
        match self {
            AluOp::Add => add(a, operand, flags),
            AluOp::Adc => adc(a, operand, flags),
            AluOp::Sub => sub(a, operand, flags),
            AluOp::Sbc => sbc(a, operand, flags),
            AluOp::And => and(a, operand, flags),
            AluOp::Xor => xor(a, operand, flags),
            AluOp::Or => or(a, operand, flags),
            AluOp::Cp => sub(a, operand, flags),
        }
    }
}

/// `ADD A,r`: sets Z/H/C from the 8-bit sum, clears N.
pub fn add(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let (result, carry) = a.overflowing_add(b);
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, (a & 0x0F) + (b & 0x0F) > 0x0F);
    flags.set(Flags::CARRY, carry);
    result
}

/// `ADC A,r`: like [`add`] but folds in the incoming carry flag.
pub fn adc(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let carry_in = flags.contains(Flags::CARRY) as u16;
    let wide = a as u16 + b as u16 + carry_in;
    let result = wide as u8;
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, (a & 0x0F) + (b & 0x0F) + carry_in as u8 > 0x0F);
    flags.set(Flags::CARRY, wide > 0xFF);
    result
}

/// `SUB r`: sets Z/H/C from the 8-bit difference, sets N.
pub fn sub(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let (result, borrow) = a.overflowing_sub(b);
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, true);
    flags.set(Flags::HALF_CARRY, (a & 0x0F) < (b & 0x0F));
    flags.set(Flags::CARRY, borrow);
    result
}

/// `SBC A,r`: like [`sub`] but folds in the incoming carry flag.
pub fn sbc(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let carry_in = flags.contains(Flags::CARRY) as i16;
    let wide = a as i16 - b as i16 - carry_in;
    let result = wide as u8;
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, true);
    flags.set(
        Flags::HALF_CARRY,
        (a as i16 & 0x0F) - (b as i16 & 0x0F) - carry_in < 0,
    );
    flags.set(Flags::CARRY, wide < 0);
    result
}

/// `AND r`: bitwise AND, always sets H and clears C.
pub fn and(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let result = a & b;
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.insert(Flags::HALF_CARRY);
    flags.set(Flags::CARRY, false);
    result
}

/// `OR r`: bitwise OR, clears N/H/C.
pub fn or(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let result = a | b;
    flags.set(Flags::ZERO, result == 0);
    flags.remove(Flags::SUBTRACT | Flags::HALF_CARRY | Flags::CARRY);
    result
}

/// `XOR r`: bitwise XOR, clears N/H/C.
pub fn xor(a: u8, b: u8, flags: &mut Flags) -> u8 {
    let result = a ^ b;
    flags.set(Flags::ZERO, result == 0);
    flags.remove(Flags::SUBTRACT | Flags::HALF_CARRY | Flags::CARRY);
    result
}

/// `INC r`: like `add(a, 1, ..)` but never touches the carry flag.
pub fn inc8(a: u8, flags: &mut Flags) -> u8 {
    let result = a.wrapping_add(1);
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, a & 0x0F == 0x0F);
    result
}

/// `DEC r`: like `sub(a, 1, ..)` but never touches the carry flag.
pub fn dec8(a: u8, flags: &mut Flags) -> u8 {
    let result = a.wrapping_sub(1);
    flags.set(Flags::ZERO, result == 0);
    flags.insert(Flags::SUBTRACT);
    flags.set(Flags::HALF_CARRY, a & 0x0F == 0x00);
    result
}

/// `ADD HL,rp`: Z is left untouched by the caller; H/C carry out of bits
/// 11/15 instead of 3/7.
pub fn add16(hl: u16, rp: u16, flags: &mut Flags) -> u16 {
    let (result, carry) = hl.overflowing_add(rp);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, (hl & 0x0FFF) + (rp & 0x0FFF) > 0x0FFF);
    flags.set(Flags::CARRY, carry);
    result
}

/// Shared by `ADD SP,e` and `LD HL,SP+e`: H/C are computed as an 8-bit add of
/// SP's low byte against the unsigned reinterpretation of the displacement.
pub fn add_sp_signed(sp: u16, e: i8, flags: &mut Flags) -> u16 {
    let e16 = e as i16 as u16;
    let result = sp.wrapping_add(e16);
    let sp_low = sp as u8;
    let e8 = e as u8;
    flags.set(Flags::ZERO, false);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, (sp_low & 0x0F) + (e8 & 0x0F) > 0x0F);
    flags.set(Flags::CARRY, (sp_low as u16) + (e8 as u16) > 0xFF);
    result
}

/// `DAA`: BCD-adjusts `A` after an add or subtract, per the preceding
/// op's N/H/C flags.
pub fn daa(a: u8, flags: &mut Flags) -> u8 {
    let mut result = a;
    let mut carry = flags.contains(Flags::CARRY);

    if !flags.contains(Flags::SUBTRACT) {
        if carry || result > 0x99 {
            result = result.wrapping_add(0x60);
            carry = true;
        }
        if flags.contains(Flags::HALF_CARRY) || (result & 0x0F) > 0x09 {
            result = result.wrapping_add(0x06);
        }
    } else {
        if carry {
            result = result.wrapping_sub(0x60);
        }
        if flags.contains(Flags::HALF_CARRY) {
            result = result.wrapping_sub(0x06);
        }
    }

    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::HALF_CARRY, false);
    flags.set(Flags::CARRY, carry);
    result
}

/// `CPL`: bitwise-complements `A`.
pub fn cpl(a: u8, flags: &mut Flags) -> u8 {
    flags.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
    !a
}

/// `RLC r`: rotates left, carry out becomes bit 0 and the flag.
pub fn rlc(v: u8, flags: &mut Flags) -> u8 {
    let carry = v & 0x80 != 0;
    let result = v.rotate_left(1);
    set_shift_flags(flags, result, carry);
    result
}

/// `RRC r`: rotates right, carry out becomes bit 7 and the flag.
pub fn rrc(v: u8, flags: &mut Flags) -> u8 {
    let carry = v & 0x01 != 0;
    let result = v.rotate_right(1);
    set_shift_flags(flags, result, carry);
    result
}

/// `RL r`: rotates left through the carry flag.
pub fn rl(v: u8, flags: &mut Flags) -> u8 {
    let carry_in = flags.contains(Flags::CARRY) as u8;
    let carry_out = v & 0x80 != 0;
    let result = (v << 1) | carry_in;
    set_shift_flags(flags, result, carry_out);
    result
}

/// `RR r`: rotates right through the carry flag.
pub fn rr(v: u8, flags: &mut Flags) -> u8 {
    let carry_in = flags.contains(Flags::CARRY) as u8;
    let carry_out = v & 0x01 != 0;
    let result = (v >> 1) | (carry_in << 7);
    set_shift_flags(flags, result, carry_out);
    result
}

/// `SLA r`: arithmetic shift left, bit 0 filled with 0.
pub fn sla(v: u8, flags: &mut Flags) -> u8 {
    let carry = v & 0x80 != 0;
    let result = v << 1;
    set_shift_flags(flags, result, carry);
    result
}

/// `SRA r`: arithmetic shift right, bit 7 (sign) preserved.
pub fn sra(v: u8, flags: &mut Flags) -> u8 {
    let carry = v & 0x01 != 0;
    let result = (v >> 1) | (v & 0x80);
    set_shift_flags(flags, result, carry);
    result
}

/// `SWAP r`: exchanges the high and low nibbles, clears N/H/C.
pub fn swap(v: u8, flags: &mut Flags) -> u8 {
    let result = v.rotate_left(4);
    flags.set(Flags::ZERO, result == 0);
    flags.remove(Flags::SUBTRACT | Flags::HALF_CARRY | Flags::CARRY);
    result
}

/// `SRL r`: logical shift right, bit 7 filled with 0.
pub fn srl(v: u8, flags: &mut Flags) -> u8 {
    let carry = v & 0x01 != 0;
    let result = v >> 1;
    set_shift_flags(flags, result, carry);
    result
}

fn set_shift_flags(flags: &mut Flags, result: u8, carry: bool) {
    flags.set(Flags::ZERO, result == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.set(Flags::HALF_CARRY, false);
    flags.set(Flags::CARRY, carry);
}

/// `BIT n,r`: sets Z to the complement of bit `n`, always sets H, clears N.
pub fn bit(v: u8, n: u8, flags: &mut Flags) {
    flags.set(Flags::ZERO, v & (1 << n) == 0);
    flags.set(Flags::SUBTRACT, false);
    flags.insert(Flags::HALF_CARRY);
}

/// `RES n,r`: clears bit `n`. Flags unaffected.
pub fn res(v: u8, n: u8) -> u8 {
    v & !(1 << n)
}

/// `SET n,r`: sets bit `n`. Flags unaffected.
pub fn set_bit(v: u8, n: u8) -> u8 {
    v | (1 << n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sets_half_and_full_carry() {
        let mut flags = Flags::empty();
        assert_eq!(0x10, add(0x0F, 0x01, &mut flags));
        assert!(flags.contains(Flags::HALF_CARRY));
        assert!(!flags.contains(Flags::CARRY));
        assert!(!flags.contains(Flags::ZERO));
    }

    #[test]
    fn add_sub_round_trip_when_no_overflow() {
        let mut flags = Flags::empty();
        let a = 0x42;
        let added = add(a, 0x10, &mut flags);
        let restored = sub(added, 0x10, &mut flags);
        assert_eq!(a, restored);
    }

    #[test]
    fn daa_corrects_bcd_addition() {
        let mut flags = Flags::empty();
        let sum = add(0x45, 0x38, &mut flags); // BCD 45 + 38 = 0x7D binary
        let corrected = daa(sum, &mut flags);
        assert_eq!(0x83, corrected); // BCD 83
        assert!(!flags.contains(Flags::CARRY));
    }

    #[test]
    fn inc8_never_touches_carry() {
        let mut flags = Flags::CARRY;
        let result = inc8(0xFF, &mut flags);
        assert_eq!(0x00, result);
        assert!(flags.contains(Flags::ZERO));
        assert!(flags.contains(Flags::CARRY));
    }

    #[test]
    fn add16_carries_out_of_bit_eleven_and_fifteen() {
        let mut flags = Flags::empty();
        let result = add16(0x0FFF, 0x0001, &mut flags);
        assert_eq!(0x1000, result);
        assert!(flags.contains(Flags::HALF_CARRY));
        assert!(!flags.contains(Flags::CARRY));
    }

    #[test]
    fn bit_sets_zero_when_bit_clear() {
        let mut flags = Flags::empty();
        bit(0b0000_0000, 3, &mut flags);
        assert!(flags.contains(Flags::ZERO));
        assert!(flags.contains(Flags::HALF_CARRY));
    }
}
