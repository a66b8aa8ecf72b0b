//! 8xyN and 7xnn. All arithmetic wraps at 8 bits. Whenever an operation sets
//! VF it is written after the result, so VF as a destination always ends up
//! holding the flag.
use crate::config::Quirks;
use crate::instruction::{AluOp, Reg};
use crate::state::{Registers, VF};

/// Vx += value, VF = carry out of bit 7
pub fn add(regs: &mut Registers, x: Reg, value: u8) {
    let (sum, carry) = regs.v[x].overflowing_add(value);
    regs.v[x] = sum;
    regs.set_flag(carry);
}

/// Vx -= value, VF = 1 when there was no borrow
pub fn sub(regs: &mut Registers, x: Reg, value: u8) {
    let (diff, borrow) = regs.v[x].overflowing_sub(value);
    regs.v[x] = diff;
    regs.set_flag(!borrow);
}

/// Vx = value - Vx, same flag convention as `sub`
pub fn reverse_sub(regs: &mut Registers, x: Reg, value: u8) {
    let (diff, borrow) = value.overflowing_sub(regs.v[x]);
    regs.v[x] = diff;
    regs.set_flag(!borrow);
}

pub fn shift_right(regs: &mut Registers, x: Reg, y: Reg, quirks: &Quirks) {
    if quirks.shift_uses_destination_register {
        let out = regs.v[x] & 0x01;
        regs.v[x] >>= 1;
        regs.v[VF] = out;
    } else {
        regs.v[x] = regs.v[y] >> 1;
    }
}

pub fn shift_left(regs: &mut Registers, x: Reg, y: Reg, quirks: &Quirks) {
    if quirks.shift_uses_destination_register {
        let out = regs.v[x] >> 7;
        regs.v[x] <<= 1;
        regs.v[VF] = out;
    } else {
        regs.v[x] = regs.v[y] << 1;
    }
}

/// one 8xyN instruction
pub fn execute(op: AluOp, regs: &mut Registers, x: Reg, y: Reg, quirks: &Quirks) {
    let vy = regs.v[y];
    match op {
        AluOp::Copy => regs.v[x] = vy,
        AluOp::Or => regs.v[x] |= vy,
        AluOp::And => regs.v[x] &= vy,
        AluOp::Xor => regs.v[x] ^= vy,
        AluOp::Add => add(regs, x, vy),
        AluOp::Sub => sub(regs, x, vy),
        AluOp::ReverseSub => reverse_sub(regs, x, vy),
        AluOp::ShiftRight => shift_right(regs, x, y, quirks),
        AluOp::ShiftLeft => shift_left(regs, x, y, quirks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs(x: u8, y: u8) -> Registers {
        let mut r = Registers::default();
        r.v[1] = x;
        r.v[2] = y;
        r
    }

    #[test]
    fn test_logic() {
        let q = Quirks::default();
        let mut r = regs(0b1100, 0b1010);
        execute(AluOp::Or, &mut r, 1, 2, &q);
        assert_eq!(r.v[1], 0b1110);
        let mut r = regs(0b1100, 0b1010);
        execute(AluOp::And, &mut r, 1, 2, &q);
        assert_eq!(r.v[1], 0b1000);
        let mut r = regs(0b1100, 0b1010);
        execute(AluOp::Xor, &mut r, 1, 2, &q);
        assert_eq!(r.v[1], 0b0110);
        let mut r = regs(0b1100, 0b1010);
        execute(AluOp::Copy, &mut r, 1, 2, &q);
        assert_eq!(r.v[1], 0b1010);
        // logic leaves the flag alone
        assert_eq!(r.v[VF], 0);
    }

    #[test]
    fn test_add_carry() {
        let mut r = regs(0xff, 0x02);
        execute(AluOp::Add, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0x01);
        assert_eq!(r.v[VF], 1);

        let mut r = regs(0x10, 0x02);
        r.v[VF] = 1;
        execute(AluOp::Add, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0x12);
        assert_eq!(r.v[VF], 0);
    }

    #[test]
    fn test_sub_no_borrow_flag() {
        let mut r = regs(0x05, 0x03);
        execute(AluOp::Sub, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0x02);
        assert_eq!(r.v[VF], 1);

        let mut r = regs(0x03, 0x05);
        execute(AluOp::Sub, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0xfe);
        assert_eq!(r.v[VF], 0);

        // equal operands don't borrow
        let mut r = regs(0x07, 0x07);
        execute(AluOp::Sub, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0);
        assert_eq!(r.v[VF], 1);
    }

    #[test]
    fn test_reverse_sub() {
        let mut r = regs(0x03, 0x05);
        execute(AluOp::ReverseSub, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0x02);
        assert_eq!(r.v[VF], 1);

        let mut r = regs(0x05, 0x03);
        execute(AluOp::ReverseSub, &mut r, 1, 2, &Quirks::default());
        assert_eq!(r.v[1], 0xfe);
        assert_eq!(r.v[VF], 0);
    }

    #[test]
    fn test_flag_wins_over_vf_destination() {
        let mut r = Registers::default();
        r.v[VF] = 0xff;
        r.v[2] = 0x01;
        execute(AluOp::Add, &mut r, VF, 2, &Quirks::default());
        assert_eq!(r.v[VF], 1);

        let mut r = Registers::default();
        r.v[VF] = 0x10;
        r.v[2] = 0x01;
        execute(AluOp::Sub, &mut r, VF, 2, &Quirks::default());
        assert_eq!(r.v[VF], 1);
    }

    #[test]
    fn test_shift_variants_differ() {
        let in_place = Quirks::default();
        let from_y = Quirks {
            shift_uses_destination_register: false,
            ..Quirks::default()
        };

        let mut a = regs(0b0000_0011, 0b1000_0000);
        execute(AluOp::ShiftRight, &mut a, 1, 2, &in_place);
        assert_eq!(a.v[1], 0b0000_0001);
        assert_eq!(a.v[VF], 1);

        let mut b = regs(0b0000_0011, 0b1000_0000);
        execute(AluOp::ShiftRight, &mut b, 1, 2, &from_y);
        assert_eq!(b.v[1], 0b0100_0000);
        assert_eq!(b.v[VF], 0);

        let mut a = regs(0b1000_0001, 0b0000_0011);
        execute(AluOp::ShiftLeft, &mut a, 1, 2, &in_place);
        assert_eq!(a.v[1], 0b0000_0010);
        assert_eq!(a.v[VF], 1);

        let mut b = regs(0b1000_0001, 0b0000_0011);
        execute(AluOp::ShiftLeft, &mut b, 1, 2, &from_y);
        assert_eq!(b.v[1], 0b0000_0110);
        assert_eq!(b.v[VF], 0);
    }

    #[test]
    fn test_shift_from_y_keeps_flag() {
        let q = Quirks {
            shift_uses_destination_register: false,
            ..Quirks::default()
        };
        let mut r = regs(0, 0xff);
        r.v[VF] = 0x42;
        execute(AluOp::ShiftLeft, &mut r, 1, 2, &q);
        assert_eq!(r.v[1], 0xfe);
        assert_eq!(r.v[VF], 0x42);
    }
}
