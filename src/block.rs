//! instructions that move runs of bytes between registers and memory at I
use crate::config::Quirks;
use crate::error::Chip8Error;
use crate::instruction::Reg;
use crate::memory::{MemoryMap, FONT_ADDR, FONT_GLYPH_BYTES};
use crate::state::Registers;

/// Fx33: hundreds, tens, ones of `value` to I, I+1, I+2
pub fn store_bcd<M: MemoryMap + ?Sized>(
    mem: &mut M,
    regs: &mut Registers,
    value: u8,
    quirks: &Quirks,
) -> Result<(), Chip8Error> {
    let digits = [value / 100, value / 10 % 10, value % 10];
    mem.write(&digits, regs.index as usize)?;
    if !quirks.block_ops_preserve_index_pointer {
        regs.index = regs.index.wrapping_add(digits.len() as u16);
    }
    Ok(())
}

/// Fx55: V[lo]..=V[hi] to memory at I, ascending. stops at the first byte
/// that would land outside memory
pub fn store_registers<M: MemoryMap + ?Sized>(
    mem: &mut M,
    regs: &mut Registers,
    lo: Reg,
    hi: Reg,
    quirks: &Quirks,
) -> Result<(), Chip8Error> {
    let mut addr = regs.index as usize;
    for r in lo..=hi {
        mem.set_byte(addr, regs.v[r])?;
        addr += 1;
    }
    advance_index(regs, lo, hi, quirks);
    Ok(())
}

/// Fx65: memory at I to V[lo]..=V[hi], ascending. registers already loaded
/// keep their new values if a later byte is out of range
pub fn recall_registers<M: MemoryMap + ?Sized>(
    mem: &M,
    regs: &mut Registers,
    lo: Reg,
    hi: Reg,
    quirks: &Quirks,
) -> Result<(), Chip8Error> {
    let mut addr = regs.index as usize;
    for r in lo..=hi {
        regs.v[r] = mem.get_byte(addr)?;
        addr += 1;
    }
    advance_index(regs, lo, hi, quirks);
    Ok(())
}

fn advance_index(regs: &mut Registers, lo: Reg, hi: Reg, quirks: &Quirks) {
    if !quirks.block_ops_preserve_index_pointer {
        regs.index = regs.index.wrapping_add((hi - lo + 1) as u16);
    }
}

/// Fx29: where the glyph for the low nibble of `digit` lives
pub fn font_address(digit: u8) -> u16 {
    FONT_ADDR + (digit & 0xf) as u16 * FONT_GLYPH_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Chip8MemoryMap, MEM_SIZE};

    fn advancing() -> Quirks {
        Quirks {
            block_ops_preserve_index_pointer: false,
            ..Quirks::default()
        }
    }

    #[test]
    fn test_bcd() -> Result<(), Chip8Error> {
        let mut m = Chip8MemoryMap::new();
        let mut r = Registers::default();
        r.index = 0x300;
        store_bcd(&mut m, &mut r, 254, &Quirks::default())?;
        assert_eq!(m.get_ro_slice(0x300, 3)?, &[2, 5, 4]);
        assert_eq!(r.index, 0x300);

        store_bcd(&mut m, &mut r, 7, &advancing())?;
        assert_eq!(m.get_ro_slice(0x300, 3)?, &[0, 0, 7]);
        assert_eq!(r.index, 0x303);
        Ok(())
    }

    #[test]
    fn test_bcd_out_of_range() {
        let mut m = Chip8MemoryMap::new();
        let mut r = Registers::default();
        r.index = 0xfffe;
        assert_eq!(
            store_bcd(&mut m, &mut r, 100, &Quirks::default()),
            Err(Chip8Error::OutOfRange { addr: MEM_SIZE })
        );
    }

    #[test]
    fn test_store_and_recall() -> Result<(), Chip8Error> {
        let mut m = Chip8MemoryMap::new();
        let mut r = Registers::default();
        r.v[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        r.index = 0x800;
        store_registers(&mut m, &mut r, 0, 3, &Quirks::default())?;
        assert_eq!(m.get_ro_slice(0x800, 5)?, &[0xde, 0xad, 0xbe, 0xef, 0]);
        assert_eq!(r.index, 0x800);

        let mut back = Registers::default();
        back.index = 0x801;
        recall_registers(&m, &mut back, 0, 2, &advancing())?;
        assert_eq!(back.v[..4], [0xad, 0xbe, 0xef, 0]);
        assert_eq!(back.index, 0x804);
        Ok(())
    }

    #[test]
    fn test_store_advances_index() -> Result<(), Chip8Error> {
        let mut m = Chip8MemoryMap::new();
        let mut r = Registers::default();
        r.index = 0x800;
        store_registers(&mut m, &mut r, 0, 0xf, &advancing())?;
        assert_eq!(r.index, 0x810);
        Ok(())
    }

    #[test]
    fn test_store_stops_at_end_of_memory() {
        let mut m = Chip8MemoryMap::new();
        let mut r = Registers::default();
        r.v[..3].copy_from_slice(&[1, 2, 3]);
        r.index = 0xfffe;
        assert_eq!(
            store_registers(&mut m, &mut r, 0, 2, &advancing()),
            Err(Chip8Error::OutOfRange { addr: 0x10000 })
        );
        // the bytes that fit were written, I didn't move
        assert_eq!(m.get_ro_slice(0xfffe, 2), Ok(&[1u8, 2][..]));
        assert_eq!(r.index, 0xfffe);
    }

    #[test]
    fn test_recall_stops_at_end_of_memory() {
        let mut m = Chip8MemoryMap::new();
        let _ = m.set_byte(0xffff, 9);
        let mut r = Registers::default();
        r.index = 0xffff;
        assert_eq!(
            recall_registers(&m, &mut r, 0, 1, &Quirks::default()),
            Err(Chip8Error::OutOfRange { addr: 0x10000 })
        );
        assert_eq!(r.v[0], 9);
        assert_eq!(r.v[1], 0);
    }

    #[test]
    fn test_font_address() -> Result<(), Chip8Error> {
        let m = Chip8MemoryMap::new();
        assert_eq!(font_address(0), FONT_ADDR);
        assert_eq!(font_address(0xa), FONT_ADDR + 50);
        // only the low nibble picks the glyph
        assert_eq!(font_address(0x1a), FONT_ADDR + 50);
        assert_eq!(
            m.get_ro_slice(font_address(1) as usize, 5)?,
            &[0x20, 0x60, 0x20, 0x20, 0x70]
        );
        Ok(())
    }
}
