//! jumps, calls, returns and skips. every check happens before anything is
//! written, so a failed instruction leaves the registers and stack as they were.
//!
//! these run after the fetch, so `regs.pc` already points past the instruction
use crate::error::Chip8Error;
use crate::memory::is_executable;
use crate::state::{Registers, Stack};

/// how far a skip moves the program counter
pub const INSTRUCTION_BYTES: u16 = 2;

pub fn jump(regs: &mut Registers, addr: usize) -> Result<(), Chip8Error> {
    if !is_executable(addr) {
        return Err(Chip8Error::OutOfRange { addr });
    }
    regs.pc = addr as u16;
    Ok(())
}

pub fn call(regs: &mut Registers, stack: &mut Stack, addr: u16) -> Result<(), Chip8Error> {
    let here = regs.pc.wrapping_sub(INSTRUCTION_BYTES);
    if stack.is_full() {
        return Err(Chip8Error::StackOverflow { addr: here });
    }
    if !is_executable(addr as usize) {
        return Err(Chip8Error::OutOfRange {
            addr: addr as usize,
        });
    }
    stack.push(regs.pc, here)?;
    regs.pc = addr;
    Ok(())
}

pub fn ret(regs: &mut Registers, stack: &mut Stack) -> Result<(), Chip8Error> {
    regs.pc = stack.pop(regs.pc.wrapping_sub(INSTRUCTION_BYTES))?;
    Ok(())
}

/// step over the next instruction when `cond` holds
pub fn skip_if(regs: &mut Registers, cond: bool) -> Result<(), Chip8Error> {
    if cond {
        let next = regs.pc as usize + INSTRUCTION_BYTES as usize;
        if !is_executable(next) {
            return Err(Chip8Error::OutOfRange { addr: next });
        }
        regs.pc = next as u16;
    }
    Ok(())
}

/// Bnnn: base + offset, then the same as a jump. returns where it went (or
/// tried to) so the caller can record it
pub fn jump_indirect(regs: &mut Registers, base: u8, offset: u16) -> Result<usize, Chip8Error> {
    let addr = base as usize + offset as usize;
    jump(regs, addr)?;
    Ok(addr)
}
