use crate::error::Chip8Error;
use crate::memory::PROGRAM_ADDR;

/// VF doubles as the carry/borrow/collision flag
pub const VF: usize = 0xf;

pub const STACK_SIZE: usize = 16;

/// the CPU-visible registers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; 16],
    /// I; range is only checked when it is used
    pub index: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new(pc: u16) -> Self {
        Registers {
            v: [0; 16],
            index: 0,
            pc,
        }
    }

    pub fn flag(&self) -> u8 {
        self.v[VF]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[VF] = set as u8;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new(PROGRAM_ADDR)
    }
}

/// return addresses for 2nnn/00EE, kept apart from memory
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    frames: [u16; STACK_SIZE],
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_full(&self) -> bool {
        self.depth == STACK_SIZE
    }

    /// live frames, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.depth]
    }

    /// `pc` is only used to report where the overflow happened
    pub fn push(&mut self, ret: u16, pc: u16) -> Result<(), Chip8Error> {
        if self.is_full() {
            return Err(Chip8Error::StackOverflow { addr: pc });
        }
        self.frames[self.depth] = ret;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16, Chip8Error> {
        if self.depth == 0 {
            return Err(Chip8Error::StackUnderflow { addr: pc });
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_start_at_program() {
        let r = Registers::default();
        assert_eq!(r.pc, 0x200);
        assert_eq!(r.index, 0);
        assert_eq!(r.v, [0; 16]);
    }

    #[test]
    fn test_stack_lifo() -> Result<(), Chip8Error> {
        let mut s = Stack::new();
        s.push(0x202, 0)?;
        s.push(0x304, 0)?;
        assert_eq!(s.frames(), &[0x202, 0x304]);
        assert_eq!(s.pop(0)?, 0x304);
        assert_eq!(s.pop(0)?, 0x202);
        assert_eq!(s.depth(), 0);
        Ok(())
    }

    #[test]
    fn test_stack_overflow_leaves_stack_alone() -> Result<(), Chip8Error> {
        let mut s = Stack::new();
        for i in 0..STACK_SIZE as u16 {
            s.push(0x200 + i * 2, 0)?;
        }
        let before = s.clone();
        assert_eq!(
            s.push(0x400, 0x222),
            Err(Chip8Error::StackOverflow { addr: 0x222 })
        );
        assert_eq!(s, before);
        Ok(())
    }

    #[test]
    fn test_stack_underflow() {
        let mut s = Stack::new();
        assert_eq!(
            s.pop(0x200),
            Err(Chip8Error::StackUnderflow { addr: 0x200 })
        );
    }
}
