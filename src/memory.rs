use crate::error::Chip8Error;

// NB. index-derived addresses can run past 0xffff (I + offset), so addresses
//     are usize here and only narrowed back to u16 for the program counter

/// Represents the flat memory image the interpreter reads and writes
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: usize) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: usize) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    fn get_byte(&self, addr: usize) -> Result<u8, Chip8Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    fn set_byte(&mut self, addr: usize, value: u8) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, 1)?[0] = value;
        Ok(())
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: usize, len: usize) -> Result<&[u8], Chip8Error>;
}

/// how much RAM we have; the whole 16-bit address space
pub const MEM_SIZE: usize = 0x10000;

/// where programs are loaded, and the first executable address
pub const PROGRAM_ADDR: u16 = 0x0200;

/// first address past the executable region. the old interpreter's reserved
/// pages below here are available to programs
pub const PROGRAM_END: u16 = 0x1000;

/// where the 4x5 hex glyphs live, just above the executable region
pub const FONT_ADDR: u16 = 0x1000;
pub const FONT_GLYPH_BYTES: u16 = 5;

/// Memory layout:
///   0x0000-0x01ff  unused (was the interpreter)
///   0x0200-0x0fff  program, executable
///   0x1000-0x104f  hex font
///   0x1050-0xffff  data, reachable through I only
///
/// there is no memory protection: a program may overwrite the font or itself
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    program_addr: u16,
    program_len: usize,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> Result<&mut [u8], Chip8Error> {
        let end = check_span(addr, len)?;
        Ok(&mut self.bytes[addr..end])
    }

    fn get_ro_slice(&self, addr: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = check_span(addr, len)?;
        Ok(&self.bytes[addr..end])
    }
}

// returns the exclusive end of a span, or the first address that falls off
// the end of memory
fn check_span(addr: usize, len: usize) -> Result<usize, Chip8Error> {
    match addr.checked_add(len) {
        Some(end) if end <= MEM_SIZE => Ok(end),
        _ => Err(Chip8Error::OutOfRange {
            addr: addr.max(MEM_SIZE),
        }),
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut bytes = vec![0u8; MEM_SIZE].into_boxed_slice();
        let font = FONT_ADDR as usize;
        bytes[font..font + HEX_FONT.len()].copy_from_slice(&HEX_FONT);
        Chip8MemoryMap {
            bytes,
            program_addr: PROGRAM_ADDR,
            program_len: 0,
        }
    }

    /// copy a program image into the executable region at `addr`
    pub fn load_program(&mut self, program: &[u8], addr: u16) -> Result<(), Chip8Error> {
        if !(PROGRAM_ADDR..PROGRAM_END).contains(&addr) {
            return Err(Chip8Error::OutOfRange {
                addr: addr as usize,
            });
        }
        let max = (PROGRAM_END - addr) as usize;
        if program.len() > max {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        self.write(program, addr as usize)?;
        self.program_addr = addr;
        self.program_len = program.len();
        Ok(())
    }

    pub fn program_addr(&self) -> u16 {
        self.program_addr
    }

    /// first address past the loaded image; reaching it ends the program
    pub fn program_end(&self) -> usize {
        self.program_addr as usize + self.program_len
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Chip8MemoryMap::new()
    }
}

/// the program counter may only ever point into [PROGRAM_ADDR, PROGRAM_END)
pub fn is_executable(addr: usize) -> bool {
    (PROGRAM_ADDR as usize..PROGRAM_END as usize).contains(&addr)
}

pub const HEX_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
