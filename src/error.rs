use thiserror::Error;

/// everything that can stop a session abnormally. all of these are fatal: the
/// interpreter halts and reports the error as its halt reason
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("undefined opcode {opcode:#06x} at {addr:#06x}")]
    UndefinedOpcode { opcode: u16, addr: u16 },

    #[error("address {addr:#06x} is outside the addressable region")]
    OutOfRange { addr: usize },

    #[error("call stack full, call from {addr:#06x}")]
    StackOverflow { addr: u16 },

    #[error("return with an empty call stack at {addr:#06x}")]
    StackUnderflow { addr: u16 },

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },
}
