//! # instruction
//!
//! Every CHIP-8 instruction is one big-endian 16-bit word. The top nibble picks
//! the group, the rest is some mix of:
//!
//!  .x..  register index
//!  ..y.  second register index
//!  ...n  4-bit immediate / sub-operation
//!  ..nn  8-bit immediate / sub-operation
//!  .nnn  12-bit address
//!
//! `Opcode` gives all of those for any word. `Instruction::decode` is where a
//! word either names something we can execute or doesn't.
use std::fmt;

/// a raw instruction word, split into fields on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from_be_bytes([high, low]))
    }

    /// top nibble
    pub fn group(&self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(&self) -> u8 {
        ((self.0 >> 8) & 0xf) as u8
    }

    pub fn y(&self) -> u8 {
        ((self.0 >> 4) & 0xf) as u8
    }

    pub fn n(&self) -> u8 {
        (self.0 & 0xf) as u8
    }

    pub fn high(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// also the nn immediate
    pub fn low(&self) -> u8 {
        self.0 as u8
    }

    pub fn nnn(&self) -> u16 {
        self.0 & 0x0fff
    }
}

/// register index, always 0..=15
pub type Reg = usize;

/// the 8xyN register-register operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Copy,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    ReverseSub,
    ShiftLeft,
}

impl AluOp {
    fn from_nibble(n: u8) -> Option<Self> {
        Some(match n {
            0x0 => AluOp::Copy,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::ShiftRight,
            0x7 => AluOp::ReverseSub,
            0xe => AluOp::ShiftLeft,
            _ => return None,
        })
    }

    fn mnemonic(&self) -> &'static str {
        match self {
            AluOp::Copy => "ld",
            AluOp::Or => "or",
            AluOp::And => "and",
            AluOp::Xor => "xor",
            AluOp::Add => "add",
            AluOp::Sub => "sub",
            AluOp::ShiftRight => "shr",
            AluOp::ReverseSub => "subn",
            AluOp::ShiftLeft => "shl",
        }
    }
}

/// SUPER-CHIP and CHIP-8-variant opcodes that are recognised but have no
/// effect here; they run as no-ops rather than killing the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    ScrollDown(u8),
    ScrollRight,
    ScrollLeft,
    LowRes,
    HighRes,
    BigFont(Reg),
    SerialOut(Reg),
    SerialIn(Reg),
    SetBaud(Reg),
    SaveFlags(Reg),
    LoadFlags(Reg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0000
    Nop,
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 00FD, start the program over from its load address
    Restart,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipEqImm(Reg, u8),
    /// 4xnn
    SkipNeImm(Reg, u8),
    /// 5xy0
    SkipEqReg(Reg, Reg),
    /// 6xnn
    SetImm(Reg, u8),
    /// 7xnn, sets VF on carry
    AddImm(Reg, u8),
    /// 8xyN
    Alu(AluOp, Reg, Reg),
    /// 9xy0
    SkipNeReg(Reg, Reg),
    /// Annn
    SetIndex(u16),
    /// Bnnn, jump to nnn + V0
    JumpIndirect(u16),
    /// Cxnn
    Random(Reg, u8),
    /// Dxyn
    Draw(Reg, Reg, u8),
    /// Ex9E
    SkipKeyEq(Reg),
    /// ExA1
    SkipKeyNe(Reg),
    /// Fx00, halt with Vx as the exit code
    Stop(Reg),
    /// Fx07
    GetDelay(Reg),
    /// Fx0A
    WaitKey(Reg),
    /// Fx15
    SetDelay(Reg),
    /// Fx17
    SetPitch(Reg),
    /// Fx18
    SetSound(Reg),
    /// Fx1E
    AddIndex(Reg),
    /// Fx29
    FontAddr(Reg),
    /// Fx33
    Bcd(Reg),
    /// Fx55, V0..=Vx to memory
    Store(Reg),
    /// Fx65, memory to V0..=Vx
    Recall(Reg),
    Extension(Extension),
}

impl Instruction {
    /// None means the word isn't an instruction
    pub fn decode(op: Opcode) -> Option<Self> {
        use Instruction::*;
        let x = op.x() as Reg;
        let y = op.y() as Reg;
        Some(match op.group() {
            0x0 => match op.0 {
                0x0000 => Nop,
                0x00e0 => ClearScreen,
                0x00ee => Return,
                0x00fd => Restart,
                0x00fb => Extension(self::Extension::ScrollRight),
                0x00fc => Extension(self::Extension::ScrollLeft),
                0x00fe => Extension(self::Extension::LowRes),
                0x00ff => Extension(self::Extension::HighRes),
                w if w & 0xfff0 == 0x00c0 => Extension(self::Extension::ScrollDown(op.n())),
                _ => return None,
            },
            0x1 => Jump(op.nnn()),
            0x2 => Call(op.nnn()),
            0x3 => SkipEqImm(x, op.low()),
            0x4 => SkipNeImm(x, op.low()),
            // the low nibble of 5xyN/9xyN is ignored
            0x5 => SkipEqReg(x, y),
            0x6 => SetImm(x, op.low()),
            0x7 => AddImm(x, op.low()),
            0x8 => Alu(AluOp::from_nibble(op.n())?, x, y),
            0x9 => SkipNeReg(x, y),
            0xa => SetIndex(op.nnn()),
            0xb => JumpIndirect(op.nnn()),
            0xc => Random(x, op.low()),
            0xd => Draw(x, y, op.n()),
            0xe => match op.low() {
                0x9e => SkipKeyEq(x),
                0xa1 => SkipKeyNe(x),
                _ => return None,
            },
            0xf => match op.low() {
                0x00 => Stop(x),
                0x07 => GetDelay(x),
                0x0a => WaitKey(x),
                0x15 => SetDelay(x),
                0x17 => SetPitch(x),
                0x18 => SetSound(x),
                0x1e => AddIndex(x),
                0x29 => FontAddr(x),
                0x30 => Extension(self::Extension::BigFont(x)),
                0x33 => Bcd(x),
                0x55 => Store(x),
                0x65 => Recall(x),
                0x70 => Extension(self::Extension::SerialOut(x)),
                0x71 => Extension(self::Extension::SerialIn(x)),
                0x72 => Extension(self::Extension::SetBaud(x)),
                0x75 => Extension(self::Extension::SaveFlags(x)),
                0x85 => Extension(self::Extension::LoadFlags(x)),
                _ => return None,
            },
            _ => return None,
        })
    }

    /// the address this instruction points somewhere else at, if any
    pub fn target(&self) -> Option<u16> {
        match *self {
            Instruction::Jump(a)
            | Instruction::Call(a)
            | Instruction::SetIndex(a)
            | Instruction::JumpIndirect(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Extension::ScrollDown(n) => write!(f, "scd  {:#x}", n),
            Extension::ScrollRight => write!(f, "scr"),
            Extension::ScrollLeft => write!(f, "scl"),
            Extension::LowRes => write!(f, "low"),
            Extension::HighRes => write!(f, "high"),
            Extension::BigFont(x) => write!(f, "ld   hf, v{:x}", x),
            Extension::SerialOut(x) => write!(f, "out  v{:x}", x),
            Extension::SerialIn(x) => write!(f, "in   v{:x}", x),
            Extension::SetBaud(x) => write!(f, "ld   baud, v{:x}", x),
            Extension::SaveFlags(x) => write!(f, "ld   r, v{:x}", x),
            Extension::LoadFlags(x) => write!(f, "ld   v{:x}, r", x),
        }
    }
}

// mnemonics loosely follow Cowgod's reference
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match self {
            Nop => write!(f, "nop"),
            ClearScreen => write!(f, "cls"),
            Return => write!(f, "ret"),
            Restart => write!(f, "rst"),
            Jump(a) => write!(f, "jp   {:#05x}", a),
            Call(a) => write!(f, "call {:#05x}", a),
            SkipEqImm(x, nn) => write!(f, "se   v{:x}, {:#04x}", x, nn),
            SkipNeImm(x, nn) => write!(f, "sne  v{:x}, {:#04x}", x, nn),
            SkipEqReg(x, y) => write!(f, "se   v{:x}, v{:x}", x, y),
            SetImm(x, nn) => write!(f, "ld   v{:x}, {:#04x}", x, nn),
            AddImm(x, nn) => write!(f, "add  v{:x}, {:#04x}", x, nn),
            Alu(op, x, y) => write!(f, "{:<4} v{:x}, v{:x}", op.mnemonic(), x, y),
            SkipNeReg(x, y) => write!(f, "sne  v{:x}, v{:x}", x, y),
            SetIndex(a) => write!(f, "ld   i, {:#05x}", a),
            JumpIndirect(a) => write!(f, "jp   v0, {:#05x}", a),
            Random(x, nn) => write!(f, "rnd  v{:x}, {:#04x}", x, nn),
            Draw(x, y, n) => write!(f, "drw  v{:x}, v{:x}, {:#x}", x, y, n),
            SkipKeyEq(x) => write!(f, "skp  v{:x}", x),
            SkipKeyNe(x) => write!(f, "sknp v{:x}", x),
            Stop(x) => write!(f, "stop v{:x}", x),
            GetDelay(x) => write!(f, "ld   v{:x}, dt", x),
            WaitKey(x) => write!(f, "ld   v{:x}, k", x),
            SetDelay(x) => write!(f, "ld   dt, v{:x}", x),
            SetPitch(x) => write!(f, "ld   pitch, v{:x}", x),
            SetSound(x) => write!(f, "ld   st, v{:x}", x),
            AddIndex(x) => write!(f, "add  i, v{:x}", x),
            FontAddr(x) => write!(f, "ld   f, v{:x}", x),
            Bcd(x) => write!(f, "ld   b, v{:x}", x),
            Store(x) => write!(f, "ld   [i], v{:x}", x),
            Recall(x) => write!(f, "ld   v{:x}, [i]", x),
            Extension(e) => write!(f, "{}", e),
        }
    }
}
