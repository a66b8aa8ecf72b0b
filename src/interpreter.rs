/// # interpreter
///
/// One session: owns memory, registers, the call stack and both timers, and
/// borrows the display, keypad and speaker it talks to. Nothing here is global;
/// the quirk set is fixed when the session is built and handed to whatever
/// needs it.
///
/// `step()` runs exactly one instruction:
///
///  Running --fetch/decode/execute--> Running
///     |  `--> Halted(EndOfProgram)   pc ran off the end of the loaded image
///     |  `--> Halted(Exit(code))     Fx00
///     |  `--> Halted(Cancelled)      cancel key seen by a key instruction,
///     |                              or by the driver through `poll_cancel`
///     `-----> Halted(Fault(error))   anything in Chip8Error
///
/// Halted is terminal. `tick()` is the 60 Hz timer input and is independent of
/// the step rate; the caller (see `clock`) decides how the two interleave.
use crate::config::{Config, Quirks};
use crate::display::PixelSurface;
use crate::error::Chip8Error;
use crate::input::{self, Gate, Input, Keypress};
use crate::instruction::{Instruction, Opcode};
use crate::memory::{Chip8MemoryMap, MemoryMap, PROGRAM_ADDR};
use crate::sound::{Sound, PITCH_TABLE};
use crate::state::{Registers, Stack};
use crate::timer::Timers;
use crate::trace::{Observer, StepRecord};
use crate::{alu, block, control, draw};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    EndOfProgram,
    Exit(u8),
    Cancelled,
    Fault(Chip8Error),
}

impl HaltReason {
    /// what the process should exit with
    pub fn exit_code(&self) -> i32 {
        match self {
            HaltReason::Exit(code) => *code as i32,
            HaltReason::EndOfProgram | HaltReason::Cancelled => 0,
            HaltReason::Fault(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecState {
    Running,
    Halted(HaltReason),
}

pub struct Chip8Interpreter<'a> {
    memory: Chip8MemoryMap,
    regs: Registers,
    stack: Stack,
    timers: Timers,
    quirks: Quirks,
    rng: StdRng,
    display: &'a mut dyn PixelSurface,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    observer: Option<&'a mut dyn Observer>,
    state: ExecState,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn PixelSurface,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: &Config,
    ) -> Chip8Interpreter<'a> {
        if let Err(e) = sound.set_pitch(config.pitch) {
            warn!("audio: {}", e);
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            regs: Registers::new(PROGRAM_ADDR),
            stack: Stack::new(),
            timers: Timers::new(),
            quirks: config.quirks,
            rng,
            display,
            input,
            sound,
            observer: None,
            state: ExecState::Running,
        }
    }

    /// load a chip8 program at the usual address
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.load_program_at(program, PROGRAM_ADDR)
    }

    /// load a chip8 program at `addr` and start executing there
    pub fn load_program_at(&mut self, program: &[u8], addr: u16) -> Result<(), Chip8Error> {
        self.memory.load_program(program, addr)?;
        self.regs.pc = addr;
        self.state = ExecState::Running;
        debug!("loaded {} bytes at {:#06x}", program.len(), addr);
        Ok(())
    }

    pub fn set_observer(&mut self, observer: &'a mut dyn Observer) {
        self.observer = Some(observer);
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    pub fn state(&self) -> &ExecState {
        &self.state
    }

    /// the 60 Hz input: count both timers down
    pub fn tick(&mut self) {
        self.timers.tick(self.sound);
    }

    /// look at the keypad between key instructions; a latched cancel key
    /// halts a running session
    pub fn poll_cancel(&mut self) -> ExecState {
        if self.state == ExecState::Running && self.input.latched() == Some(Keypress::Cancel) {
            debug!("cancelled at {:#06x}", self.regs.pc);
            self.state = ExecState::Halted(HaltReason::Cancelled);
        }
        self.state.clone()
    }

    /// push pending display changes out
    pub fn present(&mut self) -> Result<(), io::Error> {
        self.display.present()
    }

    /// fetch, decode and execute one instruction
    pub fn step(&mut self) -> ExecState {
        if let ExecState::Running = self.state {
            if let Err(reason) = self.cycle() {
                debug!("halted at {:#06x}: {:?}", self.regs.pc, reason);
                self.state = ExecState::Halted(reason);
            }
        }
        self.state.clone()
    }

    fn cycle(&mut self) -> Result<(), HaltReason> {
        let addr = self.regs.pc;
        if addr as usize >= self.memory.program_end() {
            return Err(HaltReason::EndOfProgram);
        }
        let opcode = Opcode(self.memory.get_word(addr as usize).map_err(HaltReason::Fault)?);
        self.regs.pc = addr.wrapping_add(control::INSTRUCTION_BYTES);

        let instruction = Instruction::decode(opcode).ok_or(HaltReason::Fault(
            Chip8Error::UndefinedOpcode {
                opcode: opcode.0,
                addr,
            },
        ))?;
        let outcome = self.execute(instruction, addr);

        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_step(&StepRecord {
                addr,
                opcode,
                instruction,
                registers: &self.regs,
            });
        }
        outcome
    }

    fn note_entry_point(&mut self, addr: u16) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_entry_point(addr);
        }
    }

    fn execute(&mut self, instruction: Instruction, addr: u16) -> Result<(), HaltReason> {
        use Instruction::*;
        let regs = &mut self.regs;
        match instruction {
            Nop => {}
            ClearScreen => self.display.clear(),
            Return => control::ret(regs, &mut self.stack)?,
            Restart => regs.pc = self.memory.program_addr(),
            Jump(target) => {
                self.note_entry_point(target);
                control::jump(&mut self.regs, target as usize)?;
            }
            Call(target) => {
                self.note_entry_point(target);
                control::call(&mut self.regs, &mut self.stack, target)?;
            }
            SkipEqImm(x, nn) => {
                let cond = regs.v[x] == nn;
                control::skip_if(regs, cond)?
            }
            SkipNeImm(x, nn) => {
                let cond = regs.v[x] != nn;
                control::skip_if(regs, cond)?
            }
            SkipEqReg(x, y) => {
                let cond = regs.v[x] == regs.v[y];
                control::skip_if(regs, cond)?
            }
            SkipNeReg(x, y) => {
                let cond = regs.v[x] != regs.v[y];
                control::skip_if(regs, cond)?
            }
            SetImm(x, nn) => regs.v[x] = nn,
            AddImm(x, nn) => alu::add(regs, x, nn),
            Alu(op, x, y) => alu::execute(op, regs, x, y, &self.quirks),
            SetIndex(target) => {
                self.note_entry_point(target);
                self.regs.index = target;
            }
            JumpIndirect(offset) => {
                let base = self.regs.v[0];
                self.note_entry_point(offset.wrapping_add(base as u16));
                control::jump_indirect(&mut self.regs, base, offset)?;
            }
            Random(x, nn) => regs.v[x] = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => {
                draw::draw(self.display, &self.memory, regs, x, y, n, &self.quirks)?
            }
            SkipKeyEq(x) => {
                let (key, expected) = (self.input.latched(), regs.v[x]);
                if input::skip_if_key(regs, key, expected, true)? == Gate::Cancel {
                    return Err(HaltReason::Cancelled);
                }
            }
            SkipKeyNe(x) => {
                let (key, expected) = (self.input.latched(), regs.v[x]);
                if input::skip_if_key(regs, key, expected, false)? == Gate::Cancel {
                    return Err(HaltReason::Cancelled);
                }
            }
            WaitKey(x) => {
                let key = self.input.latched();
                if input::wait_for_key(regs, key, x) == Gate::Cancel {
                    return Err(HaltReason::Cancelled);
                }
            }
            Stop(x) => return Err(HaltReason::Exit(regs.v[x])),
            GetDelay(x) => regs.v[x] = self.timers.delay(),
            SetDelay(x) => self.timers.set_delay(regs.v[x]),
            SetSound(x) => self.timers.set_sound(regs.v[x], self.sound),
            SetPitch(x) => match PITCH_TABLE.get(regs.v[x] as usize) {
                Some(hz) => {
                    if let Err(e) = self.sound.set_pitch(*hz) {
                        warn!("audio: {}", e);
                    }
                }
                None => debug!("{:#06x}: no note {:#04x}, pitch unchanged", addr, regs.v[x]),
            },
            AddIndex(x) => regs.index = regs.index.wrapping_add(regs.v[x] as u16),
            FontAddr(x) => regs.index = block::font_address(regs.v[x]),
            Bcd(x) => {
                let value = regs.v[x];
                block::store_bcd(&mut self.memory, regs, value, &self.quirks)?
            }
            Store(x) => block::store_registers(&mut self.memory, regs, 0, x, &self.quirks)?,
            Recall(x) => block::recall_registers(&self.memory, regs, 0, x, &self.quirks)?,
            Extension(e) => warn!("{:#06x}: `{}` is not supported, ignored", addr, e),
        }
        Ok(())
    }
}

impl From<Chip8Error> for HaltReason {
    fn from(e: Chip8Error) -> Self {
        HaltReason::Fault(e)
    }
}
