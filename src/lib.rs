//! # chip8
//!
//! A CHIP-8 interpreter core, with a terminal frontend in `main.rs`.
//!
//! ## Design
//!
//! * one session object owns all machine state; no globals
//! * the historical disagreements between interpreters are quirk flags, picked
//!   once per session and passed explicitly to the code that branches on them
//! * abstract the display, keypad and speaker behind traits so alternatives
//!   plug in; starting with TUI in-console
//! * every error is fatal to the session and comes back as the halt reason;
//!   nothing panics on a bad program
//! * CPU steps and 60 Hz timer ticks are separate inputs, merged by `clock`
//!
//! Model
//!
//! main
//!  |-- config (file + flags), display, input, audio
//!  |-- interpreter(display, input, audio, config)
//!  |    |-- memory, registers, stack, timers
//!  |    |-- instruction: word -> Instruction
//!  |    `-- alu / control / block / draw / input gate: one instruction each
//!  `-- clock::run
//!       |-- Schedule yields Step/Tick in virtual time
//!       |-- sleep until the event is due
//!       `-- interpreter.step() or interpreter.tick(); present and poll for
//!           cancel on ticks
pub mod alu;
pub mod block;
pub mod clock;
pub mod config;
pub mod control;
pub mod display;
pub mod draw;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod state;
pub mod timer;
pub mod trace;

pub use config::{Config, Quirks};
pub use error::Chip8Error;
pub use interpreter::{Chip8Interpreter, ExecState, HaltReason};
