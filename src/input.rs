use crate::control::{skip_if, INSTRUCTION_BYTES};
use crate::error::Chip8Error;
use crate::instruction::Reg;
use crate::state::Registers;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// the COSMAC hex keypad laid over the left-hand side of a qwerty keyboard:
///   1 2 3 C      1 2 3 4
///   4 5 6 D  <-  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the keypad latch can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keypress {
    /// hex key 0x0..=0xf
    Key(u8),
    /// the escape hatch; a key instruction or the driver's tick that sees it
    /// ends the session
    Cancel,
}

/// reads the currently latched key. the input layer updates the latch on its
/// own schedule; the interpreter only ever looks at it
pub trait Input {
    fn latched(&mut self) -> Option<Keypress>;
}

/// simple implementation of Input, using crossterm key events on stdin.
/// terminals don't report key release, so a key stays latched for `hold`
/// after it was last seen
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    latched: Option<(Keypress, Instant)>,
    hold: Duration,
}

impl StdinInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput::unattached(hold))
    }

    // everything but the terminal
    fn unattached(hold: Duration) -> Self {
        StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            latched: None,
            hold,
        }
    }

    /// Esc and ctrl-c cancel; raw mode delivers ctrl-c as a plain key event
    fn map_key(&self, evt: KeyEvent) -> Option<Keypress> {
        match evt.code {
            KeyCode::Esc => Some(Keypress::Cancel),
            KeyCode::Char('c') | KeyCode::Char('C')
                if evt.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Keypress::Cancel)
            }
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(mapped_key) => Some(Keypress::Key(*mapped_key)),
                None => {
                    warn!("can't map {:?} to a COSMAC key", key);
                    None
                }
            },
            _ => None,
        }
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if let Some(key) = self.map_key(evt) {
                    self.latched = Some((key, Instant::now()));
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn latched(&mut self) -> Option<Keypress> {
        if let Err(e) = self.read_stdin() {
            warn!("keyboard: {}", e);
        }
        match self.latched {
            // cancel never expires
            Some((Keypress::Cancel, _)) => Some(Keypress::Cancel),
            Some((key, at)) if at.elapsed() < self.hold => Some(key),
            _ => {
                self.latched = None;
                None
            }
        }
    }
}

/// dummy Input implementation for testing
#[derive(Debug, Default)]
pub struct DummyInput {
    key: Option<Keypress>,
}

impl DummyInput {
    pub fn new(key: Option<Keypress>) -> Self {
        DummyInput { key }
    }

    pub fn press(&mut self, key: Option<Keypress>) {
        self.key = key;
    }
}

impl Input for DummyInput {
    fn latched(&mut self) -> Option<Keypress> {
        self.key
    }
}

/// whether a key instruction lets the session carry on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Proceed,
    Cancel,
}

/// Ex9E (`pressed`) and ExA1 (`!pressed`): skip when the latched key is, or
/// isn't, `expected`
pub fn skip_if_key(
    regs: &mut Registers,
    latched: Option<Keypress>,
    expected: u8,
    pressed: bool,
) -> Result<Gate, Chip8Error> {
    let is_expected = match latched {
        Some(Keypress::Cancel) => return Ok(Gate::Cancel),
        Some(Keypress::Key(k)) => k == expected,
        None => false,
    };
    skip_if(regs, is_expected == pressed)?;
    Ok(Gate::Proceed)
}

/// Fx0A: with no key latched, point back at this instruction so the next step
/// runs it again. nothing else changes while waiting
pub fn wait_for_key(regs: &mut Registers, latched: Option<Keypress>, x: Reg) -> Gate {
    match latched {
        Some(Keypress::Cancel) => return Gate::Cancel,
        Some(Keypress::Key(k)) => regs.v[x] = k,
        None => regs.pc = regs.pc.wrapping_sub(INSTRUCTION_BYTES),
    }
    Gate::Proceed
}
