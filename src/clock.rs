//! # clock
//!
//! The interpreter has two inputs that fire on their own: instruction steps at
//! the CPU rate and timer ticks at 60 Hz. `Schedule` merges them into one
//! ordered stream in virtual time, so the interleaving is the same on every
//! run; `run` replays that stream against the wall clock.
use crate::config::Config;
use crate::interpreter::{Chip8Interpreter, ExecState};
use log::debug;
use std::io;
use std::time::{Duration, Instant};

/// the two rates, in Hz. zero is treated as 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub cpu_hz: u32,
    pub timer_hz: u32,
}

impl From<&Config> for Cadence {
    fn from(config: &Config) -> Self {
        Cadence {
            cpu_hz: config.cpu_hz,
            timer_hz: config.timer_hz,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Step,
    Tick,
}

/// virtual time is counted in units of 1 / (cpu_hz * timer_hz) seconds, so
/// both periods are whole numbers of units: a step every `timer_hz` units and
/// a tick every `cpu_hz` units. steps start at 0, ticks one period in; a tick
/// due at the same time as a step goes first
#[derive(Debug, Clone)]
pub struct Schedule {
    step_period: u64,
    tick_period: u64,
    next_step: u64,
    next_tick: u64,
}

impl Schedule {
    pub fn new(cadence: Cadence) -> Self {
        let cpu_hz = cadence.cpu_hz.max(1) as u64;
        let timer_hz = cadence.timer_hz.max(1) as u64;
        Schedule {
            step_period: timer_hz,
            tick_period: cpu_hz,
            next_step: 0,
            next_tick: cpu_hz,
        }
    }

    fn units_per_second(&self) -> u128 {
        self.step_period as u128 * self.tick_period as u128
    }

    /// the next event, and how long after the start it is due
    pub fn next_event(&mut self) -> (Duration, Event) {
        let (at, event) = if self.next_tick <= self.next_step {
            let at = self.next_tick;
            self.next_tick += self.tick_period;
            (at, Event::Tick)
        } else {
            let at = self.next_step;
            self.next_step += self.step_period;
            (at, Event::Step)
        };
        let nanos = at as u128 * 1_000_000_000 / self.units_per_second();
        (Duration::from_nanos(nanos as u64), event)
    }
}

impl Iterator for Schedule {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        Some(self.next_event().1)
    }
}

/// drive `interpreter` in real time until it halts, or until `max_steps`
/// instructions have run (then the state is still `Running`). on every tick
/// the surface is presented and the keypad checked for the cancel key, so a
/// program that never reads keys can still be stopped
pub fn run(
    interpreter: &mut Chip8Interpreter,
    cadence: Cadence,
    max_steps: Option<u64>,
) -> Result<ExecState, io::Error> {
    let mut schedule = Schedule::new(cadence);
    let start = Instant::now();
    let mut steps: u64 = 0;
    debug!("running at {} Hz, timers at {} Hz", cadence.cpu_hz, cadence.timer_hz);

    let state = loop {
        let (due, event) = schedule.next_event();
        if let Some(wait) = due.checked_sub(start.elapsed()) {
            spin_sleep::sleep(wait);
        }
        match event {
            Event::Tick => {
                interpreter.tick();
                interpreter.present()?;
                if let state @ ExecState::Halted(_) = interpreter.poll_cancel() {
                    break state;
                }
            }
            Event::Step => {
                if max_steps.map_or(false, |max| steps >= max) {
                    break interpreter.state().clone();
                }
                steps += 1;
                if let state @ ExecState::Halted(_) = interpreter.step() {
                    break state;
                }
            }
        }
    };
    interpreter.present()?;
    debug!("stopped after {} steps: {:?}", steps, state);
    Ok(state)
}
