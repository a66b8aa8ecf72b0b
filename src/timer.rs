//! the delay and sound timers. both count down once per 60 Hz tick from the
//! driver, never from the instruction stream
use crate::sound::Sound;
use log::warn;
use std::time::Duration;

/// ticks per second the countdowns are defined against
pub const TICK_HZ: u32 = 60;

/// an 8-bit countdown that stops at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown(u8);

impl Countdown {
    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    /// returns true on the tick that reaches zero
    pub fn tick(&mut self) -> bool {
        match self.0 {
            0 => false,
            n => {
                self.0 = n - 1;
                self.0 == 0
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    delay: Countdown,
    sound: Countdown,
}

impl Timers {
    pub fn new() -> Self {
        Timers::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.get()
    }

    pub fn sound(&self) -> u8 {
        self.sound.get()
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay.set(value);
    }

    /// starts a tone lasting `value` ticks, or stops the current one for 0
    pub fn set_sound(&mut self, value: u8, audio: &mut dyn Sound) {
        self.sound.set(value);
        let result = match value {
            0 => audio.stop_tone(),
            n => audio.start_tone(Duration::from_micros(n as u64 * 1_000_000 / TICK_HZ as u64)),
        };
        if let Err(e) = result {
            warn!("audio: {}", e);
        }
    }

    /// one 60 Hz tick for both timers
    pub fn tick(&mut self, audio: &mut dyn Sound) {
        self.delay.tick();
        if self.sound.tick() {
            if let Err(e) = audio.stop_tone() {
                warn!("audio: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Sound for Recorder {
        fn start_tone(&mut self, duration: Duration) -> Result<(), Box<dyn Error>> {
            self.events.push(format!("start {}ms", duration.as_millis()));
            Ok(())
        }

        fn stop_tone(&mut self) -> Result<(), Box<dyn Error>> {
            self.events.push("stop".to_string());
            Ok(())
        }

        fn set_pitch(&mut self, hz: u16) -> Result<(), Box<dyn Error>> {
            self.events.push(format!("pitch {}", hz));
            Ok(())
        }
    }

    #[test]
    fn test_countdown_stops_at_zero() {
        let mut t = Timers::new();
        let mut audio = Recorder::default();
        t.set_delay(5);
        for _ in 0..5 {
            t.tick(&mut audio);
        }
        assert_eq!(t.delay(), 0);
        t.tick(&mut audio);
        assert_eq!(t.delay(), 0);
        // the delay timer never touches audio
        assert!(audio.events.is_empty());
    }

    #[test]
    fn test_countdown_reports_reaching_zero_once() {
        let mut c = Countdown::default();
        c.set(2);
        assert!(!c.tick());
        assert!(c.tick());
        assert!(!c.tick());
    }

    #[test]
    fn test_sound_starts_and_stops_tone() {
        let mut t = Timers::new();
        let mut audio = Recorder::default();
        t.set_sound(3, &mut audio);
        assert_eq!(audio.events, vec!["start 50ms"]);
        t.tick(&mut audio);
        t.tick(&mut audio);
        assert_eq!(t.sound(), 1);
        assert_eq!(audio.events.len(), 1);
        t.tick(&mut audio);
        t.tick(&mut audio);
        assert_eq!(audio.events, vec!["start 50ms", "stop"]);
    }

    #[test]
    fn test_timers_independent() {
        let mut t = Timers::new();
        let mut audio = Recorder::default();
        t.set_delay(1);
        t.set_sound(2, &mut audio);
        t.tick(&mut audio);
        assert_eq!((t.delay(), t.sound()), (0, 1));
    }

    #[test]
    fn test_sound_zero_stops() {
        let mut t = Timers::new();
        let mut audio = Recorder::default();
        t.set_sound(0, &mut audio);
        assert_eq!(audio.events, vec!["stop"]);
    }
}
