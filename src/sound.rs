use beep::beep;
use std::error::Error;
use std::time::Duration;

/// the audio collaborator. the sound timer starts a tone when it is set and
/// stops it when it runs out
pub trait Sound {
    fn start_tone(&mut self, duration: Duration) -> Result<(), Box<dyn Error>>;
    fn stop_tone(&mut self) -> Result<(), Box<dyn Error>>;
    fn set_pitch(&mut self, hz: u16) -> Result<(), Box<dyn Error>>;
}

/// Fx17 picks a note from this table by index; 0 is silence
pub const PITCH_TABLE: [u16; 30] = [
    0, 65, 73, 82, 87, 98, 110, 123, 131, 147, 165, 175, 196, 220, 247, 262, // 0x00-0x0f
    294, 330, 349, 392, 440, 494, 523, 587, 659, 698, 784, 880, 988, 1047, // 0x10-0x1d
];

/// square wave from the PC speaker, via `beep`
pub struct SimpleBeep {
    pitch: u16,
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new(pitch: u16) -> Self {
        SimpleBeep {
            pitch,
            is_beeping: false,
        }
    }
}

impl Sound for SimpleBeep {
    // the speaker has no notion of duration; the sound timer stops it
    fn start_tone(&mut self, _duration: Duration) -> Result<(), Box<dyn Error>> {
        beep(self.pitch)?;
        self.is_beeping = self.pitch != 0;
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_beeping {
            beep(0)?;
            self.is_beeping = false;
        }
        Ok(())
    }

    fn set_pitch(&mut self, hz: u16) -> Result<(), Box<dyn Error>> {
        self.pitch = hz;
        if self.is_beeping {
            beep(hz)?;
        }
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        let _ = self.stop_tone();
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Mute::new()
    }
}

impl Sound for Mute {
    fn start_tone(&mut self, _duration: Duration) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn set_pitch(&mut self, _hz: u16) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_table_ascends() {
        assert_eq!(PITCH_TABLE[0], 0);
        assert_eq!(PITCH_TABLE[0x14], 440);
        assert!(PITCH_TABLE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_mute_never_fails() {
        let mut m = Mute::new();
        assert!(m.start_tone(Duration::from_millis(100)).is_ok());
        assert!(m.set_pitch(440).is_ok());
        assert!(m.stop_tone().is_ok());
    }
}
