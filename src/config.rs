use serde::Deserialize;
use std::path::Path;
use std::{fs, io};

/// behaviours that differ between historical CHIP-8 interpreters. chosen once
/// per session and handed by reference to whatever branches on them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Quirks {
    /// true: 8xy6/8xyE shift Vx in place, VF = bit shifted out.
    /// false: Vx = Vy shifted, VF untouched
    pub shift_uses_destination_register: bool,

    /// true: Fx33/Fx55/Fx65 leave I alone. false: I moves past the block
    pub block_ops_preserve_index_pointer: bool,

    /// true: Dxy0 draws a 16-row sprite. false: Dxy0 draws nothing
    pub zero_height_sprite_is_sixteen_rows: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_uses_destination_register: true,
            block_ops_preserve_index_pointer: true,
            zero_height_sprite_is_sixteen_rows: true,
        }
    }
}

impl Quirks {
    /// the behaviour of the COSMAC VIP interpreter
    pub fn cosmac() -> Self {
        Quirks {
            shift_uses_destination_register: false,
            block_ops_preserve_index_pointer: false,
            zero_height_sprite_is_sixteen_rows: false,
        }
    }
}

pub const DEFAULT_CPU_HZ: u32 = 700;
pub const DEFAULT_TIMER_HZ: u32 = 60;
pub const DEFAULT_PITCH_HZ: u16 = 880;

/// session settings; everything has a default so a config file only needs the
/// keys it wants to change
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quirks: Quirks,
    pub cpu_hz: u32,
    pub timer_hz: u32,
    /// seed for Cxnn; None seeds from the OS
    pub seed: Option<u64>,
    pub pitch: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            cpu_hz: DEFAULT_CPU_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            seed: None,
            pitch: DEFAULT_PITCH_HZ,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, io::Error> {
        toml::from_str(text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn load(path: &Path) -> Result<Self, io::Error> {
        Config::from_toml_str(&fs::read_to_string(path)?)
    }
}
