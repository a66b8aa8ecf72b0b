use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::log_enabled;

use chip8::clock::{self, Cadence};
use chip8::display::{MonoTermDisplay, SCREEN_HEIGHT, SCREEN_WIDTH};
use chip8::input::StdinInput;
use chip8::interpreter::{Chip8Interpreter, ExecState, HaltReason};
use chip8::memory::PROGRAM_ADDR;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::trace::{disassemble, LogTracer};
use chip8::{Config, Quirks};

/// how long a key counts as held after the terminal last reported it
const KEY_HOLD: Duration = Duration::from_millis(150);

#[derive(Parser, Debug)]
#[command(name = "chip8", about = "Run a CHIP-8 program in the terminal.")]
struct Args {
    /// program image to load at 0x200
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// TOML file with quirks, clock rates, seed and pitch
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// start from the COSMAC VIP quirk set instead of the default
    #[arg(long, default_value_t = false)]
    cosmac: bool,

    #[arg(long, value_name = "BOOL")]
    shift_uses_destination_register: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    block_ops_preserve_index_pointer: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    zero_height_sprite_is_sixteen_rows: Option<bool>,

    /// instructions per second
    #[arg(long, value_name = "HZ")]
    cpu_hz: Option<u32>,

    /// stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// no sound
    #[arg(long, default_value_t = false)]
    mute: bool,

    /// print a listing of the program instead of running it
    #[arg(long, default_value_t = false)]
    disassemble: bool,
}

impl Args {
    /// flags win over the config file
    fn apply(&self, config: &mut Config) {
        if self.cosmac {
            config.quirks = Quirks::cosmac();
        }
        let q = &mut config.quirks;
        if let Some(v) = self.shift_uses_destination_register {
            q.shift_uses_destination_register = v;
        }
        if let Some(v) = self.block_ops_preserve_index_pointer {
            q.block_ops_preserve_index_pointer = v;
        }
        if let Some(v) = self.zero_height_sprite_is_sixteen_rows {
            q.zero_height_sprite_is_sixteen_rows = v;
        }
        if let Some(hz) = self.cpu_hz {
            config.cpu_hz = hz;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

// everything that touches the terminal lives in here, so it is all dropped
// (and the terminal restored) before the process exits
fn run_session(args: &Args, config: &Config, rom: &[u8]) -> Result<HaltReason, Box<dyn Error>> {
    let mut display = MonoTermDisplay::new(SCREEN_WIDTH, SCREEN_HEIGHT)?;
    let mut input = StdinInput::new(KEY_HOLD)?;
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new(config.pitch))
    };
    let mut tracer = LogTracer::new();

    let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, sound.as_mut(), config);
    if log_enabled!(log::Level::Trace) {
        interpreter.set_observer(&mut tracer);
    }
    interpreter.load_program(rom)?;

    match clock::run(&mut interpreter, Cadence::from(config), args.max_steps)? {
        ExecState::Halted(reason) => Ok(reason),
        ExecState::Running => Ok(HaltReason::EndOfProgram),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);
    let rom = fs::read(&args.rom)?;

    if args.disassemble {
        print!("{}", disassemble(&rom, PROGRAM_ADDR));
        return Ok(());
    }

    let reason = run_session(&args, &config, &rom)?;

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..SCREEN_HEIGHT / 3 {
        println!();
    }
    if let HaltReason::Fault(e) = &reason {
        eprintln!("chip8: {}", e);
    }
    std::process::exit(reason.exit_code());
}
