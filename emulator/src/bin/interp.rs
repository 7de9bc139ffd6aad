
use std::fs;
use std::process::ExitCode;

use clap::Parser;

use common::constants::CODE_START;
use emu_lib::{Emulator, Memory};

/// CYBERTRONIX-64K interpreter
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Program image to execute
    image: String,

    /// Print each executed instruction to stderr.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let opt = Args::parse();

    let image = match fs::read(&opt.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}: {e}", opt.image);
            return ExitCode::FAILURE;
        }
    };

    let mut mem = Memory::new();
    if let Err(e) = mem.load_image(&image, CODE_START) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut emu = Emulator::new(mem);
    emu.set_trace(opt.trace || std::env::var_os("TRACE").is_some_and(|v| v == "1"));

    match emu.run() {
        Ok(()) => {
            // Program output goes out unbuffered byte by byte; only the
            // banner is printed here, once the machine has halted.
            println!("HCF instruction reached");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
