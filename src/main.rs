// Headless driver: loads a ROM and runs frames until the CPU halts or a frame count is
// reached, optionally emitting a Nestest-style trace. There's no display or input here -
// the CLI surface is explicitly out of scope for this core.

use nes_core::emulator::{Emulator, RunStop};
use std::env;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(rom_path) = args.next() else {
        eprintln!("usage: nes-core <rom.nes> [--frames N] [--trace FILE] [--dump-png FILE]");
        return ExitCode::FAILURE;
    };

    let mut frame_limit: Option<u64> = None;
    let mut trace_path: Option<String> = None;
    let mut dump_png_path: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => frame_limit = args.next().and_then(|v| v.parse().ok()),
            "--trace" => trace_path = args.next(),
            "--dump-png" => dump_png_path = args.next(),
            other => {
                eprintln!("unrecognized argument: {other}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut emulator = Emulator::new();
    if let Err(e) = emulator.load_rom(&rom_path) {
        eprintln!("failed to load {rom_path}: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(path) = trace_path {
        match File::create(&path) {
            Ok(file) => emulator.attach_trace_sink(Some(Box::new(file))),
            Err(e) => {
                eprintln!("failed to open trace file {path}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut frames_run: u64 = 0;
    loop {
        match emulator.frame() {
            RunStop::FrameComplete => {
                frames_run += 1;
                if frame_limit.is_some_and(|limit| frames_run >= limit) {
                    break;
                }
            }
            RunStop::Halted(err) => {
                eprintln!("CPU halted after {frames_run} frames: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = dump_png_path {
        if let Err(e) = emulator.dump_frame_png(Path::new(&path)) {
            eprintln!("failed to dump framebuffer PNG to {path}: {e}");
            return ExitCode::FAILURE;
        }
    }

    println!("ran {frames_run} frame(s)");
    ExitCode::SUCCESS
}
