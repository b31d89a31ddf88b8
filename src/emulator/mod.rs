// Emulator module - top-level orchestrator
//
// Owns the CPU, bus (which in turn owns RAM, PPU, and the installed mapper) and drives
// the frame loop. This is the only scheduler in the system: `frame()` steps the CPU and
// PPU in lockstep at the hardware's fixed 1:3 clock ratio until the PPU reports a
// completed frame, handling the two couplings between them (VBlank -> NMI, and OAM DMA's
// CPU stall) synchronously, in program order.

mod config;

pub use config::{EmulatorConfig, TraceConfig, TraceLevel};

use crate::bus::Bus;
use crate::cartridge::mappers::create_mapper;
use crate::cartridge::Cartridge;
use crate::cpu::{Cpu, StepOutcome};
use crate::error::CartridgeError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Why a ROM failed to load or run.
#[derive(Debug)]
pub enum EmulatorError {
    Io(io::Error),
    Cartridge(CartridgeError),
    UnknownMapper(crate::cartridge::mappers::MapperError),
}

impl std::fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmulatorError::Io(e) => write!(f, "couldn't read ROM file: {e}"),
            EmulatorError::Cartridge(e) => write!(f, "{e}"),
            EmulatorError::UnknownMapper(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EmulatorError {}

impl From<io::Error> for EmulatorError {
    fn from(e: io::Error) -> Self {
        EmulatorError::Io(e)
    }
}

impl From<CartridgeError> for EmulatorError {
    fn from(e: CartridgeError) -> Self {
        EmulatorError::Cartridge(e)
    }
}

/// Why `frame()` stopped before completing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStop {
    /// A full frame was rendered.
    FrameComplete,
    /// The CPU jammed on an invalid opcode.
    Halted(crate::error::CpuError),
}

/// Coordinates the CPU, bus, PPU, and mapper into a runnable NES.
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    rom_path: Option<PathBuf>,
    config: EmulatorConfig,
    trace_sink: Option<Box<dyn Write>>,
}

impl Emulator {
    /// Builds a freshly power-on emulator with no cartridge loaded.
    pub fn new() -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            rom_path: None,
            config: EmulatorConfig::load_or_default(),
            trace_sink: None,
        }
    }

    /// Parses an iNES file, installs its mapper into the bus, and resets.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EmulatorError> {
        let path = path.as_ref();
        let raw = fs::read(path)?;
        let cartridge = Cartridge::from_ines_bytes(&raw)?;
        let mapper = create_mapper(cartridge).map_err(EmulatorError::UnknownMapper)?;

        self.bus = Bus::new();
        mapper.connect(&mut self.bus);
        self.rom_path = Some(path.to_path_buf());
        self.reset();

        Ok(())
    }

    /// Resets the CPU (which reloads PC from the RESET vector) and the PPU.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
    }

    /// Attaches a sink that receives one Nestest-style trace line per executed
    /// instruction. Pass `None` to stop tracing.
    pub fn attach_trace_sink(&mut self, sink: Option<Box<dyn Write>>) {
        self.trace_sink = sink;
    }

    /// Runs instructions until a full PPU frame completes, or the CPU halts.
    ///
    /// Per instruction: optionally emits a trace line, steps the CPU (which itself
    /// consumes any pending OAM-DMA stall before fetching), then steps the PPU three
    /// times per CPU cycle, relaying a VBlank transition into an NMI synchronously
    /// before the next instruction is fetched.
    pub fn frame(&mut self) -> RunStop {
        loop {
            if let Some(sink) = self.trace_sink.as_mut() {
                let line = self.cpu.trace(&mut self.bus);
                let _ = writeln!(sink, "{line}");
            }

            let outcome = self.cpu.step(&mut self.bus);
            let cycles = match outcome {
                StepOutcome::Executed(cycles) => cycles,
                StepOutcome::Halted(err) => return RunStop::Halted(err),
            };

            let mut frame_complete = false;
            for _ in 0..(cycles as u32 * 3) {
                if self.bus.step_ppu() {
                    frame_complete = true;
                }
            }

            if self.bus.ppu.nmi_pending() {
                self.bus.ppu.clear_nmi();
                self.cpu.nmi(&mut self.bus);
            }

            if frame_complete {
                return RunStop::FrameComplete;
            }
        }
    }

    /// Runs `frame()` in a loop, forwarding each stop reason to `on_stop`; stops for
    /// good when `on_stop` returns `false` or the CPU halts.
    pub fn start(&mut self, mut on_stop: impl FnMut(RunStop) -> bool) {
        loop {
            let stop = self.frame();
            let halted = matches!(stop, RunStop::Halted(_));
            if !on_stop(stop) || halted {
                return;
            }
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EmulatorConfig {
        &mut self.config
    }

    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }

    /// The most recently rendered frame, 256x240 NES palette indices.
    pub fn frame_buffer(&self) -> &[u8] {
        self.bus.ppu.frame()
    }

    /// Debug-only: encodes the most recently rendered frame as a PNG at `path`. Never
    /// called from `frame()`/`start()`.
    pub fn dump_frame_png(&self, path: &Path) -> Result<(), crate::debug::RenderError> {
        crate::debug::save_indexed_png(path, self.frame_buffer(), 256, 240)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
