// NES emulation core: 6502 interpreter, PPU state machine, mapper 0, and the bus that
// wires them together. No audio, no controller input, no display surface, no save
// states - this crate produces a frame buffer and a trace log, nothing else.

mod bitfield;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod debug;
pub mod emulator;
pub mod error;
pub mod ppu;
pub mod ram;

pub use bus::{Bus, CpuBus, MemoryMappedDevice};
pub use cartridge::{Cartridge, Mapper, Mirroring};
pub use cpu::{Cpu, StepOutcome};
pub use debug::{
    disassemble_count, disassemble_instruction, disassemble_range, save_indexed_png, CpuDebugger,
    CpuState, Debugger, DisassembledInstruction, LogLevel, Logger, MemoryRegion, MemoryViewer,
    PpuDebugger, PpuState, RenderError, SpriteInfo, TraceEntry, NES_PALETTE,
};
pub use emulator::{Emulator, EmulatorConfig, EmulatorError, RunStop};
pub use error::{BusError, CartridgeError, CpuError};
pub use ppu::Ppu;
pub use ram::Ram;
