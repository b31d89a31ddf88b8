// Debugging tools: CPU/PPU state capture, breakpoints, stepping, trace
// logging, and performance metrics. Everything here is gated by `enabled`
// so a disabled debugger costs one bool check per call site.

pub mod cpu;
pub mod disassembler;
pub mod execution_log;
pub mod logger;
pub mod memory;
pub mod ppu;
pub mod render;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::ppu::Ppu;
use std::collections::HashSet;
use std::time::{Duration, Instant};

pub use cpu::{CpuDebugger, CpuState};
pub use disassembler::{
    disassemble_count, disassemble_instruction, disassemble_range, DisassembledInstruction,
};
pub use execution_log::{ExecutionLog, ExecutionLogEntry, LogFilter, PpuEventType};
pub use logger::{LogLevel, Logger, TraceEntry};
pub use memory::{MemoryRegion, MemoryViewer};
pub use ppu::{PpuDebugger, PpuState, SpriteInfo};
pub use render::{save_indexed_png, RenderError, NES_PALETTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    None,
    Instruction,
    Scanline,
    Frame,
}

/// Rolling FPS/cycle/instruction counters, derived from `start_frame`/`end_frame`
/// calls bracketing each rendered frame.
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub fps: f32,
    pub cpu_cycles_per_frame: u64,
    pub ppu_cycles_per_frame: u64,
    pub total_frames: u64,
    pub total_instructions: u64,
    pub execution_time: Duration,
    /// Last 60 frames, for graphing.
    pub frame_times: Vec<Duration>,
    start_time: Instant,
    last_frame_time: Option<Instant>,
    frame_start_cpu_cycles: u64,
    frame_start_ppu_cycles: u64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            fps: 0.0,
            cpu_cycles_per_frame: 0,
            ppu_cycles_per_frame: 0,
            total_frames: 0,
            total_instructions: 0,
            execution_time: Duration::ZERO,
            frame_times: Vec::with_capacity(60),
            start_time: Instant::now(),
            last_frame_time: None,
            frame_start_cpu_cycles: 0,
            frame_start_ppu_cycles: 0,
        }
    }

    pub fn start_frame(&mut self, cpu_cycles: u64, ppu_cycles: u64) {
        self.frame_start_cpu_cycles = cpu_cycles;
        self.frame_start_ppu_cycles = ppu_cycles;
    }

    pub fn end_frame(&mut self, cpu_cycles: u64, ppu_cycles: u64) {
        let now = Instant::now();

        if let Some(last_time) = self.last_frame_time {
            let frame_time = now.duration_since(last_time);
            if !frame_time.is_zero() {
                self.fps = 1.0 / frame_time.as_secs_f32();
            }

            self.frame_times.push(frame_time);
            if self.frame_times.len() > 60 {
                self.frame_times.remove(0);
            }
        }

        self.last_frame_time = Some(now);
        self.cpu_cycles_per_frame = cpu_cycles.saturating_sub(self.frame_start_cpu_cycles);
        self.ppu_cycles_per_frame = ppu_cycles.saturating_sub(self.frame_start_ppu_cycles);
        self.total_frames += 1;
        self.execution_time = self.start_time.elapsed();
    }

    pub fn record_instruction(&mut self) {
        self.total_instructions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn uptime_string(&self) -> String {
        let uptime = self.start_time.elapsed();
        let hours = uptime.as_secs() / 3600;
        let minutes = (uptime.as_secs() % 3600) / 60;
        let seconds = uptime.as_secs() % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified entry point for every debugging feature, toggled as a whole via
/// `enable`/`disable` so a disabled debugger costs one bool check per call.
pub struct Debugger {
    pub cpu: CpuDebugger,
    pub memory: MemoryViewer,
    pub ppu: PpuDebugger,
    pub logger: Logger,
    pub execution_log: ExecutionLog,
    pub metrics: PerformanceMetrics,
    enabled: bool,
    breakpoints: HashSet<u16>,
    paused: bool,
    step_mode: StepMode,
    target_scanline: Option<u16>,
    target_frame: Option<u64>,
}

impl Debugger {
    /// ```
    /// use nes_core::debug::Debugger;
    ///
    /// let debugger = Debugger::new();
    /// ```
    pub fn new() -> Self {
        Debugger {
            cpu: CpuDebugger::new(),
            memory: MemoryViewer::new(),
            ppu: PpuDebugger::new(),
            logger: Logger::new(),
            execution_log: ExecutionLog::new(),
            enabled: false,
            breakpoints: HashSet::new(),
            paused: false,
            step_mode: StepMode::None,
            target_scanline: None,
            target_frame: None,
            metrics: PerformanceMetrics::new(),
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// ```
    /// use nes_core::debug::Debugger;
    ///
    /// let mut debugger = Debugger::new();
    /// debugger.add_breakpoint(0x8000); // Break at start of ROM
    /// ```
    pub fn add_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.remove(&addr)
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    pub fn breakpoints(&self) -> Vec<u16> {
        self.breakpoints.iter().copied().collect()
    }

    pub fn should_break(&self, cpu: &Cpu) -> bool {
        self.enabled && self.breakpoints.contains(&cpu.pc)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.step_mode = StepMode::None;
        self.target_scanline = None;
        self.target_frame = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Lets exactly one instruction run even while paused, then re-pauses.
    pub fn step(&mut self) {
        self.step_instruction();
    }

    pub fn step_instruction(&mut self) {
        self.step_mode = StepMode::Instruction;
        self.target_scanline = None;
        self.target_frame = None;
    }

    pub fn step_scanline(&mut self, ppu: &Ppu) {
        self.step_mode = StepMode::Scanline;
        self.target_scanline = Some((ppu.scanline() + 1) % 262);
        self.target_frame = None;
    }

    pub fn step_frame(&mut self) {
        self.step_mode = StepMode::Frame;
        self.target_scanline = None;
        self.target_frame = Some(self.metrics.total_frames + 1);
    }

    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Call before executing each CPU instruction. Returns `false` when the
    /// emulator should not advance: already paused, or a breakpoint was hit.
    pub fn before_instruction(&mut self, cpu: &Cpu, bus: &mut Bus) -> bool {
        if !self.enabled {
            return true;
        }

        let stepping = self.step_mode != StepMode::None;

        if self.paused && !stepping {
            return false;
        }

        if !stepping && self.should_break(cpu) {
            self.pause();
            return false;
        }

        if self.logger.is_cpu_trace_enabled() {
            let state = self.cpu.capture_state(cpu, bus);
            self.logger.log_cpu_state(&state);
        }

        if self.execution_log.is_instruction_logging_enabled() {
            let instruction = disassemble_instruction(cpu.pc, bus);
            self.execution_log.log_instruction(
                cpu.cycles,
                cpu.pc,
                instruction,
                cpu.a,
                cpu.x,
                cpu.y,
                cpu.status,
                cpu.sp,
            );
        }

        if self.step_mode == StepMode::Instruction {
            self.step_mode = StepMode::None;
            self.paused = true;
        }

        self.metrics.record_instruction();
        true
    }

    /// Call after each PPU step; logs PPU trace state and resolves a pending
    /// step-scanline request once the target scanline is reached.
    pub fn after_ppu_step(&mut self, ppu: &Ppu) {
        if !self.enabled {
            return;
        }

        if self.logger.is_ppu_trace_enabled() {
            let state = self.ppu.capture_state(ppu);
            self.logger.log_ppu_state(&state);
        }

        if self.step_mode == StepMode::Scanline && self.target_scanline == Some(ppu.scanline()) {
            self.step_mode = StepMode::None;
            self.target_scanline = None;
            self.paused = true;
        }
    }

    pub fn on_frame_start(&mut self, cpu: &Cpu) {
        if !self.enabled {
            return;
        }
        self.metrics.start_frame(cpu.cycles, cpu.cycles * 3);
    }

    /// Resolves a pending step-frame request once the target frame is reached.
    pub fn on_frame_end(&mut self, cpu: &Cpu) {
        if !self.enabled {
            return;
        }

        self.metrics.end_frame(cpu.cycles, cpu.cycles * 3);

        if self.step_mode == StepMode::Frame && self.target_frame.is_some_and(|t| self.metrics.total_frames >= t) {
            self.step_mode = StepMode::None;
            self.target_frame = None;
            self.paused = true;
        }
    }

    pub fn log_memory_read(&mut self, cpu: &Cpu, address: u16, value: u8) {
        if self.enabled {
            self.execution_log.log_memory_read(cpu.cycles, address, value, cpu.pc);
        }
    }

    pub fn log_memory_write(&mut self, cpu: &Cpu, address: u16, value: u8) {
        if self.enabled {
            self.execution_log.log_memory_write(cpu.cycles, address, value, cpu.pc);
        }
    }

    pub fn log_ppu_event(&mut self, cpu: &Cpu, event: PpuEventType) {
        if self.enabled {
            self.execution_log.log_ppu_event(cpu.cycles, event);
        }
    }

    pub fn get_cpu_state(&self, cpu: &Cpu, bus: &mut Bus) -> CpuState {
        self.cpu.capture_state(cpu, bus)
    }

    pub fn get_ppu_state(&self, ppu: &Ppu) -> PpuState {
        self.ppu.capture_state(ppu)
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}
