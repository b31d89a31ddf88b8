// Common test utilities for ROM-based integration tests

#![allow(dead_code)]

use nes_core::bus::Bus;
use nes_core::cartridge::mappers::create_mapper;
use nes_core::cpu::Cpu;
use nes_core::Cartridge;
use std::fs;
use std::path::Path;

/// Maximum number of CPU cycles to run before timing out.
pub const MAX_TEST_CYCLES: u64 = 100_000_000;

/// Result of running a test ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed(u8),
    Timeout,
    Unknown,
}

pub struct TestConfig {
    pub max_cycles: u64,
    /// Starting PC address (None = use the RESET vector).
    pub start_pc: Option<u16>,
    pub start_cycles: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            max_cycles: MAX_TEST_CYCLES,
            start_pc: None,
            start_cycles: 0,
        }
    }
}

/// Reads and parses an iNES file from disk.
pub fn load_cartridge(path: &Path) -> Result<Cartridge, String> {
    let raw =
        fs::read(path).map_err(|e| format!("failed to read ROM from {}: {e}", path.display()))?;
    Cartridge::from_ines_bytes(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

/// Builds a bus with `cartridge`'s mapper installed, ready for `cpu.reset`.
pub fn bus_with_cartridge(cartridge: Cartridge) -> Result<Bus, String> {
    let mapper = create_mapper(cartridge).map_err(|e| e.to_string())?;
    let mut bus = Bus::new();
    mapper.connect(&mut bus);
    Ok(bus)
}

/// Inspects the blargg/Mesen test-ROM convention: $6000 holds a status byte (0 = still
/// running, 1 = passed, anything else = a failure code).
pub fn check_test_result(bus: &mut Bus) -> TestResult {
    let status = bus.read(0x6000);
    match status {
        0 => TestResult::Unknown,
        1 => TestResult::Passed,
        code => TestResult::Failed(code),
    }
}

/// Reads a null-terminated ASCII string out of bus memory.
pub fn read_string(bus: &mut Bus, addr: u16, max_len: usize) -> String {
    let mut result = String::new();
    let mut current = addr;
    for _ in 0..max_len {
        let byte = bus.read(current);
        if byte == 0 {
            break;
        }
        if (0x20..=0x7E).contains(&byte) {
            result.push(byte as char);
        }
        current = current.wrapping_add(1);
    }
    result
}

/// Loads a ROM, installs its mapper, and runs the CPU until the test-result convention
/// reports pass/fail or `config.max_cycles` elapses.
pub fn run_test_rom(rom_path: &Path, config: &TestConfig) -> Result<TestResult, String> {
    let cartridge = load_cartridge(rom_path)?;
    let mut bus = bus_with_cartridge(cartridge)?;
    let mut cpu = Cpu::new();

    cpu.reset(&mut bus);
    if let Some(pc) = config.start_pc {
        cpu.pc = pc;
    }
    cpu.cycles = config.start_cycles;

    while cpu.cycles < config.max_cycles {
        if matches!(cpu.step(&mut bus), nes_core::StepOutcome::Halted(_)) {
            return Ok(TestResult::Unknown);
        }

        match check_test_result(&mut bus) {
            TestResult::Passed | TestResult::Failed(_) => return Ok(check_test_result(&mut bus)),
            TestResult::Unknown | TestResult::Timeout => {}
        }
    }

    Ok(TestResult::Timeout)
}

pub fn format_result(result: &TestResult) -> String {
    match result {
        TestResult::Passed => "PASSED".to_string(),
        TestResult::Failed(code) => format!("FAILED (error code: ${code:02X})"),
        TestResult::Timeout => "TIMEOUT".to_string(),
        TestResult::Unknown => "UNKNOWN".to_string(),
    }
}
