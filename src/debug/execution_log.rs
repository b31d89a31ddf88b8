// Circular-buffer trace of instruction execution, memory access, and PPU
// events, independent of the lighter-weight CPU/PPU state trace in `logger`.

use super::disassembler::DisassembledInstruction;
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PpuEventType {
    VBlankStart { frame: u64 },
    VBlankEnd { frame: u64 },
    NmiTriggered { cycle: u64 },
    PpuCtrlChange { old: u8, new: u8 },
    PpuMaskChange { old: u8, new: u8 },
    Sprite0Hit { scanline: u16, cycle: u16 },
    ScanlineMilestone { scanline: u16 },
}

impl std::fmt::Display for PpuEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PpuEventType::VBlankStart { frame } => write!(f, "VBlank Start (Frame {})", frame),
            PpuEventType::VBlankEnd { frame } => write!(f, "VBlank End (Frame {})", frame),
            PpuEventType::NmiTriggered { cycle } => write!(f, "NMI Triggered (Cycle {})", cycle),
            PpuEventType::PpuCtrlChange { old, new } => {
                write!(f, "PPUCTRL: ${:02X} -> ${:02X}", old, new)
            }
            PpuEventType::PpuMaskChange { old, new } => {
                write!(f, "PPUMASK: ${:02X} -> ${:02X}", old, new)
            }
            PpuEventType::Sprite0Hit { scanline, cycle } => {
                write!(f, "Sprite 0 Hit (SL:{}, CY:{})", scanline, cycle)
            }
            PpuEventType::ScanlineMilestone { scanline } => write!(f, "Scanline {}", scanline),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionLogEntry {
    Instruction {
        cycle: u64,
        pc: u16,
        instruction: DisassembledInstruction,
        a: u8,
        x: u8,
        y: u8,
        p: u8,
        sp: u8,
    },
    MemoryRead { cycle: u64, address: u16, value: u8, pc: u16 },
    MemoryWrite { cycle: u64, address: u16, value: u8, pc: u16 },
    PpuEvent { cycle: u64, event: PpuEventType },
}

impl ExecutionLogEntry {
    pub fn cycle(&self) -> u64 {
        match self {
            ExecutionLogEntry::Instruction { cycle, .. }
            | ExecutionLogEntry::MemoryRead { cycle, .. }
            | ExecutionLogEntry::MemoryWrite { cycle, .. }
            | ExecutionLogEntry::PpuEvent { cycle, .. } => *cycle,
        }
    }

    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        match self {
            ExecutionLogEntry::Instruction { instruction, .. } => {
                instruction.mnemonic.to_lowercase().contains(&query)
                    || instruction.format_assembly().to_lowercase().contains(&query)
            }
            ExecutionLogEntry::MemoryRead { address, .. }
            | ExecutionLogEntry::MemoryWrite { address, .. } => {
                format!("{:04X}", address).to_lowercase().contains(&query)
            }
            ExecutionLogEntry::PpuEvent { event, .. } => {
                event.to_string().to_lowercase().contains(&query)
            }
        }
    }
}

impl std::fmt::Display for ExecutionLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionLogEntry::Instruction { cycle, pc, instruction, a, x, y, p, sp } => write!(
                f,
                "[{:08}] ${:04X}: {:20} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
                cycle,
                pc,
                instruction.format_assembly(),
                a,
                x,
                y,
                p,
                sp
            ),
            ExecutionLogEntry::MemoryRead { cycle, address, value, pc } => {
                write!(f, "[{:08}] MEM READ  ${:04X} = ${:02X} (PC: ${:04X})", cycle, address, value, pc)
            }
            ExecutionLogEntry::MemoryWrite { cycle, address, value, pc } => {
                write!(f, "[{:08}] MEM WRITE ${:04X} = ${:02X} (PC: ${:04X})", cycle, address, value, pc)
            }
            ExecutionLogEntry::PpuEvent { cycle, event } => write!(f, "[{:08}] PPU: {}", cycle, event),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LogFilter {
    pub show_instructions: bool,
    pub show_memory_reads: bool,
    pub show_memory_writes: bool,
    pub show_ppu_events: bool,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            show_instructions: true,
            show_memory_reads: false,
            show_memory_writes: false,
            show_ppu_events: false,
        }
    }
}

impl LogFilter {
    pub fn passes(&self, entry: &ExecutionLogEntry) -> bool {
        match entry {
            ExecutionLogEntry::Instruction { .. } => self.show_instructions,
            ExecutionLogEntry::MemoryRead { .. } => self.show_memory_reads,
            ExecutionLogEntry::MemoryWrite { .. } => self.show_memory_writes,
            ExecutionLogEntry::PpuEvent { .. } => self.show_ppu_events,
        }
    }
}

macro_rules! log_toggle {
    ($field:ident, $enable:ident, $disable:ident, $is_enabled:ident) => {
        pub fn $enable(&mut self) {
            self.$field = true;
        }

        pub fn $disable(&mut self) {
            self.$field = false;
        }

        pub fn $is_enabled(&self) -> bool {
            self.$field
        }
    };
}

/// Circular buffer of execution events, capped at `max_entries` (0 = unbounded).
pub struct ExecutionLog {
    entries: VecDeque<ExecutionLogEntry>,
    max_entries: usize,
    log_instructions: bool,
    log_memory_reads: bool,
    log_memory_writes: bool,
    log_ppu_events: bool,
    memory_filter_start: Option<u16>,
    memory_filter_end: Option<u16>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: 10000,
            log_instructions: true,
            log_memory_reads: false,
            log_memory_writes: false,
            log_ppu_events: false,
            memory_filter_start: None,
            memory_filter_end: None,
        }
    }

    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max;
        self.trim_if_needed();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    log_toggle!(log_instructions, enable_instruction_logging, disable_instruction_logging, is_instruction_logging_enabled);
    log_toggle!(log_memory_reads, enable_memory_read_logging, disable_memory_read_logging, is_memory_read_logging_enabled);
    log_toggle!(log_memory_writes, enable_memory_write_logging, disable_memory_write_logging, is_memory_write_logging_enabled);
    log_toggle!(log_ppu_events, enable_ppu_event_logging, disable_ppu_event_logging, is_ppu_event_logging_enabled);

    /// Inclusive range; clear with [`Self::clear_memory_filter`].
    pub fn set_memory_filter(&mut self, start: u16, end: u16) {
        self.memory_filter_start = Some(start);
        self.memory_filter_end = Some(end);
    }

    pub fn clear_memory_filter(&mut self) {
        self.memory_filter_start = None;
        self.memory_filter_end = None;
    }

    fn passes_memory_filter(&self, address: u16) -> bool {
        match (self.memory_filter_start, self.memory_filter_end) {
            (Some(start), Some(end)) => (start..=end).contains(&address),
            _ => true,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log_instruction(
        &mut self,
        cycle: u64,
        pc: u16,
        instruction: DisassembledInstruction,
        a: u8,
        x: u8,
        y: u8,
        p: u8,
        sp: u8,
    ) {
        if !self.log_instructions {
            return;
        }
        self.add_entry(ExecutionLogEntry::Instruction { cycle, pc, instruction, a, x, y, p, sp });
    }

    pub fn log_memory_read(&mut self, cycle: u64, address: u16, value: u8, pc: u16) {
        if !self.log_memory_reads || !self.passes_memory_filter(address) {
            return;
        }
        self.add_entry(ExecutionLogEntry::MemoryRead { cycle, address, value, pc });
    }

    pub fn log_memory_write(&mut self, cycle: u64, address: u16, value: u8, pc: u16) {
        if !self.log_memory_writes || !self.passes_memory_filter(address) {
            return;
        }
        self.add_entry(ExecutionLogEntry::MemoryWrite { cycle, address, value, pc });
    }

    pub fn log_ppu_event(&mut self, cycle: u64, event: PpuEventType) {
        if !self.log_ppu_events {
            return;
        }
        self.add_entry(ExecutionLogEntry::PpuEvent { cycle, event });
    }

    fn add_entry(&mut self, entry: ExecutionLogEntry) {
        self.entries.push_back(entry);
        self.trim_if_needed();
    }

    fn trim_if_needed(&mut self) {
        if self.max_entries > 0 {
            while self.entries.len() > self.max_entries {
                self.entries.pop_front();
            }
        }
    }

    pub fn entries(&self) -> &VecDeque<ExecutionLogEntry> {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn export_to_file<P: AsRef<Path>>(&self, path: P, filter: Option<&LogFilter>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        for entry in &self.entries {
            if filter.is_some_and(|f| !f.passes(entry)) {
                continue;
            }
            writeln!(file, "{}", entry)?;
        }
        Ok(())
    }

    pub fn get_filtered_entries(&self, query: &str, filter: &LogFilter) -> Vec<&ExecutionLogEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.passes(entry) && entry.matches_search(query))
            .collect()
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::debug::disassembler::disassemble_instruction;

    fn nop_instruction() -> DisassembledInstruction {
        let mut bus = Bus::new();
        bus.write(0x8000, 0xEA);
        disassemble_instruction(0x8000, &mut bus)
    }

    #[test]
    fn a_fresh_log_starts_empty_with_the_default_capacity() {
        let log = ExecutionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.max_entries(), 10000);
        assert!(log.is_instruction_logging_enabled());
        assert!(!log.is_memory_read_logging_enabled());
    }

    #[test]
    fn logging_is_dropped_when_its_channel_is_disabled() {
        let mut log = ExecutionLog::new();
        log.disable_instruction_logging();
        log.log_instruction(100, 0x8000, nop_instruction(), 0, 0, 0, 0x24, 0xFD);
        assert!(log.is_empty());
    }

    #[test]
    fn log_instruction_records_cycle_and_pc() {
        let mut log = ExecutionLog::new();
        log.log_instruction(100, 0x8000, nop_instruction(), 0, 0, 0, 0x24, 0xFD);
        assert_eq!(log.len(), 1);
        match log.entries().front().unwrap() {
            ExecutionLogEntry::Instruction { cycle, pc, .. } => {
                assert_eq!(*cycle, 100);
                assert_eq!(*pc, 0x8000);
            }
            other => panic!("expected an instruction entry, got {:?}", other),
        }
    }

    #[test]
    fn memory_reads_and_writes_are_kept_separate() {
        let mut log = ExecutionLog::new();
        log.enable_memory_read_logging();
        log.enable_memory_write_logging();
        log.log_memory_read(100, 0x2002, 0x80, 0x8000);
        log.log_memory_write(101, 0x2000, 0x42, 0x8001);
        assert_eq!(log.len(), 2);
        assert!(matches!(log.entries()[0], ExecutionLogEntry::MemoryRead { .. }));
        assert!(matches!(log.entries()[1], ExecutionLogEntry::MemoryWrite { .. }));
    }

    #[test]
    fn memory_filter_excludes_addresses_outside_the_range() {
        let mut log = ExecutionLog::new();
        log.enable_memory_read_logging();
        log.set_memory_filter(0x2000, 0x2007);
        log.log_memory_read(100, 0x2002, 0x80, 0x8000);
        log.log_memory_read(101, 0x0800, 0x00, 0x8001);
        assert_eq!(log.len(), 1);

        log.clear_memory_filter();
        log.log_memory_read(102, 0x0800, 0x00, 0x8001);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn the_oldest_entry_is_dropped_once_max_entries_is_exceeded() {
        let mut log = ExecutionLog::new();
        log.set_max_entries(3);
        log.enable_ppu_event_logging();
        for frame in 0..4 {
            log.log_ppu_event(frame, PpuEventType::VBlankStart { frame });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries().front().unwrap().cycle(), 1);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = ExecutionLog::new();
        log.enable_ppu_event_logging();
        log.log_ppu_event(100, PpuEventType::VBlankStart { frame: 0 });
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn log_filter_passes_only_the_enabled_entry_kinds() {
        let filter = LogFilter { show_instructions: true, show_memory_reads: false, ..Default::default() };
        let instr_entry = ExecutionLogEntry::Instruction {
            cycle: 100,
            pc: 0x8000,
            instruction: nop_instruction(),
            a: 0,
            x: 0,
            y: 0,
            p: 0,
            sp: 0,
        };
        let mem_entry = ExecutionLogEntry::MemoryRead { cycle: 101, address: 0x2002, value: 0x80, pc: 0x8001 };
        assert!(filter.passes(&instr_entry));
        assert!(!filter.passes(&mem_entry));
    }

    #[test]
    fn search_matches_mnemonic_operand_and_case_are_ignored() {
        let mut bus = Bus::new();
        bus.write(0x8000, 0xA9);
        bus.write(0x8001, 0x42);
        let entry = ExecutionLogEntry::Instruction {
            cycle: 100,
            pc: 0x8000,
            instruction: disassemble_instruction(0x8000, &mut bus),
            a: 0,
            x: 0,
            y: 0,
            p: 0,
            sp: 0,
        };
        assert!(entry.matches_search("LDA"));
        assert!(entry.matches_search("lda"));
        assert!(entry.matches_search("#$42"));
        assert!(!entry.matches_search("STA"));
    }

    #[test]
    fn ppu_event_display_text_includes_the_relevant_fields() {
        assert_eq!(format!("{}", PpuEventType::VBlankStart { frame: 5 }), "VBlank Start (Frame 5)");
        assert_eq!(format!("{}", PpuEventType::NmiTriggered { cycle: 12345 }), "NMI Triggered (Cycle 12345)");
        assert_eq!(
            format!("{}", PpuEventType::PpuCtrlChange { old: 0x80, new: 0x90 }),
            "PPUCTRL: $80 -> $90"
        );
    }

    #[test]
    fn instruction_entry_display_includes_every_register() {
        let entry = ExecutionLogEntry::Instruction {
            cycle: 123,
            pc: 0x8000,
            instruction: nop_instruction(),
            a: 0x42,
            x: 0x10,
            y: 0x20,
            p: 0x24,
            sp: 0xFD,
        };
        let display = format!("{}", entry);
        assert!(display.contains("[00000123]"));
        assert!(display.contains("$8000"));
        assert!(display.contains("NOP"));
        assert!(display.contains("A:42"));
        assert!(display.contains("X:10"));
        assert!(display.contains("Y:20"));
        assert!(display.contains("P:24"));
        assert!(display.contains("SP:FD"));
    }
}
