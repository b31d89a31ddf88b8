// Error hierarchy for the emulation core
//
// Mirrors the hand-rolled Display/Error convention used throughout this crate (see
// `cartridge::mappers::MapperError`) rather than pulling in `thiserror`/`anyhow`: every
// variant carries exactly the context a caller needs to print a useful message.

use std::fmt;

/// Failure parsing an iNES ROM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    /// First four bytes weren't `NES\x1A`.
    BadMagic,
    /// Byte 4 (PRG bank count) was zero.
    InvalidPrgCount,
    /// Byte 5 (CHR bank count) was zero.
    InvalidChrCount,
    /// Flags byte 7 indicates NES 2.0, which this core does not parse.
    Nes20NotSupported,
    /// Bytes 8-15 weren't all zero (iNES 1.0 requires this).
    ReservedBytesNotZero,
    /// File ended before all PRG banks were read.
    TruncatedPrg,
    /// File ended before all CHR banks were read.
    TruncatedChr,
    /// Extra bytes remained after the last CHR bank.
    TrailingBytes,
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::BadMagic => write!(f, "not an iNES file: bad magic number"),
            CartridgeError::InvalidPrgCount => write!(f, "invalid PRG-ROM bank count: 0"),
            CartridgeError::InvalidChrCount => write!(f, "invalid CHR-ROM bank count: 0"),
            CartridgeError::Nes20NotSupported => write!(f, "NES 2.0 headers are not supported"),
            CartridgeError::ReservedBytesNotZero => {
                write!(f, "header bytes 8-15 are not zeroed")
            }
            CartridgeError::TruncatedPrg => write!(f, "file ends before all PRG-ROM data"),
            CartridgeError::TruncatedChr => write!(f, "file ends before all CHR-ROM data"),
            CartridgeError::TrailingBytes => write!(f, "unexpected data after CHR-ROM"),
        }
    }
}

impl std::error::Error for CartridgeError {}

/// Which side of a bus cell a double-subscription or guard error occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Read,
    Write,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Read => write!(f, "read"),
            Side::Write => write!(f, "write"),
        }
    }
}

/// A fatal wiring error in the CPU address space. These indicate a bug in mapper
/// installation logic, not a condition a running program can trigger, so callers are
/// expected to treat them as `panic!`-worthy rather than recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A callback was already installed on this cell/side.
    DoubleSubscription { addr: u16, side: Side },
    /// A write reached a cell guarded against writes.
    WriteToReadOnly { addr: u16 },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::DoubleSubscription { addr, side } => {
                write!(f, "double {side} subscription at ${addr:04X}")
            }
            BusError::WriteToReadOnly { addr } => {
                write!(f, "write to read-only cell at ${addr:04X}")
            }
        }
    }
}

impl std::error::Error for BusError {}

/// A fault the MPU can hit while executing a program, as opposed to a wiring bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// Fetched one of the 12 opcode bytes that jam real 6502 hardware (the CPU stops
    /// responding to anything but RESET). `0x02` is the byte conventionally used by
    /// test ROMs as a deliberate halt.
    InvalidOpcode(u8),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::InvalidOpcode(opcode) => write!(f, "CPU jammed on opcode ${opcode:02X}"),
        }
    }
}

impl std::error::Error for CpuError {}
