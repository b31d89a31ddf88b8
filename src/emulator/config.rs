// Configuration management
//
// Handles the core's persisted settings: nothing about video/audio/save slots lives
// here since those surfaces aren't part of this core, only the knobs the orchestrator
// itself needs (trace verbosity, where traces go).

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

const CONFIG_FILE: &str = "emulator_config.toml";

/// Core orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Trace logging settings.
    pub trace: TraceConfig,
    /// Directory to write debug frame/nametable/pattern-table PNG dumps to, if any.
    pub frame_dump_dir: Option<PathBuf>,
}

/// Trace logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Minimum level to emit.
    pub level: TraceLevel,
    /// File to append trace lines to, if any.
    pub sink_path: Option<PathBuf>,
}

/// How verbosely the orchestrator logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceLevel {
    /// No tracing.
    None,
    /// One line per executed instruction (Nestest-style).
    Instruction,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            trace: TraceConfig {
                level: TraceLevel::None,
                sink_path: None,
            },
            frame_dump_dir: None,
        }
    }
}

impl EmulatorConfig {
    /// Loads configuration from file, or writes and returns the default if absent.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| {
            let config = Self::default();
            let _ = config.save();
            config
        })
    }

    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }
}
