//! Laser power resolution
//!
//! The laser is a two-state machine (off/on). Switching on selects the
//! command configured for the section's cutting mode; switching off always
//! sends the configured off command.

use crate::line::LineBuilder;
use laserpost_settings::PowerCommands;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Comment attached to the fallback command for an unrecognized mode
pub const UNKNOWN_MODE_MARKER: &str = "unknown jet mode";

/// Cutting mode of a toolpath section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuttingMode {
    /// Through cut
    Through,
    /// Etching
    Etch,
    /// Vaporize engraving
    Vaporize,
    /// No or unrecognized jet mode
    #[default]
    Unknown,
}

impl CuttingMode {
    /// Map a host jet-mode tag; unrecognized tags map to `Unknown`
    pub fn from_jet_mode(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "through" | "through_cut" | "cut" => Self::Through,
            "etch" | "etching" => Self::Etch,
            "vaporize" | "vaporise" => Self::Vaporize,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CuttingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Through => write!(f, "through"),
            Self::Etch => write!(f, "etch"),
            Self::Vaporize => write!(f, "vaporize"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Laser on/off state for the current section
#[derive(Debug, Clone, Default)]
pub struct LaserPower {
    mode: CuttingMode,
    on: bool,
}

impl LaserPower {
    /// Create with the laser off and no cutting mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new section. The laser state is not carried over.
    pub fn begin_section(&mut self, mode: CuttingMode) {
        self.mode = mode;
        self.on = false;
    }

    /// Current cutting mode
    pub fn mode(&self) -> CuttingMode {
        self.mode
    }

    /// Whether the laser is on
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Apply a power event. Returns the line to emit on a state change.
    pub fn switch(&mut self, on: bool, commands: &PowerCommands) -> Option<LineBuilder> {
        if on == self.on {
            return None;
        }
        self.on = on;
        if on {
            Some(Self::resolve(self.mode, commands))
        } else {
            Some(Self::off(commands))
        }
    }

    /// Laser-on command for `mode`
    pub fn resolve(mode: CuttingMode, commands: &PowerCommands) -> LineBuilder {
        match mode {
            CuttingMode::Through => LineBuilder::new().word(&commands.through),
            CuttingMode::Etch => LineBuilder::new().word(&commands.etch),
            CuttingMode::Vaporize => LineBuilder::new().word(&commands.vaporize),
            CuttingMode::Unknown => {
                warn!("laser on requested with unknown jet mode, sending off command");
                Self::off(commands).comment(UNKNOWN_MODE_MARKER)
            }
        }
    }

    /// Laser-off command
    pub fn off(commands: &PowerCommands) -> LineBuilder {
        LineBuilder::new().word(&commands.off)
    }
}
