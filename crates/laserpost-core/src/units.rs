//! Measurement units
//!
//! Coordinates pass through the encoder in the job's own units; the
//! measurement system only selects the units command written in the
//! preamble.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// The G-code word selecting this unit system (G21 or G20)
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::Metric => "G21",
            Self::Imperial => "G20",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}
