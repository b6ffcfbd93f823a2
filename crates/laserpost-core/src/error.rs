//! Error handling for laserpost
//!
//! Encoding errors are fatal to the job being encoded. Recoverable
//! conditions (dwell clamping, unknown jet modes) never surface here;
//! they are logged and reported to the host as warnings instead.
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::data::CircularPlane;
use thiserror::Error;

/// Encoder error type
///
/// Represents conditions that abort the running job.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A host event arrived in a lifecycle state that does not accept it
    #[error("Event '{event}' is not valid while the job is {state}")]
    InvalidState {
        /// The event that was rejected.
        event: &'static str,
        /// The lifecycle state at the time of the event.
        state: &'static str,
    },

    /// A circular move was requested in a plane with no native arc
    /// command on a two-axis laser
    #[error("Circular interpolation in the {plane} plane is not supported")]
    UnsupportedPlane {
        /// The rejected plane.
        plane: CircularPlane,
    },

    /// The output sink failed to accept a line
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Create a lifecycle violation error
    pub fn invalid_state(event: &'static str, state: &'static str) -> Self {
        EncodeError::InvalidState { event, state }
    }

    /// Check if this is a lifecycle violation
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, EncodeError::InvalidState { .. })
    }

    /// Check if this is an unsupported geometry error
    pub fn is_unsupported_plane(&self) -> bool {
        matches!(self, EncodeError::UnsupportedPlane { .. })
    }
}

/// Result type using EncodeError
pub type Result<T> = std::result::Result<T, EncodeError>;
