//! # laserpost Core
//!
//! Core types shared by the laserpost crates: toolpath geometry,
//! measurement units, and the error taxonomy used by the encoder.

pub mod data;
pub mod error;
pub mod units;

pub use data::{Arc, CircularPlane, Direction, Vec3};
pub use error::{EncodeError, Result};
pub use units::MeasurementSystem;
