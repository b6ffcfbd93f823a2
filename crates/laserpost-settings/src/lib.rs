//! laserpost Settings Crate
//!
//! Holds the strongly-typed post-processor configuration and its
//! file persistence.

pub mod config;
pub mod error;

pub use config::{PostConfig, PowerCommands};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use laserpost_core::units::MeasurementSystem;
