//! # laserpost
//!
//! A G-code post-processor for two-axis laser cutters running Grbl 1.1.
//!
//! ## Architecture
//!
//! laserpost is organized as a workspace with multiple crates:
//!
//! 1. **laserpost-core** - Geometry types, units, encoder errors
//! 2. **laserpost-settings** - Post configuration and persistence
//! 3. **laserpost-encoder** - Modal registers, laser power, arc dispatch, the encoder
//! 4. **laserpost** - Job replay and the command-line driver

pub mod job;

pub use job::{encode_job, load_job, JobEvent, JobOutput};

pub use laserpost_core::{
    Arc, CircularPlane, Direction, EncodeError, MeasurementSystem, Result, Vec3,
};
pub use laserpost_encoder::{
    CircularMove, CuttingMode, Host, JobState, LaserEncoder, LineSink, ReplayHost, SectionStart,
    WriterSink,
};
pub use laserpost_settings::{PostConfig, PowerCommands};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
