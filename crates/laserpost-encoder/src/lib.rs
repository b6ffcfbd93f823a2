//! # laserpost Encoder
//!
//! Modal G-code encoder for two-axis laser cutters running Grbl.
//!
//! ## Components
//!
//! - **Number Format**: fixed-precision G-code words
//! - **Modal Registers**: last-emitted-value memory that suppresses repeated words
//! - **Line Builder**: word and comment assembly with central comment sanitizing
//! - **Laser Power**: cutting mode to power command resolution
//! - **Arc Linearizer**: line segment approximation for arcs without native support
//! - **Laser Encoder**: job lifecycle, motion events and plane dispatch
//!
//! ```ignore
//! use laserpost_encoder::{LaserEncoder, ReplayHost, SectionStart};
//! use laserpost_settings::PostConfig;
//!
//! let mut encoder = LaserEncoder::new(PostConfig::default(), ReplayHost::new(), Vec::new());
//! encoder.open()?;
//! encoder.section_start(&SectionStart::default())?;
//! encoder.linear(10.0, 0.0, 0.0, 500.0)?;
//! encoder.section_end()?;
//! encoder.close()?;
//! ```

pub mod arc_linearizer;
pub mod encoder;
pub mod format;
pub mod host;
pub mod line;
pub mod modal;
pub mod power;

pub use arc_linearizer::{ArcLinearizer, ArcLinearizerConfig};
pub use encoder::{CircularMove, JobState, LaserEncoder, SectionStart};
pub use format::NumberFormat;
pub use host::{Host, LineSink, ReplayHost, WriterSink};
pub use line::{strip_comment, LineBuilder};
pub use modal::{ModalRegister, ModalRegisterSet};
pub use power::{CuttingMode, LaserPower};
