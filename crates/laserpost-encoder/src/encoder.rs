//! Grbl laser encoder
//!
//! Turns the host's event stream into G-code lines. One encoder instance
//! owns all state for one job: the configuration, the modal registers and
//! the laser state. Events must arrive in lifecycle order
//! (open, then sections, then close); anything else is rejected.

use crate::format::NumberFormat;
use crate::host::{Host, LineSink};
use crate::line::{strip_comment, LineBuilder};
use crate::modal::ModalRegisterSet;
use crate::power::{CuttingMode, LaserPower};
use laserpost_core::{Arc, CircularPlane, Direction, EncodeError, Result, Vec3};
use laserpost_settings::PostConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Parameter consulted when a section start carries no comment
pub const OPERATION_COMMENT_PARAMETER: &str = "operation-comment";

/// Shortest dwell the controller accepts, in seconds
pub const MIN_DWELL_SECONDS: f64 = 0.001;

/// Longest dwell the controller accepts, in seconds
pub const MAX_DWELL_SECONDS: f64 = 99999.999;

/// Completion marker written at job close
pub const END_OF_JOB_COMMENT: &str = "End of job";

/// Section metadata supplied with a section start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionStart {
    /// Jet-mode tag (`through`, `etch`, `vaporize`)
    pub jet_mode: Option<String>,
    /// Operation comment
    pub comment: Option<String>,
}

/// A circular move from the current position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularMove {
    /// Rotation direction
    pub clockwise: bool,
    /// Arc center
    pub center: Vec3,
    /// End point
    pub end: Vec3,
    /// Active interpolation plane
    pub plane: CircularPlane,
    /// Feed rate
    pub feed: f64,
    /// Plane normal for arcs outside the principal planes
    #[serde(default)]
    pub normal: Option<Vec3>,
}

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Nothing written yet
    Unopened,
    /// Banner written, between sections
    Open,
    /// Inside a toolpath section
    Section,
    /// Postamble written; terminal
    Closed,
}

impl JobState {
    /// Lowercase state name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unopened => "unopened",
            Self::Open => "open",
            Self::Section => "in a section",
            Self::Closed => "closed",
        }
    }
}

/// Modal G-code encoder for a two-axis Grbl laser
#[derive(Debug)]
pub struct LaserEncoder<H: Host, S: LineSink> {
    config: PostConfig,
    host: H,
    sink: S,
    registers: ModalRegisterSet,
    power: LaserPower,
    state: JobState,
    first_section: bool,
    lines_written: usize,
    sections: usize,
}

impl<H: Host, S: LineSink> LaserEncoder<H, S> {
    /// Create an encoder for one job
    pub fn new(config: PostConfig, host: H, sink: S) -> Self {
        Self {
            config,
            host,
            sink,
            registers: ModalRegisterSet::new(),
            power: LaserPower::new(),
            state: JobState::Unopened,
            first_section: true,
            lines_written: 0,
            sections: 0,
        }
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for drivers that track position
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Current lifecycle state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Active cutting mode
    pub fn cutting_mode(&self) -> CuttingMode {
        self.power.mode()
    }

    /// Whether the laser is on
    pub fn is_laser_on(&self) -> bool {
        self.power.is_on()
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Consume the encoder, returning the host and sink
    pub fn into_parts(self) -> (H, S) {
        (self.host, self.sink)
    }

    /// Write the identifying banner
    pub fn open(&mut self) -> Result<()> {
        self.expect_state("open", &[JobState::Unopened])?;

        let version = format!("laserpost {}", env!("CARGO_PKG_VERSION"));
        self.emit(LineBuilder::comment_only(&version))?;
        self.emit(LineBuilder::comment_only("Grbl 1.1 laser post"))?;

        self.state = JobState::Open;
        info!(units = %self.config.units, "job opened");
        Ok(())
    }

    /// Begin a toolpath section
    pub fn section_start(&mut self, section: &SectionStart) -> Result<()> {
        self.expect_state("section_start", &[JobState::Open])?;

        if self.first_section {
            self.write_preamble()?;
            self.first_section = false;
        }

        let mode = section
            .jet_mode
            .as_deref()
            .map(CuttingMode::from_jet_mode)
            .unwrap_or_default();
        if mode == CuttingMode::Unknown {
            if let Some(tag) = &section.jet_mode {
                warn!(jet_mode = %tag, "unrecognized jet mode");
            }
        }
        self.power.begin_section(mode);

        let comment = section
            .comment
            .clone()
            .or_else(|| self.host.parameter(OPERATION_COMMENT_PARAMETER))
            .map(|c| strip_comment(&c))
            .filter(|c| !c.is_empty());
        if let Some(comment) = comment {
            self.write_raw("")?;
            self.emit(LineBuilder::comment_only(&comment))?;
        }

        self.state = JobState::Section;
        self.sections += 1;
        debug!(section = self.sections, %mode, "section started");
        Ok(())
    }

    /// End the active toolpath section
    pub fn section_end(&mut self) -> Result<()> {
        self.expect_state("section_end", &[JobState::Section])?;

        if self.power.is_on() {
            warn!("section ended with the laser on, switching off");
            let off = self.power.switch(false, &self.config.power);
            self.emit_opt(off)?;
        }

        self.registers.plane.reset();
        let plane = self.plane_word(CircularPlane::XY);
        self.emit(LineBuilder::new().opt_word(plane))?;
        self.registers.reset_motion();

        self.state = JobState::Open;
        debug!(section = self.sections, "section ended");
        Ok(())
    }

    /// Write the postamble. No output is possible afterwards.
    pub fn close(&mut self) -> Result<()> {
        self.expect_state("close", &[JobState::Open])?;

        self.emit(LaserPower::off(&self.config.power))?;
        if self.config.home_at_end {
            self.emit(LineBuilder::new().word("$H"))?;
        }
        if let Some(x) = self.config.finish_x {
            let line = LineBuilder::new()
                .word("G0")
                .word(NumberFormat::axis("X").format(x));
            self.emit(line)?;
        }
        if let Some(y) = self.config.finish_y {
            let line = LineBuilder::new()
                .word("G0")
                .word(NumberFormat::axis("Y").format(y));
            self.emit(line)?;
        }
        self.emit(LineBuilder::new().word("M2"))?;
        self.emit(LineBuilder::comment_only(END_OF_JOB_COMMENT))?;

        self.state = JobState::Closed;
        info!(
            lines = self.lines_written,
            sections = self.sections,
            "job closed"
        );
        Ok(())
    }

    /// Rapid positioning move
    pub fn rapid(&mut self, x: f64, y: f64, z: f64) -> Result<()> {
        self.expect_motion("rapid")?;

        let x = self.registers.x.format(x);
        let y = self.registers.y.format(y);
        if x.is_some() || y.is_some() {
            let feed = self.registers.feed.format(self.config.rapid_feed);
            let line = LineBuilder::new()
                .word("G0")
                .opt_word(x)
                .opt_word(y)
                .opt_word(feed);
            debug!("rapid xy");
            self.emit(line)?;
        }

        if let Some(z) = self.registers.z.format(z) {
            let feed = self.registers.feed.format(self.config.rapid_z_feed);
            let line = LineBuilder::new().word("G0").word(z).opt_word(feed);
            debug!("rapid z");
            self.emit(line)?;
        }

        Ok(())
    }

    /// Linear cutting move
    pub fn linear(&mut self, x: f64, y: f64, z: f64, feed: f64) -> Result<()> {
        self.expect_motion("linear")?;

        let x = self.registers.x.format(x);
        let y = self.registers.y.format(y);
        let z = self.registers.z.format(z);
        let feed = self.registers.feed.format(feed);

        if x.is_some() || y.is_some() || z.is_some() {
            debug!("linear move");
            let line = LineBuilder::new()
                .word("G1")
                .opt_word(x)
                .opt_word(y)
                .opt_word(z)
                .opt_word(feed);
            self.emit(line)?;
        } else if feed.is_some() {
            debug!("feed-only linear move");
            self.emit(LineBuilder::new().word("G1").opt_word(feed))?;
        }

        Ok(())
    }

    /// Circular move, dispatched on the active plane
    pub fn circular(&mut self, motion: &CircularMove) -> Result<()> {
        self.expect_motion("circular")?;

        let direction = Direction::from_clockwise(motion.clockwise);
        match motion.plane {
            CircularPlane::XY => self.native_arc(direction, motion),
            CircularPlane::ZX | CircularPlane::YZ => {
                warn!(plane = %motion.plane, "no native arc for plane");
                Err(EncodeError::UnsupportedPlane {
                    plane: motion.plane,
                })
            }
            CircularPlane::Other => self.linearized_arc(direction, motion),
        }
    }

    /// Dwell, clamped into the controller's accepted range
    pub fn dwell(&mut self, seconds: f64) -> Result<()> {
        self.expect_motion("dwell")?;

        let clamped = if !seconds.is_finite() {
            let message = format!(
                "Dwell of {} s is not a number of seconds, using {} s",
                seconds, MIN_DWELL_SECONDS
            );
            warn!("{}", message);
            self.host.warning(&message);
            MIN_DWELL_SECONDS
        } else if seconds > MAX_DWELL_SECONDS {
            let message = format!(
                "Dwell of {} s exceeds the maximum, clamped to {} s",
                seconds, MAX_DWELL_SECONDS
            );
            warn!("{}", message);
            self.host.warning(&message);
            MAX_DWELL_SECONDS
        } else {
            seconds.max(MIN_DWELL_SECONDS)
        };

        debug!(seconds = clamped, "dwell");
        let line = LineBuilder::new()
            .word("G4")
            .word(NumberFormat::axis("P").format(clamped));
        self.emit(line)
    }

    /// Laser power event
    pub fn power(&mut self, on: bool) -> Result<()> {
        self.expect_state("power", &[JobState::Section])?;
        let line = self.power.switch(on, &self.config.power);
        if line.is_some() {
            debug!(on, mode = %self.power.mode(), "laser power");
        }
        self.emit_opt(line)
    }

    fn write_preamble(&mut self) -> Result<()> {
        self.emit(LaserPower::off(&self.config.power))?;
        self.emit(LineBuilder::new().word(self.config.units.gcode()))?;

        self.registers.plane.reset();
        let plane = self.plane_word(CircularPlane::XY);
        self.emit(LineBuilder::new().opt_word(plane))?;

        self.emit(LineBuilder::new().word("G90"))?;
        if self.config.set_position_xy {
            self.emit(LineBuilder::new().word("G92").word("X0").word("Y0").word("Z0"))?;
        }
        if self.config.home_at_start {
            self.emit(LineBuilder::new().word("$H"))?;
        }
        debug!("preamble written");
        Ok(())
    }

    fn native_arc(&mut self, direction: Direction, motion: &CircularMove) -> Result<()> {
        let start = self.host.current_position();

        let plane = self.plane_word(CircularPlane::XY);
        let x = self.registers.x.format(motion.end.x);
        let y = self.registers.y.format(motion.end.y);
        let z = self.registers.z.format(motion.end.z);
        let i = self
            .registers
            .i
            .format_reference_point(motion.center.x - start.x, "I0");
        let j = self
            .registers
            .j
            .format_reference_point(motion.center.y - start.y, "J0");
        let feed = self.registers.feed.format(motion.feed);

        let line = LineBuilder::new()
            .opt_word(plane)
            .word(format!("G{}", direction.gcode_number()))
            .opt_word(x)
            .opt_word(y)
            .opt_word(z)
            .word(i)
            .word(j)
            .opt_word(feed);
        debug!(?direction, "native arc");
        self.emit(line)
    }

    fn linearized_arc(&mut self, direction: Direction, motion: &CircularMove) -> Result<()> {
        let start = self.host.current_position();
        let arc = Arc::with_normal(
            start,
            motion.center,
            motion.end,
            direction,
            motion.normal.unwrap_or(Vec3::UNIT_Z),
        );

        let points = self.host.linearize(&arc, self.config.tolerance);
        debug!(segments = points.len(), "arc linearized");
        for point in points {
            self.linear(point.x, point.y, point.z, motion.feed)?;
        }
        Ok(())
    }

    fn plane_word(&mut self, plane: CircularPlane) -> Option<String> {
        plane
            .gcode_number()
            .and_then(|number| self.registers.plane.format(f64::from(number)))
    }

    fn expect_motion(&self, event: &'static str) -> Result<()> {
        self.expect_state(event, &[JobState::Open, JobState::Section])
    }

    fn expect_state(&self, event: &'static str, allowed: &[JobState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EncodeError::invalid_state(event, self.state.name()))
        }
    }

    fn emit_opt(&mut self, line: Option<LineBuilder>) -> Result<()> {
        match line {
            Some(line) => self.emit(line),
            None => Ok(()),
        }
    }

    fn emit(&mut self, line: LineBuilder) -> Result<()> {
        match line.build() {
            Some(text) => self.write_raw(&text),
            None => Ok(()),
        }
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.sink.write_line(text)?;
        self.lines_written += 1;
        Ok(())
    }
}
