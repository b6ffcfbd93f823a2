//! Host and sink interfaces
//!
//! The host is the CAM side of the conversation: it answers position and
//! parameter queries, linearizes arcs the encoder cannot emit natively,
//! and receives operator warnings. The sink receives finished lines.

use crate::arc_linearizer::ArcLinearizer;
use laserpost_core::{Arc, Vec3};
use std::collections::HashMap;
use std::io::{self, Write};

/// Queries the encoder issues back to the CAM host
pub trait Host {
    /// Current absolute tool position
    fn current_position(&self) -> Vec3;

    /// Named operation parameter for the active section
    fn parameter(&self, _name: &str) -> Option<String> {
        None
    }

    /// Break `arc` into line segment end points within `tolerance`
    fn linearize(&self, arc: &Arc, tolerance: f64) -> Vec<Vec3> {
        ArcLinearizer::default().linearize(arc, tolerance)
    }

    /// Surface a non-fatal warning to the operator
    fn warning(&mut self, _message: &str) {}
}

/// Destination for finished output lines
pub trait LineSink {
    /// Write one line (without terminator)
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink writing newline-terminated lines to any `io::Write`
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and return the inner writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }
}

/// Host that replays a recorded toolpath.
///
/// The driver moves the position forward after each motion event; the
/// parameters are fixed per section and warnings are collected.
#[derive(Debug, Clone, Default)]
pub struct ReplayHost {
    position: Vec3,
    parameters: HashMap<String, String>,
    warnings: Vec<String>,
}

impl ReplayHost {
    /// Create a host positioned at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the tracked tool position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set a named parameter
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Remove every parameter
    pub fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    /// Warnings received so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Host for ReplayHost {
    fn current_position(&self) -> Vec3 {
        self.position
    }

    fn parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_terminates_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("G21").unwrap();
        sink.write_line("").unwrap();
        sink.write_line("G90").unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "G21\n\nG90\n");
    }

    #[test]
    fn test_replay_host_tracks_state() {
        let mut host = ReplayHost::new();
        assert_eq!(host.current_position(), Vec3::ZERO);

        host.set_position(Vec3::new(1.0, 2.0, 3.0));
        host.set_parameter("operation-comment", "Outline");
        host.warning("dwell clamped");

        assert_eq!(host.current_position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(host.parameter("operation-comment").as_deref(), Some("Outline"));
        assert_eq!(host.parameter("missing"), None);
        assert_eq!(host.warnings(), ["dwell clamped".to_string()]);

        host.clear_parameters();
        assert_eq!(host.parameter("operation-comment"), None);
    }
}
