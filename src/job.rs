//! Recorded job replay
//!
//! A job file is a JSON array of events, each tagged by an `event` field:
//!
//! ```json
//! [
//!   { "event": "open" },
//!   { "event": "section_start", "jet_mode": "etch", "comment": "Outline" },
//!   { "event": "rapid", "x": 0, "y": 0, "z": 0 },
//!   { "event": "power", "on": true },
//!   { "event": "linear", "x": 10, "y": 0, "z": 0, "feed": 500 },
//!   { "event": "power", "on": false },
//!   { "event": "section_end" },
//!   { "event": "close" }
//! ]
//! ```

use anyhow::Context;
use laserpost_core::Vec3;
use laserpost_encoder::{CircularMove, LaserEncoder, LineSink, ReplayHost, SectionStart};
use laserpost_settings::PostConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One recorded host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    Open,
    SectionStart {
        #[serde(default)]
        jet_mode: Option<String>,
        #[serde(default)]
        comment: Option<String>,
        /// Operation parameters visible to the encoder for this section
        #[serde(default)]
        parameters: HashMap<String, String>,
    },
    Rapid {
        x: f64,
        y: f64,
        z: f64,
    },
    Linear {
        x: f64,
        y: f64,
        z: f64,
        feed: f64,
    },
    Circular(CircularMove),
    Dwell {
        seconds: f64,
    },
    Power {
        on: bool,
    },
    SectionEnd,
    Close,
}

impl JobEvent {
    /// Event tag as written in job files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::SectionStart { .. } => "section_start",
            Self::Rapid { .. } => "rapid",
            Self::Linear { .. } => "linear",
            Self::Circular(_) => "circular",
            Self::Dwell { .. } => "dwell",
            Self::Power { .. } => "power",
            Self::SectionEnd => "section_end",
            Self::Close => "close",
        }
    }
}

/// Outcome of replaying a job
#[derive(Debug)]
pub struct JobOutput<S> {
    /// The sink, holding every written line
    pub sink: S,
    /// Operator warnings raised while encoding
    pub warnings: Vec<String>,
    /// Number of lines written
    pub lines: usize,
}

/// Read a job file
pub fn load_job(path: &Path) -> anyhow::Result<Vec<JobEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {}", path.display()))?;
    let events: Vec<JobEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse job file {}", path.display()))?;
    debug!(events = events.len(), path = %path.display(), "job loaded");
    Ok(events)
}

/// Replay `events` through a fresh encoder writing to `sink`
pub fn encode_job<S: LineSink>(
    config: PostConfig,
    events: &[JobEvent],
    sink: S,
) -> anyhow::Result<JobOutput<S>> {
    let mut encoder = LaserEncoder::new(config, ReplayHost::new(), sink);

    for (index, event) in events.iter().enumerate() {
        apply(&mut encoder, event)
            .with_context(|| format!("Event #{} ({}) failed", index + 1, event.name()))?;
    }

    let lines = encoder.lines_written();
    let (host, sink) = encoder.into_parts();
    Ok(JobOutput {
        sink,
        warnings: host.warnings().to_vec(),
        lines,
    })
}

fn apply<S: LineSink>(
    encoder: &mut LaserEncoder<ReplayHost, S>,
    event: &JobEvent,
) -> laserpost_core::Result<()> {
    match event {
        JobEvent::Open => encoder.open(),
        JobEvent::SectionStart {
            jet_mode,
            comment,
            parameters,
        } => {
            let host = encoder.host_mut();
            host.clear_parameters();
            for (name, value) in parameters {
                host.set_parameter(name.as_str(), value.as_str());
            }
            encoder.section_start(&SectionStart {
                jet_mode: jet_mode.clone(),
                comment: comment.clone(),
            })
        }
        JobEvent::Rapid { x, y, z } => {
            encoder.rapid(*x, *y, *z)?;
            encoder.host_mut().set_position(Vec3::new(*x, *y, *z));
            Ok(())
        }
        JobEvent::Linear { x, y, z, feed } => {
            encoder.linear(*x, *y, *z, *feed)?;
            encoder.host_mut().set_position(Vec3::new(*x, *y, *z));
            Ok(())
        }
        JobEvent::Circular(motion) => {
            encoder.circular(motion)?;
            encoder.host_mut().set_position(motion.end);
            Ok(())
        }
        JobEvent::Dwell { seconds } => encoder.dwell(*seconds),
        JobEvent::Power { on } => encoder.power(*on),
        JobEvent::SectionEnd => encoder.section_end(),
        JobEvent::Close => encoder.close(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_events() {
        let json = r#"[
            { "event": "open" },
            { "event": "section_start", "jet_mode": "through", "parameters": { "operation-comment": "Cut" } },
            { "event": "circular", "clockwise": true, "center": { "x": 5, "y": 0, "z": 0 },
              "end": { "x": 10, "y": 0, "z": 0 }, "plane": "xy", "feed": 800 },
            { "event": "dwell", "seconds": 0.5 },
            { "event": "section_end" },
            { "event": "close" }
        ]"#;
        let events: Vec<JobEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], JobEvent::Open);
        match &events[1] {
            JobEvent::SectionStart {
                jet_mode,
                comment,
                parameters,
            } => {
                assert_eq!(jet_mode.as_deref(), Some("through"));
                assert_eq!(comment, &None);
                assert_eq!(parameters.get("operation-comment").map(String::as_str), Some("Cut"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(events[2].name(), "circular");
        assert_eq!(events[3], JobEvent::Dwell { seconds: 0.5 });
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let json = r#"[{ "event": "teleport" }]"#;
        assert!(serde_json::from_str::<Vec<JobEvent>>(json).is_err());
    }

    #[test]
    fn test_replay_tracks_position_for_arcs() {
        let events = vec![
            JobEvent::Open,
            JobEvent::SectionStart {
                jet_mode: Some("etch".to_string()),
                comment: None,
                parameters: HashMap::new(),
            },
            JobEvent::Linear {
                x: 10.0,
                y: 0.0,
                z: 0.0,
                feed: 500.0,
            },
            JobEvent::Circular(CircularMove {
                clockwise: false,
                center: Vec3::new(10.0, 5.0, 0.0),
                end: Vec3::new(10.0, 10.0, 0.0),
                plane: laserpost_core::CircularPlane::XY,
                feed: 500.0,
                normal: None,
            }),
        ];
        let output = encode_job(PostConfig::default(), &events, Vec::new()).unwrap();
        assert_eq!(output.sink.last().map(String::as_str), Some("G3 Y10 I0 J5"));
        assert_eq!(output.lines, output.sink.len());
    }

    #[test]
    fn test_failure_names_the_event() {
        let events = vec![JobEvent::Open, JobEvent::Power { on: true }];
        let err = encode_job(PostConfig::default(), &events, Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("Event #2 (power)"));
    }
}
