//! Arc Linearizer
//!
//! Converts circular and helical moves into line segments for planes the
//! controller cannot interpolate natively.

use laserpost_core::{Arc, Direction, Vec3};
use std::f64::consts::{PI, TAU};

/// Angles closer than this to zero are treated as a full turn
const ANGLE_EPSILON: f64 = 1e-9;

/// Widest angle a single segment may span
pub const MAX_SEGMENT_SWEEP: f64 = PI;

/// Arc linearization limits
#[derive(Debug, Clone)]
pub struct ArcLinearizerConfig {
    /// Shortest chord a segment may have
    pub min_chord: f64,
    /// Smallest radius used when sizing segments
    pub min_radius: f64,
    /// Largest radius used when sizing segments
    pub max_radius: f64,
    /// Upper bound on segments per arc
    pub max_segments: usize,
}

impl Default for ArcLinearizerConfig {
    fn default() -> Self {
        Self {
            min_chord: 0.01,
            min_radius: 0.01,
            max_radius: 1000.0,
            max_segments: 10_000,
        }
    }
}

/// Converts arcs to line segments
#[derive(Debug)]
pub struct ArcLinearizer {
    config: ArcLinearizerConfig,
}

impl ArcLinearizer {
    /// Create a new arc linearizer
    pub fn new(config: ArcLinearizerConfig) -> Self {
        Self { config }
    }

    /// Signed sweep of `arc` in radians: positive counterclockwise,
    /// negative clockwise. A closed arc sweeps a full turn.
    pub fn sweep(arc: &Arc) -> f64 {
        let Some(frame) = Frame::of(arc) else {
            return 0.0;
        };
        let v = frame.in_plane(arc.end - arc.center);
        let end_angle = v.dot(frame.e2).atan2(v.dot(frame.e1));

        match arc.direction {
            Direction::CounterClockwise if end_angle <= ANGLE_EPSILON => end_angle + TAU,
            Direction::Clockwise if end_angle >= -ANGLE_EPSILON => end_angle - TAU,
            _ => end_angle,
        }
    }

    /// Number of segments needed to keep every chord within `tolerance`
    /// of the true arc. No segment spans more than [`MAX_SEGMENT_SWEEP`],
    /// whatever the chord and segment limits allow.
    pub fn segment_count(&self, radius: f64, sweep: f64, tolerance: f64) -> usize {
        let radius_for_step = radius.clamp(self.config.min_radius, self.config.max_radius);
        let tolerance = tolerance.clamp(f64::EPSILON, radius_for_step);
        let step = if tolerance >= radius_for_step {
            MAX_SEGMENT_SWEEP
        } else {
            2.0 * (1.0 - tolerance / radius_for_step).acos()
        };

        let by_tolerance = (sweep.abs() / step).ceil() as usize;
        let by_chord = ((radius * sweep.abs()) / self.config.min_chord).floor() as usize;

        let by_sweep = (sweep.abs() / MAX_SEGMENT_SWEEP).ceil() as usize;

        by_tolerance
            .min(by_chord)
            .max(by_sweep)
            .clamp(1, self.config.max_segments)
    }

    /// Points along `arc` after its start, ending exactly on `arc.end`
    pub fn linearize(&self, arc: &Arc, tolerance: f64) -> Vec<Vec3> {
        let Some(frame) = Frame::of(arc) else {
            return vec![arc.end];
        };

        let sweep = Self::sweep(arc);
        let count = self.segment_count(frame.radius, sweep, tolerance);
        let start_height = (arc.start - arc.center).dot(frame.normal);
        let rise = (arc.end - arc.center).dot(frame.normal) - start_height;

        let mut points = Vec::with_capacity(count);
        for i in 1..count {
            let fraction = i as f64 / count as f64;
            let angle = sweep * fraction;
            let point = arc.center
                + frame.e1 * (frame.radius * angle.cos())
                + frame.e2 * (frame.radius * angle.sin())
                + frame.normal * (start_height + rise * fraction);
            points.push(point);
        }
        points.push(arc.end);

        points
    }
}

impl Default for ArcLinearizer {
    fn default() -> Self {
        Self::new(ArcLinearizerConfig::default())
    }
}

/// Orthonormal frame of the arc plane, `e1` pointing at the start point
struct Frame {
    normal: Vec3,
    e1: Vec3,
    e2: Vec3,
    radius: f64,
}

impl Frame {
    fn of(arc: &Arc) -> Option<Self> {
        let normal = arc.normal.normalized().unwrap_or(Vec3::UNIT_Z);
        let u = arc.start - arc.center;
        let u = u - normal * u.dot(normal);
        let radius = u.length();
        let e1 = u.normalized()?;
        let e2 = normal.cross(e1);
        Some(Self {
            normal,
            e1,
            e2,
            radius,
        })
    }

    fn in_plane(&self, v: Vec3) -> Vec3 {
        v - self.normal * v.dot(self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(direction: Direction) -> Arc {
        Arc::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(0.0, 10.0, 0.0),
            direction,
        )
    }

    #[test]
    fn test_sweep_direction() {
        let ccw = ArcLinearizer::sweep(&quarter(Direction::CounterClockwise));
        assert!((ccw - PI / 2.0).abs() < 1e-9);

        let cw = ArcLinearizer::sweep(&quarter(Direction::Clockwise));
        assert!((cw + 3.0 * PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_arc_is_full_turn() {
        let arc = Arc::new(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(5.0, 0.0, 0.0),
            Direction::CounterClockwise,
        );
        assert!((ArcLinearizer::sweep(&arc) - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_points_stay_on_radius_within_tolerance() {
        let linearizer = ArcLinearizer::default();
        let tolerance = 0.01;
        let points = linearizer.linearize(&quarter(Direction::CounterClockwise), tolerance);

        assert!(points.len() > 1);
        assert_eq!(*points.last().unwrap(), Vec3::new(0.0, 10.0, 0.0));

        let mut previous = Vec3::new(10.0, 0.0, 0.0);
        for point in &points {
            assert!((point.length() - 10.0).abs() < 1e-9);
            // Sagitta of each chord stays inside the tolerance band.
            let mid = (previous + *point) * 0.5;
            assert!(10.0 - mid.length() <= tolerance + 1e-9);
            previous = *point;
        }
    }

    #[test]
    fn test_clockwise_goes_the_long_way() {
        let points =
            ArcLinearizer::default().linearize(&quarter(Direction::Clockwise), 0.01);
        assert!(points.iter().any(|p| p.y < -5.0));
        assert!(points.iter().any(|p| p.x < -5.0));
    }

    #[test]
    fn test_helix_rises_linearly() {
        let arc = Arc::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(-10.0, 0.0, 4.0),
            Direction::CounterClockwise,
        );
        let points = ArcLinearizer::default().linearize(&arc, 0.05);
        let half = points.len() / 2;
        let expected = 4.0 * half as f64 / points.len() as f64;
        assert!((points[half - 1].z - expected).abs() < 1e-9);
        assert_eq!(points.last().unwrap().z, 4.0);
    }

    #[test]
    fn test_tilted_plane_uses_normal() {
        // Arc in the XZ plane, rotating about -Y.
        let arc = Arc::with_normal(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Direction::CounterClockwise,
            Vec3::new(0.0, -1.0, 0.0),
        );
        let points = ArcLinearizer::default().linearize(&arc, 0.001);
        for point in &points {
            assert!(point.y.abs() < 1e-12);
            assert!(point.x >= -1e-9 && point.z >= -1e-9);
        }
    }

    #[test]
    fn test_segment_count_bounds() {
        let linearizer = ArcLinearizer::default();
        // Tiny arc: limited by minimum chord length.
        assert_eq!(linearizer.segment_count(0.02, 0.5, 1e-6), 1);
        // Coarse tolerance on a large radius still yields at least one segment.
        assert!(linearizer.segment_count(500.0, 0.001, 1.0) >= 1);
        // Finer tolerance needs more segments.
        assert!(
            linearizer.segment_count(10.0, PI, 0.001) > linearizer.segment_count(10.0, PI, 0.1)
        );
    }

    #[test]
    fn test_no_segment_wider_than_half_turn() {
        let linearizer = ArcLinearizer::default();
        let three_quarters = 1.5 * PI;
        // Chord limit alone would allow a single segment here.
        assert_eq!(linearizer.segment_count(0.002, three_quarters, 0.01), 2);
        assert_eq!(linearizer.segment_count(5.0, TAU, 10.0), 2);

        let arc = quarter(Direction::Clockwise);
        let points = linearizer.linearize(&arc, 50.0);
        assert_eq!(points.len(), 2);
        let mut previous = arc.start;
        for point in &points {
            let angle = (previous.dot(*point) / 100.0).clamp(-1.0, 1.0).acos();
            assert!(angle <= MAX_SEGMENT_SWEEP + 1e-9);
            previous = *point;
        }
    }

    #[test]
    fn test_degenerate_arc_returns_end() {
        let arc = Arc::new(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Direction::Clockwise,
        );
        assert_eq!(
            ArcLinearizer::default().linearize(&arc, 0.01),
            vec![Vec3::new(1.0, 1.0, 0.0)]
        );
    }
}
