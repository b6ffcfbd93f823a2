//! Data models for toolpath geometry
//!
//! This module provides:
//! - Three-axis points and vectors
//! - Circular interpolation planes and rotation directions
//! - Arc descriptions handed to the linearizer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Three-axis position or vector in job units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X-axis component
    pub x: f64,
    /// Y-axis component
    pub y: f64,
    /// Z-axis component
    pub z: f64,
}

impl Vec3 {
    /// The origin
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Unit vector along +Z, the normal of the XY plane
    pub const UNIT_Z: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Vec3 components must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// Dot product
    pub fn dot(&self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector
    pub fn normalized(&self) -> Option<Vec3> {
        let len = self.length();
        if len > f64::EPSILON {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Active circular interpolation plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircularPlane {
    /// XY plane (G17)
    XY,
    /// ZX plane (G18)
    ZX,
    /// YZ plane (G19)
    YZ,
    /// Not a principal plane
    Other,
}

impl CircularPlane {
    /// Plane-select G-code number, if the plane is a principal plane
    pub fn gcode_number(&self) -> Option<u32> {
        match self {
            Self::XY => Some(17),
            Self::ZX => Some(18),
            Self::YZ => Some(19),
            Self::Other => None,
        }
    }
}

impl fmt::Display for CircularPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XY => write!(f, "XY"),
            Self::ZX => write!(f, "ZX"),
            Self::YZ => write!(f, "YZ"),
            Self::Other => write!(f, "non-principal"),
        }
    }
}

/// Arc rotation direction, viewed against the plane normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Clockwise (G2)
    Clockwise,
    /// Counterclockwise (G3)
    CounterClockwise,
}

impl Direction {
    /// Build from a host "clockwise" flag
    pub fn from_clockwise(clockwise: bool) -> Self {
        if clockwise {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    /// Motion G-code number (2 or 3)
    pub fn gcode_number(&self) -> u32 {
        match self {
            Self::Clockwise => 2,
            Self::CounterClockwise => 3,
        }
    }
}

/// Circular (optionally helical) move from `start` to `end` around `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    /// Start point (the current position when the move begins)
    pub start: Vec3,
    /// Arc center
    pub center: Vec3,
    /// End point
    pub end: Vec3,
    /// Rotation direction
    pub direction: Direction,
    /// Plane normal; rotation is measured around this axis
    pub normal: Vec3,
}

impl Arc {
    /// Create an arc in the XY plane
    pub fn new(start: Vec3, center: Vec3, end: Vec3, direction: Direction) -> Self {
        Self {
            start,
            center,
            end,
            direction,
            normal: Vec3::UNIT_Z,
        }
    }

    /// Create an arc around an explicit plane normal
    pub fn with_normal(
        start: Vec3,
        center: Vec3,
        end: Vec3,
        direction: Direction,
        normal: Vec3,
    ) -> Self {
        Self {
            start,
            center,
            end,
            direction,
            normal,
        }
    }
}
