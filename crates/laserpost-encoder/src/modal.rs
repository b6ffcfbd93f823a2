//! Modal output registers
//!
//! Each register remembers the last word it emitted for its channel and
//! suppresses a repeat of the same word. Values are compared after
//! formatting, so two values that render identically count as equal.

use crate::format::NumberFormat;

/// Last-emitted-value memory for a single output channel
#[derive(Debug, Clone)]
pub struct ModalRegister {
    format: NumberFormat,
    last: Option<String>,
}

impl ModalRegister {
    /// Create an unset register
    pub fn new(format: NumberFormat) -> Self {
        Self { format, last: None }
    }

    /// Word for `value`, or `None` when it matches the last emitted word.
    ///
    /// Emitting a word makes it the new last-emitted value.
    pub fn format(&mut self, value: f64) -> Option<String> {
        let word = self.format.format(value);
        if self.last.as_deref() == Some(word.as_str()) {
            return None;
        }
        self.last = Some(word.clone());
        Some(word)
    }

    /// Word for a relative arc-center offset.
    ///
    /// Never suppressed and never recorded. When the offset renders as
    /// zero, `default_if_zero` is returned instead.
    pub fn format_reference_point(&self, value: f64, default_if_zero: &str) -> String {
        if self.format.is_zero(value) {
            default_if_zero.to_string()
        } else {
            self.format.format(value)
        }
    }

    /// Forget the last emitted word so the next `format` always emits
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Last emitted word, if any
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

/// The encoder's modal channels
#[derive(Debug, Clone)]
pub struct ModalRegisterSet {
    /// X axis
    pub x: ModalRegister,
    /// Y axis
    pub y: ModalRegister,
    /// Z axis
    pub z: ModalRegister,
    /// Feed rate
    pub feed: ModalRegister,
    /// Plane select (G17/G18/G19)
    pub plane: ModalRegister,
    /// Arc center X offset; reference points only
    pub i: ModalRegister,
    /// Arc center Y offset; reference points only
    pub j: ModalRegister,
}

impl ModalRegisterSet {
    /// Create a set with every channel unset
    pub fn new() -> Self {
        Self {
            x: ModalRegister::new(NumberFormat::axis("X")),
            y: ModalRegister::new(NumberFormat::axis("Y")),
            z: ModalRegister::new(NumberFormat::axis("Z")),
            feed: ModalRegister::new(NumberFormat::axis("F")),
            plane: ModalRegister::new(NumberFormat::new("G", 0)),
            i: ModalRegister::new(NumberFormat::axis("I")),
            j: ModalRegister::new(NumberFormat::axis("J")),
        }
    }

    /// Reset the positional and feed channels. Plane select is kept.
    pub fn reset_motion(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
        self.feed.reset();
    }
}

impl Default for ModalRegisterSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_value_is_suppressed() {
        let mut x = ModalRegister::new(NumberFormat::axis("X"));
        assert_eq!(x.format(5.0).as_deref(), Some("X5"));
        assert_eq!(x.format(5.0), None);
        assert_eq!(x.format(5.0), None);
        assert_eq!(x.format(6.0).as_deref(), Some("X6"));
        assert_eq!(x.last(), Some("X6"));
    }

    #[test]
    fn test_values_equal_after_rounding_are_suppressed() {
        let mut y = ModalRegister::new(NumberFormat::axis("Y"));
        assert!(y.format(1.0).is_some());
        assert_eq!(y.format(1.0002), None);
        assert!(y.format(1.002).is_some());
    }

    #[test]
    fn test_reset_forces_emission() {
        let mut z = ModalRegister::new(NumberFormat::axis("Z"));
        assert!(z.format(0.0).is_some());
        assert!(z.format(0.0).is_none());
        z.reset();
        assert_eq!(z.last(), None);
        assert_eq!(z.format(0.0).as_deref(), Some("Z0"));
    }

    #[test]
    fn test_reference_point_never_suppressed() {
        let mut i = ModalRegister::new(NumberFormat::axis("I"));
        assert_eq!(i.format_reference_point(2.5, "I0"), "I2.5");
        assert_eq!(i.format_reference_point(2.5, "I0"), "I2.5");
        assert_eq!(i.format_reference_point(0.0, "I0"), "I0");
        assert_eq!(i.format_reference_point(-0.0002, "I0"), "I0");
        assert_eq!(i.last(), None);
        // A reference point does not disturb modal history.
        assert!(i.format(2.5).is_some());
    }

    #[test]
    fn test_set_reset_keeps_plane() {
        let mut set = ModalRegisterSet::new();
        assert!(set.plane.format(17.0).is_some());
        assert!(set.x.format(1.0).is_some());
        assert!(set.feed.format(500.0).is_some());

        set.reset_motion();

        assert!(set.plane.format(17.0).is_none());
        assert!(set.x.format(1.0).is_some());
        assert!(set.feed.format(500.0).is_some());
    }
}
