//! Numeric word formatting
//!
//! Renders a value as a G-code word: a prefix letter followed by the value
//! rounded to a fixed number of decimals. Trailing zeros and a trailing
//! decimal point are dropped, and a value that rounds to zero never
//! carries a sign.

/// Number format for one kind of G-code word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: &'static str,
    decimals: usize,
}

impl NumberFormat {
    /// Decimal count used for coordinates, offsets, feeds and dwell times
    pub const DEFAULT_DECIMALS: usize = 3;

    /// Create a format with an explicit decimal count
    pub const fn new(prefix: &'static str, decimals: usize) -> Self {
        Self { prefix, decimals }
    }

    /// Create a format with the default 3 decimals
    pub const fn axis(prefix: &'static str) -> Self {
        Self::new(prefix, Self::DEFAULT_DECIMALS)
    }

    /// The word letter
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Render `value` as a word, e.g. `X10.5`
    pub fn format(&self, value: f64) -> String {
        format!("{}{}", self.prefix, self.number(value))
    }

    /// Render `value` without the prefix
    pub fn number(&self, value: f64) -> String {
        let mut text = format!("{:.*}", self.decimals, value);
        if text.contains('.') {
            let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
            text.truncate(trimmed);
        }
        if text == "-0" {
            text.remove(0);
        }
        text
    }

    /// Whether `value` renders as zero at this precision
    pub fn is_zero(&self, value: f64) -> bool {
        self.number(value) == "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_trailing_zeros() {
        let x = NumberFormat::axis("X");
        assert_eq!(x.format(10.0), "X10");
        assert_eq!(x.format(10.5), "X10.5");
        assert_eq!(x.format(0.125), "X0.125");
        assert_eq!(x.format(100.0), "X100");
    }

    #[test]
    fn test_rounds_to_precision() {
        let y = NumberFormat::axis("Y");
        assert_eq!(y.format(1.23456), "Y1.235");
        assert_eq!(y.format(2.0004), "Y2");
        assert_eq!(y.format(-3.9999), "Y-4");
    }

    #[test]
    fn test_negative_values_keep_sign() {
        let i = NumberFormat::axis("I");
        assert_eq!(i.format(-0.125), "I-0.125");
        assert_eq!(i.format(-12.0), "I-12");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        let z = NumberFormat::axis("Z");
        assert_eq!(z.format(-0.0), "Z0");
        assert_eq!(z.format(-0.0004), "Z0");
        assert!(z.is_zero(-0.0004));
        assert!(!z.is_zero(0.0006));
    }

    #[test]
    fn test_integer_format() {
        let g = NumberFormat::new("G", 0);
        assert_eq!(g.format(17.0), "G17");
        assert_eq!(g.prefix(), "G");
    }
}
