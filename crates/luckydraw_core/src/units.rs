//! Unit conversion.
//!
//! Configured lengths come in three flavours: absolute pixels (a bare number,
//! `"12"`, `"12px"` or any unrecognised lowercase suffix), percentages of a
//! caller-supplied denominator (`"50%"`) and root-font-relative lengths
//! (`"1.5rem"`). [`UnitConverter`] turns them into device pixels.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// A configured length before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "LengthRepr")]
pub enum Length {
    /// Absolute length in CSS-equivalent pixels.
    Px(f64),
    /// Percentage of a denominator supplied at conversion time.
    Percent(f64),
    /// Multiple of the root font size.
    Rem(f64),
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);

    /// Parses `<number><unit>`.
    ///
    /// The number part may carry a leading minus and a decimal point. The unit
    /// part must be lowercase ASCII letters or `%`. Recognised units are `%`,
    /// `px` and `rem`; anything else (including no unit) is read as pixels.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        if !unit.chars().all(|c| c.is_ascii_lowercase() || c == '%') {
            return Err(CoreError::MalformedLength(input.to_owned()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| CoreError::MalformedLength(input.to_owned()))?;

        Ok(match unit {
            "%" => Self::Percent(value),
            "rem" => Self::Rem(value),
            _ => Self::Px(value),
        })
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::Px(value)
    }
}

impl FromStr for Length {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Rem(v) => write!(f, "{v}rem"),
        }
    }
}

/// Wire form of a length: a bare number or a suffixed string.
#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = CoreError;

    fn try_from(repr: LengthRepr) -> CoreResult<Self> {
        match repr {
            LengthRepr::Number(v) => Ok(Self::Px(v)),
            LengthRepr::Text(s) => Self::parse(&s),
        }
    }
}

/// Converts [`Length`]s into device pixels.
///
/// Holds the two environment values the conversions depend on. Both are
/// probed by the host and handed in already resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    dpr: f64,
    root_font_size: f64,
}

impl UnitConverter {
    /// Creates a converter for the given device pixel ratio and root font size.
    #[must_use]
    pub const fn new(dpr: f64, root_font_size: f64) -> Self {
        Self {
            dpr,
            root_font_size,
        }
    }

    /// Device pixel ratio.
    #[must_use]
    pub const fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Root font size in CSS pixels.
    #[must_use]
    pub const fn root_font_size(&self) -> f64 {
        self.root_font_size
    }

    /// Converts a length.
    ///
    /// `%` resolves against `denominator` and is never scaled by the pixel
    /// ratio. Other units are scaled by the pixel ratio unless `clean` is set,
    /// which is used for lengths the caller scales itself.
    #[must_use]
    pub fn convert(&self, length: &Length, denominator: f64, clean: bool) -> f64 {
        match *length {
            Length::Percent(v) => v * denominator / 100.0,
            Length::Px(v) if clean => v,
            Length::Px(v) => v * self.dpr,
            Length::Rem(v) if clean => v * self.root_font_size,
            Length::Rem(v) => v * self.root_font_size * self.dpr,
        }
    }

    /// Unscaled length (`%` against 1). Callers multiply by the pixel ratio
    /// where they need device pixels.
    #[must_use]
    pub fn length(&self, length: &Length) -> f64 {
        self.convert(length, 1.0, true)
    }

    /// Device-pixel length relative to `denominator`.
    #[must_use]
    pub fn relative(&self, length: &Length, denominator: f64) -> f64 {
        self.convert(length, denominator, false)
    }

    /// Like [`relative`](Self::relative) for an optional length; missing is 0.
    #[must_use]
    pub fn relative_or_zero(&self, length: Option<&Length>, denominator: f64) -> f64 {
        length.map_or(0.0, |l| self.relative(l, denominator))
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(1.0, 16.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(Length::parse("12px").unwrap(), Length::Px(12.0));
        assert_eq!(Length::parse("12").unwrap(), Length::Px(12.0));
        assert_eq!(Length::parse("-4.5px").unwrap(), Length::Px(-4.5));
        assert_eq!(Length::parse("50%").unwrap(), Length::Percent(50.0));
        assert_eq!(Length::parse("1.5rem").unwrap(), Length::Rem(1.5));
        // Unknown lowercase suffixes fall back to pixels.
        assert_eq!(Length::parse("3em").unwrap(), Length::Px(3.0));
    }

    #[test]
    fn test_malformed_lengths_are_rejected() {
        for bad in ["", "px", "abc", "1.2.3px", "10 PX", "--5", "10px;"] {
            assert!(
                matches!(Length::parse(bad), Err(CoreError::MalformedLength(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }

    #[test]
    fn test_convert_scaling_rules() {
        let units = UnitConverter::new(2.0, 16.0);

        assert_eq!(units.relative(&Length::Px(10.0), 500.0), 20.0);
        assert_eq!(units.relative(&Length::Percent(50.0), 300.0), 150.0);
        assert_eq!(units.relative(&Length::Rem(1.0), 0.0), 32.0);

        assert_eq!(units.length(&Length::Px(10.0)), 10.0);
        assert_eq!(units.length(&Length::Rem(2.0)), 32.0);
        assert!((units.length(&Length::Percent(50.0)) - 0.5).abs() < 1e-12);
    }
}
