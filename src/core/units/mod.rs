use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value: {value}")]
pub struct ParseError {
    pub value: String,
}

impl ParseError {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Rounds like `Math.round`: half-way cases go toward positive infinity.
///
/// All device-pixel rounding in the toolkit goes through this; keep it in
/// sync with the measured-size bias in `measure::resolve_size_and_state`.
pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Sentinel passed as the parent available length when the parent imposed no
/// bound (an `Unspecified` measure spec).
pub const UNBOUNDED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Device pixels.
    Px,
    /// Device-independent pixels, scaled by display density.
    Dip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PercentUnit {
    Percent,
    Px,
    Dip,
}

/// A fixed length. Equality is structural: unit and value must both match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub unit: LengthUnit,
    pub value: f32,
}

/// A length that may also be a fraction of the parent's available span.
/// The percent unit stores the fraction, so `"50%"` parses to `0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentLength {
    pub unit: PercentUnit,
    pub value: f32,
}

impl Length {
    pub const fn px(value: f32) -> Self {
        Self { unit: LengthUnit::Px, value }
    }

    pub const fn dip(value: f32) -> Self {
        Self { unit: LengthUnit::Dip, value }
    }

    pub const fn zero() -> Self {
        Self::px(0.0)
    }

    /// Parses `"10px"` as pixels and a bare number as dips.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (unit, numeric) = match trimmed.strip_suffix("px") {
            Some(rest) => (LengthUnit::Px, rest.trim()),
            None => (LengthUnit::Dip, trimmed),
        };

        let value: f32 = numeric.parse().map_err(|_| ParseError::new(input))?;
        if !value.is_finite() {
            return Err(ParseError::new(input));
        }

        Ok(Self { unit, value })
    }

    /// Resolves to device pixels at the given display density.
    pub fn effective_value(&self, density: f32) -> i32 {
        match self.unit {
            LengthUnit::Px => round_half_up(self.value),
            LengthUnit::Dip => round_half_up(density * self.value),
        }
    }
}

impl PercentLength {
    pub const fn px(value: f32) -> Self {
        Self { unit: PercentUnit::Px, value }
    }

    pub const fn dip(value: f32) -> Self {
        Self { unit: PercentUnit::Dip, value }
    }

    /// `fraction` is the stored form: `0.5` means 50%.
    pub const fn percent(fraction: f32) -> Self {
        Self { unit: PercentUnit::Percent, value: fraction }
    }

    pub const fn zero() -> Self {
        Self::px(0.0)
    }

    /// The "match parent" sentinel used as the default width/height.
    pub const fn match_parent() -> Self {
        Self::px(-1.0)
    }

    /// Parses `"50%"`, `"10px"` or a bare dip number. The `%` must be the
    /// last character and must follow a non-empty numeric prefix; anything
    /// else containing `%` is malformed.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed.find('%') {
            Some(index) => {
                if index != trimmed.len() - 1 || index == 0 {
                    return Err(ParseError::new(input));
                }
                let numeric: f32 = trimmed[..index]
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::new(input))?;
                if !numeric.is_finite() {
                    return Err(ParseError::new(input));
                }
                Ok(Self { unit: PercentUnit::Percent, value: numeric / 100.0 })
            }
            None => {
                let length = Length::parse(trimmed)?;
                Ok(Self::from(length))
            }
        }
    }

    /// Resolves to device pixels. Percent values resolve against the parent's
    /// available length; an unbounded parent ([`UNBOUNDED`]) yields `0`. The
    /// resolution is pure: same inputs, same result, no cross-pass state.
    pub fn effective_value(&self, parent_available: i32, density: f32) -> i32 {
        match self.unit {
            PercentUnit::Percent => {
                if parent_available < 0 {
                    0
                } else {
                    round_half_up(parent_available as f32 * self.value)
                }
            }
            PercentUnit::Px => round_half_up(self.value),
            PercentUnit::Dip => round_half_up(density * self.value),
        }
    }
}

impl From<Length> for PercentLength {
    fn from(length: Length) -> Self {
        match length.unit {
            LengthUnit::Px => Self::px(length.value),
            LengthUnit::Dip => Self::dip(length.value),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Px => write!(f, "{}px", self.value),
            LengthUnit::Dip => write!(f, "{}", self.value),
        }
    }
}

impl fmt::Display for PercentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            PercentUnit::Percent => write!(f, "{}%", self.value * 100.0),
            PercentUnit::Px => write!(f, "{}px", self.value),
            PercentUnit::Dip => write!(f, "{}", self.value),
        }
    }
}

/// Density and unit conversion, provided by the device layer.
pub trait DeviceMetrics {
    fn display_density(&self) -> f32;

    fn to_device_pixels(&self, dip: f32) -> f32 {
        dip * self.display_density()
    }

    fn to_device_independent_pixels(&self, px: f32) -> f32 {
        px / self.display_density()
    }
}

/// A constant-density device, the default for headless use and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDensity(pub f32);

impl DeviceMetrics for FixedDensity {
    fn display_density(&self) -> f32 {
        self.0
    }
}

impl Default for FixedDensity {
    fn default() -> Self {
        Self(1.0)
    }
}
