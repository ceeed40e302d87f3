pub mod background;
pub mod font;
pub mod registry;
pub mod snapshot;

pub use background::Background;
pub use font::{Font, FontStyle, FontWeight};
pub use registry::{PropertyDescriptor, PropertyKind, StyleProperty, StyleValue};
pub use snapshot::{EffectiveGeometry, StyleSnapshot, ValueSource};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::units::ParseError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// Malformed textual input that never produced a value.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A well-formed value outside the property's domain.
    #[error("{property}: {constraint}; value: {value}")]
    Validation {
        property: &'static str,
        constraint: &'static str,
        value: String,
    },
}

impl StyleError {
    pub fn validation(
        property: &'static str,
        constraint: &'static str,
        value: impl fmt::Display,
    ) -> Self {
        Self::Validation { property, constraint, value: value.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;

/// An RGBA color. Equality is channel-wise, which is what suppresses
/// redundant property writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0.0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 1.0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 1.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        // Byte-indexed slicing below; anything outside ASCII is malformed.
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let a = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
                let r = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let g = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let b = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    pub fn parse(input: &str) -> std::result::Result<Self, ParseError> {
        let trimmed = input.trim();

        if trimmed.starts_with('#') {
            return Self::from_hex(trimmed).ok_or_else(|| ParseError::new(input));
        }

        if let Some(args) = function_args(trimmed, "rgba") {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() == 4 {
                let r = parts[0].parse().map_err(|_| ParseError::new(input))?;
                let g = parts[1].parse().map_err(|_| ParseError::new(input))?;
                let b = parts[2].parse().map_err(|_| ParseError::new(input))?;
                let a: f32 = parts[3].parse().map_err(|_| ParseError::new(input))?;
                if a.is_finite() {
                    return Ok(Self::rgba(r, g, b, a.clamp(0.0, 1.0)));
                }
            }
            return Err(ParseError::new(input));
        }

        if let Some(args) = function_args(trimmed, "rgb") {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() == 3 {
                let r = parts[0].parse().map_err(|_| ParseError::new(input))?;
                let g = parts[1].parse().map_err(|_| ParseError::new(input))?;
                let b = parts[2].parse().map_err(|_| ParseError::new(input))?;
                return Ok(Self::rgb(r, g, b));
            }
            return Err(ParseError::new(input));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "transparent" => Ok(Self::TRANSPARENT),
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::rgb(255, 0, 0)),
            "green" => Ok(Self::rgb(0, 128, 0)),
            "blue" => Ok(Self::rgb(0, 0, 255)),
            "yellow" => Ok(Self::rgb(255, 255, 0)),
            "orange" => Ok(Self::rgb(255, 165, 0)),
            "purple" => Ok(Self::rgb(128, 0, 128)),
            "gray" | "grey" => Ok(Self::rgb(128, 128, 128)),
            _ => Err(ParseError::new(input)),
        }
    }
}

fn function_args<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(name)?.trim_start();
    rest.strip_prefix('(')?.strip_suffix(')')
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.a - 1.0).abs() < f32::EPSILON {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
    Stretch,
}

impl HorizontalAlignment {
    pub fn parse(input: &str) -> std::result::Result<Self, ParseError> {
        match input.trim() {
            "left" => Ok(Self::Left),
            "center" | "middle" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "stretch" => Ok(Self::Stretch),
            _ => Err(ParseError::new(input)),
        }
    }
}

impl fmt::Display for HorizontalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Stretch => "stretch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    Stretch,
}

impl VerticalAlignment {
    pub fn parse(input: &str) -> std::result::Result<Self, ParseError> {
        match input.trim() {
            "top" => Ok(Self::Top),
            "center" | "middle" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            "stretch" => Ok(Self::Stretch),
            _ => Err(ParseError::new(input)),
        }
    }
}

impl fmt::Display for VerticalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
            Self::Stretch => "stretch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
    /// Excluded from measurement and layout entirely.
    Collapse,
}

impl Visibility {
    pub fn parse(input: &str) -> std::result::Result<Self, ParseError> {
        match input.trim() {
            "visible" => Ok(Self::Visible),
            "hidden" => Ok(Self::Hidden),
            "collapse" | "collapsed" => Ok(Self::Collapse),
            _ => Err(ParseError::new(input)),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Collapse => "collapse",
        };
        f.write_str(name)
    }
}
