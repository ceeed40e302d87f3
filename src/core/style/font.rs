use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::units::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input.trim() {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            _ => Err(ParseError::new(input)),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input.trim() {
            "100" => Ok(Self::Thin),
            "200" => Ok(Self::ExtraLight),
            "300" => Ok(Self::Light),
            "normal" | "400" => Ok(Self::Normal),
            "500" => Ok(Self::Medium),
            "600" => Ok(Self::SemiBold),
            "bold" | "700" => Ok(Self::Bold),
            "800" => Ok(Self::ExtraBold),
            "900" => Ok(Self::Black),
            _ => Err(ParseError::new(input)),
        }
    }

    pub fn numeric(self) -> u16 {
        match self {
            Self::Thin => 100,
            Self::ExtraLight => 200,
            Self::Light => 300,
            Self::Normal => 400,
            Self::Medium => 500,
            Self::SemiBold => 600,
            Self::Bold => 700,
            Self::ExtraBold => 800,
            Self::Black => 900,
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Bold => f.write_str("bold"),
            other => write!(f, "{}", other.numeric()),
        }
    }
}

/// The resolved font for a node. Derived from the font-* style properties;
/// change hooks always replace the whole value, never mutate it in place, so
/// a handle passed to the native layer stays stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: Option<String>,
    pub size: f32,
    pub style: FontStyle,
    pub weight: FontWeight,
}

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

impl Default for Font {
    fn default() -> Self {
        Self {
            family: None,
            size: DEFAULT_FONT_SIZE,
            style: FontStyle::Normal,
            weight: FontWeight::Normal,
        }
    }
}

impl Font {
    pub fn with_family(&self, family: Option<String>) -> Self {
        Self { family, ..self.clone() }
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self { size, ..self.clone() }
    }

    pub fn with_style(&self, style: FontStyle) -> Self {
        Self { style, ..self.clone() }
    }

    pub fn with_weight(&self, weight: FontWeight) -> Self {
        Self { weight, ..self.clone() }
    }
}
