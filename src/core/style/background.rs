use super::Color;
use crate::core::image::ImageHandle;

/// The resolved background and border description for a node.
///
/// Immutable: every change hook builds a replacement via a `with_*` builder,
/// so the native layer can compare handles to detect changes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Background {
    pub color: Option<Color>,
    pub image: Option<ImageHandle>,
    pub repeat: Option<String>,
    pub size: Option<String>,
    pub position: Option<String>,
    pub border_top_color: Option<Color>,
    pub border_right_color: Option<Color>,
    pub border_bottom_color: Option<Color>,
    pub border_left_color: Option<Color>,
    /// Effective (device-pixel) border widths.
    pub border_top_width: i32,
    pub border_right_width: i32,
    pub border_bottom_width: i32,
    pub border_left_width: i32,
    pub border_top_left_radius: f32,
    pub border_top_right_radius: f32,
    pub border_bottom_right_radius: f32,
    pub border_bottom_left_radius: f32,
    pub clip_path: Option<String>,
}

impl Background {
    pub fn with_color(&self, color: Option<Color>) -> Self {
        Self { color, ..self.clone() }
    }

    pub fn with_image(&self, image: Option<ImageHandle>) -> Self {
        Self { image, ..self.clone() }
    }

    pub fn with_repeat(&self, repeat: Option<String>) -> Self {
        Self { repeat, ..self.clone() }
    }

    pub fn with_size(&self, size: Option<String>) -> Self {
        Self { size, ..self.clone() }
    }

    pub fn with_position(&self, position: Option<String>) -> Self {
        Self { position, ..self.clone() }
    }

    pub fn with_border_top_color(&self, color: Option<Color>) -> Self {
        Self { border_top_color: color, ..self.clone() }
    }

    pub fn with_border_right_color(&self, color: Option<Color>) -> Self {
        Self { border_right_color: color, ..self.clone() }
    }

    pub fn with_border_bottom_color(&self, color: Option<Color>) -> Self {
        Self { border_bottom_color: color, ..self.clone() }
    }

    pub fn with_border_left_color(&self, color: Option<Color>) -> Self {
        Self { border_left_color: color, ..self.clone() }
    }

    pub fn with_border_top_width(&self, width: i32) -> Self {
        Self { border_top_width: width, ..self.clone() }
    }

    pub fn with_border_right_width(&self, width: i32) -> Self {
        Self { border_right_width: width, ..self.clone() }
    }

    pub fn with_border_bottom_width(&self, width: i32) -> Self {
        Self { border_bottom_width: width, ..self.clone() }
    }

    pub fn with_border_left_width(&self, width: i32) -> Self {
        Self { border_left_width: width, ..self.clone() }
    }

    pub fn with_border_top_left_radius(&self, radius: f32) -> Self {
        Self { border_top_left_radius: radius, ..self.clone() }
    }

    pub fn with_border_top_right_radius(&self, radius: f32) -> Self {
        Self { border_top_right_radius: radius, ..self.clone() }
    }

    pub fn with_border_bottom_right_radius(&self, radius: f32) -> Self {
        Self { border_bottom_right_radius: radius, ..self.clone() }
    }

    pub fn with_border_bottom_left_radius(&self, radius: f32) -> Self {
        Self { border_bottom_left_radius: radius, ..self.clone() }
    }

    pub fn with_clip_path(&self, clip_path: Option<String>) -> Self {
        Self { clip_path, ..self.clone() }
    }
}
