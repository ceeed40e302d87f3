use std::collections::HashMap;

use super::background::Background;
use super::font::Font;
use super::registry::{StyleProperty, StyleValue};

/// Where a snapshot's current value came from. Local writes shadow inherited
/// pushes, which shadow descriptor defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueSource {
    Default,
    Inherited,
    Local,
}

/// Style values already resolved to device pixels for the current layout
/// pass. A complete value type from the start: every field exists whether or
/// not the corresponding property was ever set.
///
/// Width/height keep the `-1` "match parent" sentinel when no explicit size
/// resolved; everything else is a plain device-pixel amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveGeometry {
    pub width: i32,
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub margin_top: i32,
    pub margin_right: i32,
    pub margin_bottom: i32,
    pub margin_left: i32,
    pub padding_top: i32,
    pub padding_right: i32,
    pub padding_bottom: i32,
    pub padding_left: i32,
    pub border_top_width: i32,
    pub border_right_width: i32,
    pub border_bottom_width: i32,
    pub border_left_width: i32,
}

impl Default for EffectiveGeometry {
    fn default() -> Self {
        Self {
            width: -1,
            height: -1,
            min_width: 0,
            min_height: 0,
            margin_top: 0,
            margin_right: 0,
            margin_bottom: 0,
            margin_left: 0,
            padding_top: 0,
            padding_right: 0,
            padding_bottom: 0,
            padding_left: 0,
            border_top_width: 0,
            border_right_width: 0,
            border_bottom_width: 0,
            border_left_width: 0,
        }
    }
}

/// Per-node style state: the current value for each descriptor plus the
/// derived caches (effective geometry, font, background). Owned exclusively
/// by one view node.
#[derive(Debug, Default)]
pub struct StyleSnapshot {
    values: HashMap<StyleProperty, (StyleValue, ValueSource)>,
    pub effective: EffectiveGeometry,
    pub font: Font,
    pub background: Background,
}

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value: the stored one, or the descriptor default when the
    /// property was never set on this node.
    pub fn value(&self, property: StyleProperty) -> StyleValue {
        match self.values.get(&property) {
            Some((value, _)) => value.clone(),
            None => property.default_value(),
        }
    }

    pub fn source(&self, property: StyleProperty) -> ValueSource {
        self.values
            .get(&property)
            .map(|(_, source)| *source)
            .unwrap_or(ValueSource::Default)
    }

    pub fn has_local_value(&self, property: StyleProperty) -> bool {
        self.source(property) == ValueSource::Local
    }

    /// Stores a value, returning whether it actually changed. Equal values
    /// are suppressed (the source still upgrades, so a local write of the
    /// inherited value starts shadowing future pushes).
    pub fn store(
        &mut self,
        property: StyleProperty,
        value: StyleValue,
        source: ValueSource,
    ) -> bool {
        let changed = self.value(property) != value;
        self.values.insert(property, (value, source));
        changed
    }

    /// Convenience accessors for the geometry-relevant values, used by the
    /// layout engine.
    pub fn percent_length(&self, property: StyleProperty) -> crate::core::units::PercentLength {
        self.value(property)
            .as_percent_length()
            .unwrap_or_else(crate::core::units::PercentLength::zero)
    }

    pub fn length(&self, property: StyleProperty) -> crate::core::units::Length {
        self.value(property)
            .as_length()
            .unwrap_or_else(crate::core::units::Length::zero)
    }

    pub fn number(&self, property: StyleProperty) -> f32 {
        self.value(property).as_number().unwrap_or_default()
    }

    pub fn horizontal_alignment(&self) -> super::HorizontalAlignment {
        match self.value(StyleProperty::HorizontalAlignment) {
            StyleValue::HorizontalAlignment(h) => h,
            _ => super::HorizontalAlignment::Stretch,
        }
    }

    pub fn vertical_alignment(&self) -> super::VerticalAlignment {
        match self.value(StyleProperty::VerticalAlignment) {
            StyleValue::VerticalAlignment(v) => v,
            _ => super::VerticalAlignment::Stretch,
        }
    }

    pub fn visibility(&self) -> super::Visibility {
        match self.value(StyleProperty::Visibility) {
            StyleValue::Visibility(v) => v,
            _ => super::Visibility::Visible,
        }
    }
}
