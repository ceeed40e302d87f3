use smallvec::SmallVec;
use std::fmt;
use std::sync::LazyLock;

use super::font::{FontStyle, FontWeight, DEFAULT_FONT_SIZE};
use super::snapshot::StyleSnapshot;
use super::{Color, HorizontalAlignment, Result, StyleError, VerticalAlignment, Visibility};
use crate::core::units::{Length, ParseError, PercentLength};

/// Every style attribute the toolkit knows about. The set is closed and
/// compile-time known; all dispatch is a static match on this enum, never a
/// name lookup. `External` names (`css_name`) exist only for diagnostics and
/// shorthand round-tripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StyleProperty {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MarginLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    PaddingLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    HorizontalAlignment,
    VerticalAlignment,
    Visibility,
    Opacity,
    Rotate,
    ScaleX,
    ScaleY,
    TranslateX,
    TranslateY,
    ZIndex,
    BackgroundColor,
    BackgroundImage,
    BackgroundRepeat,
    BackgroundSize,
    BackgroundPosition,
    ClipPath,
    Color,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    OriginX,
    OriginY,
    // Shorthands expand into the longhands above and are applied atomically.
    Margin,
    Padding,
    BorderColor,
    BorderWidth,
    BorderRadius,
    Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// A view-level property outside the CSS cascade.
    Plain,
    /// A CSS property resolved per node.
    Css,
    /// A CSS property whose resolved value propagates to descendants.
    InheritedCss,
    /// A composite that decomposes into longhands.
    Shorthand,
}

/// A typed style value. Equality is structural and is what makes equal
/// writes no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    PercentLength(PercentLength),
    Length(Length),
    Number(f32),
    Color(Color),
    HorizontalAlignment(HorizontalAlignment),
    VerticalAlignment(VerticalAlignment),
    Visibility(Visibility),
    FontStyle(FontStyle),
    FontWeight(FontWeight),
    String(String),
    /// Unset optional value (colors, image, clip path, font family).
    None,
}

impl StyleValue {
    pub fn as_percent_length(&self) -> Option<PercentLength> {
        match self {
            Self::PercentLength(v) => Some(*v),
            Self::Length(v) => Some(PercentLength::from(*v)),
            _ => None,
        }
    }

    pub fn as_length(&self) -> Option<Length> {
        match self {
            Self::Length(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentLength(v) => v.fmt(f),
            Self::Length(v) => v.fmt(f),
            Self::Number(v) => v.fmt(f),
            Self::Color(v) => v.fmt(f),
            Self::HorizontalAlignment(v) => v.fmt(f),
            Self::VerticalAlignment(v) => v.fmt(f),
            Self::Visibility(v) => v.fmt(f),
            Self::FontStyle(v) => v.fmt(f),
            Self::FontWeight(v) => v.fmt(f),
            Self::String(v) => f.write_str(v),
            Self::None => Ok(()),
        }
    }
}

type ConvertFn = fn(&str) -> Result<StyleValue>;

/// Descriptor for one style attribute. Descriptors are process-wide and
/// shared by every style snapshot; they are built once into [`DESCRIPTORS`].
pub struct PropertyDescriptor {
    pub property: StyleProperty,
    pub name: &'static str,
    pub css_name: &'static str,
    pub kind: PropertyKind,
    pub affects_layout: bool,
    pub default: fn() -> StyleValue,
    pub convert: Option<ConvertFn>,
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("css_name", &self.css_name)
            .field("kind", &self.kind)
            .field("affects_layout", &self.affects_layout)
            .finish_non_exhaustive()
    }
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 53] = [
        Self::Width,
        Self::Height,
        Self::MinWidth,
        Self::MinHeight,
        Self::MarginLeft,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::PaddingLeft,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::BorderTopColor,
        Self::BorderRightColor,
        Self::BorderBottomColor,
        Self::BorderLeftColor,
        Self::BorderTopWidth,
        Self::BorderRightWidth,
        Self::BorderBottomWidth,
        Self::BorderLeftWidth,
        Self::BorderTopLeftRadius,
        Self::BorderTopRightRadius,
        Self::BorderBottomRightRadius,
        Self::BorderBottomLeftRadius,
        Self::HorizontalAlignment,
        Self::VerticalAlignment,
        Self::Visibility,
        Self::Opacity,
        Self::Rotate,
        Self::ScaleX,
        Self::ScaleY,
        Self::TranslateX,
        Self::TranslateY,
        Self::ZIndex,
        Self::BackgroundColor,
        Self::BackgroundImage,
        Self::BackgroundRepeat,
        Self::BackgroundSize,
        Self::BackgroundPosition,
        Self::ClipPath,
        Self::Color,
        Self::FontFamily,
        Self::FontSize,
        Self::FontStyle,
        Self::FontWeight,
        Self::OriginX,
        Self::OriginY,
        Self::Margin,
        Self::Padding,
        Self::BorderColor,
        Self::BorderWidth,
        Self::BorderRadius,
        Self::Transform,
    ];

    pub fn descriptor(self) -> &'static PropertyDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn css_name(self) -> &'static str {
        self.descriptor().css_name
    }

    pub fn kind(self) -> PropertyKind {
        self.descriptor().kind
    }

    pub fn is_shorthand(self) -> bool {
        self.kind() == PropertyKind::Shorthand
    }

    pub fn is_inherited(self) -> bool {
        self.kind() == PropertyKind::InheritedCss
    }

    pub fn affects_layout(self) -> bool {
        self.descriptor().affects_layout
    }

    pub fn default_value(self) -> StyleValue {
        (self.descriptor().default)()
    }

    /// Runs the descriptor's converter on raw textual input.
    pub fn convert(self, raw: &str) -> Result<StyleValue> {
        match self.descriptor().convert {
            Some(convert) => {
                let value = convert(raw)?;
                validate_value(self, &value)?;
                Ok(value)
            }
            None => Err(ParseError::new(raw).into()),
        }
    }
}

static DESCRIPTORS: LazyLock<Vec<PropertyDescriptor>> = LazyLock::new(|| {
    let descriptors: Vec<PropertyDescriptor> =
        StyleProperty::ALL.iter().map(|p| build_descriptor(*p)).collect();
    for (index, descriptor) in descriptors.iter().enumerate() {
        assert_eq!(
            descriptor.property as usize, index,
            "descriptor table out of order at {}",
            descriptor.name
        );
    }
    descriptors
});

fn build_descriptor(property: StyleProperty) -> PropertyDescriptor {
    use PropertyKind::*;
    use StyleProperty as P;

    let (name, css_name, kind, affects_layout, default, convert): (
        &'static str,
        &'static str,
        PropertyKind,
        bool,
        fn() -> StyleValue,
        Option<ConvertFn>,
    ) = match property {
        P::Width => ("width", "width", Css, true, match_parent_default, Some(percent_length)),
        P::Height => ("height", "height", Css, true, match_parent_default, Some(percent_length)),
        P::MinWidth => ("minWidth", "min-width", Css, true, zero_length, Some(length)),
        P::MinHeight => ("minHeight", "min-height", Css, true, zero_length, Some(length)),
        P::MarginLeft => ("marginLeft", "margin-left", Css, true, zero_percent, Some(percent_length)),
        P::MarginTop => ("marginTop", "margin-top", Css, true, zero_percent, Some(percent_length)),
        P::MarginRight => ("marginRight", "margin-right", Css, true, zero_percent, Some(percent_length)),
        P::MarginBottom => ("marginBottom", "margin-bottom", Css, true, zero_percent, Some(percent_length)),
        P::PaddingLeft => ("paddingLeft", "padding-left", Css, true, zero_length, Some(length)),
        P::PaddingTop => ("paddingTop", "padding-top", Css, true, zero_length, Some(length)),
        P::PaddingRight => ("paddingRight", "padding-right", Css, true, zero_length, Some(length)),
        P::PaddingBottom => ("paddingBottom", "padding-bottom", Css, true, zero_length, Some(length)),
        P::BorderTopColor => ("borderTopColor", "border-top-color", Css, false, none, Some(color)),
        P::BorderRightColor => ("borderRightColor", "border-right-color", Css, false, none, Some(color)),
        P::BorderBottomColor => ("borderBottomColor", "border-bottom-color", Css, false, none, Some(color)),
        P::BorderLeftColor => ("borderLeftColor", "border-left-color", Css, false, none, Some(color)),
        P::BorderTopWidth => ("borderTopWidth", "border-top-width", Css, true, zero_length, Some(length)),
        P::BorderRightWidth => ("borderRightWidth", "border-right-width", Css, true, zero_length, Some(length)),
        P::BorderBottomWidth => ("borderBottomWidth", "border-bottom-width", Css, true, zero_length, Some(length)),
        P::BorderLeftWidth => ("borderLeftWidth", "border-left-width", Css, true, zero_length, Some(length)),
        P::BorderTopLeftRadius => ("borderTopLeftRadius", "border-top-left-radius", Css, false, zero_number, Some(number)),
        P::BorderTopRightRadius => ("borderTopRightRadius", "border-top-right-radius", Css, false, zero_number, Some(number)),
        P::BorderBottomRightRadius => ("borderBottomRightRadius", "border-bottom-right-radius", Css, false, zero_number, Some(number)),
        P::BorderBottomLeftRadius => ("borderBottomLeftRadius", "border-bottom-left-radius", Css, false, zero_number, Some(number)),
        P::HorizontalAlignment => ("horizontalAlignment", "horizontal-align", Css, true, stretch_horizontal, Some(horizontal_alignment)),
        P::VerticalAlignment => ("verticalAlignment", "vertical-align", Css, true, stretch_vertical, Some(vertical_alignment)),
        P::Visibility => ("visibility", "visibility", Css, true, visible, Some(visibility)),
        P::Opacity => ("opacity", "opacity", Css, false, one_number, Some(number)),
        P::Rotate => ("rotate", "rotate", Css, false, zero_number, Some(number)),
        P::ScaleX => ("scaleX", "scaleX", Css, false, one_number, Some(number)),
        P::ScaleY => ("scaleY", "scaleY", Css, false, one_number, Some(number)),
        P::TranslateX => ("translateX", "translateX", Css, false, zero_number, Some(number)),
        P::TranslateY => ("translateY", "translateY", Css, false, zero_number, Some(number)),
        P::ZIndex => ("zIndex", "z-index", Css, false, zero_number, Some(number)),
        P::BackgroundColor => ("backgroundColor", "background-color", Css, false, none, Some(color)),
        P::BackgroundImage => ("backgroundImage", "background-image", Css, false, none, Some(string)),
        P::BackgroundRepeat => ("backgroundRepeat", "background-repeat", Css, false, none, Some(string)),
        P::BackgroundSize => ("backgroundSize", "background-size", Css, false, none, Some(string)),
        P::BackgroundPosition => ("backgroundPosition", "background-position", Css, false, none, Some(string)),
        P::ClipPath => ("clipPath", "clip-path", Css, false, none, Some(string)),
        P::Color => ("color", "color", InheritedCss, false, none, Some(color)),
        P::FontFamily => ("fontFamily", "font-family", InheritedCss, false, none, Some(string)),
        P::FontSize => ("fontSize", "font-size", InheritedCss, false, default_font_size, Some(number)),
        P::FontStyle => ("fontStyle", "font-style", InheritedCss, false, normal_font_style, Some(font_style)),
        P::FontWeight => ("fontWeight", "font-weight", InheritedCss, false, normal_font_weight, Some(font_weight)),
        P::OriginX => ("originX", "originX", Plain, false, half_number, Some(number)),
        P::OriginY => ("originY", "originY", Plain, false, half_number, Some(number)),
        P::Margin => ("margin", "margin", Shorthand, true, none, None),
        P::Padding => ("padding", "padding", Shorthand, true, none, None),
        P::BorderColor => ("borderColor", "border-color", Shorthand, false, none, None),
        P::BorderWidth => ("borderWidth", "border-width", Shorthand, true, none, None),
        P::BorderRadius => ("borderRadius", "border-radius", Shorthand, false, none, None),
        P::Transform => ("transform", "transform", Shorthand, false, none, None),
    };

    PropertyDescriptor { property, name, css_name, kind, affects_layout, default, convert }
}

// Default-value constructors.
fn match_parent_default() -> StyleValue {
    StyleValue::PercentLength(PercentLength::match_parent())
}
fn zero_percent() -> StyleValue {
    StyleValue::PercentLength(PercentLength::zero())
}
fn zero_length() -> StyleValue {
    StyleValue::Length(Length::zero())
}
fn zero_number() -> StyleValue {
    StyleValue::Number(0.0)
}
fn one_number() -> StyleValue {
    StyleValue::Number(1.0)
}
fn half_number() -> StyleValue {
    StyleValue::Number(0.5)
}
fn default_font_size() -> StyleValue {
    StyleValue::Number(DEFAULT_FONT_SIZE)
}
fn normal_font_style() -> StyleValue {
    StyleValue::FontStyle(FontStyle::Normal)
}
fn normal_font_weight() -> StyleValue {
    StyleValue::FontWeight(FontWeight::Normal)
}
fn stretch_horizontal() -> StyleValue {
    StyleValue::HorizontalAlignment(HorizontalAlignment::Stretch)
}
fn stretch_vertical() -> StyleValue {
    StyleValue::VerticalAlignment(VerticalAlignment::Stretch)
}
fn visible() -> StyleValue {
    StyleValue::Visibility(Visibility::Visible)
}
fn none() -> StyleValue {
    StyleValue::None
}

// Converters.
fn percent_length(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::PercentLength(PercentLength::parse(raw)?))
}
fn length(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::Length(Length::parse(raw)?))
}
fn number(raw: &str) -> Result<StyleValue> {
    let value: f32 = raw.trim().parse().map_err(|_| ParseError::new(raw))?;
    if !value.is_finite() {
        return Err(ParseError::new(raw).into());
    }
    Ok(StyleValue::Number(value))
}
fn color(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::Color(Color::parse(raw)?))
}
fn string(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::String(raw.trim().to_string()))
}
fn horizontal_alignment(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::HorizontalAlignment(HorizontalAlignment::parse(raw)?))
}
fn vertical_alignment(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::VerticalAlignment(VerticalAlignment::parse(raw)?))
}
fn visibility(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::Visibility(Visibility::parse(raw)?))
}
fn font_style(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::FontStyle(FontStyle::parse(raw)?))
}
fn font_weight(raw: &str) -> Result<StyleValue> {
    Ok(StyleValue::FontWeight(FontWeight::parse(raw)?))
}

const SUPPORTED_CLIP_PATHS: [&str; 4] = ["rect", "circle", "ellipse", "polygon"];

fn is_clip_path_valid(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match value.find('(') {
        Some(open) => SUPPORTED_CLIP_PATHS.contains(&value[..open].trim()),
        None => false,
    }
}

/// Domain validation applied to every converted or directly supplied value,
/// before it can reach a snapshot.
pub fn validate_value(property: StyleProperty, value: &StyleValue) -> Result<()> {
    use StyleProperty as P;
    match property {
        P::BorderTopWidth | P::BorderRightWidth | P::BorderBottomWidth | P::BorderLeftWidth => {
            if let Some(length) = value.as_length() {
                if !length.value.is_finite() || length.value < 0.0 {
                    return Err(StyleError::validation(
                        property.name(),
                        "should be a non-negative finite number",
                        length,
                    ));
                }
            }
        }
        P::BorderTopLeftRadius
        | P::BorderTopRightRadius
        | P::BorderBottomRightRadius
        | P::BorderBottomLeftRadius => {
            if let Some(number) = value.as_number() {
                if !number.is_finite() || number < 0.0 {
                    return Err(StyleError::validation(
                        property.name(),
                        "should be a non-negative finite number",
                        number,
                    ));
                }
            }
        }
        P::Opacity => {
            if let Some(number) = value.as_number() {
                if !(0.0..=1.0).contains(&number) {
                    return Err(StyleError::validation(
                        property.name(),
                        "should be between 0 and 1",
                        number,
                    ));
                }
            }
        }
        P::ClipPath => {
            if let Some(text) = value.as_str() {
                if !is_clip_path_valid(text) {
                    return Err(StyleError::validation(
                        property.name(),
                        "unsupported shape function (expected rect, circle, ellipse or polygon)",
                        text,
                    ));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Shape check for values supplied through the typed write path, where no
/// converter ran to guarantee the variant.
pub fn validate_type(property: StyleProperty, value: &StyleValue) -> Result<()> {
    use StyleProperty as P;
    use StyleValue as V;

    let ok = match property {
        P::Width | P::Height | P::MarginLeft | P::MarginTop | P::MarginRight
        | P::MarginBottom => matches!(value, V::PercentLength(_) | V::Length(_)),
        P::MinWidth | P::MinHeight | P::PaddingLeft | P::PaddingTop | P::PaddingRight
        | P::PaddingBottom | P::BorderTopWidth | P::BorderRightWidth | P::BorderBottomWidth
        | P::BorderLeftWidth => matches!(value, V::Length(_)),
        P::BorderTopLeftRadius
        | P::BorderTopRightRadius
        | P::BorderBottomRightRadius
        | P::BorderBottomLeftRadius
        | P::Opacity
        | P::Rotate
        | P::ScaleX
        | P::ScaleY
        | P::TranslateX
        | P::TranslateY
        | P::ZIndex
        | P::FontSize
        | P::OriginX
        | P::OriginY => matches!(value, V::Number(_)),
        P::BorderTopColor | P::BorderRightColor | P::BorderBottomColor | P::BorderLeftColor
        | P::BackgroundColor | P::Color => matches!(value, V::Color(_) | V::None),
        P::BackgroundImage | P::BackgroundRepeat | P::BackgroundSize | P::BackgroundPosition
        | P::ClipPath | P::FontFamily => matches!(value, V::String(_) | V::None),
        P::HorizontalAlignment => matches!(value, V::HorizontalAlignment(_)),
        P::VerticalAlignment => matches!(value, V::VerticalAlignment(_)),
        P::Visibility => matches!(value, V::Visibility(_)),
        P::FontStyle => matches!(value, V::FontStyle(_)),
        P::FontWeight => matches!(value, V::FontWeight(_)),
        P::Margin | P::Padding | P::BorderColor | P::BorderWidth | P::BorderRadius
        | P::Transform => false,
    };
    if ok {
        Ok(())
    } else {
        Err(StyleError::validation(property.name(), "wrong value type for property", value))
    }
}

/// Four edge values in CSS order.
struct Thickness<T> {
    top: T,
    right: T,
    bottom: T,
    left: T,
}

/// CSS 1/2/3/4-token edge rule. Any other token count is malformed.
fn parse_thickness(value: &str) -> Result<Thickness<&str>> {
    let tokens: SmallVec<[&str; 4]> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    let t = match tokens.as_slice() {
        [all] => Thickness { top: all, right: all, bottom: all, left: all },
        [tb, rl] => Thickness { top: tb, right: rl, bottom: tb, left: rl },
        [top, rl, bottom] => Thickness { top, right: rl, bottom, left: rl },
        [top, right, bottom, left] => Thickness { top, right, bottom, left },
        _ => return Err(ParseError::new(value).into()),
    };
    Ok(Thickness { top: *t.top, right: *t.right, bottom: *t.bottom, left: *t.left })
}

pub type Expansion = Vec<(StyleProperty, StyleValue)>;

/// Expands a shorthand into its ordered (longhand, value) list. The caller
/// applies the pairs atomically as one logical change.
pub fn expand_shorthand(property: StyleProperty, raw: &str) -> Result<Expansion> {
    use StyleProperty as P;
    match property {
        P::Margin => {
            let t = parse_thickness(raw)?;
            Ok(vec![
                (P::MarginTop, StyleValue::PercentLength(PercentLength::parse(t.top)?)),
                (P::MarginRight, StyleValue::PercentLength(PercentLength::parse(t.right)?)),
                (P::MarginBottom, StyleValue::PercentLength(PercentLength::parse(t.bottom)?)),
                (P::MarginLeft, StyleValue::PercentLength(PercentLength::parse(t.left)?)),
            ])
        }
        P::Padding => {
            let t = parse_thickness(raw)?;
            Ok(vec![
                (P::PaddingTop, StyleValue::Length(Length::parse(t.top)?)),
                (P::PaddingRight, StyleValue::Length(Length::parse(t.right)?)),
                (P::PaddingBottom, StyleValue::Length(Length::parse(t.bottom)?)),
                (P::PaddingLeft, StyleValue::Length(Length::parse(t.left)?)),
            ])
        }
        P::BorderWidth => {
            let t = parse_thickness(raw)?;
            let expansion = vec![
                (P::BorderTopWidth, StyleValue::Length(Length::parse(t.top)?)),
                (P::BorderRightWidth, StyleValue::Length(Length::parse(t.right)?)),
                (P::BorderBottomWidth, StyleValue::Length(Length::parse(t.bottom)?)),
                (P::BorderLeftWidth, StyleValue::Length(Length::parse(t.left)?)),
            ];
            for (longhand, value) in &expansion {
                validate_value(*longhand, value)?;
            }
            Ok(expansion)
        }
        P::BorderRadius => {
            let t = parse_thickness(raw)?;
            let expansion = vec![
                (P::BorderTopLeftRadius, number(t.top)?),
                (P::BorderTopRightRadius, number(t.right)?),
                (P::BorderBottomRightRadius, number(t.bottom)?),
                (P::BorderBottomLeftRadius, number(t.left)?),
            ];
            for (longhand, value) in &expansion {
                validate_value(*longhand, value)?;
            }
            Ok(expansion)
        }
        P::BorderColor => expand_border_color(raw),
        P::Transform => expand_transform(raw),
        _ => Err(ParseError::new(raw).into()),
    }
}

fn expand_border_color(raw: &str) -> Result<Expansion> {
    use StyleProperty as P;

    // An rgb()/rgba() function contains commas, so it cannot go through the
    // token splitter; a single function colors all four edges.
    let trimmed = raw.trim();
    if trimmed.starts_with("rgb") {
        let all = Color::parse(trimmed)?;
        return Ok(vec![
            (P::BorderTopColor, StyleValue::Color(all)),
            (P::BorderRightColor, StyleValue::Color(all)),
            (P::BorderBottomColor, StyleValue::Color(all)),
            (P::BorderLeftColor, StyleValue::Color(all)),
        ]);
    }

    let t = parse_thickness(trimmed)?;
    Ok(vec![
        (P::BorderTopColor, StyleValue::Color(Color::parse(t.top)?)),
        (P::BorderRightColor, StyleValue::Color(Color::parse(t.right)?)),
        (P::BorderBottomColor, StyleValue::Color(Color::parse(t.bottom)?)),
        (P::BorderLeftColor, StyleValue::Color(Color::parse(t.left)?)),
    ])
}

fn parse_transform_number(raw: &str) -> Result<f32> {
    let trimmed = raw.trim();
    let (numeric, to_degrees) = if let Some(rest) = trimmed.strip_suffix("rad") {
        (rest.trim(), true)
    } else if let Some(rest) = trimmed.strip_suffix("deg") {
        (rest.trim(), false)
    } else {
        (trimmed, false)
    };
    let value: f32 = numeric.parse().map_err(|_| ParseError::new(raw))?;
    if !value.is_finite() {
        return Err(ParseError::new(raw).into());
    }
    Ok(if to_degrees { value * (180.0 / std::f32::consts::PI) } else { value })
}

fn push_axis_pair(
    out: &mut Expansion,
    x: StyleProperty,
    y: StyleProperty,
    args: &str,
) -> Result<()> {
    let values: SmallVec<[&str; 2]> = args.split(',').map(str::trim).collect();
    match values.as_slice() {
        [both] => {
            let v = parse_transform_number(both)?;
            out.push((x, StyleValue::Number(v)));
            out.push((y, StyleValue::Number(v)));
        }
        [first, second, ..] => {
            out.push((x, StyleValue::Number(parse_transform_number(first)?)));
            out.push((y, StyleValue::Number(parse_transform_number(second)?)));
        }
        [] => return Err(ParseError::new(args).into()),
    }
    Ok(())
}

fn expand_transform(raw: &str) -> Result<Expansion> {
    use StyleProperty as P;

    let trimmed = raw.trim();
    if trimmed == "none" {
        return Ok(vec![
            (P::ScaleX, StyleValue::Number(1.0)),
            (P::ScaleY, StyleValue::Number(1.0)),
            (P::TranslateX, StyleValue::Number(0.0)),
            (P::TranslateY, StyleValue::Number(0.0)),
            (P::Rotate, StyleValue::Number(0.0)),
        ]);
    }

    let mut out = Expansion::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| ParseError::new(raw))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| ParseError::new(raw))?;
        let operator = rest[..open].trim().trim_start_matches(',').trim();
        let args = &rest[open + 1..close];

        match operator {
            "scale" | "scale3d" => push_axis_pair(&mut out, P::ScaleX, P::ScaleY, args)?,
            "translate" | "translate3d" => {
                push_axis_pair(&mut out, P::TranslateX, P::TranslateY, args)?
            }
            "scaleX" => out.push((P::ScaleX, StyleValue::Number(parse_transform_number(args)?))),
            "scaleY" => out.push((P::ScaleY, StyleValue::Number(parse_transform_number(args)?))),
            "translateX" => {
                out.push((P::TranslateX, StyleValue::Number(parse_transform_number(args)?)))
            }
            "translateY" => {
                out.push((P::TranslateY, StyleValue::Number(parse_transform_number(args)?)))
            }
            "rotate" => out.push((P::Rotate, StyleValue::Number(parse_transform_number(args)?))),
            _ => return Err(ParseError::new(raw).into()),
        }
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

fn collapse_four(values: [String; 4]) -> String {
    if values.iter().all(|v| *v == values[0]) {
        values[0].clone()
    } else {
        values.join(" ")
    }
}

/// Recomposes a shorthand's canonical string from the current longhand
/// values, collapsing to a single term when all four edges agree.
pub fn compose_shorthand(property: StyleProperty, snapshot: &StyleSnapshot) -> String {
    use StyleProperty as P;
    let get = |p: StyleProperty| snapshot.value(p).to_string();
    match property {
        P::Margin => collapse_four([
            get(P::MarginTop),
            get(P::MarginRight),
            get(P::MarginBottom),
            get(P::MarginLeft),
        ]),
        P::Padding => collapse_four([
            get(P::PaddingTop),
            get(P::PaddingRight),
            get(P::PaddingBottom),
            get(P::PaddingLeft),
        ]),
        P::BorderColor => collapse_four([
            get(P::BorderTopColor),
            get(P::BorderRightColor),
            get(P::BorderBottomColor),
            get(P::BorderLeftColor),
        ]),
        P::BorderWidth => collapse_four([
            get(P::BorderTopWidth),
            get(P::BorderRightWidth),
            get(P::BorderBottomWidth),
            get(P::BorderLeftWidth),
        ]),
        P::BorderRadius => collapse_four([
            get(P::BorderTopLeftRadius),
            get(P::BorderTopRightRadius),
            get(P::BorderBottomRightRadius),
            get(P::BorderBottomLeftRadius),
        ]),
        P::Transform => {
            let number = |p: StyleProperty| snapshot.value(p).as_number().unwrap_or_default();
            let (sx, sy) = (number(P::ScaleX), number(P::ScaleY));
            let (tx, ty) = (number(P::TranslateX), number(P::TranslateY));
            let rotate = number(P::Rotate);
            let mut parts: Vec<String> = Vec::new();
            if tx != 0.0 || ty != 0.0 {
                parts.push(format!("translate({}, {})", tx, ty));
            }
            if sx != 1.0 || sy != 1.0 {
                parts.push(format!("scale({}, {})", sx, sy));
            }
            if rotate != 0.0 {
                parts.push(format!("rotate({})", rotate));
            }
            parts.join(" ")
        }
        other => snapshot.value(other).to_string(),
    }
}
