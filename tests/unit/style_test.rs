use crossview::core::style::registry::{compose_shorthand, expand_shorthand};
use crossview::core::style::*;
use crossview::core::units::{Length, PercentLength};
use pretty_assertions::assert_eq;

#[test]
fn test_color_parse() {
    assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("#f00").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("#80ff0000").unwrap().r, 255);
    assert_eq!(Color::parse("rgb(0, 128, 255)").unwrap(), Color::rgb(0, 128, 255));
    assert_eq!(
        Color::parse("rgba(0, 128, 255, 0.5)").unwrap(),
        Color::rgba(0, 128, 255, 0.5)
    );
    assert_eq!(Color::parse("red").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("nope").is_err());
}

#[test]
fn test_color_parse_rejects_non_ascii_hex() {
    // Multi-byte payloads must fail cleanly, not split a char boundary.
    assert!(Color::parse("#\u{e9}a").is_err());
    assert!(Color::parse("#ffff\u{e9}f").is_err());
    assert!(Color::parse("#caf\u{00e9}caf\u{00e9}").is_err());
}

#[test]
fn test_color_display() {
    assert_eq!(Color::rgb(255, 0, 0).to_string(), "#ff0000");
    assert_eq!(Color::rgba(1, 2, 3, 0.5).to_string(), "rgba(1, 2, 3, 0.5)");
}

#[test]
fn test_font_weight_parse() {
    assert_eq!(FontWeight::parse("bold").unwrap(), FontWeight::Bold);
    assert_eq!(FontWeight::parse("700").unwrap(), FontWeight::Bold);
    assert_eq!(FontWeight::parse("normal").unwrap(), FontWeight::Normal);
    assert_eq!(FontWeight::parse("100").unwrap(), FontWeight::Thin);
    assert!(FontWeight::parse("550").is_err());
}

#[test]
fn test_alignment_parse_accepts_middle() {
    assert_eq!(HorizontalAlignment::parse("middle").unwrap(), HorizontalAlignment::Center);
    assert_eq!(VerticalAlignment::parse("middle").unwrap(), VerticalAlignment::Center);
    assert_eq!(Visibility::parse("collapsed").unwrap(), Visibility::Collapse);
}

#[test]
fn test_property_conversion() {
    assert_eq!(
        StyleProperty::Width.convert("50%").unwrap(),
        StyleValue::PercentLength(PercentLength::percent(0.5))
    );
    assert_eq!(
        StyleProperty::MinWidth.convert("10px").unwrap(),
        StyleValue::Length(Length::px(10.0))
    );
    assert_eq!(StyleProperty::Opacity.convert("0.5").unwrap(), StyleValue::Number(0.5));
    assert!(StyleProperty::Width.convert("nope").is_err());
}

#[test]
fn test_border_width_rejects_negative() {
    match StyleProperty::BorderTopWidth.convert("-1") {
        Err(StyleError::Validation { property, .. }) => assert_eq!(property, "borderTopWidth"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_opacity_rejects_out_of_range() {
    assert!(matches!(
        StyleProperty::Opacity.convert("1.5"),
        Err(StyleError::Validation { .. })
    ));
    assert!(matches!(
        StyleProperty::Opacity.convert("-0.1"),
        Err(StyleError::Validation { .. })
    ));
    assert!(StyleProperty::Opacity.convert("1").is_ok());
}

#[test]
fn test_clip_path_shapes() {
    assert!(StyleProperty::ClipPath.convert("circle(50% at 50% 50%)").is_ok());
    assert!(StyleProperty::ClipPath.convert("polygon(0 0, 100% 0, 100% 100%)").is_ok());
    assert!(matches!(
        StyleProperty::ClipPath.convert("blob(1)"),
        Err(StyleError::Validation { .. })
    ));
}

#[test]
fn test_descriptor_metadata() {
    assert!(StyleProperty::Width.affects_layout());
    assert!(!StyleProperty::BackgroundColor.affects_layout());
    assert!(StyleProperty::Color.is_inherited());
    assert!(StyleProperty::FontSize.is_inherited());
    assert!(!StyleProperty::Width.is_inherited());
    assert!(StyleProperty::Margin.is_shorthand());
    assert_eq!(StyleProperty::MinWidth.css_name(), "min-width");
    assert_eq!(StyleProperty::MinWidth.name(), "minWidth");
}

#[test]
fn test_margin_shorthand_two_values() {
    let expansion = expand_shorthand(StyleProperty::Margin, "5 10").unwrap();
    assert_eq!(
        expansion,
        vec![
            (StyleProperty::MarginTop, StyleValue::PercentLength(PercentLength::dip(5.0))),
            (StyleProperty::MarginRight, StyleValue::PercentLength(PercentLength::dip(10.0))),
            (StyleProperty::MarginBottom, StyleValue::PercentLength(PercentLength::dip(5.0))),
            (StyleProperty::MarginLeft, StyleValue::PercentLength(PercentLength::dip(10.0))),
        ]
    );
}

#[test]
fn test_margin_shorthand_three_values() {
    let expansion = expand_shorthand(StyleProperty::Margin, "1 2 3").unwrap();
    assert_eq!(
        expansion,
        vec![
            (StyleProperty::MarginTop, StyleValue::PercentLength(PercentLength::dip(1.0))),
            (StyleProperty::MarginRight, StyleValue::PercentLength(PercentLength::dip(2.0))),
            (StyleProperty::MarginBottom, StyleValue::PercentLength(PercentLength::dip(3.0))),
            (StyleProperty::MarginLeft, StyleValue::PercentLength(PercentLength::dip(2.0))),
        ]
    );
}

#[test]
fn test_shorthand_rejects_bad_token_counts() {
    assert!(expand_shorthand(StyleProperty::Margin, "1 2 3 4 5").is_err());
    assert!(expand_shorthand(StyleProperty::Margin, "").is_err());
    assert!(expand_shorthand(StyleProperty::Padding, "1 nope").is_err());
}

#[test]
fn test_border_width_shorthand_validates_each_edge() {
    assert!(expand_shorthand(StyleProperty::BorderWidth, "1 2 3 4").is_ok());
    assert!(matches!(
        expand_shorthand(StyleProperty::BorderWidth, "1 -2"),
        Err(StyleError::Validation { .. })
    ));
    assert!(matches!(
        expand_shorthand(StyleProperty::BorderRadius, "-5"),
        Err(StyleError::Validation { .. })
    ));
}

#[test]
fn test_border_color_shorthand() {
    let expansion = expand_shorthand(StyleProperty::BorderColor, "red blue").unwrap();
    assert_eq!(expansion[0], (StyleProperty::BorderTopColor, StyleValue::Color(Color::rgb(255, 0, 0))));
    assert_eq!(expansion[1], (StyleProperty::BorderRightColor, StyleValue::Color(Color::rgb(0, 0, 255))));
    assert_eq!(expansion[2].1, StyleValue::Color(Color::rgb(255, 0, 0)));
    assert_eq!(expansion[3].1, StyleValue::Color(Color::rgb(0, 0, 255)));

    // A single rgb() function contains commas and colors all four edges.
    let uniform = expand_shorthand(StyleProperty::BorderColor, "rgb(1, 2, 3)").unwrap();
    assert_eq!(uniform.len(), 4);
    assert!(uniform.iter().all(|(_, v)| *v == StyleValue::Color(Color::rgb(1, 2, 3))));
}

#[test]
fn test_transform_expansion() {
    let expansion =
        expand_shorthand(StyleProperty::Transform, "translate(10, 20) scale(2) rotate(45deg)")
            .unwrap();
    assert_eq!(
        expansion,
        vec![
            (StyleProperty::TranslateX, StyleValue::Number(10.0)),
            (StyleProperty::TranslateY, StyleValue::Number(20.0)),
            (StyleProperty::ScaleX, StyleValue::Number(2.0)),
            (StyleProperty::ScaleY, StyleValue::Number(2.0)),
            (StyleProperty::Rotate, StyleValue::Number(45.0)),
        ]
    );
}

#[test]
fn test_transform_radians_convert_to_degrees() {
    let expansion = expand_shorthand(StyleProperty::Transform, "rotate(1.5708rad)").unwrap();
    let (property, value) = &expansion[0];
    assert_eq!(*property, StyleProperty::Rotate);
    let degrees = match value {
        StyleValue::Number(n) => *n,
        other => panic!("expected number, got {other:?}"),
    };
    assert!((degrees - 90.0).abs() < 0.01);
}

#[test]
fn test_transform_none_resets_components() {
    let expansion = expand_shorthand(StyleProperty::Transform, "none").unwrap();
    assert_eq!(
        expansion,
        vec![
            (StyleProperty::ScaleX, StyleValue::Number(1.0)),
            (StyleProperty::ScaleY, StyleValue::Number(1.0)),
            (StyleProperty::TranslateX, StyleValue::Number(0.0)),
            (StyleProperty::TranslateY, StyleValue::Number(0.0)),
            (StyleProperty::Rotate, StyleValue::Number(0.0)),
        ]
    );
}

#[test]
fn test_transform_rejects_unknown_operator() {
    assert!(expand_shorthand(StyleProperty::Transform, "skew(10)").is_err());
    assert!(expand_shorthand(StyleProperty::Transform, "rotate(").is_err());
}

#[test]
fn test_compose_collapses_equal_edges() {
    let mut snapshot = StyleSnapshot::new();
    for (property, value) in expand_shorthand(StyleProperty::Margin, "5").unwrap() {
        snapshot.store(property, value, ValueSource::Local);
    }
    assert_eq!(compose_shorthand(StyleProperty::Margin, &snapshot), "5");

    snapshot.store(
        StyleProperty::MarginLeft,
        StyleValue::PercentLength(PercentLength::dip(1.0)),
        ValueSource::Local,
    );
    assert_eq!(compose_shorthand(StyleProperty::Margin, &snapshot), "5 5 5 1");
}

#[test]
fn test_compose_transform() {
    let mut snapshot = StyleSnapshot::new();
    assert_eq!(compose_shorthand(StyleProperty::Transform, &snapshot), "");

    snapshot.store(StyleProperty::Rotate, StyleValue::Number(45.0), ValueSource::Local);
    assert_eq!(compose_shorthand(StyleProperty::Transform, &snapshot), "rotate(45)");

    snapshot.store(StyleProperty::TranslateX, StyleValue::Number(10.0), ValueSource::Local);
    snapshot.store(StyleProperty::TranslateY, StyleValue::Number(20.0), ValueSource::Local);
    assert_eq!(
        compose_shorthand(StyleProperty::Transform, &snapshot),
        "translate(10, 20) rotate(45)"
    );
}

#[test]
fn test_snapshot_suppresses_equal_writes() {
    let mut snapshot = StyleSnapshot::new();
    let red = StyleValue::Color(Color::rgb(255, 0, 0));

    assert!(snapshot.store(StyleProperty::BackgroundColor, red.clone(), ValueSource::Local));
    assert!(!snapshot.store(StyleProperty::BackgroundColor, red, ValueSource::Local));
    assert!(snapshot.store(
        StyleProperty::BackgroundColor,
        StyleValue::Color(Color::rgb(0, 0, 255)),
        ValueSource::Local
    ));
}

#[test]
fn test_snapshot_source_upgrades_on_equal_write() {
    let mut snapshot = StyleSnapshot::new();
    let red = StyleValue::Color(Color::rgb(255, 0, 0));

    snapshot.store(StyleProperty::Color, red.clone(), ValueSource::Inherited);
    assert!(!snapshot.has_local_value(StyleProperty::Color));

    // Equal value, but the write is local now: it starts shadowing pushes.
    assert!(!snapshot.store(StyleProperty::Color, red, ValueSource::Local));
    assert!(snapshot.has_local_value(StyleProperty::Color));
}

#[test]
fn test_snapshot_falls_back_to_descriptor_default() {
    let snapshot = StyleSnapshot::new();
    assert_eq!(
        snapshot.value(StyleProperty::Width),
        StyleValue::PercentLength(PercentLength::match_parent())
    );
    assert_eq!(snapshot.value(StyleProperty::Opacity), StyleValue::Number(1.0));
    assert_eq!(snapshot.source(StyleProperty::Width), ValueSource::Default);
}
