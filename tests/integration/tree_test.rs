use std::cell::Cell;
use std::rc::Rc;

use crossview::core::measure::resolve_size_and_state;
use crossview::{
    layout, measure, Color, FixedSizeView, FontWeight, FrameContainer, ImageError, ImageHandle,
    MeasureMode, MeasureSpec, RequestToken, StyleProperty, StyleValue, ViewBehavior, ViewError,
    ViewId, ViewTree,
};

fn exactly(size: i32) -> MeasureSpec {
    MeasureSpec::make(size, MeasureMode::Exactly)
}

fn run_pass(tree: &mut ViewTree, root: ViewId, width: i32, height: i32) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    measure(tree, root, exactly(width), exactly(height));
    layout(tree, root, 0, 0, width, height);
}

fn small_tree() -> (ViewTree, ViewId, ViewId, ViewId) {
    let mut tree = ViewTree::with_defaults();
    let root = tree.create_view(Box::new(FrameContainer));
    let child = tree.create_view(Box::new(FrameContainer));
    let grandchild = tree.create_view(Box::new(FixedSizeView::new(10.0, 10.0)));
    tree.set_root(root).unwrap();
    tree.add_child(root, child).unwrap();
    tree.add_child(child, grandchild).unwrap();
    (tree, root, child, grandchild)
}

#[test]
fn test_remove_child_destroys_subtree() {
    let (mut tree, root, child, grandchild) = small_tree();

    tree.remove_child(root, child).unwrap();

    assert!(tree.get(child).is_none());
    assert!(tree.get(grandchild).is_none());
    assert!(tree.get(root).is_some());
}

#[test]
fn test_structural_errors() {
    let (mut tree, root, child, _) = small_tree();
    let stranger = ViewId(9999);

    assert!(matches!(tree.add_child(root, stranger), Err(ViewError::NotFound(_))));
    let orphan = tree.create_view(Box::new(FrameContainer));
    assert!(matches!(tree.add_child(stranger, orphan), Err(ViewError::NotFound(_))));
    assert!(matches!(tree.add_child(root, child), Err(ViewError::AlreadyAttached(_))));
    assert!(matches!(
        tree.remove_child(child, root),
        Err(ViewError::NotAChild(_, _))
    ));
}

#[test]
fn test_equal_write_does_not_invalidate() {
    let (mut tree, root, child, _) = small_tree();
    tree.set_style(child, StyleProperty::Width, "100").unwrap();
    run_pass(&mut tree, root, 200, 200);
    assert!(tree.node(child).is_layout_valid());

    tree.set_style(child, StyleProperty::Width, "100").unwrap();
    assert!(tree.node(child).is_layout_valid());

    tree.set_style(child, StyleProperty::Width, "120").unwrap();
    assert!(!tree.node(child).is_layout_valid());
    assert!(!tree.node(root).is_layout_valid());
}

#[test]
fn test_non_layout_property_does_not_invalidate() {
    let (mut tree, root, child, _) = small_tree();
    run_pass(&mut tree, root, 200, 200);

    tree.set_style(child, StyleProperty::BackgroundColor, "red").unwrap();

    assert!(tree.node(child).is_layout_valid());
    assert_eq!(tree.node(child).style.background.color, Some(Color::rgb(255, 0, 0)));
}

#[test]
fn test_invalid_write_leaves_state_untouched() {
    let (mut tree, _, child, _) = small_tree();
    tree.set_style(child, StyleProperty::Margin, "5").unwrap();

    assert!(tree.set_style(child, StyleProperty::Width, "nope").is_err());
    assert!(tree.set_style(child, StyleProperty::Margin, "1 2 3 4 5").is_err());
    assert!(tree.set_style(child, StyleProperty::BorderWidth, "1 -2").is_err());

    assert_eq!(tree.style_string(child, StyleProperty::Margin), "5");
    assert_eq!(
        tree.style_value(child, StyleProperty::Width),
        StyleProperty::Width.default_value()
    );
}

#[test]
fn test_typed_write_rejects_wrong_shape() {
    let (mut tree, _, child, _) = small_tree();

    assert!(tree
        .set_style_value(child, StyleProperty::Width, StyleValue::Number(10.0))
        .is_err());
    assert!(tree
        .set_style_value(child, StyleProperty::Opacity, StyleValue::Number(0.5))
        .is_ok());
    assert!(tree
        .set_style_value(child, StyleProperty::Opacity, StyleValue::Number(1.5))
        .is_err());
}

#[test]
fn test_color_inherits_until_local_override() {
    let (mut tree, root, child, grandchild) = small_tree();

    tree.set_style(root, StyleProperty::Color, "red").unwrap();
    assert_eq!(
        tree.style_value(child, StyleProperty::Color),
        StyleValue::Color(Color::rgb(255, 0, 0))
    );
    assert_eq!(
        tree.style_value(grandchild, StyleProperty::Color),
        StyleValue::Color(Color::rgb(255, 0, 0))
    );

    tree.set_style(child, StyleProperty::Color, "blue").unwrap();
    assert_eq!(
        tree.style_value(grandchild, StyleProperty::Color),
        StyleValue::Color(Color::rgb(0, 0, 255))
    );

    // The local override shadows any further pushes from above.
    tree.set_style(root, StyleProperty::Color, "green").unwrap();
    assert_eq!(
        tree.style_value(child, StyleProperty::Color),
        StyleValue::Color(Color::rgb(0, 0, 255))
    );
    assert_eq!(
        tree.style_value(grandchild, StyleProperty::Color),
        StyleValue::Color(Color::rgb(0, 0, 255))
    );
}

#[test]
fn test_inherited_values_flow_on_attach() {
    let mut tree = ViewTree::with_defaults();
    let root = tree.create_view(Box::new(FrameContainer));
    tree.set_style(root, StyleProperty::FontWeight, "bold").unwrap();
    tree.set_style(root, StyleProperty::FontSize, "20").unwrap();

    let late = tree.create_view(Box::new(FixedSizeView::new(10.0, 10.0)));
    tree.add_child(root, late).unwrap();

    let font = &tree.node(late).style.font;
    assert_eq!(font.weight, FontWeight::Bold);
    assert_eq!(font.size, 20.0);
}

#[test]
fn test_font_rebuilds_from_longhands() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::FontFamily, "monospace").unwrap();
    tree.set_style(child, StyleProperty::FontStyle, "italic").unwrap();

    let font = &tree.node(child).style.font;
    assert_eq!(font.family.as_deref(), Some("monospace"));
    assert_eq!(font.style, crossview::FontStyle::Italic);
}

#[test]
fn test_shorthand_round_trip_through_tree() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::Margin, "1 2 3").unwrap();
    assert_eq!(tree.style_string(child, StyleProperty::Margin), "1 2 3 2");

    tree.set_style(child, StyleProperty::BorderRadius, "4").unwrap();
    assert_eq!(tree.style_string(child, StyleProperty::BorderRadius), "4");
    assert_eq!(tree.node(child).style.background.border_top_left_radius, 4.0);
}

#[test]
fn test_data_uri_background_loads_synchronously() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(
        child,
        StyleProperty::BackgroundImage,
        "url('data:image/png;base64,iVBORw0KGgo=')",
    )
    .unwrap();

    assert!(tree.node(child).style.background.image.is_some());
    assert!(tree.pending_background_image(child).is_none());
}

#[test]
fn test_resource_background_loads_synchronously() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::BackgroundImage, "res://logo").unwrap();

    assert!(tree.node(child).style.background.image.is_some());
}

#[test]
fn test_url_background_completes_with_matching_token() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::BackgroundImage, "http://example.com/a.png")
        .unwrap();
    assert!(tree.node(child).style.background.image.is_none());
    let token = tree.pending_background_image(child).unwrap();

    tree.complete_background_image(child, token, Ok(ImageHandle(77)));

    assert_eq!(tree.node(child).style.background.image, Some(ImageHandle(77)));
    assert!(tree.pending_background_image(child).is_none());
}

#[test]
fn test_stale_url_response_is_discarded() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::BackgroundImage, "http://example.com/a.png")
        .unwrap();
    let first = tree.pending_background_image(child).unwrap();
    tree.set_style(child, StyleProperty::BackgroundImage, "http://example.com/b.png")
        .unwrap();
    let second = tree.pending_background_image(child).unwrap();
    assert_ne!(first, second);

    // The response for the replaced request arrives late and must not land.
    tree.complete_background_image(child, first, Ok(ImageHandle(1)));
    assert!(tree.node(child).style.background.image.is_none());
    assert_eq!(tree.pending_background_image(child), Some(second));

    tree.complete_background_image(child, second, Ok(ImageHandle(2)));
    assert_eq!(tree.node(child).style.background.image, Some(ImageHandle(2)));
}

#[test]
fn test_failed_url_load_clears_slot() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::BackgroundImage, "res://logo").unwrap();
    assert!(tree.node(child).style.background.image.is_some());

    tree.set_style(child, StyleProperty::BackgroundImage, "http://example.com/a.png")
        .unwrap();
    let token = tree.pending_background_image(child).unwrap();
    tree.complete_background_image(
        child,
        token,
        Err(ImageError::Network("connection reset".into())),
    );

    assert!(tree.node(child).style.background.image.is_none());
    assert!(tree.pending_background_image(child).is_none());
}

#[test]
fn test_unset_background_image_clears_slot() {
    let (mut tree, _, child, _) = small_tree();

    tree.set_style(child, StyleProperty::BackgroundImage, "res://logo").unwrap();
    tree.set_style_value(child, StyleProperty::BackgroundImage, StyleValue::None)
        .unwrap();

    assert!(tree.node(child).style.background.image.is_none());
}

#[derive(Debug)]
struct CountingLeaf {
    measures: Rc<Cell<usize>>,
    native_layouts: Rc<Cell<usize>>,
}

impl CountingLeaf {
    fn new() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let measures = Rc::new(Cell::new(0));
        let native_layouts = Rc::new(Cell::new(0));
        let leaf = Self {
            measures: Rc::clone(&measures),
            native_layouts: Rc::clone(&native_layouts),
        };
        (leaf, measures, native_layouts)
    }
}

impl ViewBehavior for CountingLeaf {
    fn on_measure(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) {
        self.measures.set(self.measures.get() + 1);
        let width =
            resolve_size_and_state(10.0, width_spec.size() as f32, width_spec.mode(), 0);
        let height =
            resolve_size_and_state(10.0, height_spec.size() as f32, height_spec.mode(), 0);
        tree.set_measured_dimension(id, width, height);
    }

    fn on_layout(&mut self, _: &mut ViewTree, _: ViewId, _: i32, _: i32, _: i32, _: i32) {}

    fn layout_native_view(&mut self, _: &mut ViewTree, _: ViewId, _: i32, _: i32, _: i32, _: i32) {
        self.native_layouts.set(self.native_layouts.get() + 1);
    }
}

#[test]
fn test_measure_is_memoized_until_invalidated() {
    let (leaf, measures, _) = CountingLeaf::new();
    let mut tree = ViewTree::with_defaults();
    let view = tree.create_view(Box::new(leaf));

    run_pass(&mut tree, view, 100, 100);
    assert_eq!(measures.get(), 1);

    // Same specs, still valid: the cached measurement stands.
    measure(&mut tree, view, exactly(100), exactly(100));
    assert_eq!(measures.get(), 1);

    // Different constraints force a fresh measurement.
    measure(&mut tree, view, exactly(150), exactly(100));
    assert_eq!(measures.get(), 2);

    layout(&mut tree, view, 0, 0, 150, 100);
    tree.request_layout(view);
    measure(&mut tree, view, exactly(150), exactly(100));
    assert_eq!(measures.get(), 3);
}

#[test]
fn test_layout_reports_bounds_changes() {
    let (mut tree, root, child, _) = small_tree();

    run_pass(&mut tree, root, 100, 100);
    let first = tree.node(child).bounds();

    run_pass(&mut tree, root, 100, 100);
    assert_eq!(tree.node(child).bounds(), first);

    tree.request_layout(root);
    run_pass(&mut tree, root, 80, 80);
    assert_eq!(tree.node(child).bounds().width(), 80);
}

#[test]
fn test_native_layout_skipped_when_bounds_unchanged() {
    let (leaf, _, native_layouts) = CountingLeaf::new();
    let mut tree = ViewTree::with_defaults();
    let view = tree.create_view(Box::new(leaf));

    run_pass(&mut tree, view, 100, 100);
    assert_eq!(native_layouts.get(), 1);

    // Identical bounds, so the native view is left alone.
    run_pass(&mut tree, view, 100, 100);
    assert_eq!(native_layouts.get(), 1);

    tree.request_layout(view);
    run_pass(&mut tree, view, 80, 80);
    assert_eq!(native_layouts.get(), 2);
}
