use tracing::trace;

use crate::core::measure::{child_measure_spec, MeasureMode, MeasureSpec};
use crate::core::style::{HorizontalAlignment, StyleProperty, VerticalAlignment};
use crate::core::units::{round_half_up, UNBOUNDED};
use crate::core::view::{Bounds, LayoutState, ViewId, ViewTree};

/// Measures one node against the given constraints.
///
/// Memoized: when the specs are unchanged since the last pass and nothing
/// invalidated the node, the cached measured dimensions stand and the
/// behavior is not consulted.
pub fn measure(
    tree: &mut ViewTree,
    id: ViewId,
    width_spec: MeasureSpec,
    height_spec: MeasureSpec,
) {
    let node = tree.node_mut(id);
    let spec_changed = node.set_current_measure_specs(width_spec, height_spec);
    if !spec_changed && node.is_layout_valid() && node.measured_set {
        return;
    }

    trace!(view = id.0, %width_spec, %height_spec, "measure");
    node.layout_state = LayoutState::Measuring;
    node.measured_set = false;
    let mut behavior = match node.behavior.take() {
        Some(behavior) => behavior,
        None => panic!("measure re-entered view {id:?}"),
    };
    behavior.on_measure(tree, id, width_spec, height_spec);

    let node = tree.node_mut(id);
    node.behavior = Some(behavior);
    assert!(
        node.measured_set,
        "on_measure finished without set_measured_dimension for view {id:?}"
    );
    node.layout_state = LayoutState::Measured;
}

/// Places one node at the given frame (parent-local device pixels) and
/// recurses into it. The native widget is touched only when the bounds
/// actually moved.
pub fn layout(tree: &mut ViewTree, id: ViewId, left: i32, top: i32, right: i32, bottom: i32) {
    let node = tree.node_mut(id);
    node.layout_state = LayoutState::LayingOut;
    let (bounds_changed, size_changed) =
        node.set_current_layout_bounds(Bounds { left, top, right, bottom });
    trace!(view = id.0, left, top, right, bottom, bounds_changed, size_changed, "layout");

    let mut behavior = match node.behavior.take() {
        Some(behavior) => behavior,
        None => panic!("layout re-entered view {id:?}"),
    };
    if bounds_changed {
        behavior.layout_native_view(tree, id, left, top, right, bottom);
    }
    behavior.on_layout(tree, id, left, top, right, bottom);

    let node = tree.node_mut(id);
    node.behavior = Some(behavior);
    node.layout_state = LayoutState::LaidOut;
}

/// Resolves the child's declared width/height/margins against the parent's
/// current constraints. Percentages resolve against the parent's available
/// length; with an unbounded parent they resolve to zero.
fn update_child_layout_params(tree: &mut ViewTree, parent: ViewId, child: ViewId) {
    use StyleProperty as P;

    let density = tree.density();
    let (available_width, available_height) = {
        let parent = tree.node(parent);
        let horizontal = match parent.width_spec.mode() {
            MeasureMode::Unspecified => UNBOUNDED,
            _ => parent.width_spec.size(),
        };
        let vertical = match parent.height_spec.mode() {
            MeasureMode::Unspecified => UNBOUNDED,
            _ => parent.height_spec.size(),
        };
        (horizontal, vertical)
    };

    let node = tree.node_mut(child);
    let style = &node.style;
    let width = style.percent_length(P::Width).effective_value(available_width, density);
    let height = style.percent_length(P::Height).effective_value(available_height, density);
    let margin_left =
        style.percent_length(P::MarginLeft).effective_value(available_width, density);
    let margin_right =
        style.percent_length(P::MarginRight).effective_value(available_width, density);
    let margin_top =
        style.percent_length(P::MarginTop).effective_value(available_height, density);
    let margin_bottom =
        style.percent_length(P::MarginBottom).effective_value(available_height, density);

    let effective = &mut node.style.effective;
    effective.width = width;
    effective.height = height;
    effective.margin_left = margin_left;
    effective.margin_right = margin_right;
    effective.margin_top = margin_top;
    effective.margin_bottom = margin_bottom;
}

/// Measures a child on the parent's behalf: resolves the child's layout
/// params, derives per-axis child specs and runs the child's measure.
/// Returns the child's measured size plus its margins on each axis, which is
/// the space the child asks of the parent. A collapsed child takes (0, 0).
pub fn measure_child(
    tree: &mut ViewTree,
    parent: ViewId,
    child: ViewId,
    width_spec: MeasureSpec,
    height_spec: MeasureSpec,
) -> (i32, i32) {
    if tree.node(child).is_collapsed() {
        return (0, 0);
    }

    update_child_layout_params(tree, parent, child);

    let (effective, stretched_horizontally, stretched_vertically) = {
        let style = &tree.node(child).style;
        (
            style.effective,
            style.horizontal_alignment() == HorizontalAlignment::Stretch,
            style.vertical_alignment() == VerticalAlignment::Stretch,
        )
    };
    let horizontal_margins = effective.margin_left + effective.margin_right;
    let vertical_margins = effective.margin_top + effective.margin_bottom;

    let child_width_spec = child_measure_spec(
        width_spec.size(),
        width_spec.mode(),
        horizontal_margins,
        effective.width,
        stretched_horizontally,
    );
    let child_height_spec = child_measure_spec(
        height_spec.size(),
        height_spec.mode(),
        vertical_margins,
        effective.height,
        stretched_vertically,
    );
    trace!(
        child = child.0,
        %child_width_spec,
        %child_height_spec,
        "measure_child"
    );

    measure(tree, child, child_width_spec, child_height_spec);

    let node = tree.node(child);
    (
        node.measured_width() + horizontal_margins,
        node.measured_height() + vertical_margins,
    )
}

/// Positions a measured child inside the frame `(left, top, right, bottom)`
/// of its parent, honoring alignment and margins. A stretch alignment paired
/// with an explicitly resolved size degrades to center: the declared size
/// wins over filling the axis. Collapsed children are skipped entirely.
pub fn layout_child(
    tree: &mut ViewTree,
    _parent: ViewId,
    child: ViewId,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
) {
    if tree.node(child).is_collapsed() {
        return;
    }

    let (effective, mut horizontal, mut vertical, measured_width, measured_height) = {
        let node = tree.node(child);
        (
            node.style.effective,
            node.style.horizontal_alignment(),
            node.style.vertical_alignment(),
            node.measured_width(),
            node.measured_height(),
        )
    };

    if effective.width >= 0 && horizontal == HorizontalAlignment::Stretch {
        horizontal = HorizontalAlignment::Center;
    }
    if effective.height >= 0 && vertical == VerticalAlignment::Stretch {
        vertical = VerticalAlignment::Center;
    }

    let mut child_width = measured_width as f32;
    let child_left = match horizontal {
        HorizontalAlignment::Left => (left + effective.margin_left) as f32,
        HorizontalAlignment::Center => {
            left as f32
                + (right - left - measured_width + (effective.margin_left - effective.margin_right))
                    as f32
                    / 2.0
        }
        HorizontalAlignment::Right => (right - measured_width - effective.margin_right) as f32,
        HorizontalAlignment::Stretch => {
            child_width = (right - left - (effective.margin_left + effective.margin_right)) as f32;
            (left + effective.margin_left) as f32
        }
    };

    let mut child_height = measured_height as f32;
    let child_top = match vertical {
        VerticalAlignment::Top => (top + effective.margin_top) as f32,
        VerticalAlignment::Center => {
            top as f32
                + (bottom - top - measured_height + (effective.margin_top - effective.margin_bottom))
                    as f32
                    / 2.0
        }
        VerticalAlignment::Bottom => (bottom - measured_height - effective.margin_bottom) as f32,
        VerticalAlignment::Stretch => {
            child_height = (bottom - top - (effective.margin_top + effective.margin_bottom)) as f32;
            (top + effective.margin_top) as f32
        }
    };

    let child_right = round_half_up(child_left + child_width);
    let child_bottom = round_half_up(child_top + child_height);
    layout(
        tree,
        child,
        round_half_up(child_left),
        round_half_up(child_top),
        child_right,
        child_bottom,
    );
}
