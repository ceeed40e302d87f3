use super::{layout_child, measure_child, ViewBehavior};
use crate::core::measure::{combine_measured_states, resolve_size_and_state, MeasureSpec};
use crate::core::units::Length;
use crate::core::view::{ViewId, ViewTree};

/// A leaf with an intrinsic size in device-independent pixels, standing in
/// for any widget whose content dictates how big it wants to be.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeView {
    pub desired_width: Length,
    pub desired_height: Length,
}

impl FixedSizeView {
    pub fn new(width: f32, height: f32) -> Self {
        Self { desired_width: Length::dip(width), desired_height: Length::dip(height) }
    }
}

impl ViewBehavior for FixedSizeView {
    fn on_measure(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) {
        let density = tree.density();
        let (min_width, min_height) = {
            let effective = &tree.node(id).style.effective;
            (effective.min_width, effective.min_height)
        };
        let desired_width = self.desired_width.effective_value(density).max(min_width);
        let desired_height = self.desired_height.effective_value(density).max(min_height);

        let measured_width = resolve_size_and_state(
            desired_width as f32,
            width_spec.size() as f32,
            width_spec.mode(),
            0,
        );
        let measured_height = resolve_size_and_state(
            desired_height as f32,
            height_spec.size() as f32,
            height_spec.mode(),
            0,
        );
        tree.set_measured_dimension(id, measured_width, measured_height);
    }

    fn on_layout(
        &mut self,
        _tree: &mut ViewTree,
        _id: ViewId,
        _left: i32,
        _top: i32,
        _right: i32,
        _bottom: i32,
    ) {
    }

    fn layout_native_view(
        &mut self,
        _tree: &mut ViewTree,
        _id: ViewId,
        _left: i32,
        _top: i32,
        _right: i32,
        _bottom: i32,
    ) {
    }
}

/// A container that sizes to its largest child plus its own padding and
/// border, then lets every child fill (or align within) the content box.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContainer;

impl ViewBehavior for FrameContainer {
    fn on_measure(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) {
        let mut max_width = 0;
        let mut max_height = 0;
        let mut child_state = 0u32;

        for child in tree.children(id) {
            let (child_width, child_height) =
                measure_child(tree, id, child, width_spec, height_spec);
            max_width = max_width.max(child_width);
            max_height = max_height.max(child_height);
            if !tree.node(child).is_collapsed() {
                child_state =
                    combine_measured_states(child_state, tree.node(child).measured_state());
            }
        }

        let effective = tree.node(id).style.effective;
        let horizontal_inset = effective.padding_left
            + effective.padding_right
            + effective.border_left_width
            + effective.border_right_width;
        let vertical_inset = effective.padding_top
            + effective.padding_bottom
            + effective.border_top_width
            + effective.border_bottom_width;
        let desired_width = (max_width + horizontal_inset).max(effective.min_width);
        let desired_height = (max_height + vertical_inset).max(effective.min_height);

        let measured_width = resolve_size_and_state(
            desired_width as f32,
            width_spec.size() as f32,
            width_spec.mode(),
            child_state,
        );
        let measured_height = resolve_size_and_state(
            desired_height as f32,
            height_spec.size() as f32,
            height_spec.mode(),
            child_state,
        );
        tree.set_measured_dimension(id, measured_width, measured_height);
    }

    fn on_layout(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) {
        let effective = tree.node(id).style.effective;
        // Children are placed in node-local coordinates, inside the
        // padding+border content box.
        let content_left = effective.border_left_width + effective.padding_left;
        let content_top = effective.border_top_width + effective.padding_top;
        let content_right =
            (right - left) - effective.border_right_width - effective.padding_right;
        let content_bottom =
            (bottom - top) - effective.border_bottom_width - effective.padding_bottom;

        for child in tree.children(id) {
            layout_child(tree, id, child, content_left, content_top, content_right, content_bottom);
        }
    }

    fn layout_native_view(
        &mut self,
        _tree: &mut ViewTree,
        _id: ViewId,
        _left: i32,
        _top: i32,
        _right: i32,
        _bottom: i32,
    ) {
    }
}
