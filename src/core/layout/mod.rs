//! The two-pass layout engine: top-down constraint propagation (measure)
//! followed by top-down placement (layout). Passes are driven externally by
//! the host; invalidation only marks nodes, it never re-enters layout.

mod behaviors;
mod engine;

use std::fmt;

use super::measure::MeasureSpec;
use super::view::{ViewId, ViewTree};

pub use behaviors::{FixedSizeView, FrameContainer};
pub use engine::{layout, layout_child, measure, measure_child};

/// Per-kind measurement and placement logic, the one seam each view kind
/// must fill in.
///
/// `on_measure` must call [`ViewTree::set_measured_dimension`] before
/// returning; the engine treats omission as a contract violation and panics.
/// `layout_native_view` applies resolved bounds to the native widget and is
/// invoked only when bounds actually changed.
pub trait ViewBehavior: fmt::Debug {
    fn on_measure(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    );

    fn on_layout(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    );

    fn layout_native_view(
        &mut self,
        tree: &mut ViewTree,
        id: ViewId,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    );
}
