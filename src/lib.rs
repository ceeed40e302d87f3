//! crossview: the box-model layout core and reactive style system of a
//! cross-platform UI toolkit.
//!
//! The crate is headless: it owns the view tree, the style property
//! registry and the two-pass measure/layout engine, and reaches the
//! platform only through two seams, [`core::units::DeviceMetrics`] for
//! display density and [`core::image::ImageLoader`] for background images.
//!
//! A minimal pass looks like this:
//!
//! ```
//! use crossview::{
//!     layout, measure, FixedSizeView, FrameContainer, MeasureMode, MeasureSpec,
//!     StyleProperty, ViewTree,
//! };
//!
//! let mut tree = ViewTree::with_defaults();
//! let root = tree.create_view(Box::new(FrameContainer));
//! let child = tree.create_view(Box::new(FixedSizeView::new(40.0, 20.0)));
//! tree.set_root(root).unwrap();
//! tree.add_child(root, child).unwrap();
//! tree.set_style(child, StyleProperty::Margin, "5").unwrap();
//!
//! measure(
//!     &mut tree,
//!     root,
//!     MeasureSpec::make(100, MeasureMode::Exactly),
//!     MeasureSpec::make(100, MeasureMode::Exactly),
//! );
//! layout(&mut tree, root, 0, 0, 100, 100);
//! assert_eq!(tree.node(root).bounds().width(), 100);
//! ```

use thiserror::Error;

pub mod core;

/// Umbrella error for hosts that funnel every toolkit failure into one type.
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error(transparent)]
    View(#[from] crate::core::view::ViewError),
    #[error(transparent)]
    Style(#[from] crate::core::style::StyleError),
    #[error(transparent)]
    Image(#[from] crate::core::image::ImageError),
    #[error(transparent)]
    Parse(#[from] crate::core::units::ParseError),
}

pub use crate::core::image::{
    HeadlessImageLoader, ImageError, ImageHandle, ImageLoader, RequestToken,
};
pub use crate::core::layout::{
    layout, layout_child, measure, measure_child, FixedSizeView, FrameContainer, ViewBehavior,
};
pub use crate::core::measure::{
    child_measure_spec, combine_measured_states, resolve_size_and_state, MeasureMode, MeasureSpec,
};
pub use crate::core::style::{
    Background, Color, Font, FontStyle, FontWeight, HorizontalAlignment, StyleError,
    StyleProperty, StyleValue, VerticalAlignment, Visibility,
};
pub use crate::core::units::{
    DeviceMetrics, FixedDensity, Length, LengthUnit, ParseError, PercentLength, PercentUnit,
};
pub use crate::core::view::{Bounds, LayoutState, ViewError, ViewId, ViewNode, ViewTree};
