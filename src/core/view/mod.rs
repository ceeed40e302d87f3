use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{trace, warn};

use super::image::{
    self, HeadlessImageLoader, ImageError, ImageHandle, ImageLoader, RequestToken,
};
use super::layout::ViewBehavior;
use super::measure::{
    MeasureSpec, MEASURED_HEIGHT_STATE_SHIFT, MEASURED_SIZE_MASK, MEASURED_STATE_MASK,
};
use super::style::registry::{self, PropertyKind, StyleProperty, StyleValue};
use super::style::snapshot::{StyleSnapshot, ValueSource};
use super::style::{StyleError, Visibility};
use super::units::{DeviceMetrics, FixedDensity};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("unknown view id: {0:?}")]
    NotFound(ViewId),
    #[error("view {0:?} is already attached to a parent")]
    AlreadyAttached(ViewId),
    #[error("view {0:?} is not a child of {1:?}")]
    NotAChild(ViewId, ViewId),
    #[error(transparent)]
    Style(#[from] StyleError),
}

pub type Result<T> = std::result::Result<T, ViewError>;

/// Handle to a node in a [`ViewTree`]. Ids are never reused within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Layout lifecycle of a node. Invalidation moves a node (and its ancestors)
/// back to `Unmeasured`; only an external measure+layout pass moves it
/// forward again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Unmeasured,
    Measuring,
    Measured,
    LayingOut,
    LaidOut,
}

/// A layout rectangle, edges in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One node of the view tree: an owned style snapshot, layout caches and the
/// behavior object implementing this view kind's measurement and layout.
#[derive(Debug)]
pub struct ViewNode {
    id: ViewId,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: SmallVec<[ViewId; 8]>,
    pub style: StyleSnapshot,
    pub(crate) behavior: Option<Box<dyn ViewBehavior>>,
    pub(crate) width_spec: MeasureSpec,
    pub(crate) height_spec: MeasureSpec,
    measured_width: u32,
    measured_height: u32,
    pub(crate) measured_set: bool,
    bounds: Bounds,
    pub(crate) layout_state: LayoutState,
    is_layout_valid: bool,
    pub(crate) pending_image_token: Option<RequestToken>,
}

impl ViewNode {
    fn new(id: ViewId, behavior: Box<dyn ViewBehavior>) -> Self {
        Self {
            id,
            parent: None,
            children: SmallVec::new(),
            style: StyleSnapshot::new(),
            behavior: Some(behavior),
            width_spec: MeasureSpec::unspecified(),
            height_spec: MeasureSpec::unspecified(),
            measured_width: 0,
            measured_height: 0,
            measured_set: false,
            bounds: Bounds::default(),
            layout_state: LayoutState::Unmeasured,
            is_layout_valid: false,
            pending_image_token: None,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn layout_state(&self) -> LayoutState {
        self.layout_state
    }

    pub fn is_layout_valid(&self) -> bool {
        self.is_layout_valid
    }

    pub fn is_collapsed(&self) -> bool {
        self.style.visibility() == Visibility::Collapse
    }

    /// Measured width with the state byte masked off.
    pub fn measured_width(&self) -> i32 {
        assert!(self.measured_set, "measured width read before on_measure set it");
        (self.measured_width & MEASURED_SIZE_MASK) as i32
    }

    pub fn measured_height(&self) -> i32 {
        assert!(self.measured_set, "measured height read before on_measure set it");
        (self.measured_height & MEASURED_SIZE_MASK) as i32
    }

    /// Combined state bits of both measured dimensions, for propagation to
    /// the parent's own `resolve_size_and_state`.
    pub fn measured_state(&self) -> u32 {
        (self.measured_width & MEASURED_STATE_MASK)
            | ((self.measured_height >> MEASURED_HEIGHT_STATE_SHIFT)
                & (MEASURED_STATE_MASK >> MEASURED_HEIGHT_STATE_SHIFT))
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn set_current_measure_specs(
        &mut self,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> bool {
        let changed = self.width_spec != width_spec || self.height_spec != height_spec;
        self.width_spec = width_spec;
        self.height_spec = height_spec;
        changed
    }

    /// Stores new bounds, returning (bounds_changed, size_changed). The old
    /// bounds exist only for this comparison; resolution never reuses them.
    pub(crate) fn set_current_layout_bounds(&mut self, bounds: Bounds) -> (bool, bool) {
        self.is_layout_valid = true;
        let old = self.bounds;
        let bounds_changed = old != bounds;
        let size_changed =
            old.width() != bounds.width() || old.height() != bounds.height();
        self.bounds = bounds;
        (bounds_changed, size_changed)
    }

    pub(crate) fn set_measured_dimension(&mut self, measured_width: u32, measured_height: u32) {
        self.measured_width = measured_width;
        self.measured_height = measured_height;
        self.measured_set = true;
        trace!(
            view = self.id.0,
            measured_width,
            measured_height,
            "set_measured_dimension"
        );
    }

    fn invalidate(&mut self) {
        self.is_layout_valid = false;
        self.layout_state = LayoutState::Unmeasured;
        self.measured_set = false;
    }
}

/// The view tree: owns every node, the device-metrics collaborator and the
/// image-loading collaborator. All operations are synchronous on the owning
/// thread; the only asynchronous edge is background-image completion, which
/// re-enters through [`ViewTree::complete_background_image`].
pub struct ViewTree {
    nodes: HashMap<ViewId, ViewNode>,
    next_id: u64,
    next_token: u64,
    root: Option<ViewId>,
    metrics: Box<dyn DeviceMetrics>,
    loader: Box<dyn ImageLoader>,
}

impl ViewTree {
    pub fn new(metrics: Box<dyn DeviceMetrics>, loader: Box<dyn ImageLoader>) -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
            next_token: 0,
            root: None,
            metrics,
            loader,
        }
    }

    /// Density-1 metrics and a headless image loader.
    pub fn with_defaults() -> Self {
        Self::new(Box::new(FixedDensity::default()), Box::new(HeadlessImageLoader::new()))
    }

    pub fn density(&self) -> f32 {
        self.metrics.display_density()
    }

    pub fn create_view(&mut self, behavior: Box<dyn ViewBehavior>) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.nodes.insert(id, ViewNode::new(id, behavior));
        id
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, id: ViewId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(ViewError::NotFound(id));
        }
        self.root = Some(id);
        Ok(())
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    /// Panics on a stale id: handles outliving their node is a structural
    /// defect in the host, not a runtime condition.
    pub fn node(&self, id: ViewId) -> &ViewNode {
        match self.nodes.get(&id) {
            Some(node) => node,
            None => panic!("unknown view id: {id:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> &mut ViewNode {
        match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => panic!("unknown view id: {id:?}"),
        }
    }

    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        let index = self
            .nodes
            .get(&parent)
            .ok_or(ViewError::NotFound(parent))?
            .children
            .len();
        self.insert_child(parent, child, index)
    }

    pub fn insert_child(&mut self, parent: ViewId, child: ViewId, index: usize) -> Result<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(ViewError::NotFound(parent));
        }
        let child_node = self.nodes.get_mut(&child).ok_or(ViewError::NotFound(child))?;
        if child_node.parent.is_some() {
            return Err(ViewError::AlreadyAttached(child));
        }
        child_node.parent = Some(parent);
        self.node_mut(parent).children.insert(index, child);

        self.refresh_inherited_from_parent(child);
        self.request_layout(parent);
        Ok(())
    }

    /// Detaches `child` and destroys its whole subtree. The parent link is
    /// lookup-only; ownership flows strictly parent to child, so removal
    /// releases the snapshot and derived caches of every node underneath.
    pub fn remove_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(ViewError::NotAChild(child, parent))?;
        self.node_mut(parent).children.remove(position);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children.iter().copied());
            }
        }
        if self.root == Some(child) {
            self.root = None;
        }
        self.request_layout(parent);
        Ok(())
    }

    pub fn children(&self, id: ViewId) -> SmallVec<[ViewId; 8]> {
        self.node(id).children.clone()
    }

    /// Marks the node and every ancestor as needing a fresh measure+layout.
    /// Honored on the next external pass; nothing re-enters layout from here.
    pub fn request_layout(&mut self, id: ViewId) {
        let mut current = Some(id);
        while let Some(view) = current {
            let node = self.node_mut(view);
            node.invalidate();
            current = node.parent;
        }
    }

    /// Writes a style property from raw text: convert, compare, store, run
    /// the change effect, invalidate. Fails before touching the snapshot.
    pub fn set_style(&mut self, id: ViewId, property: StyleProperty, raw: &str) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(ViewError::NotFound(id));
        }
        if property.is_shorthand() {
            // All longhand values are converted and validated up front so the
            // expansion applies atomically or not at all.
            let expansion =
                registry::expand_shorthand(property, raw).map_err(ViewError::Style)?;
            for (longhand, value) in expansion {
                self.apply_value(id, longhand, value, ValueSource::Local);
            }
            Ok(())
        } else {
            let value = property.convert(raw).map_err(ViewError::Style)?;
            self.apply_value(id, property, value, ValueSource::Local);
            Ok(())
        }
    }

    /// Typed write path; domain validation still applies.
    pub fn set_style_value(
        &mut self,
        id: ViewId,
        property: StyleProperty,
        value: StyleValue,
    ) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(ViewError::NotFound(id));
        }
        if property.is_shorthand() {
            return Err(StyleError::validation(
                property.name(),
                "shorthand properties take textual input",
                value,
            )
            .into());
        }
        registry::validate_type(property, &value).map_err(ViewError::Style)?;
        registry::validate_value(property, &value).map_err(ViewError::Style)?;
        self.apply_value(id, property, value, ValueSource::Local);
        Ok(())
    }

    /// Current value of a property as its canonical string; shorthands
    /// recompose from their longhands.
    pub fn style_string(&self, id: ViewId, property: StyleProperty) -> String {
        registry::compose_shorthand(property, &self.node(id).style)
    }

    pub fn style_value(&self, id: ViewId, property: StyleProperty) -> StyleValue {
        self.node(id).style.value(property)
    }

    fn apply_value(
        &mut self,
        id: ViewId,
        property: StyleProperty,
        value: StyleValue,
        source: ValueSource,
    ) {
        let node = self.node_mut(id);
        let changed = node.style.store(property, value.clone(), source);
        if !changed {
            return;
        }

        self.run_change_effect(id, property, &value);

        if property.affects_layout() {
            self.request_layout(id);
        }

        if property.kind() == PropertyKind::InheritedCss {
            self.push_inherited(id, property, &value);
        }
    }

    /// Eager inheritance: the resolved value is pushed down immediately,
    /// stopping wherever a local override shadows it.
    fn push_inherited(&mut self, id: ViewId, property: StyleProperty, value: &StyleValue) {
        let children = self.children(id);
        for child in children {
            if self.node(child).style.has_local_value(property) {
                continue;
            }
            self.apply_value(child, property, value.clone(), ValueSource::Inherited);
        }
    }

    /// Applies the parent chain's current inherited values to a freshly
    /// attached node (and transitively, via push, to its subtree).
    fn refresh_inherited_from_parent(&mut self, child: ViewId) {
        let parent = match self.node(child).parent {
            Some(parent) => parent,
            None => return,
        };
        for property in StyleProperty::ALL {
            if !property.is_inherited() {
                continue;
            }
            if self.node(child).style.has_local_value(property) {
                continue;
            }
            if self.node(parent).style.source(property) == ValueSource::Default {
                continue;
            }
            let inherited = self.node(parent).style.value(property);
            self.apply_value(child, property, inherited, ValueSource::Inherited);
        }
    }

    /// The change hooks of the property registry, as one static dispatch.
    /// Derived caches are replaced with new immutable values, never patched.
    fn run_change_effect(&mut self, id: ViewId, property: StyleProperty, value: &StyleValue) {
        use StyleProperty as P;

        let density = self.density();
        match property {
            P::MinWidth => {
                let node = self.node_mut(id);
                node.style.effective.min_width =
                    node.style.length(P::MinWidth).effective_value(density);
            }
            P::MinHeight => {
                let node = self.node_mut(id);
                node.style.effective.min_height =
                    node.style.length(P::MinHeight).effective_value(density);
            }
            P::PaddingLeft | P::PaddingTop | P::PaddingRight | P::PaddingBottom => {
                let node = self.node_mut(id);
                let effective = node.style.length(property).effective_value(density);
                match property {
                    P::PaddingLeft => node.style.effective.padding_left = effective,
                    P::PaddingTop => node.style.effective.padding_top = effective,
                    P::PaddingRight => node.style.effective.padding_right = effective,
                    _ => node.style.effective.padding_bottom = effective,
                }
            }
            P::BorderTopWidth | P::BorderRightWidth | P::BorderBottomWidth
            | P::BorderLeftWidth => {
                let node = self.node_mut(id);
                let effective = node.style.length(property).effective_value(density);
                let background = &node.style.background;
                node.style.background = match property {
                    P::BorderTopWidth => {
                        node.style.effective.border_top_width = effective;
                        background.with_border_top_width(effective)
                    }
                    P::BorderRightWidth => {
                        node.style.effective.border_right_width = effective;
                        background.with_border_right_width(effective)
                    }
                    P::BorderBottomWidth => {
                        node.style.effective.border_bottom_width = effective;
                        background.with_border_bottom_width(effective)
                    }
                    _ => {
                        node.style.effective.border_left_width = effective;
                        background.with_border_left_width(effective)
                    }
                };
            }
            P::BorderTopLeftRadius | P::BorderTopRightRadius | P::BorderBottomRightRadius
            | P::BorderBottomLeftRadius => {
                let node = self.node_mut(id);
                let radius = value.as_number().unwrap_or_default();
                let background = &node.style.background;
                node.style.background = match property {
                    P::BorderTopLeftRadius => background.with_border_top_left_radius(radius),
                    P::BorderTopRightRadius => background.with_border_top_right_radius(radius),
                    P::BorderBottomRightRadius => {
                        background.with_border_bottom_right_radius(radius)
                    }
                    _ => background.with_border_bottom_left_radius(radius),
                };
            }
            P::BorderTopColor | P::BorderRightColor | P::BorderBottomColor
            | P::BorderLeftColor => {
                let node = self.node_mut(id);
                let color = value.as_color();
                let background = &node.style.background;
                node.style.background = match property {
                    P::BorderTopColor => background.with_border_top_color(color),
                    P::BorderRightColor => background.with_border_right_color(color),
                    P::BorderBottomColor => background.with_border_bottom_color(color),
                    _ => background.with_border_left_color(color),
                };
            }
            P::BackgroundColor => {
                let node = self.node_mut(id);
                node.style.background = node.style.background.with_color(value.as_color());
            }
            P::BackgroundRepeat => {
                let node = self.node_mut(id);
                let repeat = value.as_str().map(str::to_string);
                node.style.background = node.style.background.with_repeat(repeat);
            }
            P::BackgroundSize => {
                let node = self.node_mut(id);
                let size = value.as_str().map(str::to_string);
                node.style.background = node.style.background.with_size(size);
            }
            P::BackgroundPosition => {
                let node = self.node_mut(id);
                let position = value.as_str().map(str::to_string);
                node.style.background = node.style.background.with_position(position);
            }
            P::ClipPath => {
                let node = self.node_mut(id);
                let clip = value.as_str().map(str::to_string);
                node.style.background = node.style.background.with_clip_path(clip);
            }
            P::BackgroundImage => self.apply_background_image(id, value),
            P::FontFamily => {
                let node = self.node_mut(id);
                let family = value.as_str().map(str::to_string);
                node.style.font = node.style.font.with_family(family);
            }
            P::FontSize => {
                let node = self.node_mut(id);
                let size = value.as_number().unwrap_or_default();
                node.style.font = node.style.font.with_size(size);
            }
            P::FontStyle => {
                if let StyleValue::FontStyle(style) = value {
                    let node = self.node_mut(id);
                    node.style.font = node.style.font.with_style(*style);
                }
            }
            P::FontWeight => {
                if let StyleValue::FontWeight(weight) = value {
                    let node = self.node_mut(id);
                    node.style.font = node.style.font.with_weight(*weight);
                }
            }
            // Width/height/margins resolve against the parent constraint
            // during the measure pass; alignment, visibility, opacity,
            // transform components and z-index carry no derived cache.
            _ => {}
        }
    }

    fn apply_background_image(&mut self, id: ViewId, value: &StyleValue) {
        let raw = match value.as_str() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                let node = self.node_mut(id);
                node.pending_image_token = None;
                node.style.background = node.style.background.with_image(None);
                return;
            }
        };
        let url = image::unwrap_css_url(&raw).to_string();

        if image::is_data_uri(&url) {
            let loaded = match url.split_once(',') {
                Some((_, data)) => self.loader.load_from_base64(data),
                None => Err(ImageError::Decode("data URI without payload".into())),
            };
            self.store_loaded_image(id, loaded);
        } else if image::is_file_or_resource_path(&url) {
            let loaded = self.loader.load_from_file_or_resource(&url);
            self.store_loaded_image(id, loaded);
        } else if url.starts_with("http") {
            // Asynchronous: clear the slot, stamp the request, let the host
            // complete it later. The token guards against stale completions.
            self.next_token += 1;
            let token = RequestToken(self.next_token);
            self.node_mut(id).pending_image_token = Some(token);
            let node = self.node_mut(id);
            node.style.background = node.style.background.with_image(None);
            self.loader.load_from_url(&url, token);
        } else {
            let node = self.node_mut(id);
            node.style.background = node.style.background.with_image(None);
        }
    }

    fn store_loaded_image(&mut self, id: ViewId, loaded: image::Result<ImageHandle>) {
        let node = self.node_mut(id);
        node.pending_image_token = None;
        match loaded {
            Ok(handle) => {
                node.style.background = node.style.background.with_image(Some(handle));
            }
            Err(error) => {
                // Load failure is not a tree error: the slot just goes empty.
                warn!(view = id.0, %error, "background image load failed");
                node.style.background = node.style.background.with_image(None);
            }
        }
    }

    /// The token of the node's in-flight background-image request, if any.
    pub fn pending_background_image(&self, id: ViewId) -> Option<RequestToken> {
        self.node(id).pending_image_token
    }

    /// Delivers the result of an asynchronous URL load. Applied only when
    /// `token` still matches the node's last issued request; anything else
    /// is a stale response and is discarded.
    pub fn complete_background_image(
        &mut self,
        id: ViewId,
        token: RequestToken,
        result: image::Result<ImageHandle>,
    ) {
        let node = match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => return,
        };
        if node.pending_image_token != Some(token) {
            trace!(view = id.0, ?token, "discarding stale background image response");
            return;
        }
        self.store_loaded_image(id, result);
    }

    /// Records a measured dimension for a node; every `on_measure` override
    /// must end up here.
    pub fn set_measured_dimension(&mut self, id: ViewId, measured_width: u32, measured_height: u32) {
        self.node_mut(id).set_measured_dimension(measured_width, measured_height);
    }
}

impl std::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
