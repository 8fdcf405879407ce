use std::fmt;

use crate::error::{Result, ViewError};
use crate::input::InputState;
use crate::render_api::{BlendMode, RenderBackend, TargetId};
use crate::{Color, Placement, Point, Rect, Size, clamp_alpha};

/// Runs after a node's content and children are rendered, while the node's
/// own target is still active. Used for overlays.
pub type RenderObserver = Box<dyn FnMut(&mut dyn RenderBackend)>;

/// Everything an update pass needs besides the tree itself.
pub struct UpdateContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub input: &'a InputState,
    scope: Scope,
}

/// What the ancestors of the node being updated impose on it.
#[derive(Clone, Copy, Debug)]
struct Scope {
    origin: Point,
    /// Screen area the ancestors' targets leave visible. `None` is unbounded.
    clip: Option<Rect>,
    /// Every ancestor is visible.
    shown: bool,
    /// Every ancestor is drawable, so the node can reach the screen at all.
    composited: bool,
}

impl<'a> UpdateContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend, input: &'a InputState) -> Self {
        Self {
            backend,
            input,
            scope: Scope {
                origin: Point::ORIGIN,
                clip: None,
                shown: true,
                composited: true,
            },
        }
    }

    /// Limits everything below to `clip`, in screen space.
    pub fn clipped_to(mut self, clip: Rect) -> Self {
        self.scope.clip = Some(clip);
        self
    }

    /// Screen-space origin of the parent of the node being updated.
    pub fn origin(&self) -> Point {
        self.scope.origin
    }

    pub fn clip(&self) -> Option<Rect> {
        self.scope.clip
    }

    /// Whether the node being updated sits under drawable ancestors only.
    /// Descendants of a group never reach the screen.
    pub fn is_composited(&self) -> bool {
        self.scope.composited
    }

    /// The part of `node` that actually shows on screen, in screen space.
    /// `None` when the node or an ancestor is hidden, when it sits under a
    /// group, or when the ancestors' targets cut it off entirely.
    pub fn visible_bounds(&self, node: &ViewNode) -> Option<Rect> {
        let scope = &self.scope;
        if !(scope.shown && scope.composited && node.visible && node.drawable) {
            return None;
        }
        let bounds = Rect::from_origin_size(scope.origin.offset(node.position()), node.size());
        let visible = scope.clip.map_or(bounds, |clip| clip.intersect(bounds));
        (!visible.is_empty()).then_some(visible)
    }
}

/// Per-tick recomputation: buffers, layout, input reactions.
pub trait Updatable {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()>;
}

/// Widget-specific painting on top of the node's background.
///
/// Called with the node's own target active and blending off. Whatever is
/// drawn here sits under the children.
pub trait Drawable {
    fn draw_content(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        let _ = backend;
        Ok(())
    }
}

pub trait HasChildren {
    fn children(&self) -> &[Box<dyn Widget>];

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>];

    fn add_child(&mut self, child: Box<dyn Widget>);

    /// Detaches the child at `index`, releasing its render targets.
    fn remove_child(&mut self, index: usize, backend: &mut dyn RenderBackend) -> bool;
}

/// Controls that place themselves inside the area their owner pushes.
pub trait Positionable {
    fn placement(&self) -> &Placement;

    fn placement_mut(&mut self) -> &mut Placement;
}

pub trait Widget: Updatable + Drawable {
    fn node(&self) -> &ViewNode;

    fn node_mut(&mut self) -> &mut ViewNode;
}

/// A node of the view tree, rendered privately into its own off-screen
/// target and blended onto its parent.
pub struct ViewNode {
    pub width: i32,
    pub height: i32,
    /// Top-left corner in the parent's coordinate space.
    pub x: i32,
    pub y: i32,
    pub alpha: u8,
    pub background_alpha: u8,
    /// `None` skips the background fill entirely.
    pub background_color: Option<Color>,
    /// `<= 0` fills a sharp rectangle.
    pub corner_radius: f32,
    pub visible: bool,
    /// Blend onto the parent as premultiplied alpha instead of straight alpha.
    /// Parents force this on every child they compose.
    pub premultiplied: bool,

    drawable: bool,
    target: Option<TargetId>,
    allocated: Option<Size>,
    parent_area: Option<Rect>,
    children: Vec<Box<dyn Widget>>,
    observers: Vec<RenderObserver>,
}

impl ViewNode {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            alpha: 255,
            background_alpha: 255,
            background_color: Some(Color::WHITE),
            corner_radius: 8.0,
            visible: true,
            premultiplied: false,
            drawable: true,
            target: None,
            allocated: None,
            parent_area: None,
            children: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// A structural node: updated and laid out like any other, but never
    /// composited (nor are its children).
    pub fn group(width: i32, height: i32) -> Self {
        let mut node = Self::new(width, height);
        node.drawable = false;
        node.background_color = None;
        node
    }

    pub fn with_background(mut self, color: Option<Color>, alpha: u8) -> Self {
        self.background_color = color;
        self.background_alpha = alpha;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_child(mut self, child: impl Widget + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    pub fn set_alpha_clamped(&mut self, alpha: i32) {
        self.alpha = clamp_alpha(alpha);
    }

    pub fn set_background_alpha_clamped(&mut self, alpha: i32) {
        self.background_alpha = clamp_alpha(alpha);
    }

    pub fn is_drawable(&self) -> bool {
        self.drawable
    }

    pub fn blend_mode(&self) -> BlendMode {
        if self.premultiplied {
            BlendMode::PremultipliedAlpha
        } else {
            BlendMode::Alpha
        }
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    /// Size the current target was allocated for, once an update has run.
    pub fn allocated_size(&self) -> Option<Size> {
        self.allocated
    }

    /// Pushes the owner's area; positioned controls align inside it.
    pub fn set_parent_area(&mut self, area: Rect) {
        self.parent_area = Some(area);
    }

    pub fn set_parent_size(&mut self, size: Size) {
        self.set_parent_area(Rect::from_origin_size(Point::ORIGIN, size));
    }

    pub fn parent_area(&self) -> Option<Rect> {
        self.parent_area
    }

    pub fn on_rendering(&mut self, observer: impl FnMut(&mut dyn RenderBackend) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn observers_mut(&mut self) -> &mut [RenderObserver] {
        &mut self.observers
    }

    /// Reallocates the render target if the size changed since the last
    /// allocation. Returns whether anything was reallocated.
    ///
    /// Empty sizes drop the target and allocate nothing, as do structural
    /// (non-drawable) nodes and anything below one. If allocation fails the
    /// node stays unallocated and the next update tries again.
    pub fn sync_target(&mut self, cx: &mut UpdateContext<'_>) -> Result<bool> {
        let composited = cx.scope.composited;
        let backend = &mut *cx.backend;
        let size = self.size();
        if self.allocated == Some(size) {
            return Ok(false);
        }

        log::debug!("view size changed {:?} -> {:?}", self.allocated, size);
        if let Some(old) = self.target.take() {
            backend.destroy_offscreen_target(old);
            log::trace!("released target {old:?}");
        }
        self.allocated = None;

        if self.drawable && composited && !size.is_empty() {
            let id = backend.create_offscreen_target(size)?;
            log::trace!("allocated target {id:?} ({}x{})", size.width, size.height);
            self.target = Some(id);
        }
        self.allocated = Some(size);
        Ok(true)
    }

    /// The target to draw into, provided it matches the current size.
    pub(crate) fn current_target(&self) -> Result<TargetId> {
        match (self.target, self.allocated) {
            (Some(target), Some(allocated)) if allocated == self.size() => Ok(target),
            _ => {
                debug_assert!(
                    false,
                    "drawing a {:?} view whose target is {:?}; update before drawing",
                    self.size(),
                    self.allocated
                );
                Err(ViewError::StaleTarget {
                    expected: self.size(),
                    allocated: self.allocated,
                })
            }
        }
    }

    /// Updates every child inside the whole area of this node.
    pub fn update_children(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        let area = Rect::from_origin_size(Point::ORIGIN, self.size());
        self.update_children_in(cx, |_| area)
    }

    /// Updates every child in insertion order, first pushing the area
    /// `area_for` assigns it. Children see this node's screen position as
    /// their origin, and are clipped to this node's target.
    pub fn update_children_in(
        &mut self,
        cx: &mut UpdateContext<'_>,
        mut area_for: impl FnMut(&ViewNode) -> Rect,
    ) -> Result<()> {
        let outer = cx.scope;
        let origin = outer.origin.offset(self.position());
        cx.scope.origin = origin;
        if self.drawable {
            let own = Rect::from_origin_size(origin, self.size());
            cx.scope.clip = Some(outer.clip.map_or(own, |clip| clip.intersect(own)));
        }
        cx.scope.shown &= self.visible;
        cx.scope.composited &= self.drawable;

        let mut result = Ok(());
        for child in &mut self.children {
            let area = area_for(child.node());
            child.node_mut().set_parent_area(area);
            result = child.update(cx);
            if result.is_err() {
                break;
            }
        }

        cx.scope = outer;
        result
    }

    /// Releases this node's target and, first, every descendant's.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        for child in &mut self.children {
            child.node_mut().release(backend);
        }
        if let Some(target) = self.target.take() {
            backend.destroy_offscreen_target(target);
            log::trace!("released target {target:?} on dispose");
        }
        self.allocated = None;
    }
}

impl Drop for ViewNode {
    fn drop(&mut self) {
        if let Some(target) = self.target {
            log::warn!("view dropped with live render target {target:?}; release() was not called");
        }
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("bounds", &self.bounds())
            .field("alpha", &self.alpha)
            .field("background_color", &self.background_color)
            .field("background_alpha", &self.background_alpha)
            .field("corner_radius", &self.corner_radius)
            .field("visible", &self.visible)
            .field("premultiplied", &self.premultiplied)
            .field("drawable", &self.drawable)
            .field("target", &self.target)
            .field("children", &self.children.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl HasChildren for ViewNode {
    fn children(&self) -> &[Box<dyn Widget>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn Widget>) {
        self.children.push(child);
    }

    fn remove_child(&mut self, index: usize, backend: &mut dyn RenderBackend) -> bool {
        if index >= self.children.len() {
            return false;
        }
        let mut child = self.children.remove(index);
        child.node_mut().release(backend);
        true
    }
}

impl Updatable for ViewNode {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.sync_target(cx)?;
        self.update_children(cx)
    }
}

impl Drawable for ViewNode {}

impl Widget for ViewNode {
    fn node(&self) -> &ViewNode {
        self
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        self
    }
}
