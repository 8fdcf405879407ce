//! # Scroll model
//!
//! A `Scroller` stacks its children like a `VStackPanel` and shifts the
//! whole stack up by its scroll value. Its own render target is the
//! viewport: anything scrolled out of it is cut off when the children are
//! blended in. Input follows the same cut, so a child scrolled out of the
//! viewport no longer reacts to the pointer.
//!
//! The value is moved programmatically (`scroll_to`, `scroll_by`) and always
//! kept within `0..=max_value()`, where the maximum is the stacked content
//! height minus the viewport height. Content shorter than the viewport
//! cannot scroll.

use sweet_core::*;

use crate::stack::{stacked_height, update_stacked};

#[derive(Debug)]
pub struct Scroller {
    pub control: Control,
    pub spacing: i32,
    value: i32,
}

impl Scroller {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            control: Control::new(width, height),
            spacing: 0,
            value: 0,
        }
    }

    pub fn spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn aligned(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.control = self.control.aligned(horizontal, vertical);
        self
    }

    pub fn offset(mut self, horizontal: i32, vertical: i32) -> Self {
        self.control = self.control.offset(horizontal, vertical);
        self
    }

    pub fn with_child(mut self, child: impl Widget + 'static) -> Self {
        self.control = self.control.with_child(child);
        self
    }

    pub fn push(&mut self, child: impl Widget + 'static) {
        self.control.node.add_child(Box::new(child));
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn content_height(&self) -> i32 {
        stacked_height(&self.control.node, self.spacing)
    }

    pub fn max_value(&self) -> i32 {
        (self.content_height() - self.control.node.height).max(0)
    }

    pub fn scroll_to(&mut self, value: i32) {
        self.value = value.clamp(0, self.max_value());
    }

    /// Scrolls by `delta` and returns the part that could not be applied.
    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        let before = self.value;
        self.scroll_to(before.saturating_add(delta));
        delta.saturating_sub(self.value - before)
    }
}

impl Updatable for Scroller {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.control.update_self(cx)?;
        // Content or viewport may have changed size since the last scroll.
        self.scroll_to(self.value);
        update_stacked(&mut self.control.node, cx, -self.value, self.spacing)
    }
}

impl Drawable for Scroller {}

impl Widget for Scroller {
    fn node(&self) -> &ViewNode {
        &self.control.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.control.node
    }
}

impl Positionable for Scroller {
    fn placement(&self) -> &Placement {
        &self.control.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.control.placement
    }
}
