use crate::error::{Result, ViewError};
use crate::view::{Drawable, Positionable, UpdateContext, Updatable, ViewNode, Widget};
use crate::{HorizontalAlignment, Placement, Point, VerticalAlignment};

/// A view that aligns itself inside the area its owner pushes, every tick.
#[derive(Debug)]
pub struct Control {
    pub node: ViewNode,
    pub placement: Placement,
}

impl Control {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            node: ViewNode::new(width, height),
            placement: Placement::default(),
        }
    }

    pub fn from_node(node: ViewNode) -> Self {
        Self {
            node,
            placement: Placement::default(),
        }
    }

    pub fn aligned(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.placement.horizontal = horizontal;
        self.placement.vertical = vertical;
        self
    }

    pub fn offset(mut self, horizontal: i32, vertical: i32) -> Self {
        self.placement.horizontal_offset = horizontal;
        self.placement.vertical_offset = vertical;
        self
    }

    pub fn with_child(mut self, child: impl Widget + 'static) -> Self {
        self.node = self.node.with_child(child);
        self
    }

    /// Buffer maintenance, then alignment against the pushed parent area.
    /// Children are not touched.
    pub fn update_self(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.node.sync_target(cx)?;
        self.place()?;
        Ok(())
    }

    /// Recomputes `(x, y)` from the placement and the pushed parent area.
    pub fn place(&mut self) -> Result<Point> {
        let Some(area) = self.node.parent_area() else {
            debug_assert!(false, "control updated before its owner pushed a parent size");
            return Err(ViewError::MissingParentSize);
        };
        let at = self
            .placement
            .resolve(area.size(), self.node.size())
            .offset(area.origin());
        self.node.x = at.x;
        self.node.y = at.y;
        Ok(at)
    }
}

impl Updatable for Control {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.update_self(cx)?;
        self.node.update_children(cx)
    }
}

impl Drawable for Control {}

impl Widget for Control {
    fn node(&self) -> &ViewNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}

impl Positionable for Control {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}
