use sweet_core::*;

/// Lays its children out top to bottom. Each child gets a slot as wide as
/// the panel and as tall as itself, so its horizontal alignment still
/// applies while its vertical position comes from the stack.
#[derive(Debug)]
pub struct VStackPanel {
    pub control: Control,
    pub spacing: i32,
}

impl VStackPanel {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            control: Control::new(width, height),
            spacing: 0,
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

    /// Height of all children stacked, spacing included.
    pub fn content_height(&self) -> i32 {
        stacked_height(&self.control.node, self.spacing)
    }
}

pub(crate) fn stacked_height(node: &ViewNode, spacing: i32) -> i32 {
    let children = node.children();
    let heights: i32 = children.iter().map(|c| c.node().height.max(0)).sum();
    let gaps = spacing * (children.len() as i32 - 1).max(0);
    heights + gaps
}

/// Pushes consecutive slots starting at `start` down the panel.
pub(crate) fn update_stacked(
    node: &mut ViewNode,
    cx: &mut UpdateContext<'_>,
    start: i32,
    spacing: i32,
) -> Result<()> {
    let width = node.width;
    let mut cursor = start;
    node.update_children_in(cx, |child| {
        let height = child.height.max(0);
        let slot = Rect::new(0, cursor, width, height);
        cursor += height + spacing;
        slot
    })
}

impl Updatable for VStackPanel {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.control.update_self(cx)?;
        update_stacked(&mut self.control.node, cx, 0, self.spacing)
    }
}

impl Drawable for VStackPanel {}

impl Widget for VStackPanel {
    fn node(&self) -> &ViewNode {
        &self.control.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.control.node
    }
}

impl Positionable for VStackPanel {
    fn placement(&self) -> &Placement {
        &self.control.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.control.placement
    }
}
