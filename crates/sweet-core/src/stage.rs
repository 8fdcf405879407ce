use crate::compositor;
use crate::error::Result;
use crate::input::InputState;
use crate::render_api::RenderBackend;
use crate::view::{UpdateContext, Widget};
use crate::{Point, Rect, Size};

/// Owns the root of a view tree and drives its update and draw passes.
pub struct Stage {
    root: Box<dyn Widget>,
}

impl Stage {
    pub fn new(root: impl Widget + 'static) -> Self {
        Self {
            root: Box::new(root),
        }
    }

    pub fn from_boxed(root: Box<dyn Widget>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &dyn Widget {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut dyn Widget {
        self.root.as_mut()
    }

    /// Pushes the screen size into the root and runs one top-down update,
    /// clipped to the screen.
    pub fn update(
        &mut self,
        backend: &mut dyn RenderBackend,
        input: &InputState,
        screen: Size,
    ) -> Result<()> {
        self.root.node_mut().set_parent_size(screen);
        let mut cx = UpdateContext::new(backend, input)
            .clipped_to(Rect::from_origin_size(Point::ORIGIN, screen));
        self.root.update(&mut cx)
    }

    /// Composes the whole tree onto the currently active target.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        compositor::draw(self.root.as_mut(), backend)
    }

    /// Releases every render target in the tree.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        log::debug!("releasing view tree");
        self.root.node_mut().release(backend);
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("root", self.root.node())
            .finish()
    }
}
