//! The capability interface the core draws through.
//!
//! A backend is a single fixed-function, immediate-mode renderer with one
//! "active" draw target at a time. Views never rasterize anything themselves:
//! they select targets, fill rectangles and blend finished targets onto each
//! other.

use crate::{Color, Point, Rect, Size};

slotmap::new_key_type! {
    /// Opaque handle to an off-screen render target owned by a backend.
    pub struct TargetId;
}

/// Where draw calls currently land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawTarget {
    /// The back buffer that `present` flips to the screen.
    Screen,
    Offscreen(TargetId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source replaces destination; alpha is ignored.
    #[default]
    NoBlend,
    /// Straight alpha: the source is scaled by its alpha before blending.
    Alpha,
    /// Premultiplied alpha: the source already carries its opacity.
    PremultipliedAlpha,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to create a {width}x{height} off-screen target")]
    TargetCreation { width: i32, height: i32 },

    #[error("unknown render target {0:?}")]
    UnknownTarget(TargetId),
}

pub trait RenderBackend {
    /// Allocates an off-screen target. Callers only ask for non-empty sizes.
    fn create_offscreen_target(&mut self, size: Size) -> Result<TargetId, BackendError>;

    fn destroy_offscreen_target(&mut self, target: TargetId);

    /// Makes `target` the active draw target and returns the previous one.
    fn set_active_target(&mut self, target: DrawTarget) -> DrawTarget;

    /// Clears the active target to fully transparent.
    fn clear_active_target(&mut self);

    /// Sets the blend mode used by subsequent fills.
    fn set_blend_mode(&mut self, mode: BlendMode, alpha: u8);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_rounded_rect(&mut self, rect: Rect, radius_x: f32, radius_y: f32, color: Color);

    /// Composites `target` onto the active target with its top-left at `at`.
    fn blend_target(&mut self, target: TargetId, at: Point, mode: BlendMode, alpha: u8);

    /// Flips the screen target.
    fn present(&mut self);
}
