//! Off-screen composition of the view tree.
//!
//! Every drawable node renders into its own target: background, then the
//! widget's content, then each child (which renders into *its* target and
//! blends itself onto ours), then post-render observers. Only after the
//! previous target is restored is the finished buffer blended onto it.

use crate::error::Result;
use crate::render_api::{BlendMode, DrawTarget, RenderBackend};
use crate::view::{HasChildren, ViewNode, Widget};
use crate::{Color, Rect};

/// Renders `widget` and its subtree and, if visible, blends the result onto
/// the target that was active on entry.
///
/// Empty or non-drawable nodes are skipped. The active target is restored
/// even when rendering fails part way.
pub fn draw(widget: &mut dyn Widget, backend: &mut dyn RenderBackend) -> Result<()> {
    let node = widget.node();
    if !node.is_drawable() || node.size().is_empty() {
        return Ok(());
    }
    let target = node.current_target()?;

    let previous = backend.set_active_target(DrawTarget::Offscreen(target));
    let rendered = render_into_target(widget, backend);
    backend.set_active_target(previous);
    rendered?;

    let node = widget.node();
    if node.visible {
        backend.blend_target(target, node.position(), node.blend_mode(), node.alpha);
    }
    Ok(())
}

fn render_into_target(widget: &mut dyn Widget, backend: &mut dyn RenderBackend) -> Result<()> {
    backend.clear_active_target();
    paint_background(widget.node(), backend);
    widget.draw_content(backend)?;

    let node = widget.node_mut();
    for child in node.children_mut() {
        if !child.node().is_drawable() {
            continue;
        }
        child.node_mut().premultiplied = true;
        draw(child.as_mut(), backend)?;
    }

    for observer in node.observers_mut() {
        observer(backend);
    }
    Ok(())
}

/// Fills the node's bounds with its background color, weighted by the
/// background alpha.
pub fn paint_background(node: &ViewNode, backend: &mut dyn RenderBackend) {
    let Some(color) = node.background_color else {
        return;
    };
    if node.background_alpha == 0 {
        return;
    }
    fill_bounds(node, backend, color, node.background_alpha);
}

/// Fills the node's local bounds in premultiplied mode at `alpha`, rounded
/// when the node has a corner radius. Blending is switched off afterwards.
pub fn fill_bounds(
    node: &ViewNode,
    backend: &mut dyn RenderBackend,
    color: Color,
    alpha: u8,
) {
    let bounds = Rect::new(0, 0, node.width, node.height);
    backend.set_blend_mode(BlendMode::PremultipliedAlpha, alpha);
    if node.corner_radius <= 0.0 {
        backend.fill_rect(bounds, color);
    } else {
        backend.fill_rounded_rect(bounds, node.corner_radius, node.corner_radius, color);
    }
    backend.set_blend_mode(BlendMode::NoBlend, 255);
}
