use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use sweet_core::{BlendMode, Color, HasChildren, Point, Rect, RenderBackend, Size, ViewNode, Widget};

const BAR_ORIGIN: Point = Point::new(8, 8);
const BAR_MAX_WIDTH: i32 = 200;
const BAR_HEIGHT: i32 = 6;

pub struct Hud {
    pub inspector_enabled: bool,
    /// Highlighted node, in root-local coordinates.
    pub hovered: Option<Rect>,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub budget: Duration,
    pub metrics: Option<Metrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            budget: Duration::from_secs(1) / 60,
            metrics: None,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn set_hovered(&mut self, r: Option<Rect>) {
        self.hovered = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Counts a frame that started at `now`.
    pub fn record_frame(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    /// Width of the frame-time bar: the whole bar is one frame budget.
    pub fn bar_width(&self) -> i32 {
        let Some(m) = &self.metrics else {
            return 0;
        };
        let budget_ms = self.budget.as_secs_f32() * 1000.0;
        if budget_ms <= 0.0 {
            return 0;
        }
        let ratio = (m.update_draw_ms / budget_ms).min(1.0);
        (ratio * BAR_MAX_WIDTH as f32).round() as i32
    }

    pub fn over_budget(&self) -> bool {
        self.metrics
            .as_ref()
            .is_some_and(|m| m.update_draw_ms > self.budget.as_secs_f32() * 1000.0)
    }

    /// Draws onto whatever target is active; coordinates are target-local.
    pub fn overlay(&self, backend: &mut dyn RenderBackend) {
        backend.set_blend_mode(BlendMode::Alpha, 160);
        backend.fill_rect(
            Rect::from_origin_size(BAR_ORIGIN, Size::new(BAR_MAX_WIDTH, BAR_HEIGHT)),
            Color::from_hex("#333333"),
        );
        let width = self.bar_width();
        if width > 0 {
            let color = if self.over_budget() {
                Color::ORANGE
            } else {
                Color::from_hex("#44AAFF")
            };
            backend.set_blend_mode(BlendMode::NoBlend, 255);
            backend.fill_rect(Rect::new(BAR_ORIGIN.x, BAR_ORIGIN.y, width, BAR_HEIGHT), color);
        }

        if let Some(r) = self.hovered {
            backend.set_blend_mode(BlendMode::Alpha, 64);
            backend.fill_rect(r, Color::from_hex("#44AAFF"));
        }
        backend.set_blend_mode(BlendMode::NoBlend, 255);
    }
}

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub update_draw_ms: f32,
    pub nodes: usize,
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    pub fn frame(&mut self, backend: &mut dyn RenderBackend) {
        if self.hud.inspector_enabled {
            self.hud.overlay(backend);
        }
    }

    /// Hooks the overlay into `node`'s post-render notification, so it is
    /// painted into that node's buffer after its children.
    pub fn attach(this: &Rc<RefCell<Inspector>>, node: &mut ViewNode) {
        let inspector = Rc::clone(this);
        node.on_rendering(move |backend| match inspector.try_borrow_mut() {
            Ok(mut i) => i.frame(backend),
            Err(_) => log::warn!("inspector busy, skipping overlay"),
        });
    }
}

/// Counts `widget` and all of its descendants.
pub fn count_nodes(widget: &dyn Widget) -> usize {
    1 + widget
        .node()
        .children()
        .iter()
        .map(|c| count_nodes(c.as_ref()))
        .sum::<usize>()
}

/// Finds the deepest drawable node under `point` (given in the coordinate
/// space `root` is positioned in) and returns its bounds relative to `root`.
/// Later siblings win, matching draw order.
pub fn hit_test(root: &dyn Widget, point: Point) -> Option<Rect> {
    let node = root.node();
    let local = Point::new(point.x - node.x, point.y - node.y);
    hit_in(node, local, Point::ORIGIN)
}

fn hit_in(node: &ViewNode, local: Point, offset: Point) -> Option<Rect> {
    let own = Rect::new(offset.x, offset.y, node.width, node.height);
    let inside = Rect::new(0, 0, node.width, node.height).contains(local);
    if !node.visible || !node.is_drawable() || !inside {
        return None;
    }
    for child in node.children().iter().rev() {
        let c = child.node();
        let child_local = Point::new(local.x - c.x, local.y - c.y);
        let child_offset = offset.offset(c.position());
        if let Some(hit) = hit_in(c, child_local, child_offset) {
            return Some(hit);
        }
    }
    Some(own)
}

/// One line per node, indented by depth.
pub fn dump_tree(root: &dyn Widget) -> String {
    let mut out = String::new();
    dump_node(root.node(), 0, &mut out);
    out
}

fn dump_node(node: &ViewNode, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{}x{} at ({}, {}) alpha={} {}{}",
        "",
        node.width,
        node.height,
        node.x,
        node.y,
        node.alpha,
        if node.is_drawable() { "target" } else { "group" },
        if node.visible { "" } else { " hidden" },
        indent = depth * 2,
    );
    for child in node.children() {
        dump_node(child.node(), depth + 1, out);
    }
}
