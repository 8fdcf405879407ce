use std::fmt;
use std::rc::Rc;

use sweet_core::compositor::fill_bounds;
use sweet_core::*;

use crate::gestures::{PressEvent, PressTracker};

pub type Callback = Rc<dyn Fn()>;

/// A clickable control. While held with the pointer over it, it paints
/// `click_color` over its background.
///
/// Only the part of the button its ancestors actually show reacts to input.
pub struct Button {
    pub control: Control,
    pub click_color: Color,
    /// Opacity of the overlay while pressed.
    pub press_alpha: u8,
    enabled: bool,
    press: PressTracker,
    held_over: bool,
    on_pushed: Vec<Callback>,
    on_clicked: Vec<Callback>,
}

impl Button {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            control: Control::new(width, height),
            click_color: Color::GRAY,
            press_alpha: 96,
            enabled: true,
            press: PressTracker::new(),
            held_over: false,
            on_pushed: Vec::new(),
            on_clicked: Vec::new(),
        }
    }

    pub fn aligned(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.control = self.control.aligned(horizontal, vertical);
        self
    }

    pub fn offset(mut self, horizontal: i32, vertical: i32) -> Self {
        self.control = self.control.offset(horizontal, vertical);
        self
    }

    pub fn background(mut self, color: Color, alpha: u8) -> Self {
        self.control.node.background_color = Some(color);
        self.control.node.background_alpha = alpha;
        self
    }

    pub fn click_color(mut self, color: Color) -> Self {
        self.click_color = color;
        self
    }

    /// Fires on the tick the pointer goes down over the button.
    pub fn on_pushed(mut self, f: impl Fn() + 'static) -> Self {
        self.on_pushed.push(Rc::new(f));
        self
    }

    /// Fires when a press that started on the button is released over it.
    pub fn on_clicked(mut self, f: impl Fn() + 'static) -> Self {
        self.on_clicked.push(Rc::new(f));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled buttons ignore input and drop any press in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.press.cancel();
            self.held_over = false;
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_pressed()
    }

    /// Pressed, and the pressing pointer is still over the button.
    pub fn is_held_over(&self) -> bool {
        self.held_over
    }

    fn react(&mut self, input: &InputState, screen_bounds: Rect) {
        if !self.enabled {
            return;
        }
        let callbacks = match self.press.handle(input, screen_bounds) {
            Some(PressEvent::Pushed) => &self.on_pushed,
            Some(PressEvent::Clicked) => {
                log::debug!("button at {:?} clicked", screen_bounds.origin());
                &self.on_clicked
            }
            Some(PressEvent::Cancelled) | None => return,
        };
        for cb in callbacks {
            cb();
        }
    }
}

impl Updatable for Button {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        self.control.update_self(cx)?;
        match cx.visible_bounds(&self.control.node) {
            Some(bounds) => {
                self.react(cx.input, bounds);
                self.held_over = self.press.is_held_over(cx.input, bounds);
            }
            None => {
                if self.press.cancel().is_some() {
                    log::debug!("button press dropped: no longer on screen");
                }
                self.held_over = false;
            }
        }
        self.control.node.update_children(cx)
    }
}

impl Drawable for Button {
    fn draw_content(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        if self.held_over {
            fill_bounds(&self.control.node, backend, self.click_color, self.press_alpha);
        }
        Ok(())
    }
}

impl Widget for Button {
    fn node(&self) -> &ViewNode {
        &self.control.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.control.node
    }
}

impl Positionable for Button {
    fn placement(&self) -> &Placement {
        &self.control.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.control.placement
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("control", &self.control)
            .field("click_color", &self.click_color)
            .field("enabled", &self.enabled)
            .field("pressed", &self.is_pressed())
            .field("held_over", &self.held_over)
            .field("on_pushed", &self.on_pushed.len())
            .field("on_clicked", &self.on_clicked.len())
            .finish()
    }
}
