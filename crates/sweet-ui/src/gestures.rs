use sweet_core::{InputState, MouseButton, Point, Rect, TouchPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressEvent {
    /// The pointer went down inside the bounds this tick.
    Pushed,
    /// The pointer that pushed came up inside the bounds.
    Clicked,
    /// The pointer that pushed came up outside, or the press was abandoned.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pointer {
    Mouse,
    Touch,
}

/// Turns edge-triggered pointer state into press/click events for one
/// rectangle. Only the pointer that started a press can finish it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressTracker {
    active: Option<Pointer>,
    last_touch: Point,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.active.is_some()
    }

    /// Feeds one tick of input against `bounds` (screen space).
    pub fn handle(&mut self, input: &InputState, bounds: Rect) -> Option<PressEvent> {
        match self.active {
            None => self.try_start(input, bounds),
            Some(Pointer::Mouse) => {
                if input.mouse.is_separate(MouseButton::Left) {
                    self.active = None;
                    Some(Self::finish(bounds.contains(input.cursor())))
                } else {
                    None
                }
            }
            Some(Pointer::Touch) => {
                if let Some(at) = input.touch_position() {
                    self.last_touch = at;
                }
                if input.touch.is_separate(TouchPoint::PRIMARY) {
                    self.active = None;
                    Some(Self::finish(bounds.contains(self.last_touch)))
                } else {
                    None
                }
            }
        }
    }

    /// Whether the pointer holding the press is currently inside `bounds`.
    pub fn is_held_over(&self, input: &InputState, bounds: Rect) -> bool {
        match self.active {
            None => false,
            Some(Pointer::Mouse) => bounds.contains(input.cursor()),
            Some(Pointer::Touch) => bounds.contains(self.last_touch),
        }
    }

    /// Abandons a press in progress, e.g. when the control gets disabled.
    pub fn cancel(&mut self) -> Option<PressEvent> {
        self.active.take().map(|_| PressEvent::Cancelled)
    }

    fn try_start(&mut self, input: &InputState, bounds: Rect) -> Option<PressEvent> {
        if input.mouse.is_pushed(MouseButton::Left) && bounds.contains(input.cursor()) {
            self.active = Some(Pointer::Mouse);
            return Some(PressEvent::Pushed);
        }
        if input.touch.is_pushed(TouchPoint::PRIMARY) {
            if let Some(at) = input.touch_position().filter(|p| bounds.contains(*p)) {
                self.active = Some(Pointer::Touch);
                self.last_touch = at;
                return Some(PressEvent::Pushed);
            }
        }
        None
    }

    fn finish(inside: bool) -> PressEvent {
        if inside {
            PressEvent::Clicked
        } else {
            PressEvent::Cancelled
        }
    }
}
