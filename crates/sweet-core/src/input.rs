//! Edge-triggered input tracking.
//!
//! Every device class (mouse, keyboard, touch, joypad) runs the same
//! push/hold/release machine over a fixed set of slots. Raw device state is
//! sampled exactly once per tick; the previous edge state plus the new
//! sample fully determine the next edge state:
//!
//! ```text
//! idle(0) ──press──▶ pushed(1) ──hold──▶ held(2) ─┐
//!   ▲                   │                  ▲  │  hold
//!   │                   │release           └──┘
//!   └──── separated(-1) ◀───────────────────────┘ release
//! ```
//!
//! A press that lasts a single sample reports `pushed` on that tick and
//! `separated` on the next one; the two edges never land on the same tick.

use std::marker::PhantomData;

use smallvec::{SmallVec, smallvec};

use crate::Point;

/// Edge code of a single key or button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum EdgeState {
    /// Released this tick.
    Separated = -1,
    #[default]
    Idle = 0,
    /// Pressed this tick.
    Pushed = 1,
    /// Pressed on this tick and the previous one.
    Held = 2,
}

impl EdgeState {
    /// The signed edge code: `-1`, `0`, `1` or `2`.
    pub fn code(self) -> i8 {
        self as i8
    }

    /// The state after sampling `active` on the next tick.
    pub fn next(self, active: bool) -> EdgeState {
        match (active, self) {
            (true, EdgeState::Idle | EdgeState::Separated) => EdgeState::Pushed,
            (true, EdgeState::Pushed | EdgeState::Held) => EdgeState::Held,
            (false, EdgeState::Pushed | EdgeState::Held) => EdgeState::Separated,
            (false, EdgeState::Idle | EdgeState::Separated) => EdgeState::Idle,
        }
    }

    pub fn is_down(self) -> bool {
        self.code() > 0
    }
}

/// Per-slot edge states for one device, indexed by raw sample position.
#[derive(Clone, Debug)]
pub struct EdgeTracker {
    states: SmallVec<[EdgeState; 16]>,
}

impl EdgeTracker {
    pub fn new(slots: usize) -> Self {
        Self {
            states: smallvec![EdgeState::Idle; slots],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Advances every slot by one tick. Slots missing from `raw` count as
    /// inactive; extra samples are ignored.
    pub fn update(&mut self, raw: &[bool]) {
        for (i, state) in self.states.iter_mut().enumerate() {
            let active = raw.get(i).copied().unwrap_or(false);
            *state = state.next(active);
        }
    }

    /// Edge state of `index`; out-of-range slots read as idle.
    pub fn state(&self, index: usize) -> EdgeState {
        self.states.get(index).copied().unwrap_or_default()
    }

    pub fn is_pushing(&self, index: usize) -> bool {
        self.state(index).is_down()
    }

    pub fn is_pushed(&self, index: usize) -> bool {
        self.state(index) == EdgeState::Pushed
    }

    pub fn is_separate(&self, index: usize) -> bool {
        self.state(index) == EdgeState::Separated
    }

    /// Forgets all state, e.g. after the window lost focus.
    pub fn reset(&mut self) {
        self.states.iter_mut().for_each(|s| *s = EdgeState::Idle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mouse,
    Keyboard,
    Touch,
    Joypad,
}

/// Raw, level-triggered device state, queried once per tick.
pub trait RawInput {
    /// Writes whether each slot of `device` is currently active.
    /// `active` is sized to the device's slot count.
    fn sample(&mut self, device: DeviceClass, active: &mut [bool]);

    fn cursor_position(&mut self) -> Point;

    /// Position of the primary touch point, if any finger is down.
    fn touch_position(&mut self) -> Option<Point> {
        None
    }
}

/// Maps a symbolic key of one device class onto its raw sample slot.
pub trait DeviceKey: Copy {
    const CLASS: DeviceClass;
    const COUNT: usize;

    /// Always `< COUNT`.
    fn index(self) -> usize;
}

/// One device class' edge tracker, queried with typed keys.
#[derive(Clone, Debug)]
pub struct Device<K: DeviceKey> {
    tracker: EdgeTracker,
    scratch: Vec<bool>,
    _key: PhantomData<K>,
}

impl<K: DeviceKey> Default for Device<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: DeviceKey> Device<K> {
    pub fn new() -> Self {
        Self {
            tracker: EdgeTracker::new(K::COUNT),
            scratch: vec![false; K::COUNT],
            _key: PhantomData,
        }
    }

    /// Samples `source` and advances one tick.
    pub fn poll(&mut self, source: &mut dyn RawInput) {
        self.scratch.iter_mut().for_each(|s| *s = false);
        source.sample(K::CLASS, &mut self.scratch);
        self.tracker.update(&self.scratch);
    }

    /// Advances one tick from an already-sampled slot array.
    pub fn update(&mut self, raw: &[bool]) {
        self.tracker.update(raw);
    }

    pub fn state(&self, key: K) -> EdgeState {
        self.tracker.state(key.index())
    }

    /// True while the key is down, including the tick it went down.
    pub fn is_pushing(&self, key: K) -> bool {
        self.tracker.is_pushing(key.index())
    }

    /// True only on the tick the key went down.
    pub fn is_pushed(&self, key: K) -> bool {
        self.tracker.is_pushed(key.index())
    }

    /// True only on the tick the key came up.
    pub fn is_separate(&self, key: K) -> bool {
        self.tracker.is_separate(key.index())
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}

bitflags::bitflags! {
    /// Raw mouse button mask, as reported by the backend in one call.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const X1 = 1 << 3;
        const X2 = 1 << 4;
    }
}

impl MouseButtons {
    /// Expands the mask into per-button slots. Chorded presses set every
    /// bit they contain.
    pub fn write_samples(self, active: &mut [bool]) {
        for (slot, button) in active.iter_mut().zip(MouseButton::ALL) {
            *slot = self.contains(button.flag());
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::X1,
        MouseButton::X2,
    ];

    pub fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::X1 => MouseButtons::X1,
            MouseButton::X2 => MouseButtons::X2,
        }
    }
}

impl DeviceKey for MouseButton {
    const CLASS: DeviceClass = DeviceClass::Mouse;
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::X1 => 3,
            MouseButton::X2 => 4,
        }
    }
}

/// Keyboard scan code (DirectInput numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const ESCAPE: KeyCode = KeyCode(0x01);
    pub const BACKSPACE: KeyCode = KeyCode(0x0E);
    pub const TAB: KeyCode = KeyCode(0x0F);
    pub const Q: KeyCode = KeyCode(0x10);
    pub const W: KeyCode = KeyCode(0x11);
    pub const E: KeyCode = KeyCode(0x12);
    pub const ENTER: KeyCode = KeyCode(0x1C);
    pub const LEFT_CONTROL: KeyCode = KeyCode(0x1D);
    pub const A: KeyCode = KeyCode(0x1E);
    pub const S: KeyCode = KeyCode(0x1F);
    pub const D: KeyCode = KeyCode(0x20);
    pub const LEFT_SHIFT: KeyCode = KeyCode(0x2A);
    pub const Z: KeyCode = KeyCode(0x2C);
    pub const X: KeyCode = KeyCode(0x2D);
    pub const SPACE: KeyCode = KeyCode(0x39);
    pub const F1: KeyCode = KeyCode(0x3B);
    pub const UP: KeyCode = KeyCode(0xC8);
    pub const LEFT: KeyCode = KeyCode(0xCB);
    pub const RIGHT: KeyCode = KeyCode(0xCD);
    pub const DOWN: KeyCode = KeyCode(0xD0);
}

impl DeviceKey for KeyCode {
    const CLASS: DeviceClass = DeviceClass::Keyboard;
    const COUNT: usize = 256;

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// One of the simultaneously tracked touch contacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TouchPoint(u8);

impl TouchPoint {
    pub const MAX: u8 = 10;
    pub const PRIMARY: TouchPoint = TouchPoint(0);

    pub fn new(n: u8) -> Option<TouchPoint> {
        (n < Self::MAX).then_some(TouchPoint(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl DeviceKey for TouchPoint {
    const CLASS: DeviceClass = DeviceClass::Touch;
    const COUNT: usize = TouchPoint::MAX as usize;

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadButton {
    Down,
    Left,
    Right,
    Up,
    A,
    B,
    X,
    Y,
    L,
    R,
    ZL,
    ZR,
    Start,
    Select,
    LeftStick,
    RightStick,
}

impl DeviceKey for PadButton {
    const CLASS: DeviceClass = DeviceClass::Joypad;
    const COUNT: usize = 16;

    fn index(self) -> usize {
        self as usize
    }
}

pub type Mouse = Device<MouseButton>;
pub type Keyboard = Device<KeyCode>;
pub type Touch = Device<TouchPoint>;
pub type Joypad = Device<PadButton>;

/// One tracker per device class plus pointer positions, polled together at
/// the start of every tick.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub mouse: Mouse,
    pub keyboard: Keyboard,
    pub touch: Touch,
    pub joypad: Joypad,
    cursor: Point,
    touch_position: Option<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, source: &mut dyn RawInput) {
        self.mouse.poll(source);
        self.keyboard.poll(source);
        self.touch.poll(source);
        self.joypad.poll(source);
        self.cursor = source.cursor_position();
        self.touch_position = source.touch_position();
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn touch_position(&self) -> Option<Point> {
        self.touch_position
    }
}
