//! A backend that rasterizes nothing and records everything.
//!
//! Used by tests across the workspace and by the headless runner.

use slotmap::SlotMap;

use crate::input::{DeviceClass, KeyCode, MouseButtons, PadButton, RawInput, TouchPoint};
use crate::render_api::{BackendError, BlendMode, DrawTarget, RenderBackend, TargetId};
use crate::{Color, Point, Rect, Size};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Create { target: TargetId, size: Size },
    Destroy(TargetId),
    SetTarget(DrawTarget),
    Clear(DrawTarget),
    SetBlendMode(BlendMode, u8),
    FillRect {
        on: DrawTarget,
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        on: DrawTarget,
        rect: Rect,
        radius: f32,
        color: Color,
    },
    Blend {
        source: TargetId,
        onto: DrawTarget,
        at: Point,
        mode: BlendMode,
        alpha: u8,
    },
    Present,
}

#[derive(Debug)]
pub struct RecordingBackend {
    targets: SlotMap<TargetId, Size>,
    active: DrawTarget,
    calls: Vec<DrawCall>,
    created: usize,
    destroyed: usize,
    presented: u64,
    fail_creation: bool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            targets: SlotMap::with_key(),
            active: DrawTarget::Screen,
            calls: Vec::new(),
            created: 0,
            destroyed: 0,
            presented: 0,
            fail_creation: false,
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn active_target(&self) -> DrawTarget {
        self.active
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn target_size(&self, target: TargetId) -> Option<Size> {
        self.targets.get(target).copied()
    }

    /// Total targets ever created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total targets ever destroyed.
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Makes every following `create_offscreen_target` fail.
    pub fn set_fail_creation(&mut self, fail: bool) {
        self.fail_creation = fail;
    }
}

impl RenderBackend for RecordingBackend {
    fn create_offscreen_target(&mut self, size: Size) -> Result<TargetId, BackendError> {
        if self.fail_creation || size.is_empty() {
            return Err(BackendError::TargetCreation {
                width: size.width,
                height: size.height,
            });
        }
        let target = self.targets.insert(size);
        self.created += 1;
        self.calls.push(DrawCall::Create { target, size });
        Ok(target)
    }

    fn destroy_offscreen_target(&mut self, target: TargetId) {
        if self.targets.remove(target).is_none() {
            log::error!("destroying unknown target {target:?}");
            return;
        }
        if self.active == DrawTarget::Offscreen(target) {
            self.active = DrawTarget::Screen;
        }
        self.destroyed += 1;
        self.calls.push(DrawCall::Destroy(target));
    }

    fn set_active_target(&mut self, target: DrawTarget) -> DrawTarget {
        self.calls.push(DrawCall::SetTarget(target));
        std::mem::replace(&mut self.active, target)
    }

    fn clear_active_target(&mut self) {
        self.calls.push(DrawCall::Clear(self.active));
    }

    fn set_blend_mode(&mut self, mode: BlendMode, alpha: u8) {
        self.calls.push(DrawCall::SetBlendMode(mode, alpha));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect {
            on: self.active,
            rect,
            color,
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius_x: f32, _radius_y: f32, color: Color) {
        self.calls.push(DrawCall::FillRoundedRect {
            on: self.active,
            rect,
            radius: radius_x,
            color,
        });
    }

    fn blend_target(&mut self, target: TargetId, at: Point, mode: BlendMode, alpha: u8) {
        if !self.targets.contains_key(target) {
            log::error!("blending unknown target {target:?}");
        }
        self.calls.push(DrawCall::Blend {
            source: target,
            onto: self.active,
            at,
            mode,
            alpha,
        });
    }

    fn present(&mut self) {
        self.presented += 1;
        self.calls.push(DrawCall::Present);
    }
}

/// Raw device state set directly by the caller between ticks.
#[derive(Clone, Debug)]
pub struct ScriptedInput {
    mouse: MouseButtons,
    cursor: Point,
    keys: Vec<bool>,
    touches: [Option<Point>; TouchPoint::MAX as usize],
    pad: [bool; 16],
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            mouse: MouseButtons::empty(),
            cursor: Point::ORIGIN,
            keys: vec![false; 256],
            touches: [None; TouchPoint::MAX as usize],
            pad: [false; 16],
        }
    }

    pub fn set_mouse(&mut self, buttons: MouseButtons) {
        self.mouse = buttons;
    }

    pub fn set_cursor(&mut self, at: Point) {
        self.cursor = at;
    }

    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        self.keys[usize::from(key.0)] = down;
    }

    pub fn set_touch(&mut self, point: TouchPoint, at: Option<Point>) {
        self.touches[usize::from(point.get())] = at;
    }

    pub fn set_pad(&mut self, button: PadButton, down: bool) {
        self.pad[button as usize] = down;
    }
}

impl RawInput for ScriptedInput {
    fn sample(&mut self, device: DeviceClass, active: &mut [bool]) {
        match device {
            DeviceClass::Mouse => self.mouse.write_samples(active),
            DeviceClass::Keyboard => copy_slots(&self.keys, active),
            DeviceClass::Touch => {
                for (slot, touch) in active.iter_mut().zip(&self.touches) {
                    *slot = touch.is_some();
                }
            }
            DeviceClass::Joypad => copy_slots(&self.pad, active),
        }
    }

    fn cursor_position(&mut self) -> Point {
        self.cursor
    }

    fn touch_position(&mut self) -> Option<Point> {
        self.touches[0]
    }
}

fn copy_slots(from: &[bool], into: &mut [bool]) {
    for (slot, &down) in into.iter_mut().zip(from) {
        *slot = down;
    }
}
