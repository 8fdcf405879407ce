use std::collections::BTreeMap;

use sweet_core::{
    BackendError, BlendMode, Color, DeviceClass, DrawTarget, Point, RawInput, RecordingBackend,
    Rect, RenderBackend, ScriptedInput, Size, TargetId,
};

use crate::Platform;

type ScriptStep = Box<dyn FnMut(&mut ScriptedInput)>;

/// A platform with no window: rendering is recorded and input is scripted
/// per frame. Used by tests and the demo.
pub struct HeadlessPlatform {
    pub backend: RecordingBackend,
    pub input: ScriptedInput,
    screen: Size,
    frame: u64,
    script: BTreeMap<u64, Vec<ScriptStep>>,
    exit_at: Option<u64>,
}

impl HeadlessPlatform {
    pub fn new(screen: Size) -> Self {
        Self {
            backend: RecordingBackend::new(),
            input: ScriptedInput::new(),
            screen,
            frame: 0,
            script: BTreeMap::new(),
            exit_at: None,
        }
    }

    /// Runs `step` against the input right before frame `frame` samples it.
    pub fn at_frame(&mut self, frame: u64, step: impl FnMut(&mut ScriptedInput) + 'static) {
        self.script.entry(frame).or_default().push(Box::new(step));
    }

    /// Reports an exit request when frame `frame` pumps messages.
    pub fn exit_at(&mut self, frame: u64) {
        self.exit_at = Some(frame);
    }

    pub fn resize(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Frames pumped so far, the exit frame excluded.
    pub fn frames_pumped(&self) -> u64 {
        self.frame
    }
}

impl Platform for HeadlessPlatform {
    fn pump_messages(&mut self) -> bool {
        if self.exit_at.is_some_and(|at| self.frame >= at) {
            log::debug!("headless platform exiting at frame {}", self.frame);
            return false;
        }
        if let Some(steps) = self.script.remove(&self.frame) {
            for mut step in steps {
                step(&mut self.input);
            }
        }
        self.frame += 1;
        true
    }

    fn screen_size(&self) -> Size {
        self.screen
    }
}

impl RenderBackend for HeadlessPlatform {
    fn create_offscreen_target(&mut self, size: Size) -> Result<TargetId, BackendError> {
        self.backend.create_offscreen_target(size)
    }

    fn destroy_offscreen_target(&mut self, target: TargetId) {
        self.backend.destroy_offscreen_target(target)
    }

    fn set_active_target(&mut self, target: DrawTarget) -> DrawTarget {
        self.backend.set_active_target(target)
    }

    fn clear_active_target(&mut self) {
        self.backend.clear_active_target()
    }

    fn set_blend_mode(&mut self, mode: BlendMode, alpha: u8) {
        self.backend.set_blend_mode(mode, alpha)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.backend.fill_rect(rect, color)
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius_x: f32, radius_y: f32, color: Color) {
        self.backend.fill_rounded_rect(rect, radius_x, radius_y, color)
    }

    fn blend_target(&mut self, target: TargetId, at: Point, mode: BlendMode, alpha: u8) {
        self.backend.blend_target(target, at, mode, alpha)
    }

    fn present(&mut self) {
        self.backend.present()
    }
}

impl RawInput for HeadlessPlatform {
    fn sample(&mut self, device: DeviceClass, active: &mut [bool]) {
        self.input.sample(device, active)
    }

    fn cursor_position(&mut self) -> Point {
        self.input.cursor_position()
    }

    fn touch_position(&mut self) -> Option<Point> {
        self.input.touch_position()
    }
}
