use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use sweet_core::{Color, DrawTarget, InputState, Point, Rect, Stage, Widget};
use sweet_devtools::{Inspector, Metrics, count_nodes, hit_test};
use web_time::Instant;

use crate::{Platform, RunnerConfig};

/// What a finished `Runner::run` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub failed_frames: u64,
}

/// Drives one view tree on one platform, a frame at a time.
pub struct Runner<P: Platform> {
    config: RunnerConfig,
    platform: P,
    stage: Stage,
    input: InputState,
    inspector: Rc<RefCell<Inspector>>,
    clear_color: Color,
    frame: u64,
    failed_frames: u64,
}

impl<P: Platform> Runner<P> {
    pub fn new(config: RunnerConfig, platform: P, root: impl Widget + 'static) -> Self {
        let mut root: Box<dyn Widget> = Box::new(root);

        let inspector = Rc::new(RefCell::new(Inspector::new()));
        {
            let mut i = inspector.borrow_mut();
            i.hud.budget = config.frame_duration();
            i.hud.inspector_enabled = config.show_hud;
        }
        Inspector::attach(&inspector, root.node_mut());

        Self {
            clear_color: config.clear_color(),
            config,
            platform,
            stage: Stage::from_boxed(root),
            input: InputState::new(),
            inspector,
            frame: 0,
            failed_frames: 0,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn inspector(&self) -> Rc<RefCell<Inspector>> {
        Rc::clone(&self.inspector)
    }

    /// Frames ticked so far, failed ones included.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// One full frame: pump messages, clear the screen, poll input, update,
    /// draw, present. Returns `Ok(false)` once the platform asks to exit.
    ///
    /// The screen is presented even when the update or draw pass fails; the
    /// next tick starts over from a clean screen.
    pub fn tick(&mut self) -> anyhow::Result<bool> {
        if !self.platform.pump_messages() {
            return Ok(false);
        }
        let started = Instant::now();
        self.frame += 1;

        let screen = self.platform.screen_size();
        self.platform.set_active_target(DrawTarget::Screen);
        self.platform.clear_active_target();
        self.platform
            .fill_rect(Rect::from_origin_size(Point::ORIGIN, screen), self.clear_color);

        self.input.poll(&mut self.platform);
        let result = self.update_and_draw(started);
        self.platform.present();
        result.map(|()| true)
    }

    fn update_and_draw(&mut self, started: Instant) -> anyhow::Result<()> {
        let screen = self.platform.screen_size();
        self.stage
            .update(&mut self.platform, &self.input, screen)
            .with_context(|| format!("update pass of frame {} failed", self.frame))?;

        {
            let mut inspector = self.inspector.borrow_mut();
            inspector.hud.record_frame(started);
            if inspector.hud.inspector_enabled {
                let hovered = hit_test(self.stage.root(), self.input.cursor());
                inspector.hud.set_hovered(hovered);
            }
        }

        self.stage
            .draw(&mut self.platform)
            .with_context(|| format!("draw pass of frame {} failed", self.frame))?;

        let metrics = Metrics {
            update_draw_ms: started.elapsed().as_secs_f32() * 1000.0,
            nodes: count_nodes(self.stage.root()),
        };
        self.inspector.borrow_mut().hud.metrics = Some(metrics);
        Ok(())
    }

    /// Ticks until the platform exits or `max_frames` is reached, pacing to
    /// the configured frame rate, then releases every render target.
    /// Failed frames are logged and skipped.
    pub fn run(&mut self) -> RunSummary {
        let budget = self.config.frame_duration();
        let first_frame = self.frame;
        let first_failure = self.failed_frames;
        log::info!(
            "running at {} fps on a {:?} screen",
            self.config.target_fps,
            self.platform.screen_size()
        );

        loop {
            if let Some(max) = self.config.max_frames
                && self.frame >= max
            {
                log::debug!("frame limit {max} reached");
                break;
            }

            let started = Instant::now();
            match self.tick() {
                Ok(true) => {}
                Ok(false) => {
                    log::info!("platform requested exit after {} frames", self.frame);
                    break;
                }
                Err(e) => {
                    self.failed_frames += 1;
                    log::error!("{e:#}");
                }
            }
            pace(started.elapsed(), budget, self.frame);
        }

        self.stage.release(&mut self.platform);
        RunSummary {
            frames: self.frame - first_frame,
            failed_frames: self.failed_frames - first_failure,
        }
    }
}

fn pace(elapsed: Duration, budget: Duration, frame: u64) {
    if budget.is_zero() {
        return;
    }
    if elapsed < budget {
        std::thread::sleep(budget - elapsed);
    } else {
        log::warn!("frame {frame} overran its budget: {elapsed:?} > {budget:?}");
    }
}
