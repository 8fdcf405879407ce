//! Headless counter: two buttons in a stack panel, clicked by a scripted
//! mouse, drive a bar whose width follows the count.
//!
//! `showcase [config.json]`

use std::cell::Cell;
use std::rc::Rc;

use sweet_core::*;
use sweet_devtools::dump_tree;
use sweet_platform::{HeadlessPlatform, Runner, RunnerConfig};
use sweet_ui::{Button, VStackPanel};

const PANEL: Size = Size::new(320, 400);
const SPACING: i32 = 16;
const METER_HEIGHT: i32 = 24;
const BUTTON: Size = Size::new(200, 60);

/// A bar `20px` wide per count.
struct Meter {
    control: Control,
    count: Rc<Cell<i32>>,
}

impl Updatable for Meter {
    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
        let width = (self.count.get() * 20).clamp(0, PANEL.width);
        self.control.node.set_size(Size::new(width, METER_HEIGHT));
        self.control.update(cx)
    }
}

impl Drawable for Meter {}

impl Widget for Meter {
    fn node(&self) -> &ViewNode {
        &self.control.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.control.node
    }
}

fn counter_button(color: Color, count: &Rc<Cell<i32>>, delta: i32) -> Button {
    let count = count.clone();
    Button::new(BUTTON.width, BUTTON.height)
        .background(color, 255)
        .on_clicked(move || count.set(count.get() + delta))
}

fn app(count: &Rc<Cell<i32>>) -> VStackPanel {
    let meter = Meter {
        control: Control::from_node(
            ViewNode::new(0, METER_HEIGHT).with_background(Some(Color::ORANGE), 255),
        )
        .aligned(HorizontalAlignment::Left, VerticalAlignment::Top),
        count: count.clone(),
    };
    let mut panel = VStackPanel::new(PANEL.width, PANEL.height)
        .spacing(SPACING)
        .with_child(meter)
        .with_child(counter_button(Color::from_hex("#44AAFF"), count, 1))
        .with_child(counter_button(Color::PINK, count, -1));
    panel.control.node.background_color = Some(Color::from_hex("#221628"));
    panel
}

/// Presses at `at` on `frame` and lets go two frames later.
fn click(platform: &mut HeadlessPlatform, frame: u64, at: Point) {
    platform.at_frame(frame, move |input| {
        input.set_cursor(at);
        input.set_mouse(MouseButtons::LEFT);
    });
    platform.at_frame(frame + 2, |input| input.set_mouse(MouseButtons::empty()));
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig {
            max_frames: Some(60),
            ..RunnerConfig::default()
        },
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    let screen = config.screen_size();
    let top = (screen.height - PANEL.height).div_euclid(2);
    let center_x = screen.width.div_euclid(2);
    let first_button = top + METER_HEIGHT + SPACING;
    let increment = Point::new(center_x, first_button + BUTTON.height / 2);
    let decrement = Point::new(center_x, first_button + BUTTON.height + SPACING + BUTTON.height / 2);

    let mut platform = HeadlessPlatform::new(screen);
    click(&mut platform, 10, increment);
    click(&mut platform, 20, increment);
    click(&mut platform, 30, increment);
    click(&mut platform, 40, decrement);

    let count = Rc::new(Cell::new(0));
    let mut runner = Runner::new(config, platform, app(&count));
    let summary = runner.run();

    log::info!("final tree:\n{}", dump_tree(runner.stage().root()));
    let backend = &runner.platform().backend;
    log::info!(
        "{} frames ({} failed), count = {}, targets created {} / destroyed {}",
        summary.frames,
        summary.failed_frames,
        count.get(),
        backend.created(),
        backend.destroyed(),
    );
    if backend.live_targets() != 0 {
        anyhow::bail!("{} render targets leaked", backend.live_targets());
    }
    Ok(())
}
