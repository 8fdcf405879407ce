//! Frame runner and platform seam.
//!
//! A [`Platform`] is a render backend plus a raw input source that also owns
//! the message pump. [`Runner`] drives a view tree on one: every frame it
//! pumps messages, clears the screen, polls every input device, runs the
//! update and draw passes, presents and sleeps off the rest of the frame
//! budget from [`RunnerConfig`].
//!
//! [`HeadlessPlatform`] records rendering and plays back scripted input; it
//! backs tests and the showcase demo.

mod config;
mod headless;
mod runner;

pub use config::RunnerConfig;
pub use headless::HeadlessPlatform;
pub use runner::{RunSummary, Runner};

use sweet_core::{RawInput, RenderBackend, Size};

pub trait Platform: RenderBackend + RawInput {
    /// Processes pending OS messages. Returns `false` once the application
    /// should exit.
    fn pump_messages(&mut self) -> bool;

    fn screen_size(&self) -> Size;
}
