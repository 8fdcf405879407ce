use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use sweet_core::{Color, Size};

/// Runner settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Frames per second to pace to; 0 runs unpaced.
    pub target_fps: u32,
    /// `#RRGGBB` the screen is filled with before the tree is drawn.
    pub clear_color: String,
    /// Stop after this many frames. `None` runs until the platform exits.
    pub max_frames: Option<u64>,
    /// Default `env_logger` filter; `RUST_LOG` overrides it.
    pub log_filter: String,
    pub show_hud: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            target_fps: 60,
            clear_color: "#000000".to_string(),
            max_frames: None,
            log_filter: "info".to_string(),
            show_hud: false,
        }
    }
}

impl RunnerConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: RunnerConfig =
            serde_json::from_str(json).context("failed to parse runner config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runner config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            bail!(
                "screen size must be positive, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        let hex = self.clear_color.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("clear_color must be #RRGGBB, got {:?}", self.clear_color);
        }
        Ok(())
    }

    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    pub fn clear_color(&self) -> Color {
        Color::from_hex(&self.clear_color)
    }

    /// Time budget of one frame.
    pub fn frame_duration(&self) -> Duration {
        if self.target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / self.target_fps
        }
    }
}
