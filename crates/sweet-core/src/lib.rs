//! # Views, buffers and composition
//!
//! Sweet keeps UI as a retained tree of [`ViewNode`]s. Each drawable node
//! owns a private off-screen render target sized to the node; every frame the
//! tree is updated top-down and then composed bottom-up onto the screen.
//!
//! ## The tick
//!
//! One tick is always, in order:
//!
//! 1. poll raw input into the per-device edge trackers ([`InputState`]),
//! 2. update the tree ([`Stage::update`]): targets are (re)allocated where a
//!    node's size changed, and controls realign inside the area their owner
//!    pushed,
//! 3. draw the tree ([`Stage::draw`]),
//! 4. present.
//!
//! ```rust
//! use sweet_core::*;
//!
//! let mut backend = RecordingBackend::new();
//! let input = InputState::new();
//!
//! let panel = Control::new(200, 100)
//!     .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
//!     .with_child(
//!         Control::new(40, 20).aligned(HorizontalAlignment::Right, VerticalAlignment::Bottom),
//!     );
//!
//! let mut stage = Stage::new(panel);
//! stage.update(&mut backend, &input, Size::new(640, 480)).unwrap();
//! stage.draw(&mut backend).unwrap();
//! backend.present();
//!
//! assert_eq!(stage.root().node().children()[0].node().position(), Point::new(160, 80));
//! stage.release(&mut backend);
//! assert_eq!(backend.live_targets(), 0);
//! ```
//!
//! ## Composition
//!
//! Drawing a node selects its target, clears it, fills the background, lets
//! the widget paint its content, draws each drawable child (which blends
//! itself onto this node's target), notifies post-render observers and
//! finally restores the previous target and blends itself onto it.
//!
//! Groups ([`ViewNode::group`]) are laid out and updated but never drawn, so
//! neither they nor anything below them allocate a target. The update pass
//! also tracks which screen area each node actually shows through its
//! ancestors ([`UpdateContext::visible_bounds`]); input reacts only there.
//!
//! ## Backends
//!
//! Rendering goes through [`RenderBackend`] and raw input through
//! [`RawInput`]. [`RecordingBackend`] and [`ScriptedInput`] implement them
//! headlessly for tests and tooling.

pub mod color;
pub mod compositor;
pub mod control;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod input;
pub mod position;
pub mod render_api;
pub mod stage;
pub mod tests;
pub mod view;

pub use color::*;
pub use control::Control;
pub use error::{Result, ViewError};
pub use geometry::*;
pub use headless::{DrawCall, RecordingBackend, ScriptedInput};
pub use input::{
    DeviceClass, DeviceKey, EdgeState, EdgeTracker, InputState, KeyCode, MouseButton,
    MouseButtons, PadButton, RawInput, TouchPoint,
};
pub use position::*;
pub use render_api::*;
pub use stage::Stage;
pub use view::*;
