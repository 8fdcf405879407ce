//! Controls built on `sweet-core`: clickable buttons, vertical stack panels
//! and a scroller.
//!
//! Every control here wraps a [`sweet_core::Control`], so it aligns itself in
//! whatever area its owner pushes. Stack-like containers push one slot per
//! child instead of their whole area.

pub mod button;
pub mod gestures;
pub mod scroll;
pub mod stack;


pub use button::{Button, Callback};
pub use gestures::{PressEvent, PressTracker};
pub use scroll::Scroller;
pub use stack::VStackPanel;
