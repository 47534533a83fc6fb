//! Input Bridge: pointer presses and key presses mapped to seat actions.
//!
//! # Invariants
//! - Buttons are hit-tested before any seat pick.
//! - The session consumes actions, never raw input events.

pub mod action;
pub mod bridge;
pub mod buttons;

pub use action::Action;
pub use bridge::{InputBridge, InputConfig};
pub use buttons::{ButtonBar, ButtonLayout};
