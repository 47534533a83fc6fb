//! Host Contract: everything the seat feature consumes from the hosting engine.
//!
//! # Invariants
//! - The feature never owns rendering, physics or the scene graph; it only
//!   calls through [`Host`].
//! - [`SimHost`] mutations are recorded in an append-only event log.

pub mod camera;
pub mod host;
pub mod sim;

pub use camera::PickCamera;
pub use host::{Color, Host, ImageOverlay, OverlayEdit, Rect, SphereOverlay};
pub use sim::{HostEvent, Overlay, SimHost};
