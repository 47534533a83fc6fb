//! Shared types and geometry for the seat feature.
//!
//! # Invariants
//! - Sit point offsets are object-local and scaled by the object radius.
//! - Geometry helpers are pure functions of their inputs.

pub mod geometry;
pub mod types;

pub use geometry::{Ray, ray_sphere_distance, ray_sphere_intersection};
pub use types::{ModelId, ModelProperties, OverlayId, SitPoint, TargetSeat};
