//! Seat Registry: nearby objects with sit points and one indicator per sit point.
//!
//! # Invariants
//! - Every tracked object has at least one sit point and exactly one indicator
//!   per sit point.
//! - An object farther than the search radius is never tracked after a scan.
//! - Indicator visibility is global; indicators created while hidden start hidden.

mod indicator;
mod registry;

pub use indicator::Indicator;
pub use registry::{PickMode, RegistryConfig, RegistryStats, SeatRegistry};
