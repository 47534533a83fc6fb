//! Seat Session: one explicit state struct receiving every host event.
//!
//! # Invariants
//! - All feature state lives in [`SitSession`]; there are no globals.
//! - Host events are handled synchronously, one at a time.
//! - Shutdown leaves no overlays and no joint overrides behind.

mod config;
mod session;

pub use config::{ConfigError, SessionConfig};
pub use session::SitSession;
