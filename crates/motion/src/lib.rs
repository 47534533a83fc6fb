//! Avatar Transitions: timed blends between standing and seated poses.
//!
//! # Invariants
//! - At most one transition callback is registered at any time.
//! - Deregistering a transition that is not registered is a no-op.
//! - Progress is elapsed / duration, clamped at 1.

mod motion;
mod pose;
mod slot;

pub use motion::{AvatarMotion, AvatarState, MotionConfig, MotionEvent};
pub use pose::{
    JointBlend, JointTarget, JointTransition, SEATED_POSE, euler_degrees, quat_from_degrees,
};
pub use slot::{CallbackSlot, TransitionKind};
