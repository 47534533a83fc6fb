use glam::{Quat, Vec3};
use perch_common::TargetSeat;
use perch_kernel::Host;
use serde::{Deserialize, Serialize};

use crate::pose::{JointBlend, SEATED_POSE};
use crate::slot::{CallbackSlot, TransitionKind};

/// Timing and offsets for every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Length of one transition phase, in the host's time units.
    pub duration: f32,
    /// How far the avatar lowers itself (subtracted) when sitting down.
    pub sit_offset: Vec3,
    /// Added to a seat position to get the end of the walk to it.
    pub approach_offset: Vec3,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            duration: 2.0,
            sit_offset: Vec3::new(0.3, 0.5, 0.0),
            approach_offset: Vec3::new(0.3, 0.5, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarState {
    IdleStanding,
    IdleSitting,
    SittingDown,
    StandingUp,
    GoingToSeat,
}

/// Reported by [`AvatarMotion::advance`] on the tick a transition finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    SatDown,
    StoodUp,
    /// The walk to a seat finished and a sit-down has been started.
    ArrivedAtSeat,
}

/// Avatar transition state machine.
///
/// Captures the start position, orientation and joint pose when a transition
/// begins and blends toward the target on every [`advance`](Self::advance).
pub struct AvatarMotion {
    pub config: MotionConfig,
    slot: CallbackSlot,
    sitting: bool,
    elapsed: f32,
    start_position: Vec3,
    start_orientation: Quat,
    seat: Option<TargetSeat>,
    pose: Option<JointBlend>,
}

impl AvatarMotion {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            slot: CallbackSlot::new(),
            sitting: false,
            elapsed: 0.0,
            start_position: Vec3::ZERO,
            start_orientation: Quat::IDENTITY,
            seat: None,
            pose: None,
        }
    }

    pub fn state(&self) -> AvatarState {
        match self.slot.active() {
            Some(TransitionKind::SittingDown) => AvatarState::SittingDown,
            Some(TransitionKind::StandingUp) => AvatarState::StandingUp,
            Some(TransitionKind::GoingToSeat) => AvatarState::GoingToSeat,
            None if self.sitting => AvatarState::IdleSitting,
            None => AvatarState::IdleStanding,
        }
    }

    /// The sitting flag. Flips when a sit-down or stand-up starts.
    pub fn is_sitting(&self) -> bool {
        self.sitting
    }

    pub fn active(&self) -> Option<TransitionKind> {
        self.slot.active()
    }

    /// Time since the current transition started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn target_seat(&self) -> Option<TargetSeat> {
        self.seat
    }

    /// Joint pose captured by the last sit-down, until the stand-up finishes.
    pub fn captured_pose(&self) -> Option<&JointBlend> {
        self.pose.as_ref()
    }

    /// Start lowering the avatar into the seated pose from where it is now.
    pub fn sit_down(&mut self, host: &mut impl Host) {
        self.sitting = true;
        self.elapsed = 0.0;
        self.start_position = host.avatar_position();
        self.pose = Some(JointBlend::capture(&*host, &SEATED_POSE));
        self.slot.deregister(TransitionKind::StandingUp);
        self.slot.register(TransitionKind::SittingDown);
    }

    /// Start blending back out of the seated pose.
    pub fn stand_up(&mut self, host: &mut impl Host) {
        self.sitting = false;
        self.elapsed = 0.0;
        self.start_position = host.avatar_position();
        self.seat = None;
        self.slot.deregister(TransitionKind::SittingDown);
        self.slot.register(TransitionKind::StandingUp);
    }

    /// Start walking to `seat`, then turning to face its orientation.
    pub fn go_to_seat(&mut self, host: &mut impl Host, seat: TargetSeat) {
        self.elapsed = 0.0;
        self.start_position = host.avatar_position();
        self.start_orientation = host.avatar_orientation();
        self.seat = Some(seat);
        self.slot.deregister(TransitionKind::StandingUp);
        self.slot.deregister(TransitionKind::SittingDown);
        self.slot.register(TransitionKind::GoingToSeat);
        tracing::debug!(seat = ?seat.position, "going to seat");
    }

    /// Advance the registered transition by `dt`.
    pub fn advance(&mut self, host: &mut impl Host, dt: f32) -> Option<MotionEvent> {
        let kind = self.slot.active()?;
        let _span = tracing::info_span!("advance_transition", ?kind).entered();
        self.elapsed += dt;
        match kind {
            TransitionKind::SittingDown => self.advance_sitting_down(host),
            TransitionKind::StandingUp => self.advance_standing_up(host),
            TransitionKind::GoingToSeat => self.advance_going_to_seat(host),
        }
    }

    /// Release every seated-pose joint back to the host's animation.
    pub fn clear_pose(&self, host: &mut impl Host) {
        for t in &SEATED_POSE {
            host.clear_joint(t.joint);
        }
    }

    fn factor(&self) -> f32 {
        if self.config.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.config.duration).min(1.0)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.config.duration
    }

    fn advance_sitting_down(&mut self, host: &mut impl Host) -> Option<MotionEvent> {
        let factor = self.factor();
        if let Some(pose) = &self.pose {
            pose.apply(host, factor);
        }
        host.set_avatar_position(self.start_position - self.config.sit_offset * factor);

        if !self.finished() {
            return None;
        }
        self.slot.deregister(TransitionKind::SittingDown);
        Some(MotionEvent::SatDown)
    }

    fn advance_standing_up(&mut self, host: &mut impl Host) -> Option<MotionEvent> {
        let factor = self.factor();
        if let Some(pose) = &self.pose {
            pose.apply(host, 1.0 - factor);
        }
        host.set_avatar_position(self.start_position + self.config.sit_offset * factor);

        if !self.finished() {
            return None;
        }
        self.slot.deregister(TransitionKind::StandingUp);
        self.pose = None;
        Some(MotionEvent::StoodUp)
    }

    fn advance_going_to_seat(&mut self, host: &mut impl Host) -> Option<MotionEvent> {
        let Some(seat) = self.seat else {
            self.slot.deregister(TransitionKind::GoingToSeat);
            return None;
        };
        let duration = self.config.duration;
        let target = seat.position + self.config.approach_offset;

        if self.elapsed < duration {
            let factor = self.factor();
            host.set_avatar_position(self.start_position.lerp(target, factor));
            return None;
        }

        host.set_avatar_position(target);
        if self.elapsed < 2.0 * duration {
            let factor = (self.elapsed - duration) / duration;
            host.set_avatar_orientation(self.start_orientation.slerp(seat.orientation, factor));
            return None;
        }

        host.set_avatar_orientation(seat.orientation);
        self.slot.deregister(TransitionKind::GoingToSeat);
        self.sit_down(host);
        Some(MotionEvent::ArrivedAtSeat)
    }
}
