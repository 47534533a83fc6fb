use glam::Vec2;
use perch_input::{Action, ButtonBar, InputBridge};
use perch_kernel::Host;
use perch_motion::{AvatarMotion, AvatarState, MotionEvent};
use perch_registry::SeatRegistry;

use crate::config::{ConfigError, SessionConfig};

/// State of the seat feature for one avatar.
///
/// The host calls [`on_tick`](Self::on_tick) every frame, forwards pointer
/// and key presses, and calls [`shutdown`](Self::shutdown) on teardown.
pub struct SitSession {
    config: SessionConfig,
    registry: SeatRegistry,
    motion: AvatarMotion,
    input: InputBridge,
    buttons: ButtonBar,
}

impl SitSession {
    /// Validate `config` and put the sit/stand buttons on screen.
    pub fn start(host: &mut impl Host, config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buttons = ButtonBar::create(host, config.input.buttons.clone());
        tracing::info!(
            search_radius = config.registry.search_radius,
            duration = config.motion.duration,
            "seat session started"
        );
        Ok(Self {
            registry: SeatRegistry::new(config.registry.clone()),
            motion: AvatarMotion::new(config.motion.clone()),
            input: InputBridge::new(config.input.clone()),
            buttons,
            config,
        })
    }

    /// Per-frame update: button layout, seat scan, then the running transition.
    pub fn on_tick(&mut self, host: &mut impl Host, dt: f32) {
        self.buttons.relayout_if_resized(host);

        let position = host.avatar_position();
        self.registry.update(host, position);

        match self.motion.advance(host, dt) {
            Some(MotionEvent::ArrivedAtSeat) => {
                self.buttons.show_sitting(host, true);
                self.registry.set_visible(host, true);
                tracing::info!("arrived at seat");
            }
            Some(event) => tracing::debug!(?event, "transition finished"),
            None => {}
        }
    }

    pub fn on_pointer_press(&mut self, host: &mut impl Host, point: Vec2) {
        let action = self
            .input
            .pointer_action(&*host, &self.buttons, &self.registry, point);
        self.apply(host, action);
    }

    pub fn on_key_press(&mut self, host: &mut impl Host, text: &str) {
        let action = self.input.key_action(text, self.motion.is_sitting());
        self.apply(host, action);
    }

    /// Apply a resolved action.
    ///
    /// Buttons swap as soon as a sit-down or stand-up starts, not when it
    /// finishes. A sit-down or stand-up cancels any walk to a seat, so hidden
    /// indicators come back.
    pub fn apply(&mut self, host: &mut impl Host, action: Action) {
        match action {
            Action::SitDown => {
                self.motion.sit_down(host);
                self.buttons.show_sitting(host, true);
                self.registry.set_visible(host, true);
            }
            Action::StandUp => {
                self.motion.stand_up(host);
                self.buttons.show_sitting(host, false);
                self.registry.set_visible(host, true);
            }
            Action::GoToSeat(seat) => {
                self.motion.go_to_seat(host, seat);
                self.registry.set_visible(host, false);
            }
            Action::Noop => {}
        }
    }

    /// Release the rig, remove the buttons and destroy every indicator.
    pub fn shutdown(mut self, host: &mut impl Host) {
        self.motion.clear_pose(host);
        self.buttons.remove(host);
        self.registry.clear(host);
        tracing::info!("seat session shut down");
    }

    pub fn state(&self) -> AvatarState {
        self.motion.state()
    }

    pub fn is_sitting(&self) -> bool {
        self.motion.is_sitting()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &SeatRegistry {
        &self.registry
    }

    pub fn motion(&self) -> &AvatarMotion {
        &self.motion
    }

    pub fn buttons(&self) -> &ButtonBar {
        &self.buttons
    }
}
