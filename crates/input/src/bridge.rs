use glam::Vec2;
use perch_kernel::Host;
use perch_registry::{PickMode, SeatRegistry};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::buttons::{ButtonBar, ButtonLayout};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Key text that toggles between sitting down and standing up.
    pub toggle_key: String,
    /// Which seat wins when a click ray crosses several indicators.
    pub pick_mode: PickMode,
    pub buttons: ButtonLayout,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            toggle_key: ".".into(),
            pick_mode: PickMode::default(),
            buttons: ButtonLayout::default(),
        }
    }
}

/// Resolves raw pointer and key input into [`Action`]s.
#[derive(Debug, Clone, Default)]
pub struct InputBridge {
    pub config: InputConfig,
}

impl InputBridge {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Resolve a pointer press at `point`.
    ///
    /// Buttons are tested first. Otherwise a camera ray through the point is
    /// tested against every indicator in `registry`.
    pub fn pointer_action(
        &self,
        host: &impl Host,
        buttons: &ButtonBar,
        registry: &SeatRegistry,
        point: Vec2,
    ) -> Action {
        if let Some(action) = host
            .overlay_at_point(point)
            .and_then(|overlay| buttons.action_for(overlay))
        {
            return action;
        }
        let ray = host.compute_pick_ray(point);
        match registry.pick(&ray, self.config.pick_mode) {
            Some(seat) => {
                tracing::debug!(seat = ?seat.position, "seat clicked");
                Action::GoToSeat(seat)
            }
            None => Action::Noop,
        }
    }

    /// Resolve a key press. The toggle key stands up while sitting and sits
    /// down otherwise.
    pub fn key_action(&self, text: &str, sitting: bool) -> Action {
        if text != self.config.toggle_key {
            return Action::Noop;
        }
        if sitting {
            Action::StandUp
        } else {
            Action::SitDown
        }
    }
}
