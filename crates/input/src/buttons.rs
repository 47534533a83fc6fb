use glam::Vec2;
use perch_common::OverlayId;
use perch_kernel::{Host, ImageOverlay, OverlayEdit, Rect};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Size and artwork of the sit/stand buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLayout {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    /// Sprite sheet holding both button images side by side.
    pub image_url: String,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self {
            width: 37.0,
            height: 46.0,
            padding: 10.0,
            image_url: "https://worklist-prod.s3.amazonaws.com/attachment/0aca88e1-9bd8-5c1d.svg"
                .into(),
        }
    }
}

impl ButtonLayout {
    /// Top-left corner of both buttons: against the right edge, just above
    /// vertical center.
    pub fn origin(&self, viewport: Vec2) -> Vec2 {
        Vec2::new(
            viewport.x - self.padding - self.width,
            (viewport.y - self.height) / 2.0 - (self.height + self.padding),
        )
    }

    fn sub_image(&self, column: f32) -> Rect {
        Rect::new(self.width * column, self.height, self.width, self.height)
    }
}

/// The sit-down and stand-up buttons. Exactly one is visible at a time.
#[derive(Debug)]
pub struct ButtonBar {
    sit: OverlayId,
    stand: OverlayId,
    layout: ButtonLayout,
    viewport: Vec2,
}

impl ButtonBar {
    /// Create both overlays; the sit button starts visible.
    pub fn create(host: &mut impl Host, layout: ButtonLayout) -> Self {
        let viewport = host.viewport_dimensions();
        let origin = layout.origin(viewport);
        let bounds = Rect::new(origin.x, origin.y, layout.width, layout.height);
        let sit = host.add_image_overlay(ImageOverlay {
            bounds,
            sub_image: layout.sub_image(0.0),
            image_url: layout.image_url.clone(),
            visible: true,
            alpha: 1.0,
        });
        let stand = host.add_image_overlay(ImageOverlay {
            bounds,
            sub_image: layout.sub_image(1.0),
            image_url: layout.image_url.clone(),
            visible: false,
            alpha: 1.0,
        });
        Self {
            sit,
            stand,
            layout,
            viewport,
        }
    }

    /// Move both buttons if the viewport changed size. Returns whether it did.
    pub fn relayout_if_resized(&mut self, host: &mut impl Host) -> bool {
        let viewport = host.viewport_dimensions();
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        let origin = self.layout.origin(viewport);
        host.edit_overlay(self.sit, OverlayEdit::moved_to(origin));
        host.edit_overlay(self.stand, OverlayEdit::moved_to(origin));
        tracing::debug!(?viewport, "buttons relaid out");
        true
    }

    /// Show the button matching the sitting flag: stand-up while sitting,
    /// sit-down otherwise.
    pub fn show_sitting(&self, host: &mut impl Host, sitting: bool) {
        host.edit_overlay(self.sit, OverlayEdit::visible(!sitting));
        host.edit_overlay(self.stand, OverlayEdit::visible(sitting));
    }

    /// The action for a click on `overlay`, if it is one of the buttons.
    pub fn action_for(&self, overlay: OverlayId) -> Option<Action> {
        if overlay == self.sit {
            Some(Action::SitDown)
        } else if overlay == self.stand {
            Some(Action::StandUp)
        } else {
            None
        }
    }

    pub fn sit_overlay(&self) -> OverlayId {
        self.sit
    }

    pub fn stand_overlay(&self) -> OverlayId {
        self.stand
    }

    pub fn remove(self, host: &mut impl Host) {
        host.delete_overlay(self.sit);
        host.delete_overlay(self.stand);
    }
}
