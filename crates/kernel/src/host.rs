use glam::{Quat, Vec2, Vec3};
use perch_common::{ModelId, ModelProperties, OverlayId, Ray};
use serde::{Deserialize, Serialize};

/// Axis-aligned screen rectangle in pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on the top-left edges, exclusive on the bottom-right.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLUE: Color = Color {
        red: 0,
        green: 0,
        blue: 255,
    };
}

/// A 2D image overlay drawn on top of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlay {
    pub bounds: Rect,
    /// Region of the source image to draw.
    pub sub_image: Rect,
    pub image_url: String,
    pub visible: bool,
    pub alpha: f32,
}

/// A 3D sphere marker placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereOverlay {
    pub position: Vec3,
    /// Diameter in world units.
    pub size: f32,
    pub solid: bool,
    pub color: Color,
    pub alpha: f32,
    pub visible: bool,
}

/// Partial update for an existing overlay. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayEdit {
    pub visible: Option<bool>,
    /// New top-left corner for image overlays.
    pub origin: Option<Vec2>,
    /// New center for sphere overlays.
    pub position: Option<Vec3>,
    pub size: Option<f32>,
}

impl OverlayEdit {
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn moved_to(origin: Vec2) -> Self {
        Self {
            origin: Some(origin),
            ..Self::default()
        }
    }

    pub fn placed(position: Vec3, size: f32) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            ..Self::default()
        }
    }
}

/// The hosting engine, as seen by the seat feature.
///
/// All calls are synchronous and assumed to succeed. Per-frame ticks, pointer
/// presses, key presses and teardown are delivered by the host calling into the
/// session rather than through this trait.
pub trait Host {
    /// Viewport size in pixels.
    fn viewport_dimensions(&self) -> Vec2;

    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> OverlayId;
    fn add_sphere_overlay(&mut self, overlay: SphereOverlay) -> OverlayId;
    fn edit_overlay(&mut self, id: OverlayId, edit: OverlayEdit);
    fn delete_overlay(&mut self, id: OverlayId);
    /// Topmost visible 2D overlay under `point`, if any.
    fn overlay_at_point(&self, point: Vec2) -> Option<OverlayId>;

    fn avatar_position(&self) -> Vec3;
    fn set_avatar_position(&mut self, position: Vec3);
    fn avatar_orientation(&self) -> Quat;
    fn set_avatar_orientation(&mut self, orientation: Quat);
    fn avatar_scale(&self) -> f32;

    fn joint_rotation(&self, joint: &str) -> Quat;
    fn set_joint_rotation(&mut self, joint: &str, rotation: Quat);
    /// Hand the joint back to the host's own animation.
    fn clear_joint(&mut self, joint: &str);

    /// Objects within `radius` of `center`.
    fn find_models(&self, center: Vec3, radius: f32) -> Vec<ModelId>;
    fn model_properties(&self, id: ModelId) -> Option<ModelProperties>;
    fn set_model_glow(&mut self, id: ModelId, level: f32);

    /// World-space ray from the camera through a screen point.
    fn compute_pick_ray(&self, point: Vec2) -> Ray;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 20.0, 37.0, 46.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(46.9, 65.9)));
        assert!(!r.contains(Vec2::new(47.0, 30.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
    }

    #[test]
    fn overlay_edit_constructors() {
        let e = OverlayEdit::visible(false);
        assert_eq!(e.visible, Some(false));
        assert!(e.origin.is_none());

        let e = OverlayEdit::placed(Vec3::ONE, 0.5);
        assert_eq!(e.position, Some(Vec3::ONE));
        assert_eq!(e.size, Some(0.5));
        assert!(e.visible.is_none());
    }
}
