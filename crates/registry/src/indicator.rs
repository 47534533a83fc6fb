use glam::{Quat, Vec3};
use perch_common::{ModelProperties, OverlayId, TargetSeat};
use perch_kernel::{Color, Host, OverlayEdit, SphereOverlay};

/// A sphere marker shown at a sit point's world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub overlay: OverlayId,
    pub position: Vec3,
    pub orientation: Quat,
    /// Sphere diameter.
    pub scale: f32,
}

impl Indicator {
    /// Create the overlay for sit point `index` of `properties`.
    ///
    /// Returns `None` if the object has no such sit point.
    pub(crate) fn spawn(
        host: &mut impl Host,
        properties: &ModelProperties,
        index: usize,
        scale: f32,
        alpha: f32,
        visible: bool,
    ) -> Option<Self> {
        let position = properties.sit_point_position(index)?;
        let orientation = properties.sit_point_orientation(index)?;
        let overlay = host.add_sphere_overlay(SphereOverlay {
            position,
            size: scale,
            solid: true,
            color: Color::BLUE,
            alpha,
            visible,
        });
        Some(Self {
            overlay,
            position,
            orientation,
            scale,
        })
    }

    /// Recompute placement from the object's current properties and push it
    /// to the overlay.
    pub(crate) fn refresh(
        &mut self,
        host: &mut impl Host,
        properties: &ModelProperties,
        index: usize,
        scale: f32,
    ) {
        let (Some(position), Some(orientation)) = (
            properties.sit_point_position(index),
            properties.sit_point_orientation(index),
        ) else {
            return;
        };
        self.position = position;
        self.orientation = orientation;
        self.scale = scale;
        host.edit_overlay(self.overlay, OverlayEdit::placed(position, scale));
    }

    pub(crate) fn show(&self, host: &mut impl Host, visible: bool) {
        host.edit_overlay(self.overlay, OverlayEdit::visible(visible));
    }

    pub(crate) fn cleanup(&self, host: &mut impl Host) {
        host.delete_overlay(self.overlay);
    }

    /// Radius of the bounding sphere used for picking.
    pub fn pick_radius(&self) -> f32 {
        self.scale / 2.0
    }

    pub fn target_seat(&self) -> TargetSeat {
        TargetSeat {
            position: self.position,
            orientation: self.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_common::SitPoint;
    use perch_kernel::{Overlay, SimHost};

    fn chair() -> ModelProperties {
        ModelProperties {
            position: Vec3::new(1.0, 0.0, 1.0),
            rotation: Quat::IDENTITY,
            radius: 2.0,
            sitting_points: vec![SitPoint::new("front", Vec3::new(0.0, 0.25, 0.5), Quat::IDENTITY)],
        }
    }

    #[test]
    fn spawn_places_sphere_at_sit_point() {
        let mut host = SimHost::new();
        let ind = Indicator::spawn(&mut host, &chair(), 0, 0.1, 0.3, true).unwrap();
        assert_eq!(ind.position, Vec3::new(1.0, 0.5, 2.0));
        let Some(Overlay::Sphere(s)) = host.overlay(ind.overlay) else {
            panic!("expected sphere overlay");
        };
        assert_eq!(s.position, ind.position);
        assert_eq!(s.color, Color::BLUE);
        assert!(s.solid);
    }

    #[test]
    fn spawn_missing_sit_point_creates_nothing() {
        let mut host = SimHost::new();
        assert!(Indicator::spawn(&mut host, &chair(), 4, 0.1, 0.3, true).is_none());
        assert!(host.overlays().is_empty());
    }

    #[test]
    fn refresh_follows_object() {
        let mut host = SimHost::new();
        let mut props = chair();
        let mut ind = Indicator::spawn(&mut host, &props, 0, 0.1, 0.3, true).unwrap();
        props.position = Vec3::new(2.0, 0.0, 1.0);
        ind.refresh(&mut host, &props, 0, 0.2);
        assert_eq!(ind.position, Vec3::new(2.0, 0.5, 2.0));
        assert_eq!(ind.pick_radius(), 0.1);
    }

    #[test]
    fn cleanup_deletes_overlay() {
        let mut host = SimHost::new();
        let ind = Indicator::spawn(&mut host, &chair(), 0, 0.1, 0.3, true).unwrap();
        ind.cleanup(&mut host);
        assert!(host.overlay(ind.overlay).is_none());
    }
}
