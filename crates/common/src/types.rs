use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a world object (a model) reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub Uuid);

impl ModelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a host overlay (2D image or 3D marker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u32);

/// A named, object-local place where an avatar can sit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitPoint {
    pub name: String,
    /// Offset in object space, in units of the object radius.
    pub position: Vec3,
    pub rotation: Quat,
}

impl SitPoint {
    pub fn new(name: impl Into<String>, position: Vec3, rotation: Quat) -> Self {
        Self {
            name: name.into(),
            position,
            rotation,
        }
    }
}

/// Properties of a world object as fetched from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProperties {
    pub position: Vec3,
    pub rotation: Quat,
    pub radius: f32,
    pub sitting_points: Vec<SitPoint>,
}

impl Default for ModelProperties {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            radius: 1.0,
            sitting_points: Vec::new(),
        }
    }
}

impl ModelProperties {
    /// World-space position of the sit point at `index`.
    ///
    /// The local offset is rotated by the object orientation, scaled by the
    /// object radius and added to the object position.
    pub fn sit_point_position(&self, index: usize) -> Option<Vec3> {
        let point = self.sitting_points.get(index)?;
        Some(self.position + (self.rotation * point.position) * self.radius)
    }

    /// World-space orientation of the sit point at `index`.
    pub fn sit_point_orientation(&self, index: usize) -> Option<Quat> {
        let point = self.sitting_points.get(index)?;
        Some(self.rotation * point.rotation)
    }

    /// Whether the placement fields that drive indicator positions differ.
    pub fn placement_differs(&self, other: &ModelProperties) -> bool {
        self.position != other.position
            || self.rotation != other.rotation
            || self.radius != other.radius
    }
}

/// The seat the avatar committed to: world position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSeat {
    pub position: Vec3,
    pub orientation: Quat,
}
