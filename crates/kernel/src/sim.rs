use glam::{Quat, Vec2, Vec3};
use perch_common::{ModelId, ModelProperties, OverlayId, Ray};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::camera::PickCamera;
use crate::host::{Host, ImageOverlay, OverlayEdit, SphereOverlay};

/// A record produced by every mutation the feature makes through the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    OverlayAdded { id: OverlayId },
    OverlayEdited { id: OverlayId },
    OverlayDeleted { id: OverlayId },
    AvatarMoved { position: Vec3 },
    AvatarTurned { orientation: Quat },
    JointSet { joint: String, rotation: Quat },
    JointCleared { joint: String },
    GlowSet { model: ModelId, level: f32 },
}

/// An overlay held by the simulated host.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Image(ImageOverlay),
    Sphere(SphereOverlay),
}

impl Overlay {
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Image(image) => image.visible,
            Self::Sphere(sphere) => sphere.visible,
        }
    }

    fn apply(&mut self, edit: &OverlayEdit) {
        match self {
            Self::Image(image) => {
                if let Some(visible) = edit.visible {
                    image.visible = visible;
                }
                if let Some(origin) = edit.origin {
                    image.bounds.x = origin.x;
                    image.bounds.y = origin.y;
                }
            }
            Self::Sphere(sphere) => {
                if let Some(visible) = edit.visible {
                    sphere.visible = visible;
                }
                if let Some(position) = edit.position {
                    sphere.position = position;
                }
                if let Some(size) = edit.size {
                    sphere.size = size;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct SimModel {
    properties: ModelProperties,
    glow: f32,
}

/// In-memory host used by tests and the scenario runner.
///
/// Objects and overlays live in BTreeMaps for deterministic iteration; overlay
/// ids increase monotonically and are never reused.
pub struct SimHost {
    viewport: Vec2,
    overlays: BTreeMap<OverlayId, Overlay>,
    next_overlay: u32,
    models: BTreeMap<ModelId, SimModel>,
    avatar_position: Vec3,
    avatar_orientation: Quat,
    avatar_scale: f32,
    joints: BTreeMap<String, Quat>,
    camera: PickCamera,
    event_log: Vec<HostEvent>,
}

impl Default for SimHost {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(1280.0, 720.0),
            overlays: BTreeMap::new(),
            next_overlay: 1,
            models: BTreeMap::new(),
            avatar_position: Vec3::ZERO,
            avatar_orientation: Quat::IDENTITY,
            avatar_scale: 1.0,
            joints: BTreeMap::new(),
            camera: PickCamera::default(),
            event_log: Vec::new(),
        }
    }
}

impl SimHost {
    /// Create a host with a 1280x720 viewport and the avatar at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn set_avatar_scale(&mut self, scale: f32) {
        self.avatar_scale = scale;
    }

    pub fn camera(&self) -> &PickCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PickCamera {
        &mut self.camera
    }

    /// Add a world object. Returns its id.
    pub fn spawn_model(&mut self, properties: ModelProperties) -> ModelId {
        let id = ModelId::new();
        self.spawn_model_with_id(id, properties);
        id
    }

    pub fn spawn_model_with_id(&mut self, id: ModelId, properties: ModelProperties) {
        self.models.insert(
            id,
            SimModel {
                properties,
                glow: 1.0,
            },
        );
    }

    pub fn despawn_model(&mut self, id: ModelId) -> Option<ModelProperties> {
        self.models.remove(&id).map(|m| m.properties)
    }

    /// Move an object. Returns false if it does not exist.
    pub fn set_model_position(&mut self, id: ModelId, position: Vec3) -> bool {
        if let Some(model) = self.models.get_mut(&id) {
            model.properties.position = position;
            true
        } else {
            false
        }
    }

    pub fn model_glow(&self, id: ModelId) -> Option<f32> {
        self.models.get(&id).map(|m| m.glow)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Read-only access to all live overlays.
    pub fn overlays(&self) -> &BTreeMap<OverlayId, Overlay> {
        &self.overlays
    }

    /// Live sphere overlays, in creation order.
    pub fn spheres(&self) -> impl Iterator<Item = (OverlayId, &SphereOverlay)> {
        self.overlays.iter().filter_map(|(id, overlay)| match overlay {
            Overlay::Sphere(sphere) => Some((*id, sphere)),
            Overlay::Image(_) => None,
        })
    }

    /// Current rig override for `joint`, if one is set.
    pub fn joint_override(&self, joint: &str) -> Option<Quat> {
        self.joints.get(joint).copied()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[HostEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.event_log)
    }

    fn insert_overlay(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.next_overlay);
        self.next_overlay += 1;
        self.overlays.insert(id, overlay);
        self.event_log.push(HostEvent::OverlayAdded { id });
        id
    }
}

impl Host for SimHost {
    fn viewport_dimensions(&self) -> Vec2 {
        self.viewport
    }

    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> OverlayId {
        self.insert_overlay(Overlay::Image(overlay))
    }

    fn add_sphere_overlay(&mut self, overlay: SphereOverlay) -> OverlayId {
        self.insert_overlay(Overlay::Sphere(overlay))
    }

    fn edit_overlay(&mut self, id: OverlayId, edit: OverlayEdit) {
        let Some(overlay) = self.overlays.get_mut(&id) else {
            tracing::warn!(?id, "edit of unknown overlay ignored");
            return;
        };
        overlay.apply(&edit);
        self.event_log.push(HostEvent::OverlayEdited { id });
    }

    fn delete_overlay(&mut self, id: OverlayId) {
        if self.overlays.remove(&id).is_some() {
            self.event_log.push(HostEvent::OverlayDeleted { id });
        } else {
            tracing::warn!(?id, "delete of unknown overlay ignored");
        }
    }

    fn overlay_at_point(&self, point: Vec2) -> Option<OverlayId> {
        // Later overlays draw on top.
        self.overlays
            .iter()
            .rev()
            .find_map(|(id, overlay)| match overlay {
                Overlay::Image(image) if image.visible && image.bounds.contains(point) => {
                    Some(*id)
                }
                _ => None,
            })
    }

    fn avatar_position(&self) -> Vec3 {
        self.avatar_position
    }

    fn set_avatar_position(&mut self, position: Vec3) {
        self.avatar_position = position;
        self.event_log.push(HostEvent::AvatarMoved { position });
    }

    fn avatar_orientation(&self) -> Quat {
        self.avatar_orientation
    }

    fn set_avatar_orientation(&mut self, orientation: Quat) {
        self.avatar_orientation = orientation;
        self.event_log.push(HostEvent::AvatarTurned { orientation });
    }

    fn avatar_scale(&self) -> f32 {
        self.avatar_scale
    }

    fn joint_rotation(&self, joint: &str) -> Quat {
        self.joints.get(joint).copied().unwrap_or(Quat::IDENTITY)
    }

    fn set_joint_rotation(&mut self, joint: &str, rotation: Quat) {
        self.joints.insert(joint.to_owned(), rotation);
        self.event_log.push(HostEvent::JointSet {
            joint: joint.to_owned(),
            rotation,
        });
    }

    fn clear_joint(&mut self, joint: &str) {
        self.joints.remove(joint);
        self.event_log.push(HostEvent::JointCleared {
            joint: joint.to_owned(),
        });
    }

    fn find_models(&self, center: Vec3, radius: f32) -> Vec<ModelId> {
        self.models
            .iter()
            .filter(|(_, m)| m.properties.position.distance(center) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn model_properties(&self, id: ModelId) -> Option<ModelProperties> {
        self.models.get(&id).map(|m| m.properties.clone())
    }

    fn set_model_glow(&mut self, id: ModelId, level: f32) {
        if let Some(model) = self.models.get_mut(&id) {
            model.glow = level;
            self.event_log.push(HostEvent::GlowSet { model: id, level });
        }
    }

    fn compute_pick_ray(&self, point: Vec2) -> Ray {
        self.camera.pick_ray(point, self.viewport)
    }
}
