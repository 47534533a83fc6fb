use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A pick ray in world space. `direction` need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Distance along the ray to the point of closest approach to `center`, if the
/// sphere is hit.
///
/// With `x` the projection of `center - origin` onto the normalized direction,
/// the sphere is rejected when `x <= 0` (behind the origin) and accepted when
/// the perpendicular distance from `center` to the ray is at most `radius`.
pub fn ray_sphere_distance(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let dir = ray.direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    let x = (center - ray.origin).dot(dir);
    if x <= 0.0 {
        return None;
    }
    let closest = ray.origin + dir * x;
    (center.distance(closest) <= radius).then_some(x)
}

/// Boolean form of [`ray_sphere_distance`].
pub fn ray_sphere_intersection(ray: &Ray, center: Vec3, radius: f32) -> bool {
    ray_sphere_distance(ray, center, radius).is_some()
}
