use glam::{Mat4, Vec2, Vec3};
use perch_common::Ray;

/// Camera used by the simulated host to turn screen clicks into pick rays.
pub struct PickCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PickCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 15.0),
            yaw: -90.0_f32.to_radians(),
            pitch: -30.0_f32.to_radians(),
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl PickCamera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Point the camera at `target`. No-op if `target` is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Ray from the camera through a pixel of a viewport of size `viewport`.
    pub fn pick_ray(&self, point: Vec2, viewport: Vec2) -> Ray {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return Ray::new(self.position, self.forward());
        }
        let ndc = Vec2::new(
            2.0 * point.x / viewport.x - 1.0,
            1.0 - 2.0 * point.y / viewport.y,
        );
        let inverse = self.view_projection(viewport.x / viewport.y).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position, (far - near).normalize_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PickCamera::default();
        assert!(cam.position.y > 0.0);
        let vp = cam.view_projection(16.0 / 9.0);
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = PickCamera {
            position: Vec3::ZERO,
            ..PickCamera::default()
        };
        cam.look_at(Vec3::new(0.0, 0.0, -5.0));
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn center_pixel_ray_matches_forward() {
        let mut cam = PickCamera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..PickCamera::default()
        };
        cam.look_at(Vec3::new(4.0, 0.0, -2.0));
        let viewport = Vec2::new(800.0, 600.0);
        let ray = cam.pick_ray(viewport / 2.0, viewport);
        assert_eq!(ray.origin, cam.position);
        assert!((ray.direction - cam.forward()).length() < 1e-3);
    }

    #[test]
    fn left_pixel_ray_bends_left() {
        let mut cam = PickCamera {
            position: Vec3::ZERO,
            ..PickCamera::default()
        };
        cam.look_at(Vec3::NEG_Z);
        let viewport = Vec2::new(800.0, 600.0);
        let ray = cam.pick_ray(Vec2::new(0.0, 300.0), viewport);
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn degenerate_viewport_falls_back_to_forward() {
        let cam = PickCamera::default();
        let ray = cam.pick_ray(Vec2::ZERO, Vec2::ZERO);
        assert_eq!(ray.direction, cam.forward());
    }
}
