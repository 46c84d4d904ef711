use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed look-at camera with a perspective projection.
///
/// Only the aspect ratio changes after startup (on window resize).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 65.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Update the aspect ratio for a new framebuffer size. A zero height
    /// (minimized window) leaves the camera untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        tracing::debug!(width, height, aspect = self.aspect, "camera resized");
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.fov_degrees, 65.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 100.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn resize_sets_exact_aspect() {
        let mut cam = Camera::default();
        cam.resize(800, 600);
        assert_eq!(cam.aspect, 800.0 / 600.0);
        assert_eq!(cam.fov_degrees, 65.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 100.0);

        let expected = Mat4::perspective_rh(65.0_f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(cam.projection_matrix(), expected);
    }

    #[test]
    fn resize_ignores_zero_height() {
        let mut cam = Camera::default();
        cam.resize(640, 0);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::default();
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
