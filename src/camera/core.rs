use glam::{Mat4, Vec2, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

/// World-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, options.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }

    /// Ray through a screen UV (origin top-left, `[0, 1]` on both axes).
    #[must_use]
    pub fn ray_through(&self, uv: Vec2) -> Ray {
        let ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
        let inverse = self.build_matrix().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let far = far.truncate() / far.w;
        Ray {
            origin: self.eye,
            direction: (far - self.eye).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera::from_options(&CameraOptions::default(), 1.5);
        let ray = camera.ray_through(Vec2::splat(0.5));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn top_of_screen_looks_up() {
        let camera = Camera::from_options(&CameraOptions::default(), 1.0);
        let ray = camera.ray_through(Vec2::new(0.5, 0.0));
        assert!(ray.direction.y > 0.0);
        // Half the vertical field of view above the axis
        let angle = ray.direction.y.atan2(-ray.direction.z).to_degrees();
        assert!((angle - 22.5).abs() < 1e-3);
    }
}
