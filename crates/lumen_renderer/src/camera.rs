//! Pinhole camera for primary ray generation.

use lumen_math::{Ray, Vec3};

/// Pinhole camera mapping normalized image coordinates to rays.
///
/// `(0, 0)` is the bottom-left corner of the image plane and `(1, 1)` the
/// top-right one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Build from a scene camera description and an aspect ratio.
    pub fn new(desc: &lumen_core::Camera, aspect: f32) -> Self {
        let half_height = (desc.fov.to_radians() * 0.5).tan();
        let viewport_height = 2.0 * half_height;
        let viewport_width = aspect * viewport_height;

        let w = (desc.position - desc.look_at).normalize();
        let u = desc.up.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;

        Self {
            position: desc.position,
            lower_left: desc.position - horizontal * 0.5 - vertical * 0.5 - w,
            horizontal,
            vertical,
        }
    }

    /// Ray through normalized image coordinates `(x, y)`.
    #[inline]
    pub fn shoot(&self, x: f32, y: f32) -> Ray {
        Ray::normalized(
            self.position,
            self.lower_left + x * self.horizontal + y * self.vertical - self.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_z() -> Camera {
        let desc = lumen_core::Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov: 90.0,
            aspect: None,
        };
        Camera::new(&desc, 2.0)
    }

    #[test]
    fn test_center_ray_hits_look_at() {
        let ray = looking_down_z().shoot(0.5, 0.5);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_corners_follow_fov_and_aspect() {
        let camera = looking_down_z();

        // 90 degree vertical fov: top edge at 45 degrees
        let top = camera.shoot(0.5, 1.0).direction;
        assert!((top.y - (-top.z)).abs() < 1e-5);
        assert!(top.y > 0.0);

        // Aspect 2: right edge twice as far out as the top edge
        let right = camera.shoot(1.0, 0.5).direction;
        assert!((right.x / -right.z - 2.0).abs() < 1e-5);

        let bottom_left = camera.shoot(0.0, 0.0).direction;
        assert!(bottom_left.x < 0.0 && bottom_left.y < 0.0);
    }
}
