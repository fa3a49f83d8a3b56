// Transform utilities for Mat4
//
// Extends glam::Mat4 with the helpers the world-transform pass needs.
// Note: glam::Mat4 already provides transform_point3() and inverse()

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Build the model matrix `translate * scale`.
    fn from_translation_scale(translation: Vec3, scale: Vec3) -> Mat4;

    /// Transform a surface normal by the inverse transpose of the upper 3x3.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn from_translation_scale(translation: Vec3, scale: Vec3) -> Mat4 {
        Mat4::from_translation(translation) * Mat4::from_scale(scale)
    }

    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        let inv_t = self.inverse().transpose();
        inv_t.transform_vector3(normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (lo, hi) = (aabb.min, aabb.max);
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            self.transform_point3(corner)
        });
        Aabb::enclosing(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_scale_order() {
        // Scale applies first, then translation
        let mat = Mat4::from_translation_scale(Vec3::new(10.0, 0.0, 0.0), Vec3::splat(2.0));
        let p = mat.transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_transform_vector3_no_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(mat.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_transform_normal_nonuniform_scale() {
        // A 45 degree normal squashed along x tilts toward x
        let mat = Mat4::from_scale(Vec3::new(0.5, 1.0, 1.0));
        let n = mat.transform_normal3(Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(n.x > n.y);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::splat(5.0));
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max - Vec3::splat(6.0)).length() < 0.001);
    }
}
