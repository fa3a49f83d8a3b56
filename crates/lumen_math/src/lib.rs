// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// RGB color in linear space. Shares storage with [`Vec3`].
pub type Color = Vec3;

/// Index of the largest component of `v` (0=X, 1=Y, 2=Z).
///
/// Ties resolve toward the lower axis.
pub fn max_axis(v: Vec3) -> usize {
    if v.x >= v.y && v.x >= v.z {
        0
    } else if v.y >= v.z {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
    }

    #[test]
    fn test_max_axis() {
        assert_eq!(max_axis(Vec3::new(3.0, 1.0, 2.0)), 0);
        assert_eq!(max_axis(Vec3::new(1.0, 3.0, 2.0)), 1);
        assert_eq!(max_axis(Vec3::new(1.0, 2.0, 3.0)), 2);
        assert_eq!(max_axis(Vec3::splat(1.0)), 0);
    }
}
