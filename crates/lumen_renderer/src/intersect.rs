//! Ray/primitive intersection routines.
//!
//! Every routine accepts hits in the half-open range `[ray_t.min, ray_t.max)`
//! and reports a miss as `None`. Numerically degenerate configurations
//! (parallel rays, zero determinants) are ordinary misses.

use lumen_core::geometry::MaterialId;
use lumen_math::{Interval, Ray, Vec3};

use crate::primitive::Quad;

/// Smallest triangle determinant treated as non-parallel.
const TRIANGLE_EPSILON: f32 = 1e-6;

/// Smallest `|direction . normal|` treated as non-parallel for quads.
const PLANE_EPSILON: f32 = 1e-7;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Ray parameter of the hit
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Geometric normal; not flipped toward the ray
    pub normal: Vec3,
    pub material: MaterialId,
}

/// Sphere hit as `(t, point, outward normal)`.
///
/// The nearer root wins when it lies in range, otherwise the farther one.
pub fn intersect_sphere(
    ray: &Ray,
    center: Vec3,
    radius: f32,
    ray_t: Interval,
) -> Option<(f32, Vec3, Vec3)> {
    let oc = ray.origin - center;
    let a = ray.direction.length_squared();
    let half_b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant <= 0.0 || a == 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.admits(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.admits(root) {
            return None;
        }
    }

    let point = ray.at(root);
    Some((root, point, (point - center) / radius))
}

/// Möller-Trumbore triangle test, two-sided. Returns `(t, point)`.
pub fn intersect_triangle(
    ray: &Ray,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray_t: Interval,
) -> Option<(f32, Vec3)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < TRIANGLE_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if !ray_t.admits(t) {
        return None;
    }
    Some((t, ray.at(t)))
}

/// Ray against a parallelogram. Returns `(t, point)`.
///
/// The hit point is expressed in the quad's `(u, v)` basis through the
/// precomputed inverse basis matrix and accepted when both coordinates lie
/// in `[0, 1]`.
pub fn intersect_quad(ray: &Ray, quad: &Quad, ray_t: Interval) -> Option<(f32, Vec3)> {
    let denom = ray.direction.dot(quad.normal);
    if denom.abs() < PLANE_EPSILON {
        return None;
    }

    let t = (quad.position - ray.origin).dot(quad.normal) / denom;
    if !ray_t.admits(t) {
        return None;
    }

    let point = ray.at(t);
    let local = quad.to_local(point);
    if (0.0..=1.0).contains(&local.x) && (0.0..=1.0).contains(&local.y) {
        Some((t, point))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_sphere_from_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let (t, point, normal) =
            intersect_sphere(&ray, Vec3::ZERO, 1.0, Interval::from_min(1e-4)).unwrap();

        assert_eq!(t, 4.0);
        assert_eq!(point, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(normal, Vec3::Z);
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let (t, _, normal) =
            intersect_sphere(&ray, Vec3::ZERO, 2.0, Interval::from_min(1e-4)).unwrap();

        assert_eq!(t, 2.0);
        assert_eq!(normal, Vec3::X);
    }

    #[test]
    fn test_sphere_range_is_half_open() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        // Near root at exactly t_max is rejected, far root is beyond it
        assert!(intersect_sphere(&ray, Vec3::ZERO, 1.0, Interval::new(0.0, 4.0)).is_none());
        assert!(intersect_sphere(&ray, Vec3::ZERO, 1.0, Interval::new(4.0, 4.5)).is_some());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let (v0, v1, v2) = (
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        );
        let range = Interval::from_min(1e-4);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (t, point) = intersect_triangle(&ray, v0, v1, v2, range).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        assert!((point.z + 1.0).abs() < 1e-6);

        // Back side is hit as well
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        assert!(intersect_triangle(&ray, v0, v1, v2, range).is_some());

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(intersect_triangle(&ray, v0, v1, v2, range).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let hit = intersect_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Interval::from_min(1e-4),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_quad_inside_and_outside() {
        let quad = Quad::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::X * 2.0, Vec3::Z * 2.0, None).unwrap();
        let range = Interval::from_min(1e-4);

        let ray = Ray::new(Vec3::new(0.5, 3.0, 0.5), Vec3::NEG_Y);
        let (t, point) = intersect_quad(&ray, &quad, range).unwrap();
        assert!((t - 3.0).abs() < 1e-6);
        assert!(point.y.abs() < 1e-6);

        let ray = Ray::new(Vec3::new(1.5, 3.0, 0.5), Vec3::NEG_Y);
        assert!(intersect_quad(&ray, &quad, range).is_none());

        // Grazing ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(intersect_quad(&ray, &quad, range).is_none());
    }
}
