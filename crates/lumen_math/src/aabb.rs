use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as its two extreme corners. `Aabb::EMPTY` has `min > max` on every
/// axis and acts as the identity for [`Aabb::surrounding`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its corners. The caller guarantees `min <= max`.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest AABB containing every point of the iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::new(acc.min.min(p), acc.max.max(p)))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Grow any axis thinner than `delta` so the box never has zero width.
    ///
    /// Flat primitives (axis-aligned triangles and quads) would otherwise
    /// produce slabs that a ray can never enter.
    pub fn padded(&self, delta: f32) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            if max[axis] - min[axis] < delta {
                min[axis] -= delta * 0.5;
                max[axis] += delta * 0.5;
            }
        }
        Self { min, max }
    }

    /// Extent of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        crate::max_axis(self.extent())
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test: the parametric range over which the ray is inside the box,
    /// clipped to `ray_t`.
    ///
    /// Per axis the entry and exit distances are `(min - origin) / direction`
    /// and `(max - origin) / direction`, swapped when the direction component
    /// is negative. The hit range is the intersection of the three per-axis
    /// ranges and must be non-empty with an exit that is not behind the origin.
    pub fn slab(&self, ray: &Ray, mut ray_t: Interval) -> Option<Interval> {
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t_in = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t_out = (self.max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t_in, &mut t_out);
            }
            // f32::max/min discard NaN from 0 * inf on grazing axes
            ray_t.min = ray_t.min.max(t_in);
            ray_t.max = ray_t.max.min(t_out);
            if ray_t.min > ray_t.max {
                return None;
            }
        }

        if ray_t.max >= 0.0 {
            Some(ray_t)
        } else {
            None
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.slab(ray, ray_t).is_some()
    }

    /// The empty box, hit by no ray.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_enclosing() {
        let aabb = Aabb::enclosing([
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ]);

        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::new(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::new(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Vec3::ZERO);
        assert_eq!(surrounding.max, Vec3::splat(10.0));

        // EMPTY is the identity of the union
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_padded() {
        let flat = Aabb::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        let padded = flat.padded(0.01);

        assert!(padded.extent().z > 0.0);
        assert_eq!(padded.min.x, 0.0);
        assert_eq!(padded.max.x, 1.0);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let range = aabb.slab(&ray, Interval::new(0.0, 100.0)).unwrap();
        assert!((range.min - 4.0).abs() < 1e-6);
        assert!((range.max - 6.0).abs() < 1e-6);

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Range ends before the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_from_inside() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 1.0));
        assert!(aabb.hit(&ray, Interval::from_min(0.0)));
    }

    #[test]
    fn test_aabb_hit_axis_parallel() {
        // Direction has zero components; the slab on those axes is infinite
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.5, 0.5, -3.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::from_min(0.0)));

        let ray = Ray::new(Vec3::new(1.5, 0.5, -3.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::from_min(0.0)));
    }

    #[test]
    fn test_aabb_centroid_and_axis() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(10.0, 2.0, 4.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 1.0, 2.0));
        assert_eq!(aabb.longest_axis(), 0);

        let aabb_y = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }
}
