//! World-space primitives the BVH is built over.

use lumen_core::geometry::MaterialId;
use lumen_math::{Aabb, Interval, Mat3, Ray, Vec3};

use crate::intersect::{intersect_quad, intersect_sphere, intersect_triangle, HitRecord};

/// A parallelogram `position + s * u + t * v`, `(s, t)` in `[0, 1]^2`.
///
/// Shared by plane primitives and area lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub position: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    /// Unit normal used for the plane equation and shading
    pub normal: Vec3,
    /// Inverse of the basis matrix `[u, v, u x v]`
    inverse: Mat3,
}

impl Quad {
    /// Build a quad. `normal` defaults to `normalize(u x v)`.
    ///
    /// Returns `None` when `u` and `v` are parallel or zero.
    pub fn new(position: Vec3, u: Vec3, v: Vec3, normal: Option<Vec3>) -> Option<Self> {
        let w = u.cross(v);
        if w.length_squared() <= f32::EPSILON * f32::EPSILON {
            return None;
        }
        let basis = Mat3::from_cols(u, v, w);
        let normal = normal
            .filter(|n| n.length_squared() > 0.0)
            .map(Vec3::normalize)
            .unwrap_or_else(|| w.normalize());

        Some(Self {
            position,
            u,
            v,
            normal,
            inverse: basis.inverse(),
        })
    }

    /// Coordinates of `point` in the `(u, v, u x v)` basis.
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.inverse * (point - self.position)
    }

    /// Point at parametric coordinates `(s, t)`.
    #[inline]
    pub fn point_at(&self, s: f32, t: f32) -> Vec3 {
        self.position + s * self.u + t * self.v
    }

    /// Surface area, `|u x v|`.
    pub fn area(&self) -> f32 {
        self.u.cross(self.v).length()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing([
            self.position,
            self.position + self.u,
            self.position + self.v,
            self.position + self.u + self.v,
        ])
    }
}

/// A primitive in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere {
        center: Vec3,
        radius: f32,
        material: MaterialId,
    },
    Triangle {
        vertices: [Vec3; 3],
        normal: Vec3,
        material: MaterialId,
    },
    Plane {
        quad: Quad,
        material: MaterialId,
    },
}

impl Primitive {
    pub fn material(&self) -> MaterialId {
        match self {
            Primitive::Sphere { material, .. }
            | Primitive::Triangle { material, .. }
            | Primitive::Plane { material, .. } => *material,
        }
    }

    /// Tight bounding box.
    pub fn bounds(&self) -> Aabb {
        match self {
            Primitive::Sphere { center, radius, .. } => {
                let r = Vec3::splat(*radius);
                Aabb::new(*center - r, *center + r)
            }
            Primitive::Triangle { vertices, .. } => Aabb::enclosing(vertices.iter().copied()),
            Primitive::Plane { quad, .. } => quad.bounds(),
        }
    }

    /// Closest intersection within `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Primitive::Sphere {
                center,
                radius,
                material,
            } => intersect_sphere(ray, *center, *radius, ray_t).map(|(t, point, normal)| {
                HitRecord {
                    t,
                    point,
                    normal,
                    material: *material,
                }
            }),
            Primitive::Triangle {
                vertices: [v0, v1, v2],
                normal,
                material,
            } => intersect_triangle(ray, *v0, *v1, *v2, ray_t).map(|(t, point)| HitRecord {
                t,
                point,
                normal: *normal,
                material: *material,
            }),
            Primitive::Plane { quad, material } => {
                intersect_quad(ray, quad, ray_t).map(|(t, point)| HitRecord {
                    t,
                    point,
                    normal: quad.normal,
                    material: *material,
                })
            }
        }
    }
}
