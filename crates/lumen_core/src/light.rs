//! Light buffers.
//!
//! Area lights take part in global illumination. The first point light
//! drives the direct ray caster. Directional and spot lights are part of
//! the scene format and are kept so scenes round-trip.

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// An emitting parallelogram spanned by `u` and `v` from `position`.
///
/// Emits `radiance` from the side its normal (`u x v`) faces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaLight {
    pub radiance: Color,
    pub position: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

impl AreaLight {
    pub fn new(radiance: Color, position: Vec3, u: Vec3, v: Vec3) -> Self {
        Self {
            radiance,
            position,
            u,
            v,
        }
    }

    /// Surface area, `|u x v|`.
    pub fn area(&self) -> f32 {
        self.u.cross(self.v).length()
    }

    /// Unit normal, `normalize(u x v)`.
    pub fn normal(&self) -> Vec3 {
        self.u.cross(self.v).normalize_or_zero()
    }

    /// Point at parametric coordinates `(s, t)` in `[0, 1]^2`.
    pub fn point_at(&self, s: f32, t: f32) -> Vec3 {
        self.position + s * self.u + t * self.v
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Vec3,
}

impl PointLight {
    pub fn new(intensity: Color, position: Vec3) -> Self {
        Self {
            intensity,
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub irradiance: Color,
    pub direction: Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub intensity: Color,
    pub position: Vec3,
    pub direction: Vec3,
    /// Half angle of the cone in degrees
    pub hot_spot: f32,
    /// Fall-off half angle in degrees
    pub fall_off: f32,
}
