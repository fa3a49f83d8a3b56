//! Primitive buffers and the nodes that place them in the world.
//!
//! Primitives are stored in per-kind buffers on the [`Scene`](crate::Scene).
//! A [`Node`] names one buffer entry and the [`Model`] whose transform moves
//! it into world space.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

/// Index into `Scene::materials`.
pub type MaterialId = usize;

/// A sphere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    pub fn new(position: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            material,
        }
    }
}

/// A single triangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    /// Face normal. Zero means "derive from winding".
    #[serde(default)]
    pub normal: Vec3,
    pub material: MaterialId,
}

impl Triangle {
    /// Create a triangle whose normal follows the counter-clockwise winding.
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3, material: MaterialId) -> Self {
        Self {
            v1,
            v2,
            v3,
            normal: Vec3::ZERO,
            material,
        }
    }

    /// The stored normal, or the winding normal when none was given.
    pub fn face_normal(&self) -> Vec3 {
        if self.normal.length_squared() > 0.0 {
            self.normal.normalize()
        } else {
            (self.v2 - self.v1).cross(self.v3 - self.v1).normalize_or_zero()
        }
    }
}

/// A parallelogram spanned by `u` and `v` from `position`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub position: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    /// Surface normal. Zero means `normalize(u x v)`.
    #[serde(default)]
    pub normal: Vec3,
    pub material: MaterialId,
}

impl Plane {
    pub fn new(position: Vec3, u: Vec3, v: Vec3, material: MaterialId) -> Self {
        Self {
            position,
            u,
            v,
            normal: Vec3::ZERO,
            material,
        }
    }

    /// The stored normal, or `normalize(u x v)` when none was given.
    pub fn face_normal(&self) -> Vec3 {
        if self.normal.length_squared() > 0.0 {
            self.normal.normalize()
        } else {
            self.u.cross(self.v).normalize_or_zero()
        }
    }
}

/// Which primitive buffer a node points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Sphere,
    Triangle,
    Plane,
    Mesh,
}

/// Places one primitive buffer entry in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Index into the buffer selected by `kind`
    pub entity: usize,
    /// Index into `Scene::models`; `None` leaves the entity in place
    #[serde(default)]
    pub model: Option<usize>,
}

impl Node {
    pub fn new(kind: NodeKind, entity: usize) -> Self {
        Self {
            kind,
            entity,
            model: None,
        }
    }

    pub fn with_model(mut self, model: usize) -> Self {
        self.model = Some(model);
        self
    }
}

/// World placement shared by a group of nodes.
///
/// Spheres, triangles and planes only take the translation; meshes take
/// `translate * scale`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Model {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Model {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }
}
