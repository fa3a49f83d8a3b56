//! Indexed triangle meshes.
//!
//! Meshes are expanded into individual triangles by the renderer before BVH
//! construction; this type only stores the indexed form.

use lumen_math::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::MaterialId;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional, one per vertex)
    #[serde(default)]
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Material shared by every triangle
    pub material: MaterialId,
}

/// One resolved mesh face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshFace {
    pub vertices: [Vec3; 3],
    /// Per-vertex normals when the mesh carries them
    pub normals: Option<[Vec3; 3]>,
}

impl MeshFace {
    /// Averaged vertex normal, or the winding normal without vertex normals.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        let geometric = (b - a).cross(c - a).normalize_or_zero();
        match self.normals {
            Some([n0, n1, n2]) => {
                let avg = n0 + n1 + n2;
                if avg.length_squared() > 0.0 {
                    avg.normalize()
                } else {
                    geometric
                }
            }
            None => geometric,
        }
    }
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        material: MaterialId,
    ) -> Self {
        Self {
            positions,
            normals,
            indices,
            material,
        }
    }

    /// Compute axis-aligned bounding box from positions.
    pub fn bounds(&self) -> Aabb {
        Aabb::enclosing(self.positions.iter().copied())
    }

    /// Check if the mesh has one normal per vertex.
    pub fn has_normals(&self) -> bool {
        matches!(&self.normals, Some(n) if n.len() == self.positions.len())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Resolve the index buffer into faces.
    ///
    /// Faces with out-of-range indices are skipped with a warning.
    pub fn faces(&self) -> Vec<MeshFace> {
        let mut faces = Vec::with_capacity(self.triangle_count());
        let normals = self.normals.as_ref().filter(|_| self.has_normals());

        for chunk in self.indices.chunks_exact(3) {
            let idx = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];

            if idx.iter().any(|&i| i >= self.positions.len()) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    idx,
                    self.positions.len()
                );
                continue;
            }

            faces.push(MeshFace {
                vertices: idx.map(|i| self.positions[i]),
                normals: normals.map(|n| idx.map(|i| n[i])),
            });
        }

        faces
    }
}
