//! World transform pass.
//!
//! Bakes every node's model transform into its primitive so the renderer
//! only ever sees world-space coordinates.

use lumen_math::{Mat4, Mat4Ext};

use crate::geometry::NodeKind;
use crate::loader::SceneResult;
use crate::scene::Scene;

impl Scene {
    /// Move every node's entity into world space.
    ///
    /// Spheres, triangles and planes are translated by their model; meshes
    /// are transformed by `translate * scale` and their normals follow.
    /// Running the pass twice is a no-op.
    pub fn bake_world_transforms(&mut self) -> SceneResult<()> {
        if self.baked {
            log::debug!("Scene '{}' already in world space", self.name);
            return Ok(());
        }
        self.validate()?;

        for node in &self.nodes {
            let Some(model) = node.model.map(|m| &self.models[m]) else {
                continue;
            };
            let t = model.translation;

            match node.kind {
                NodeKind::Sphere => {
                    self.spheres[node.entity].position += t;
                }
                NodeKind::Triangle => {
                    let tri = &mut self.triangles[node.entity];
                    tri.v1 += t;
                    tri.v2 += t;
                    tri.v3 += t;
                }
                NodeKind::Plane => {
                    self.planes[node.entity].position += t;
                }
                NodeKind::Mesh => {
                    let matrix = Mat4::from_translation_scale(t, model.scale);
                    let mesh = &mut self.meshes[node.entity];
                    for p in &mut mesh.positions {
                        *p = matrix.transform_point3(*p);
                    }
                    if let Some(normals) = &mut mesh.normals {
                        for n in normals.iter_mut() {
                            *n = matrix.transform_normal3(*n);
                        }
                    }
                    log::debug!(
                        "Mesh #{} baked, world bounds {:?}",
                        node.entity,
                        matrix.transform_aabb(&mesh.bounds())
                    );
                }
            }
        }

        self.baked = true;
        Ok(())
    }
}
