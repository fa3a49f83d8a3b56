//! Renderable world: world-space primitives, resolved BSDFs and Phong
//! parameters, lights and the BVH, built once before rendering and
//! read-only afterward.

use std::borrow::Cow;

use lumen_core::{NodeKind, PointLight, Scene};
use lumen_math::{Color, Interval, Ray, Vec3};

use crate::bsdf::Bsdf;
use crate::bvh::{closest_hit_linear, Bvh};
use crate::error::{BuildError, BuildResult};
use crate::intersect::{intersect_quad, HitRecord};
use crate::phong::Phong;
use crate::primitive::{Primitive, Quad};
use crate::stats::RenderStats;

/// An emitting quad. Only the side its normal faces emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub quad: Quad,
    pub radiance: Color,
    pub area: f32,
}

/// Nearest light along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightHit {
    pub t: f32,
    pub light: usize,
    /// Radiance toward the ray origin; zero when the back side was hit
    pub radiance: Color,
}

pub struct World {
    primitives: Vec<Primitive>,
    bsdfs: Vec<Bsdf>,
    phongs: Vec<Phong>,
    lights: Vec<Light>,
    point_lights: Vec<PointLight>,
    bvh: Bvh,
    /// Radiance returned by paths that reach the depth limit
    pub ambient: Color,
}

impl World {
    /// Build the world from a scene, baking model transforms first if the
    /// scene is still in local space.
    pub fn build(scene: &Scene) -> BuildResult<Self> {
        let scene: Cow<Scene> = if scene.is_baked() {
            Cow::Borrowed(scene)
        } else {
            let mut baked = scene.clone();
            baked.bake_world_transforms()?;
            Cow::Owned(baked)
        };

        let primitives = collect_primitives(&scene)?;
        let bsdfs: Vec<Bsdf> = scene.materials.iter().map(Bsdf::from_material).collect();
        let phongs: Vec<Phong> = scene.materials.iter().map(Phong::from_material).collect();
        let lights = collect_lights(&scene)?;

        let ignored = scene.directional_lights.len() + scene.spot_lights.len();
        if ignored > 0 {
            log::warn!("Ignoring {} directional/spot lights", ignored);
        }

        let bvh = Bvh::build(&primitives);
        log::info!(
            "Built BVH: {} primitives, {} nodes, bounds {:?}",
            primitives.len(),
            bvh.nodes().len(),
            bvh.bounds()
        );

        Ok(Self {
            primitives,
            bsdfs,
            phongs,
            lights,
            point_lights: scene.point_lights.clone(),
            bvh,
            ambient: scene.ambient.constant,
        })
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn bsdf(&self, material: usize) -> &Bsdf {
        &self.bsdfs[material]
    }

    pub fn phong(&self, material: usize) -> &Phong {
        &self.phongs[material]
    }

    /// Closest object hit through the BVH.
    pub fn closest_hit(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RenderStats,
    ) -> Option<HitRecord> {
        self.bvh.closest_hit(&self.primitives, ray, ray_t, stats)
    }

    /// Closest object hit by linear scan; agrees with [`World::closest_hit`].
    pub fn closest_hit_linear(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RenderStats,
    ) -> Option<HitRecord> {
        closest_hit_linear(&self.primitives, ray, ray_t, stats)
    }

    /// Whether any object blocks `ray` within `ray_t`.
    pub fn occluded(&self, ray: &Ray, ray_t: Interval, stats: &mut RenderStats) -> bool {
        self.closest_hit(ray, ray_t, stats).is_some()
    }

    /// Closest area light along `ray`.
    pub fn closest_light(&self, ray: &Ray, ray_t: Interval) -> Option<LightHit> {
        let mut closest: Option<LightHit> = None;
        let mut range = ray_t;

        for (index, light) in self.lights.iter().enumerate() {
            if let Some((t, _)) = intersect_quad(ray, &light.quad, range) {
                range = range.with_max(t);
                let radiance = if ray.direction.dot(light.quad.normal) < 0.0 {
                    light.radiance
                } else {
                    Color::ZERO
                };
                closest = Some(LightHit {
                    t,
                    light: index,
                    radiance,
                });
            }
        }
        closest
    }
}

fn collect_primitives(scene: &Scene) -> BuildResult<Vec<Primitive>> {
    let missing = |node: usize, kind: NodeKind, entity: usize| BuildError::MissingEntity {
        node,
        kind,
        entity,
    };
    let mut primitives = Vec::with_capacity(scene.nodes.len());

    for (index, node) in scene.nodes.iter().enumerate() {
        let first = primitives.len();
        match node.kind {
            NodeKind::Sphere => {
                let s = scene
                    .spheres
                    .get(node.entity)
                    .ok_or_else(|| missing(index, node.kind, node.entity))?;
                primitives.push(Primitive::Sphere {
                    center: s.position,
                    radius: s.radius,
                    material: s.material,
                });
            }
            NodeKind::Triangle => {
                let t = scene
                    .triangles
                    .get(node.entity)
                    .ok_or_else(|| missing(index, node.kind, node.entity))?;
                primitives.push(Primitive::Triangle {
                    vertices: [t.v1, t.v2, t.v3],
                    normal: t.face_normal(),
                    material: t.material,
                });
            }
            NodeKind::Plane => {
                let p = scene
                    .planes
                    .get(node.entity)
                    .ok_or_else(|| missing(index, node.kind, node.entity))?;
                match Quad::new(p.position, p.u, p.v, Some(p.normal)) {
                    Some(quad) => primitives.push(Primitive::Plane {
                        quad,
                        material: p.material,
                    }),
                    None => log::warn!("Skipping degenerate plane of node {}", index),
                }
            }
            NodeKind::Mesh => {
                let mesh = scene
                    .meshes
                    .get(node.entity)
                    .ok_or_else(|| missing(index, node.kind, node.entity))?;
                primitives.extend(mesh.faces().into_iter().map(|face| Primitive::Triangle {
                    vertices: face.vertices,
                    normal: face.normal(),
                    material: mesh.material,
                }));
            }
        }

        for primitive in &primitives[first..] {
            let material = primitive.material();
            if material >= scene.materials.len() {
                return Err(BuildError::MissingMaterial {
                    node: index,
                    material,
                    count: scene.materials.len(),
                });
            }
        }
    }
    Ok(primitives)
}

fn collect_lights(scene: &Scene) -> BuildResult<Vec<Light>> {
    scene
        .area_lights
        .iter()
        .enumerate()
        .map(|(index, light)| {
            let quad = Quad::new(light.position, light.u, light.v, None)
                .ok_or(BuildError::DegenerateLight(index))?;
            Ok(Light {
                quad,
                radiance: light.radiance,
                area: light.area(),
            })
        })
        .collect()
}

impl Light {
    /// Unit normal of the emitting side.
    pub fn normal(&self) -> Vec3 {
        self.quad.normal
    }
}
