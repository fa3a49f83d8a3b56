//! Scene graph types for Lumen.
//!
//! A [`Scene`] is the complete, in-memory description a renderer reads:
//! camera, render options, ambient term, materials, primitive buffers,
//! nodes that place primitives, and light buffers.

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{MaterialId, Model, Node, NodeKind, Plane, Sphere, Triangle};
use crate::light::{AreaLight, DirectionalLight, PointLight, SpotLight};
use crate::loader::{SceneError, SceneResult};
use crate::material::Material;
use crate::mesh::Mesh;

/// Image and sampling settings stored with the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Recursion limit of the path integrators
    pub max_depth: u32,
    pub samples_per_pixel: u32,
    /// Photons emitted per area light by the photon-mapping integrator
    pub photon_count: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            max_depth: 40,
            samples_per_pixel: 16,
            photon_count: 100_000,
        }
    }
}

/// Radiance returned for paths that exhaust the depth limit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ambient {
    pub constant: Color,
}

/// Pinhole camera description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width / height. `None` derives it from the image size.
    pub aspect: Option<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov: 40.0,
            aspect: None,
        }
    }
}

/// A complete scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    pub camera: Camera,
    pub render_options: RenderOptions,
    pub ambient: Ambient,

    pub materials: Vec<Material>,

    pub models: Vec<Model>,
    pub nodes: Vec<Node>,

    // Object buffers
    pub spheres: Vec<Sphere>,
    pub triangles: Vec<Triangle>,
    pub planes: Vec<Plane>,
    pub meshes: Vec<Mesh>,

    // Light buffers
    pub point_lights: Vec<PointLight>,
    pub area_lights: Vec<AreaLight>,
    pub directional_lights: Vec<DirectionalLight>,
    pub spot_lights: Vec<SpotLight>,

    /// Set once the world transform pass has run
    #[serde(skip)]
    pub(crate) baked: bool,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a model (world placement) and return its ID.
    pub fn add_model(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// Add a sphere and a node referencing it. Returns the node index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> usize {
        self.spheres.push(sphere);
        self.push_node(NodeKind::Sphere, self.spheres.len() - 1)
    }

    /// Add a triangle and a node referencing it. Returns the node index.
    pub fn add_triangle(&mut self, triangle: Triangle) -> usize {
        self.triangles.push(triangle);
        self.push_node(NodeKind::Triangle, self.triangles.len() - 1)
    }

    /// Add a plane and a node referencing it. Returns the node index.
    pub fn add_plane(&mut self, plane: Plane) -> usize {
        self.planes.push(plane);
        self.push_node(NodeKind::Plane, self.planes.len() - 1)
    }

    /// Add a mesh and a node referencing it. Returns the node index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.push_node(NodeKind::Mesh, self.meshes.len() - 1)
    }

    /// Add an area light.
    pub fn add_area_light(&mut self, light: AreaLight) {
        self.area_lights.push(light);
    }

    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    fn push_node(&mut self, kind: NodeKind, entity: usize) -> usize {
        self.nodes.push(Node::new(kind, entity));
        self.nodes.len() - 1
    }

    /// Number of entries in the buffer a node kind refers to.
    pub fn buffer_len(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Sphere => self.spheres.len(),
            NodeKind::Triangle => self.triangles.len(),
            NodeKind::Plane => self.planes.len(),
            NodeKind::Mesh => self.meshes.len(),
        }
    }

    /// Whether the world transform pass has already been applied.
    pub fn is_baked(&self) -> bool {
        self.baked
    }

    /// Check that every node points at an existing entity and model.
    pub fn validate(&self) -> SceneResult<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.entity >= self.buffer_len(node.kind) {
                return Err(SceneError::InvalidReference(format!(
                    "node {} references {:?} #{} but only {} exist",
                    i,
                    node.kind,
                    node.entity,
                    self.buffer_len(node.kind)
                )));
            }
            if let Some(model) = node.model {
                if model >= self.models.len() {
                    return Err(SceneError::InvalidReference(format!(
                        "node {} references model #{} but only {} exist",
                        i,
                        model,
                        self.models.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Aspect ratio used for camera rays.
    pub fn aspect(&self) -> f32 {
        self.camera.aspect.unwrap_or_else(|| {
            self.render_options.width as f32 / self.render_options.height.max(1) as f32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");
        let white = scene.add_material(Material::lambertian("white", Color::ONE));

        let node = scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, white));
        scene.add_triangle(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, white));

        assert_eq!(node, 0);
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.nodes[1].kind, NodeKind::Triangle);
        assert_eq!(scene.materials[white].kind, MaterialKind::Lambertian);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_validate_dangling_entity() {
        let mut scene = Scene::new("broken");
        scene.nodes.push(Node::new(NodeKind::Plane, 3));

        assert!(matches!(
            scene.validate(),
            Err(SceneError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_validate_dangling_model() {
        let mut scene = Scene::new("broken");
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, 0));
        scene.nodes[0].model = Some(2);

        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_render_option_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.width, 500);
        assert_eq!(options.max_depth, 40);
        assert_eq!(options.samples_per_pixel, 16);
        assert_eq!(options.photon_count, 100_000);
    }

    #[test]
    fn test_aspect_from_resolution() {
        let mut scene = Scene::new("aspect");
        scene.render_options.width = 200;
        scene.render_options.height = 100;
        assert_eq!(scene.aspect(), 2.0);

        scene.camera.aspect = Some(1.0);
        assert_eq!(scene.aspect(), 1.0);
    }
}
