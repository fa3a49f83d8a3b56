//! Lumen Core - Scene description for the Lumen renderer.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `RenderOptions`, `Camera`, primitive
//!   buffers (`Sphere`, `Triangle`, `Plane`, `Mesh`) addressed by `Node`s
//! - **Materials**: named, typed properties with per-kind defaults
//! - **Lights**: point, area, directional and spot light buffers
//! - **World transform pass**: bakes model transforms into world space
//! - **Loading**: JSON scene files and a built-in Cornell box
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_scene, Scene};
//!
//! let mut scene = load_scene("cornell.json")?;
//! scene.bake_world_transforms()?;
//! println!("{} nodes, {} area lights", scene.nodes.len(), scene.area_lights.len());
//! ```

pub mod cornell;
pub mod geometry;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod scene;
mod transform;

// Re-export commonly used types
pub use geometry::{Model, Node, NodeKind, Plane, Sphere, Triangle};
pub use light::{AreaLight, DirectionalLight, PointLight, SpotLight};
pub use loader::{load_scene, load_scene_from_str, SceneError, SceneResult};
pub use material::{Material, MaterialKind, Property};
pub use mesh::Mesh;
pub use scene::{Ambient, Camera, RenderOptions, Scene};
