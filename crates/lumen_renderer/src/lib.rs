//! Lumen renderer - CPU global illumination
//!
//! Monte Carlo path tracing with next-event estimation and Russian
//! roulette, plus a two-pass photon-mapping estimator with a KD-tree
//! final gather and a direct Phong ray caster for previews. The scene is
//! flattened into world-space primitives under a BVH once, then traced by
//! a pool of worker threads that each own an interleaved set of image rows.

mod bsdf;
mod bvh;
mod camera;
mod error;
mod integrator;
mod intersect;
mod kdtree;
mod output;
mod phong;
mod photon;
mod primitive;
mod renderer;
mod sampler;
mod stats;
mod world;

pub use bsdf::{face_forward, Bsdf, Lobe, Refraction, Scattered};
pub use bvh::{closest_hit_linear, Bvh, BvhNode};
pub use camera::Camera;
pub use error::{BuildError, BuildResult};
pub use integrator::{Integrator, IntegratorKind};
pub use intersect::{intersect_quad, intersect_sphere, intersect_triangle, HitRecord};
pub use kdtree::{KdTree, Neighbor};
pub use output::{encode_pixel, linear_to_gamma, ImageBuffer};
pub use phong::Phong;
pub use photon::{emit_photons, initial_power, trace_photon, Photon, PhotonMap, PhotonSettings};
pub use primitive::{Primitive, Quad};
pub use renderer::{render, RenderConfig, RenderOutput};
pub use sampler::{stream_rng, stream_seed, time_seed, PHOTON_STREAM};
pub use stats::RenderStats;
pub use world::{Light, LightHit, World};

/// Re-export common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
