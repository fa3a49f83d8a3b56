//! Photon emission, tracing and the final-gather density estimate.
//!
//! Photons leave every area light, bounce through the scene with Russian
//! roulette, and are recorded at each diffuse surface they reach. The
//! recorded list is then frozen into a [`KdTree`] and queried during
//! rendering.

use std::f32::consts::PI;

use lumen_math::{Color, Interval, Onb, Ray, Vec3};
use rand::RngCore;

use crate::bsdf::Lobe;
use crate::kdtree::KdTree;
use crate::sampler::{russian_roulette, sample_hemisphere, sample_square};
use crate::stats::RenderStats;
use crate::world::World;

/// A recorded light-transport event on a diffuse surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: Vec3,
    pub power: Color,
    /// Ray that carried the photon to the surface
    pub in_ray: Ray,
    /// Ray the photon continued along
    pub out_ray: Ray,
    pub normal: Vec3,
}

/// Settings of the photon pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonSettings {
    /// Photons emitted per area light
    pub count: u32,
    /// Bounce limit
    pub max_depth: u32,
    /// Continuation probability at every bounce
    pub survival: f32,
    /// Self-intersection epsilon
    pub t_min: f32,
}

/// Initial power of each photon emitted by a light.
///
/// `radiance * area / (count * pi)`: total emitted power grows with light
/// size and is split evenly over the photons.
pub fn initial_power(radiance: Color, area: f32, count: u32) -> Color {
    if count == 0 {
        return Color::ZERO;
    }
    radiance * area / (count as f32 * PI)
}

/// Emit and trace `settings.count` photons from every area light.
pub fn emit_photons(
    world: &World,
    settings: &PhotonSettings,
    rng: &mut dyn RngCore,
    stats: &mut RenderStats,
) -> Vec<Photon> {
    let mut photons = Vec::new();

    for _ in 0..settings.count {
        for light in world.lights() {
            let uv = sample_square(rng);
            let origin = light.quad.point_at(uv.x, uv.y);
            let direction = Onb::from_w(light.normal())
                .local(sample_hemisphere(rng))
                .normalize();
            let power = initial_power(light.radiance, light.area, settings.count);

            trace_photon(
                world,
                settings,
                &Ray::new(origin, direction),
                power,
                0,
                &mut photons,
                rng,
                stats,
            );
        }
    }

    stats.photons_stored += photons.len() as u64;
    photons
}

/// Follow one photon, appending a record at every diffuse hit.
#[allow(clippy::too_many_arguments)]
pub fn trace_photon(
    world: &World,
    settings: &PhotonSettings,
    ray: &Ray,
    power: Color,
    depth: u32,
    photons: &mut Vec<Photon>,
    rng: &mut dyn RngCore,
    stats: &mut RenderStats,
) {
    if depth >= settings.max_depth {
        return;
    }
    let Some(hit) = world.closest_hit(ray, Interval::from_min(settings.t_min), stats) else {
        return;
    };

    let scattered = world
        .bsdf(hit.material)
        .shade(ray, hit.point, hit.normal, rng);
    let survival = settings.survival;

    match scattered.lobe {
        Lobe::Diffuse => {
            photons.push(Photon {
                position: hit.point,
                power,
                in_ray: *ray,
                out_ray: scattered.ray,
                normal: hit.normal,
            });

            if russian_roulette(rng, survival) {
                let cos = hit.normal.dot(scattered.ray.direction).abs();
                let next = power * scattered.attenuation * cos / (scattered.pdf * survival);
                trace_photon(
                    world,
                    settings,
                    &scattered.ray,
                    next,
                    depth + 1,
                    photons,
                    rng,
                    stats,
                );
            }
        }
        Lobe::Specular => {
            // Each branch survives the roulette on its own
            if scattered.attenuation != Color::ZERO && russian_roulette(rng, survival) {
                let next = power * scattered.attenuation / (scattered.pdf * survival);
                trace_photon(
                    world,
                    settings,
                    &scattered.ray,
                    next,
                    depth + 1,
                    photons,
                    rng,
                    stats,
                );
            }
            if let Some(refraction) = scattered.refraction {
                if refraction.ratio != Color::ZERO && russian_roulette(rng, survival) {
                    let next = power * refraction.ratio / (scattered.pdf * survival);
                    trace_photon(
                        world,
                        settings,
                        &refraction.ray,
                        next,
                        depth + 1,
                        photons,
                        rng,
                        stats,
                    );
                }
            }
        }
    }
}

/// Photons frozen into a KD-tree for final gathering.
#[derive(Debug, Clone, Default)]
pub struct PhotonMap {
    tree: KdTree,
}

impl PhotonMap {
    pub fn build(photons: Vec<Photon>) -> Self {
        let tree = KdTree::build(photons);
        log::info!("Built photon map: {} photons", tree.len());
        Self { tree }
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Radiance leaving a diffuse point, estimated from the `k` nearest photons.
    ///
    /// The farthest of them sets the disc radius `r`. Photons arriving from
    /// behind `normal` are ignored; the rest contribute
    /// `attenuation * sum(power) / (pi r^2) * cos`, with `cos` taken from
    /// their average incoming direction.
    pub fn gather(&self, point: Vec3, normal: Vec3, attenuation: Color, k: usize) -> Color {
        let neighbors = self.tree.nearest(point, k);
        let Some(farthest) = neighbors.last() else {
            return Color::ZERO;
        };
        let r2 = farthest.distance_squared;
        if r2 <= 0.0 {
            return Color::ZERO;
        }

        let mut flux = Color::ZERO;
        let mut incoming = Vec3::ZERO;
        for neighbor in &neighbors {
            let to_light = -neighbor.photon.in_ray.direction.normalize_or_zero();
            if normal.dot(to_light) > 0.0 {
                flux += neighbor.photon.power;
                incoming += to_light;
            }
        }
        if flux == Color::ZERO {
            return Color::ZERO;
        }

        let cos = normal.dot(incoming.normalize_or_zero()).max(0.0);
        attenuation * flux / (PI * r2) * cos
    }
}
