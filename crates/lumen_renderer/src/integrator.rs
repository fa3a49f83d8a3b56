//! Recursive radiance estimators.
//!
//! The four global-illumination integrators share one recursion and differ
//! only in what they do at a diffuse hit:
//!
//! - `Path` follows the sampled direction.
//! - `NextEvent` adds a direct term sampled on every area light and hides
//!   emission seen by the following indirect bounce.
//! - `RussianRoulette` is `NextEvent` with the indirect bounce continued
//!   only with a fixed probability.
//! - `PhotonMap` stops and estimates the outgoing radiance from the photon map.
//!
//! Specular lobes recurse along their reflected and refracted rays in every
//! one of them.
//!
//! `RayCast` does not recurse: it shades the first hit with Phong under the
//! scene's first point light.

use lumen_math::{Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::bsdf::{face_forward, Lobe, Scattered};
use crate::intersect::HitRecord;
use crate::photon::PhotonMap;
use crate::renderer::RenderConfig;
use crate::sampler::{russian_roulette, sample_square};
use crate::stats::RenderStats;
use crate::world::World;

/// Shadow rays stop this fraction short of the light sample.
const SHADOW_EPSILON: f32 = 1e-3;

/// Radiance estimator used by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegratorKind {
    /// Plain recursive path tracing
    #[default]
    Path,
    /// Path tracing with next-event estimation
    NextEvent,
    /// Next-event estimation with Russian-roulette termination
    RussianRoulette,
    /// Final gather from a photon map
    PhotonMap,
    /// Direct Phong shading from the first point light
    RayCast,
}

impl IntegratorKind {
    /// Whether a photon pass must run before rendering.
    pub fn needs_photons(&self) -> bool {
        matches!(self, IntegratorKind::PhotonMap)
    }
}

/// Shared, read-only state of a render's radiance estimates.
#[derive(Clone, Copy)]
pub struct Integrator<'a> {
    world: &'a World,
    photon_map: Option<&'a PhotonMap>,
    kind: IntegratorKind,
    max_depth: u32,
    t_min: f32,
    survival: f32,
    gather_count: usize,
}

impl<'a> Integrator<'a> {
    pub fn new(world: &'a World, config: &RenderConfig, max_depth: u32) -> Self {
        Self {
            world,
            photon_map: None,
            kind: config.integrator,
            max_depth,
            t_min: config.t_min,
            survival: config.path_survival,
            gather_count: config.gather_count,
        }
    }

    pub fn with_photon_map(mut self, photon_map: &'a PhotonMap) -> Self {
        self.photon_map = Some(photon_map);
        self
    }

    pub fn kind(&self) -> IntegratorKind {
        self.kind
    }

    /// Radiance arriving at the origin of a camera ray.
    pub fn radiance(&self, ray: &Ray, rng: &mut dyn RngCore, stats: &mut RenderStats) -> Color {
        match self.kind {
            IntegratorKind::RayCast => self.ray_cast(ray, stats),
            _ => self.trace(ray, 0, true, rng, stats),
        }
    }

    /// Phong-shaded first hit, lit by the first point light only. Black on a
    /// miss, without point lights, or when the light is behind the surface
    /// or blocked.
    fn ray_cast(&self, ray: &Ray, stats: &mut RenderStats) -> Color {
        let Some(light) = self.world.point_lights().first() else {
            return Color::ZERO;
        };
        let Some(hit) = self
            .world
            .closest_hit(ray, Interval::from_min(self.t_min), stats)
        else {
            return Color::ZERO;
        };

        let normal = face_forward(hit.normal, ray.direction);
        let to_light = light.position - hit.point;
        let distance = to_light.length();
        if distance <= 0.0 {
            return Color::ZERO;
        }
        let out = to_light / distance;
        if out.dot(normal) < 0.0 {
            return Color::ZERO;
        }

        let shadow = Ray::new(hit.point, out);
        if self
            .world
            .occluded(&shadow, Interval::new(self.t_min, distance), stats)
        {
            return Color::ZERO;
        }

        let view = -ray.direction.normalize();
        self.world.phong(hit.material).shade(view, out, normal) * light.intensity
    }

    /// `emission` is false right after a diffuse bounce whose direct light
    /// was already sampled.
    fn trace(
        &self,
        ray: &Ray,
        depth: u32,
        emission: bool,
        rng: &mut dyn RngCore,
        stats: &mut RenderStats,
    ) -> Color {
        if depth >= self.max_depth {
            return self.world.ambient;
        }

        let range = Interval::from_min(self.t_min);
        let hit = self.world.closest_hit(ray, range, stats);
        let light = self.world.closest_light(ray, range);

        match (hit, light) {
            (Some(hit), light) if light.map_or(true, |l| hit.t < l.t) => {
                self.shade(ray, &hit, depth, rng, stats)
            }
            (_, Some(light)) if emission => light.radiance,
            _ => Color::ZERO,
        }
    }

    fn shade(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        rng: &mut dyn RngCore,
        stats: &mut RenderStats,
    ) -> Color {
        let scattered = self
            .world
            .bsdf(hit.material)
            .shade(ray, hit.point, hit.normal, rng);

        match scattered.lobe {
            Lobe::Diffuse => self.shade_diffuse(ray, hit, &scattered, depth, rng, stats),
            Lobe::Specular => {
                let mut color = scattered.emitted;
                if scattered.attenuation != Color::ZERO {
                    color += scattered.attenuation
                        * self.trace(&scattered.ray, depth + 1, true, rng, stats);
                }
                if let Some(refraction) = scattered.refraction {
                    if refraction.ratio != Color::ZERO {
                        color += refraction.ratio
                            * self.trace(&refraction.ray, depth + 1, true, rng, stats);
                    }
                }
                color
            }
        }
    }

    fn shade_diffuse(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        scattered: &Scattered,
        depth: u32,
        rng: &mut dyn RngCore,
        stats: &mut RenderStats,
    ) -> Color {
        let normal = face_forward(hit.normal, ray.direction);

        match self.kind {
            // Ray casting never reaches the recursion
            IntegratorKind::Path | IntegratorKind::RayCast => {
                scattered.emitted + self.indirect(scattered, normal, depth, true, rng, stats)
            }
            IntegratorKind::NextEvent => {
                let direct = self.direct_light(hit.point, normal, rng, stats);
                scattered.emitted
                    + scattered.attenuation * direct
                    + self.indirect(scattered, normal, depth, false, rng, stats)
            }
            IntegratorKind::RussianRoulette => {
                let direct = self.direct_light(hit.point, normal, rng, stats);
                let indirect = if russian_roulette(rng, self.survival) {
                    self.indirect(scattered, normal, depth, false, rng, stats) / self.survival
                } else {
                    Color::ZERO
                };
                scattered.emitted + scattered.attenuation * direct + indirect
            }
            IntegratorKind::PhotonMap => {
                let gathered = self.photon_map.map_or(Color::ZERO, |map| {
                    map.gather(hit.point, normal, scattered.attenuation, self.gather_count)
                });
                scattered.emitted + gathered
            }
        }
    }

    /// `attenuation * L(next) * cos / pdf` along the sampled direction.
    fn indirect(
        &self,
        scattered: &Scattered,
        normal: Vec3,
        depth: u32,
        emission: bool,
        rng: &mut dyn RngCore,
        stats: &mut RenderStats,
    ) -> Color {
        let cos = normal.dot(scattered.ray.direction).max(0.0);
        let incoming = self.trace(&scattered.ray, depth + 1, emission, rng, stats);
        scattered.attenuation * incoming * cos / scattered.pdf
    }

    /// Irradiance from one sample on every area light, before the BRDF.
    fn direct_light(
        &self,
        point: Vec3,
        normal: Vec3,
        rng: &mut dyn RngCore,
        stats: &mut RenderStats,
    ) -> Color {
        let mut irradiance = Color::ZERO;

        for light in self.world.lights() {
            let uv = sample_square(rng);
            let to_light = light.quad.point_at(uv.x, uv.y) - point;
            let distance_squared = to_light.length_squared();
            if distance_squared <= 0.0 {
                continue;
            }
            let distance = distance_squared.sqrt();
            let direction = to_light / distance;

            let cos_surface = normal.dot(direction);
            let cos_light = light.normal().dot(-direction);
            if cos_surface <= 0.0 || cos_light <= 0.0 {
                continue;
            }

            let shadow = Ray::new(point, direction);
            let range = Interval::new(self.t_min, distance * (1.0 - SHADOW_EPSILON));
            if self.world.occluded(&shadow, range, stats) {
                continue;
            }

            // pdf of the light sample is 1 / area
            irradiance += light.radiance * cos_surface * cos_light * light.area / distance_squared;
        }
        irradiance
    }
}
