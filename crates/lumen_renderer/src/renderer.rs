//! Render driver and row-interleaved parallel scheduler.
//!
//! A render runs in three phases:
//! - build the [`World`] (and the photon map when the integrator needs it)
//!   on the calling thread
//! - trace pixels on a pool of `workers` threads, worker `i` owning camera
//!   rows `i, i + workers, i + 2 * workers, ...`
//! - join, merge per-worker statistics and hand the buffer to the caller
//!
//! Workers share the world read-only and write disjoint rows, so no locking
//! happens while tracing.

use std::time::Instant;

use lumen_core::Scene;
use lumen_math::{Color, Vec4};
use rand::RngCore;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::BuildResult;
use crate::integrator::{Integrator, IntegratorKind};
use crate::output::{encode_pixel, ImageBuffer};
use crate::photon::{emit_photons, PhotonMap, PhotonSettings};
use crate::sampler::{sample_square, stream_rng, time_seed, PHOTON_STREAM};
use crate::stats::RenderStats;
use crate::world::World;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Radiance estimator
    pub integrator: IntegratorKind,
    /// Number of worker threads
    pub workers: usize,
    /// Top-level seed; `None` derives one from the clock
    pub seed: Option<u64>,
    /// Continuation probability of the Russian-roulette integrator
    pub path_survival: f32,
    /// Continuation probability of photon tracing
    pub photon_survival: f32,
    /// Photons used per final-gather estimate
    pub gather_count: usize,
    /// Self-intersection epsilon
    pub t_min: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::Path,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: None,
            path_survival: 0.85,
            photon_survival: 0.8,
            gather_count: 100,
            t_min: 1e-4,
        }
    }
}

/// Finished render handed back to the caller.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
    /// Seed the render actually used
    pub seed: u64,
}

/// Render a scene with the image settings stored in its render options.
pub fn render(scene: &Scene, config: &RenderConfig) -> BuildResult<RenderOutput> {
    let start = Instant::now();
    let options = &scene.render_options;

    let world = World::build(scene)?;

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = time_seed();
            log::info!("No seed given, using {}", seed);
            seed
        }
    };
    let workers = config.workers.max(1);

    log::info!(
        "Rendering '{}': {}x{}, {} spp, depth {}, {:?} integrator, {} workers",
        scene.name,
        options.width,
        options.height,
        options.samples_per_pixel,
        options.max_depth,
        config.integrator,
        workers
    );

    let mut stats = RenderStats::default();

    let photon_map = if config.integrator.needs_photons() {
        Some(build_photon_map(&world, scene, config, seed, &mut stats))
    } else {
        None
    };

    let mut integrator = Integrator::new(&world, config, options.max_depth);
    if let Some(map) = &photon_map {
        integrator = integrator.with_photon_map(map);
    }

    let camera = Camera::new(&scene.camera, scene.aspect());
    let mut image = ImageBuffer::new(options.width, options.height);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let frame = Frame {
        integrator: &integrator,
        camera: &camera,
        width: options.width,
        height: options.height,
        samples_per_pixel: options.samples_per_pixel,
    };
    stats += pool.install(|| render_rows(&frame, &mut image.pixels, workers, seed));

    log::info!(
        "Render complete in {:.2?}: {} primary rays, {} primitive tests ({:.1} per ray), {} box tests",
        start.elapsed(),
        stats.primary_rays,
        stats.primitive_tests,
        stats.tests_per_ray(),
        stats.box_tests
    );

    Ok(RenderOutput { image, stats, seed })
}

/// Emit photons single-threaded on their own random stream.
fn build_photon_map(
    world: &World,
    scene: &Scene,
    config: &RenderConfig,
    seed: u64,
    stats: &mut RenderStats,
) -> PhotonMap {
    let settings = PhotonSettings {
        count: scene.render_options.photon_count,
        max_depth: scene.render_options.max_depth,
        survival: config.photon_survival,
        t_min: config.t_min,
    };
    let mut rng = stream_rng(seed, PHOTON_STREAM);
    let photons = emit_photons(world, &settings, &mut rng, stats);
    log::info!(
        "Emitted {} photons from each of {} lights, stored {}",
        settings.count,
        world.lights().len(),
        photons.len()
    );
    PhotonMap::build(photons)
}

/// Everything a worker needs to shade a pixel.
struct Frame<'a> {
    integrator: &'a Integrator<'a>,
    camera: &'a Camera,
    width: u32,
    height: u32,
    samples_per_pixel: u32,
}

/// Split the buffer into rows, deal them to workers by camera row and trace
/// them in parallel. Returns the merged worker statistics.
fn render_rows(frame: &Frame, pixels: &mut [Vec4], workers: usize, seed: u64) -> RenderStats {
    if frame.width == 0 || frame.height == 0 {
        return RenderStats::default();
    }

    // Buffer row 0 is the top of the image, camera row 0 the bottom
    let mut lanes: Vec<Vec<(u32, &mut [Vec4])>> = (0..workers).map(|_| Vec::new()).collect();
    for (buffer_row, row) in pixels.chunks_mut(frame.width as usize).enumerate() {
        let y = frame.height - 1 - buffer_row as u32;
        lanes[y as usize % workers].push((y, row));
    }

    lanes
        .into_par_iter()
        .enumerate()
        .map(|(worker, rows)| {
            let mut rng = stream_rng(seed, worker as u64);
            let mut stats = RenderStats::default();
            for (y, row) in rows {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let color = render_pixel(frame, x as u32, y, &mut rng, &mut stats);
                    *pixel = encode_pixel(color);
                }
            }
            log::debug!("Worker {} done: {} primary rays", worker, stats.primary_rays);
            stats
        })
        .sum()
}

/// Average of `samples_per_pixel` jittered samples through pixel `(x, y)`,
/// counted from the bottom-left corner.
fn render_pixel(
    frame: &Frame,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
    stats: &mut RenderStats,
) -> Color {
    if frame.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let mut color = Color::ZERO;
    for _ in 0..frame.samples_per_pixel {
        let jitter = sample_square(rng);
        let ray = frame.camera.shoot(
            (x as f32 + jitter.x) / frame.width as f32,
            (y as f32 + jitter.y) / frame.height as f32,
        );
        stats.primary_rays += 1;
        color += frame.integrator.radiance(&ray, rng, stats);
    }
    color / frame.samples_per_pixel as f32
}
