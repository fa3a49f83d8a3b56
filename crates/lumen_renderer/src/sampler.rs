//! Random sampling helpers.
//!
//! Each worker owns a [`StdRng`] seeded from the render's top-level seed
//! and its own stream index, so a render with a fixed seed is reproducible
//! regardless of how the OS schedules threads.

use std::f32::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use lumen_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Stream index reserved for the photon emission pass.
pub const PHOTON_STREAM: u64 = u64::MAX;

/// Mix a top-level seed with a stream index (SplitMix64 finalizer).
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Private random engine for one worker or pass.
pub fn stream_rng(seed: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(stream_seed(seed, stream))
}

/// Seed derived from the wall clock, for renders that do not fix one.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Uniform point in the unit square.
#[inline]
pub fn sample_square(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(rng.gen(), rng.gen())
}

/// Direction on the +Z hemisphere, uniform in solid angle (pdf `1 / 2pi`).
pub fn sample_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let e1: f32 = rng.gen();
    let e2: f32 = rng.gen();
    let r = (1.0 - e1 * e1).max(0.0).sqrt();
    let phi = 2.0 * PI * e2;
    Vec3::new(phi.cos() * r, phi.sin() * r, e1)
}

/// Density of [`sample_hemisphere`].
pub const HEMISPHERE_PDF: f32 = 1.0 / (2.0 * PI);

/// True with probability `p`.
#[inline]
pub fn russian_roulette(rng: &mut dyn RngCore, p: f32) -> bool {
    rng.gen::<f32>() < p
}
