//! Per-render diagnostic counters.
//!
//! Every worker owns its own [`RenderStats`]; the scheduler sums them after
//! the workers are joined, so counting never needs atomics.

use std::iter::Sum;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Camera rays traced
    pub primary_rays: u64,
    /// Ray/primitive intersection tests
    pub primitive_tests: u64,
    /// Ray/box slab tests during BVH traversal
    pub box_tests: u64,
    /// Photons recorded on diffuse surfaces
    pub photons_stored: u64,
}

impl RenderStats {
    /// Average primitive tests per camera ray.
    pub fn tests_per_ray(&self) -> f64 {
        if self.primary_rays == 0 {
            0.0
        } else {
            self.primitive_tests as f64 / self.primary_rays as f64
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.primary_rays += other.primary_rays;
        self.primitive_tests += other.primitive_tests;
        self.box_tests += other.box_tests;
        self.photons_stored += other.photons_stored;
    }
}

impl Sum for RenderStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}
