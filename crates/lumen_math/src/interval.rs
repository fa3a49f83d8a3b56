/// A parametric range along a ray.
///
/// Ray queries accept hits in the half-open range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval starting at `min` and extending to infinity.
    pub fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Returns true if x is within the half-open ray range [min, max).
    #[inline]
    pub fn admits(&self, x: f32) -> bool {
        self.min <= x && x < self.max
    }

    /// Narrows the upper bound, keeping the lower one.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_admits_is_half_open() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.admits(0.0));
        assert!(interval.admits(9.99));
        assert!(!interval.admits(10.0));
        assert!(!interval.admits(-0.001));
    }

    #[test]
    fn test_interval_with_max() {
        let narrowed = Interval::from_min(0.5).with_max(3.0);
        assert_eq!(narrowed, Interval::new(0.5, 3.0));
    }
}
