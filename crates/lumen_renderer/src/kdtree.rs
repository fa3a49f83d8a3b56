//! KD-tree over photon positions.
//!
//! Nodes are stored in an arena; each owns one photon and the axis it
//! splits on. Split axes follow the largest positional variance of each
//! subset rather than cycling X, Y, Z.

use std::collections::BinaryHeap;

use lumen_math::Vec3;
use ordered_float::OrderedFloat;

use crate::photon::Photon;

#[derive(Debug, Clone, Copy, PartialEq)]
struct KdNode {
    photon: Photon,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A photon returned by a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub photon: &'a Photon,
    pub distance_squared: f32,
}

#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

impl KdTree {
    /// Build a tree from a finished photon list.
    pub fn build(mut photons: Vec<Photon>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(photons.len()),
            root: None,
        };
        tree.root = tree.build_node(&mut photons);
        tree
    }

    fn build_node(&mut self, photons: &mut [Photon]) -> Option<usize> {
        if photons.is_empty() {
            return None;
        }

        let axis = max_variance_axis(photons);
        let median = photons.len() / 2;
        photons.select_nth_unstable_by(median, |a, b| {
            a.position[axis].total_cmp(&b.position[axis])
        });

        let index = self.nodes.len();
        self.nodes.push(KdNode {
            photon: photons[median],
            axis,
            left: None,
            right: None,
        });

        let (lower, upper) = photons.split_at_mut(median);
        let left = self.build_node(lower);
        let right = self.build_node(&mut upper[1..]);
        self.nodes[index].left = left;
        self.nodes[index].right = right;
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The `k` photons nearest to `target`, closest first.
    pub fn nearest(&self, target: Vec3, k: usize) -> Vec<Neighbor<'_>> {
        self.nearest_within(target, k, f32::INFINITY)
    }

    /// At most `k` photons within `radius` of `target`, closest first.
    ///
    /// A negative or NaN radius finds nothing.
    pub fn nearest_within(&self, target: Vec3, k: usize, radius: f32) -> Vec<Neighbor<'_>> {
        if k == 0 || self.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        // Max-heap on distance: the top is the current k-th best
        let k = k.min(self.len());
        let mut heap: BinaryHeap<(OrderedFloat<f32>, usize)> =
            BinaryHeap::with_capacity(k.saturating_add(1));
        self.search(self.root, target, k, radius * radius, &mut heap);

        let mut found: Vec<Neighbor<'_>> = heap
            .into_iter()
            .map(|(d, i)| Neighbor {
                photon: &self.nodes[i].photon,
                distance_squared: d.into_inner(),
            })
            .collect();
        found.sort_by(|a, b| a.distance_squared.total_cmp(&b.distance_squared));
        found
    }

    fn search(
        &self,
        node: Option<usize>,
        target: Vec3,
        k: usize,
        max_distance_squared: f32,
        heap: &mut BinaryHeap<(OrderedFloat<f32>, usize)>,
    ) {
        let Some(index) = node else {
            return;
        };
        let current = &self.nodes[index];

        let d2 = current.photon.position.distance_squared(target);
        if d2 <= max_distance_squared {
            heap.push((OrderedFloat(d2), index));
            if heap.len() > k {
                heap.pop();
            }
        }

        let delta = target[current.axis] - current.photon.position[current.axis];
        let (near, far) = if delta < 0.0 {
            (current.left, current.right)
        } else {
            (current.right, current.left)
        };
        self.search(near, target, k, max_distance_squared, heap);

        // Visit the far side only if the splitting plane is closer than the k-th best
        let bound = match heap.peek() {
            Some((worst, _)) if heap.len() == k => worst.into_inner().min(max_distance_squared),
            _ => max_distance_squared,
        };
        if delta * delta <= bound {
            self.search(far, target, k, max_distance_squared, heap);
        }
    }
}

/// Axis with the largest positional variance.
fn max_variance_axis(photons: &[Photon]) -> usize {
    let n = photons.len() as f32;
    let mean = photons.iter().map(|p| p.position).sum::<Vec3>() / n;
    let variance = photons
        .iter()
        .map(|p| (p.position - mean) * (p.position - mean))
        .sum::<Vec3>();
    lumen_math::max_axis(variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{Color, Ray};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn photon_at(position: Vec3) -> Photon {
        Photon {
            position,
            power: Color::ONE,
            in_ray: Ray::new(position + Vec3::Y, Vec3::NEG_Y),
            out_ray: Ray::new(position, Vec3::Y),
            normal: Vec3::Y,
        }
    }

    fn random_photons(rng: &mut StdRng, n: usize) -> Vec<Photon> {
        (0..n)
            .map(|_| {
                photon_at(Vec3::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-3.0..3.0),
                ))
            })
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(Vec::new());

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.nearest(Vec3::ZERO, 10).is_empty());
        assert!(tree.nearest_within(Vec3::ZERO, 10, 1.0).is_empty());
    }

    #[test]
    fn test_query_at_stored_point() {
        let mut rng = StdRng::seed_from_u64(17);
        let photons = random_photons(&mut rng, 500);
        let target = photons[123].position;
        let tree = KdTree::build(photons);

        assert_eq!(tree.len(), 500);
        let found = tree.nearest(target, 5);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].distance_squared, 0.0);
        assert_eq!(found[0].photon.position, target);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        let photons = random_photons(&mut rng, 1000);
        let tree = KdTree::build(photons.clone());

        for _ in 0..50 {
            let target = Vec3::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-4.0..4.0),
            );
            let k = rng.gen_range(1..40);

            let mut expected: Vec<f32> = photons
                .iter()
                .map(|p| p.position.distance_squared(target))
                .collect();
            expected.sort_by(|a, b| a.total_cmp(b));
            expected.truncate(k);

            let found: Vec<f32> = tree
                .nearest(target, k)
                .iter()
                .map(|n| n.distance_squared)
                .collect();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn test_nearest_within_radius() {
        let photons: Vec<Photon> = (0..10).map(|i| photon_at(Vec3::X * i as f32)).collect();
        let tree = KdTree::build(photons);

        let found = tree.nearest_within(Vec3::ZERO, 100, 3.5);
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|n| n.distance_squared <= 3.5 * 3.5));

        // k still caps the result
        assert_eq!(tree.nearest_within(Vec3::ZERO, 2, 3.5).len(), 2);
    }

    #[test]
    fn test_fewer_photons_than_k() {
        let tree = KdTree::build(vec![photon_at(Vec3::ZERO), photon_at(Vec3::ONE)]);
        assert_eq!(tree.nearest(Vec3::splat(0.2), 10).len(), 2);
        assert!(tree.nearest(Vec3::ZERO, 0).is_empty());
    }

    #[test]
    fn test_huge_k_is_capped_by_tree_size() {
        let tree = KdTree::build(vec![photon_at(Vec3::ZERO), photon_at(Vec3::X)]);

        assert_eq!(tree.nearest(Vec3::ZERO, usize::MAX).len(), 2);
        assert_eq!(tree.nearest(Vec3::ZERO, 1 << 40).len(), 2);
        assert_eq!(tree.nearest_within(Vec3::ZERO, usize::MAX, 0.5).len(), 1);
    }

    #[test]
    fn test_negative_or_nan_radius_finds_nothing() {
        let tree = KdTree::build(vec![photon_at(Vec3::ZERO), photon_at(Vec3::X)]);

        assert!(tree.nearest_within(Vec3::ZERO, 10, -1.0).is_empty());
        assert!(tree.nearest_within(Vec3::ZERO, 10, f32::NAN).is_empty());
        // Zero radius still finds a photon sitting on the target
        assert_eq!(tree.nearest_within(Vec3::ZERO, 10, 0.0).len(), 1);
    }

    #[test]
    fn test_split_axis_follows_variance() {
        // Spread along Z only
        let photons: Vec<Photon> = (0..8).map(|i| photon_at(Vec3::Z * i as f32)).collect();
        assert_eq!(max_variance_axis(&photons), 2);

        let tree = KdTree::build(photons);
        assert_eq!(tree.nodes[tree.root.unwrap()].axis, 2);
    }
}
