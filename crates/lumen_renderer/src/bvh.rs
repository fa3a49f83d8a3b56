//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and refer to their children by index. Every
//! leaf holds exactly one primitive; every interior node has exactly two
//! children and a box equal to the union of theirs.

use lumen_math::{Aabb, Interval, Ray};

use crate::intersect::HitRecord;
use crate::primitive::Primitive;
use crate::stats::RenderStats;

/// Padding applied to leaf boxes so flat primitives keep a volume.
const LEAF_PADDING: f32 = 1e-4;

/// BVH node - either an interior node with two children or a leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node whose box is the union of its children's boxes.
    Interior { bbox: Aabb, left: usize, right: usize },
    /// Leaf node referencing one primitive.
    Leaf { bbox: Aabb, primitive: usize },
}

impl BvhNode {
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Interior { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }
}

/// Binary BVH over a primitive list.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl Bvh {
    /// Build a BVH over `primitives`. Leaf `i` of the result refers to
    /// `primitives[i]` by index; the slice itself is not reordered.
    pub fn build(primitives: &[Primitive]) -> Self {
        let boxes: Vec<Aabb> = primitives
            .iter()
            .map(|p| p.bounds().padded(LEAF_PADDING))
            .collect();
        Self::from_boxes(&boxes)
    }

    /// Build a BVH directly from primitive bounding boxes.
    pub fn from_boxes(boxes: &[Aabb]) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(boxes.len().saturating_mul(2)),
            root: None,
        };
        if boxes.is_empty() {
            return bvh;
        }

        let mut order: Vec<usize> = (0..boxes.len()).collect();
        let root = bvh.build_range(boxes, &mut order);
        bvh.root = Some(root);
        bvh
    }

    /// Recursive construction over a slice of primitive indices.
    ///
    /// Splits at the midpoint of the longest axis of the range's union box.
    /// When every centroid lands on the same side, splits by count instead.
    fn build_range(&mut self, boxes: &[Aabb], order: &mut [usize]) -> usize {
        if order.len() == 1 {
            let primitive = order[0];
            return self.push(BvhNode::Leaf {
                bbox: boxes[primitive],
                primitive,
            });
        }

        let bounds = order
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| Aabb::surrounding(&acc, &boxes[i]));
        let axis = bounds.longest_axis();
        let mid_value = bounds.centroid()[axis];

        // In-place partition: [start, split) has centroids below the midpoint
        let mut split = 0;
        for i in 0..order.len() {
            if boxes[order[i]].centroid()[axis] < mid_value {
                order.swap(i, split);
                split += 1;
            }
        }
        if split == 0 || split == order.len() {
            split = order.len() / 2;
        }

        let (lower, upper) = order.split_at_mut(split);
        let left = self.build_range(boxes, lower);
        let right = self.build_range(boxes, upper);

        let bbox = Aabb::surrounding(&self.nodes[left].bbox(), &self.nodes[right].bbox());
        self.push(BvhNode::Interior { bbox, left, right })
    }

    fn push(&mut self, node: BvhNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Bounds of the whole hierarchy.
    pub fn bounds(&self) -> Aabb {
        self.root.map_or(Aabb::EMPTY, |r| self.nodes[r].bbox())
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BvhNode::Leaf { .. }))
            .count()
    }

    /// Closest primitive hit along `ray` within `ray_t`.
    ///
    /// Interior nodes test their box first and skip both children on a miss.
    /// Leaves go straight to the primitive test.
    pub fn closest_hit(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RenderStats,
    ) -> Option<HitRecord> {
        let root = self.root?;
        self.hit_node(root, primitives, ray, ray_t, stats)
    }

    fn hit_node(
        &self,
        index: usize,
        primitives: &[Primitive],
        ray: &Ray,
        ray_t: Interval,
        stats: &mut RenderStats,
    ) -> Option<HitRecord> {
        match self.nodes[index] {
            BvhNode::Leaf { primitive, .. } => {
                stats.primitive_tests += 1;
                primitives[primitive].intersect(ray, ray_t)
            }
            BvhNode::Interior { bbox, left, right } => {
                stats.box_tests += 1;
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = self.hit_node(left, primitives, ray, ray_t, stats);

                // Only search the right side up to the closest hit so far
                let right_t = hit_left.map_or(ray_t, |h| ray_t.with_max(h.t));
                let hit_right = self.hit_node(right, primitives, ray, right_t, stats);

                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if r.t < l.t { r } else { l }),
                    (l, r) => l.or(r),
                }
            }
        }
    }
}

/// Closest hit by testing every primitive in turn.
pub fn closest_hit_linear(
    primitives: &[Primitive],
    ray: &Ray,
    ray_t: Interval,
    stats: &mut RenderStats,
) -> Option<HitRecord> {
    let mut closest = None;
    let mut range = ray_t;

    for primitive in primitives {
        stats.primitive_tests += 1;
        if let Some(hit) = primitive.intersect(ray, range) {
            range = range.with_max(hit.t);
            closest = Some(hit);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Quad;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, scale: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
            rng.gen_range(-scale..scale),
        )
    }

    fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Primitive> {
        (0..count)
            .map(|i| match i % 3 {
                0 => Primitive::Sphere {
                    center: random_vec(rng, 10.0),
                    radius: rng.gen_range(0.2..1.5),
                    material: i,
                },
                1 => {
                    let a = random_vec(rng, 10.0);
                    Primitive::Triangle {
                        vertices: [a, a + random_vec(rng, 2.0), a + random_vec(rng, 2.0)],
                        normal: Vec3::Z,
                        material: i,
                    }
                }
                _ => {
                    // Axis-aligned quads exercise the zero-thickness padding
                    let quad = Quad::new(
                        random_vec(rng, 10.0),
                        Vec3::X * rng.gen_range(0.5..3.0),
                        Vec3::Z * rng.gen_range(0.5..3.0),
                        None,
                    );
                    Primitive::Plane {
                        quad: quad.unwrap(),
                        material: i,
                    }
                }
            })
            .collect()
    }

    /// Walk the tree checking the union invariant and counting leaves.
    fn check_node(bvh: &Bvh, index: usize) -> usize {
        match bvh.nodes()[index] {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Interior { bbox, left, right } => {
                let union = Aabb::surrounding(&bvh.nodes()[left].bbox(), &bvh.nodes()[right].bbox());
                assert_eq!(bbox, union);
                check_node(bvh, left) + check_node(bvh, right)
            }
        }
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = Bvh::build(&[]);
        assert!(bvh.is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut stats = RenderStats::default();
        assert!(bvh.closest_hit(&[], &ray, Interval::from_min(0.0), &mut stats).is_none());
    }

    #[test]
    fn test_bvh_single_primitive_is_leaf() {
        let primitives = vec![Primitive::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
            material: 0,
        }];
        let bvh = Bvh::build(&primitives);

        assert_eq!(bvh.nodes().len(), 1);
        assert!(matches!(bvh.nodes()[0], BvhNode::Leaf { primitive: 0, .. }));
    }

    #[test]
    fn test_unit_sphere_hit_through_bvh() {
        let primitives = vec![
            Primitive::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
                material: 0,
            },
            Primitive::Sphere {
                center: Vec3::new(5.0, 0.0, 0.0),
                radius: 1.0,
                material: 1,
            },
        ];
        let bvh = Bvh::build(&primitives);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let mut stats = RenderStats::default();

        let hit = bvh
            .closest_hit(&primitives, &ray, Interval::from_min(1e-4), &mut stats)
            .unwrap();

        assert_eq!(hit.t, 4.0);
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(hit.normal, Vec3::Z);
        assert_eq!(hit.material, 0);
        assert!(stats.box_tests >= 1);
    }

    #[test]
    fn test_leaf_count_and_union_invariant() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [2, 3, 17, 100, 257] {
            let primitives = random_scene(&mut rng, count);
            let bvh = Bvh::build(&primitives);

            assert_eq!(bvh.leaf_count(), count);
            assert_eq!(bvh.nodes().len(), 2 * count - 1);
            assert_eq!(check_node(&bvh, bvh.root().unwrap()), count);
        }
    }

    #[test]
    fn test_degenerate_split_falls_back_to_median() {
        // Identical boxes put every centroid on the same side of the midpoint
        let boxes = vec![Aabb::new(Vec3::ZERO, Vec3::ONE); 9];
        let bvh = Bvh::from_boxes(&boxes);

        assert_eq!(bvh.leaf_count(), 9);
        assert_eq!(check_node(&bvh, bvh.root().unwrap()), 9);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = random_scene(&mut rng, 300);
        let bvh = Bvh::build(&primitives);
        let mut stats = RenderStats::default();
        let range = Interval::from_min(1e-4);

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec(&mut rng, 15.0);
            let direction = random_vec(&mut rng, 1.0);
            let ray = Ray::new(origin, direction);

            let fast = bvh.closest_hit(&primitives, &ray, range, &mut stats);
            let slow = closest_hit_linear(&primitives, &ray, range, &mut stats);

            match (fast, slow) {
                (Some(a), Some(b)) => {
                    hits += 1;
                    assert!((a.t - b.t).abs() < 1e-4, "bvh t={} linear t={}", a.t, b.t);
                }
                (None, None) => {}
                (a, b) => panic!("bvh {:?} disagrees with linear scan {:?}", a, b),
            }
        }
        // Make sure the fixture actually exercises hits
        assert!(hits > 100);
    }

    #[test]
    fn test_bvh_does_fewer_primitive_tests() {
        let mut rng = StdRng::seed_from_u64(3);
        let primitives = random_scene(&mut rng, 500);
        let bvh = Bvh::build(&primitives);
        let range = Interval::from_min(1e-4);

        let mut fast = RenderStats::default();
        let mut slow = RenderStats::default();
        for _ in 0..200 {
            let ray = Ray::new(random_vec(&mut rng, 15.0), random_vec(&mut rng, 1.0));
            bvh.closest_hit(&primitives, &ray, range, &mut fast);
            closest_hit_linear(&primitives, &ray, range, &mut slow);
        }
        assert!(fast.primitive_tests < slow.primitive_tests);
    }
}
