//! Bounding volume hierarchy over sphere proxies
//!
//! The tree is built bottom-up from one frame's sphere snapshot and dropped
//! with it; nothing is kept between frames. Nodes live in a flat arena and
//! refer to each other by [`NodeId`], so releasing the tree is a single
//! `Vec` drop.
//!
//! # Construction
//!
//! Every proxy starts as a leaf in the open set. Each round pops the first
//! open node and scans the rest for the smallest surface distance
//! (see [`Sphere::surface_distance`]). Within the cutoff the two nodes are
//! merged under a parent whose sphere encloses both; otherwise the node gets
//! a pass-through parent with only a left child. The parents, in creation
//! order, form the next open set.
//!
//! Only the first round honours the cutoff. Every later round pairs
//! unconditionally, which guarantees a single root after O(log n) rounds.
//! The nearest-neighbour scan makes each round O(n²); frame populations are
//! tens of entities, not thousands.
//!
//! Leaf order follows the proxy slice, so the tree shape (and the order of
//! query results) depends on the order the snapshot was taken in.

use std::collections::VecDeque;

use crate::physics::collision::{enclosing_sphere, Sphere};

/// Relative slack on the pruning test, in ulps of the distances involved
const PRUNE_SLACK: f32 = 8.0 * f32::EPSILON;

/// Handle to a node in a [`Bvh`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single tree node
#[derive(Debug, Clone, PartialEq)]
pub struct BvhNode {
    /// Bounding sphere of everything below this node
    pub sphere: Sphere,

    /// Index into the proxy slice, set for leaves only
    pub proxy: Option<usize>,

    /// First child; the only child of a pass-through node
    pub left: Option<NodeId>,

    /// Second child, absent for leaves and pass-through nodes
    pub right: Option<NodeId>,
}

impl BvhNode {
    fn leaf(sphere: Sphere, proxy: usize) -> Self {
        Self {
            sphere,
            proxy: Some(proxy),
            left: None,
            right: None,
        }
    }

    /// Check if this node wraps a proxy
    pub fn is_leaf(&self) -> bool {
        self.proxy.is_some()
    }
}

/// Frame-local sphere tree
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<NodeId>,
    leaf_count: usize,
    rounds: usize,
}

impl Bvh {
    /// Build a tree over `proxies`, merging only nodes within `max_distance`
    /// of each other in the first round
    ///
    /// An empty slice gives an empty tree; a single proxy becomes the root leaf.
    pub fn build(proxies: &[Sphere], max_distance: f32) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(proxies.len() * 2),
            root: None,
            leaf_count: proxies.len(),
            rounds: 0,
        };

        let mut open: VecDeque<NodeId> = proxies
            .iter()
            .enumerate()
            .map(|(index, sphere)| bvh.push(BvhNode::leaf(*sphere, index)))
            .collect();

        let mut cutoff = Some(max_distance);
        while open.len() > 1 {
            open = bvh.merge_round(open, cutoff);
            bvh.rounds += 1;
            cutoff = None;
        }

        bvh.root = open.pop_front();
        log::trace!(
            "Built BVH: {} leaves, {} nodes, {} rounds",
            bvh.leaf_count,
            bvh.nodes.len(),
            bvh.rounds
        );
        bvh
    }

    /// One greedy pairing pass; `None` as cutoff pairs regardless of distance
    fn merge_round(&mut self, mut open: VecDeque<NodeId>, cutoff: Option<f32>) -> VecDeque<NodeId> {
        let mut parents = VecDeque::with_capacity(open.len() / 2 + 1);

        while let Some(current) = open.pop_front() {
            let parent = match self.nearest(current, &open, cutoff).and_then(|at| open.remove(at)) {
                Some(partner) => {
                    let sphere = enclosing_sphere(&self.sphere(current), &self.sphere(partner));
                    BvhNode {
                        sphere,
                        proxy: None,
                        left: Some(current),
                        right: Some(partner),
                    }
                }
                None => BvhNode {
                    sphere: self.sphere(current),
                    proxy: None,
                    left: Some(current),
                    right: None,
                },
            };
            parents.push_back(self.push(parent));
        }

        parents
    }

    /// Position in `open` of the node closest to `current`
    ///
    /// Ties keep the earlier node. Without a cutoff the first node is
    /// accepted even if its distance does not compare (NaN).
    fn nearest(&self, current: NodeId, open: &VecDeque<NodeId>, cutoff: Option<f32>) -> Option<usize> {
        let sphere = self.sphere(current);
        let mut best: Option<(usize, f32)> = None;

        for (position, &candidate) in open.iter().enumerate() {
            let distance = sphere.surface_distance(&self.sphere(candidate));
            let within = cutoff.map_or(true, |cutoff| distance <= cutoff);
            if !within {
                continue;
            }
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((position, distance));
            }
        }

        best.map(|(position, _)| position)
    }

    fn push(&mut self, node: BvhNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn sphere(&self, id: NodeId) -> Sphere {
        self.nodes[id.0].sphere
    }

    /// Indices of every proxy whose leaf is reachable without leaving `query`
    ///
    /// Depth first, left subtree before right. A node whose sphere misses the
    /// query is pruned with everything below it. The query proxy itself is
    /// reported too when it is part of the tree. Spheres within a few ulps of
    /// touching the query may be reported as well.
    pub fn find_candidates(&self, query: &Sphere) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, query, &mut results);
        }
        results
    }

    fn collect(&self, id: NodeId, query: &Sphere, results: &mut Vec<usize>) {
        let node = &self.nodes[id.0];
        if !may_overlap(&node.sphere, query) {
            return;
        }

        if let Some(proxy) = node.proxy {
            results.push(proxy);
            return;
        }

        if let Some(left) = node.left {
            self.collect(left, query, results);
        }
        if let Some(right) = node.right {
            self.collect(right, query, results);
        }
    }

    /// Root node, `None` for an empty tree
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by handle
    pub fn node(&self, id: NodeId) -> Option<&BvhNode> {
        self.nodes.get(id.0)
    }

    /// Total node count, leaves included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no proxies
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of merge rounds it took to reach the root
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Levels on the longest root-to-leaf path; 0 for an empty tree
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            let node = &self.nodes[id.0];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, level + 1));
            }
        }

        deepest
    }
}

/// Sphere overlap loosened by a few ulps
///
/// A query touching a leaf exactly has to pass at every ancestor even when
/// rounding lands the other way there; an extra candidate is harmless, a
/// missing one is not.
fn may_overlap(node: &Sphere, query: &Sphere) -> bool {
    let reach = node.radius + query.radius;
    let scale = reach + node.center.amax().max(query.center.amax());
    let limit = reach + scale * PRUNE_SLACK;
    (node.center - query.center).magnitude_squared() <= limit * limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::sphere_sphere;
    use crate::foundation::math::Vec3;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere::new(Vec3::new(x, y, z), radius)
    }

    fn children(bvh: &Bvh, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let node = bvh.node(id).unwrap();
        (node.left, node.right)
    }

    #[test]
    fn test_empty_snapshot_builds_nothing() {
        let bvh = Bvh::build(&[], 3.0);
        assert!(bvh.is_empty());
        assert_eq!(bvh.root(), None);
        assert_eq!(bvh.depth(), 0);
        assert!(bvh.find_candidates(&sphere(0.0, 0.0, 0.0, 100.0)).is_empty());
    }

    #[test]
    fn test_single_proxy_is_root_leaf() {
        let bvh = Bvh::build(&[sphere(1.0, 2.0, 3.0, 0.5)], 3.0);
        let root = bvh.node(bvh.root().unwrap()).unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.proxy, Some(0));
        assert_eq!(bvh.rounds(), 0);
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn test_nearest_node_is_paired_first() {
        let proxies = [
            sphere(0.0, 0.0, 0.0, 0.5),
            sphere(10.0, 0.0, 0.0, 0.5),
            sphere(1.5, 0.0, 0.0, 0.5),
        ];
        let bvh = Bvh::build(&proxies, 3.0);

        // Round one: (0, 2) merge, 1 is out of range and passes through
        let (first, second) = children(&bvh, bvh.root().unwrap());
        let (a, b) = children(&bvh, first.unwrap());
        assert_eq!(bvh.node(a.unwrap()).unwrap().proxy, Some(0));
        assert_eq!(bvh.node(b.unwrap()).unwrap().proxy, Some(2));

        let (only, none) = children(&bvh, second.unwrap());
        assert_eq!(none, None);
        assert_eq!(bvh.node(only.unwrap()).unwrap().proxy, Some(1));
        assert_eq!(bvh.rounds(), 2);
    }

    #[test]
    fn test_distance_ties_keep_earlier_node() {
        // Proxies 1 and 2 are equally far from proxy 0
        let proxies = [
            sphere(0.0, 0.0, 0.0, 0.5),
            sphere(2.0, 0.0, 0.0, 0.5),
            sphere(-2.0, 0.0, 0.0, 0.5),
        ];
        let bvh = Bvh::build(&proxies, 3.0);
        let (first, _) = children(&bvh, bvh.root().unwrap());
        let (_, partner) = children(&bvh, first.unwrap());
        assert_eq!(bvh.node(partner.unwrap()).unwrap().proxy, Some(1));
    }

    #[test]
    fn test_pass_through_keeps_child_sphere() {
        let proxies = [sphere(0.0, 0.0, 0.0, 1.0), sphere(50.0, 0.0, 0.0, 1.0)];
        let bvh = Bvh::build(&proxies, 3.0);

        // Nothing merges in round one, so both leaves get pass-through parents
        for leaf in 0..2 {
            let parent = bvh.node(NodeId(2 + leaf)).unwrap();
            assert_eq!(parent.left, Some(NodeId(leaf)));
            assert_eq!(parent.right, None);
            assert_eq!(parent.sphere, proxies[leaf]);
        }
        assert_eq!(bvh.rounds(), 2);
    }

    #[test]
    fn test_three_far_spheres_merge_into_one_root() {
        let proxies = [
            sphere(0.0, 0.0, 0.0, 1.0),
            sphere(10.0, 0.0, 0.0, 1.0),
            sphere(20.0, 0.0, 0.0, 1.0),
        ];
        let bvh = Bvh::build(&proxies, 3.0);

        assert_eq!(bvh.leaf_count(), 3);
        // Pass-through round, (0, 1) + pass-through, then the final merge
        assert_eq!(bvh.rounds(), 3);
        assert_eq!(bvh.depth(), 4);

        let root = bvh.node(bvh.root().unwrap()).unwrap();
        for proxy in &proxies {
            assert!(root.sphere.radius + 1e-4 >= (root.sphere.center - proxy.center).magnitude() + proxy.radius);
        }

        // Pruning below the root leaves every sphere with only itself
        for (index, proxy) in proxies.iter().enumerate() {
            assert_eq!(bvh.find_candidates(proxy), vec![index]);
        }
    }

    #[test]
    fn test_query_order_is_left_before_right() {
        let proxies = [
            sphere(0.0, 0.0, 0.0, 1.0),
            sphere(1.0, 0.0, 0.0, 1.0),
            sphere(2.0, 0.0, 0.0, 1.0),
            sphere(3.0, 0.0, 0.0, 1.0),
        ];
        let bvh = Bvh::build(&proxies, 3.0);
        let candidates = bvh.find_candidates(&sphere(1.5, 0.0, 0.0, 10.0));
        assert_eq!(candidates, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_query_prunes_distant_subtrees() {
        let proxies = [
            sphere(0.0, 0.0, 0.0, 1.0),
            sphere(1.5, 0.0, 0.0, 1.0),
            sphere(40.0, 0.0, 0.0, 1.0),
        ];
        let bvh = Bvh::build(&proxies, 3.0);
        assert_eq!(bvh.find_candidates(&proxies[0]), vec![0, 1]);
        assert_eq!(bvh.find_candidates(&proxies[2]), vec![2]);
    }

    #[test]
    fn test_no_false_negatives() {
        // Deterministic scatter with a mix of clustered and isolated spheres
        let mut state: u32 = 0x2545_f491;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 10_000) as f32 / 10_000.0
        };

        let proxies: Vec<Sphere> = (0..40)
            .map(|_| {
                let center = Vec3::new(next() * 30.0 - 15.0, next() * 4.0, next() * 30.0 - 15.0);
                Sphere::new(center, 0.3 + next() * 1.7)
            })
            .collect();

        let bvh = Bvh::build(&proxies, 3.0);
        for (i, a) in proxies.iter().enumerate() {
            let candidates = bvh.find_candidates(a);
            assert!(candidates.contains(&i));
            for (j, b) in proxies.iter().enumerate() {
                if sphere_sphere(a, b) {
                    assert!(candidates.contains(&j), "proxy {j} overlaps {i} but was pruned");
                }
            }
        }
    }

    #[test]
    fn test_touching_spheres_are_never_pruned() {
        let mut state: u32 = 0x1b87_3593;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 100_000) as f32 / 100_000.0
        };

        for _ in 0..4_000 {
            let mut proxies: Vec<Sphere> = (0..6)
                .map(|_| {
                    let center = Vec3::new(next() * 20.0 - 10.0, next() * 4.0, next() * 20.0 - 10.0);
                    Sphere::new(center, 0.2 + next() * 2.0)
                })
                .collect();

            // Put proxy 1 exactly against proxy 0
            let offset = Vec3::new(next() - 0.5, next() - 0.5, next() - 0.5);
            let direction = if offset.magnitude() > 1e-3 { offset.normalize() } else { Vec3::x() };
            proxies[1].center = proxies[0].center + direction * (proxies[0].radius + proxies[1].radius);

            let bvh = Bvh::build(&proxies, 3.0);
            for (i, a) in proxies.iter().enumerate() {
                let candidates = bvh.find_candidates(a);
                for (j, b) in proxies.iter().enumerate() {
                    if sphere_sphere(a, b) {
                        assert!(candidates.contains(&j), "proxy {j} touches {i} but was pruned");
                    }
                }
            }
        }
    }

    #[test]
    fn test_loosened_pruning_still_rejects_clear_gaps() {
        let node = sphere(0.0, 0.0, 0.0, 1.0);
        assert!(may_overlap(&node, &sphere(2.0, 0.0, 0.0, 1.0)));
        assert!(!may_overlap(&node, &sphere(2.001, 0.0, 0.0, 1.0)));
        assert!(!may_overlap(&sphere(100.0, 0.0, 0.0, 1.0), &sphere(102.01, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_internal_nodes_enclose_children() {
        let proxies: Vec<Sphere> = (0..12)
            .map(|i| {
                let i = i as f32;
                sphere((i * 2.7) % 11.0, (i * 1.3) % 3.0, (i * 4.1) % 7.0, 0.4 + (i % 3.0) * 0.3)
            })
            .collect();
        let bvh = Bvh::build(&proxies, 3.0);

        for index in 0..bvh.len() {
            let node = bvh.node(NodeId(index)).unwrap();
            for child in [node.left, node.right].into_iter().flatten() {
                let inner = bvh.node(child).unwrap().sphere;
                let reach = (node.sphere.center - inner.center).magnitude() + inner.radius;
                assert!(reach <= node.sphere.radius + 1e-4);
            }
        }
    }
}
