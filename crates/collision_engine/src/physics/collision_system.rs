//! Core collision detection system
//!
//! The broad phase builds a fresh [`Bvh`] over one frame's sphere proxies and
//! queries it once per proxy. It knows nothing about the ECS; the ECS wrapper
//! in `ecs/systems/collision_system.rs` takes the snapshot, runs the narrow
//! phase on the candidates and applies the results.

use crate::config::DEFAULT_MERGE_CUTOFF;
use crate::ecs::Entity;
use crate::physics::bvh::Bvh;
use crate::physics::collision::Sphere;

/// Collision pair representing two entities that are in contact
///
/// The smaller entity key is always stored first, so `(a, b)` and `(b, a)`
/// compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Entity with the smaller key
    pub entity_a: Entity,
    /// Entity with the larger key
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair in canonical order
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self {
                entity_a: entity_b,
                entity_b: entity_a,
            }
        }
    }

    /// Check if `entity` is one side of this pair
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

/// Shape of the tree built for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadPhaseStats {
    /// Number of sphere proxies in the snapshot
    pub proxies: usize,
    /// Nodes allocated, leaves included
    pub nodes: usize,
    /// Merge rounds until a single root remained
    pub rounds: usize,
    /// Levels on the longest root-to-leaf path
    pub depth: usize,
    /// Candidates returned over all queries, self hits excluded
    pub candidates: usize,
}

/// Candidates found for every proxy of one frame
#[derive(Debug, Clone, Default)]
pub struct BroadPhaseResult {
    candidates: Vec<Vec<usize>>,
    stats: BroadPhaseStats,
}

impl BroadPhaseResult {
    /// Raw query result for proxy `index`, in tree order and including `index` itself
    pub fn raw_candidates(&self, index: usize) -> &[usize] {
        self.candidates.get(index).map_or(&[], Vec::as_slice)
    }

    /// Candidates for proxy `index` other than the proxy itself
    pub fn partners(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.raw_candidates(index)
            .iter()
            .copied()
            .filter(move |&other| other != index)
    }

    /// Number of candidates for proxy `index`, not counting itself
    pub fn candidate_count(&self, index: usize) -> usize {
        self.partners(index).count()
    }

    /// Number of proxies that were queried
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the snapshot was empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Tree and query statistics
    pub fn stats(&self) -> BroadPhaseStats {
        self.stats
    }
}

/// Sphere-tree broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadPhase {
    max_distance: f32,
}

impl BroadPhase {
    /// Create a broad phase with the given first-round merge cutoff
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// First-round merge cutoff in world units
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Build the tree over `proxies` and query it once per proxy
    ///
    /// The tree is dropped before returning. An empty snapshot builds no
    /// tree and yields an empty result.
    pub fn run(&self, proxies: &[Sphere]) -> BroadPhaseResult {
        if proxies.is_empty() {
            return BroadPhaseResult::default();
        }

        let bvh = Bvh::build(proxies, self.max_distance);
        let candidates: Vec<Vec<usize>> = proxies
            .iter()
            .map(|proxy| bvh.find_candidates(proxy))
            .collect();

        let mut result = BroadPhaseResult {
            candidates,
            stats: BroadPhaseStats {
                proxies: proxies.len(),
                nodes: bvh.len(),
                rounds: bvh.rounds(),
                depth: bvh.depth(),
                candidates: 0,
            },
        };
        result.stats.candidates = (0..proxies.len()).map(|i| result.candidate_count(i)).sum();
        result
    }
}

impl Default for BroadPhase {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_CUTOFF)
    }
}
