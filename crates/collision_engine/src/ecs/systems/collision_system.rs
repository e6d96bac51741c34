//! ECS collision system wrapper
//!
//! Drives one collision pass per frame over the [`World`]:
//!
//! 1. clear every collider flag
//! 2. snapshot `{transform, sphere collider}` entities into world-space spheres
//! 3. run the sphere-tree broad phase over the snapshot
//! 4. confirm each candidate with sphere-sphere and box-box tests
//! 5. flag confirmed contacts, hand pickups to the listener and push
//!    physical (non-trigger) pairs apart horizontally
//! 6. brute-force box-box, sphere-plane and box-plane passes that only flag
//!
//! Snapshot order is the world's slot order, which fixes leaf order and the
//! order pairs are handled in. Spawning or despawning entities between
//! frames can change it.

use std::collections::{HashMap, HashSet};

use crate::config::CollisionConfig;
use crate::ecs::{Entity, World};
use crate::ecs::components::{
    BoxColliderComponent,
    PickupComponent,
    PlaneColliderComponent,
    SphereColliderComponent,
    TransformComponent,
};
use crate::foundation::math::Vec3;
use crate::physics::collision::{aabb_aabb, aabb_plane, sphere_plane, sphere_sphere, Aabb, Plane, Sphere};
use crate::physics::collision_system::{BroadPhase, BroadPhaseStats, CollisionPair};
use crate::physics::resolution::horizontal_separation;

/// Receives pickup notifications from the collision pass
///
/// Only borrowed for the duration of [`CollisionSystem::update`].
pub trait PickupListener {
    /// The entity allowed to collect pickups; [`Entity::null`] disables pickups
    fn player(&self) -> Entity;

    /// Called once per pickup, the first frame the player touches it
    fn on_pickup_collected(&mut self, pickup: Entity);
}

/// Listener for scenes without a player
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPickups;

impl PickupListener for NoPickups {
    fn player(&self) -> Entity {
        Entity::null()
    }

    fn on_pickup_collected(&mut self, _pickup: Entity) {}
}

/// Contact between a collider and a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneContact {
    /// Entity whose sphere or box touches the plane
    pub entity: Entity,
    /// Entity carrying the plane collider
    pub plane: Entity,
}

/// Everything one collision pass found
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Broad-phase candidates confirmed by the sphere and box tests
    pub contacts: HashSet<CollisionPair>,
    /// Overlapping box colliders found by the brute-force pass
    pub box_contacts: HashSet<CollisionPair>,
    /// Sphere colliders touching a plane
    pub sphere_plane_contacts: Vec<PlaneContact>,
    /// Box colliders touching a plane
    pub box_plane_contacts: Vec<PlaneContact>,
    /// Pickups collected this pass, in the order they were handled
    pub pickups_collected: Vec<Entity>,
    /// Number of positional corrections applied
    pub corrections: usize,
    /// Shape of this pass's sphere tree
    pub broad_phase: BroadPhaseStats,
}

/// Narrow-phase result for one candidate pair
struct Contact {
    sphere_a: Sphere,
    sphere_b: Sphere,
    involves_trigger: bool,
}

/// ECS collision system
pub struct CollisionSystem {
    config: CollisionConfig,
    broad_phase: BroadPhase,
    candidate_counts: HashMap<Entity, usize>,
}

impl CollisionSystem {
    /// Create a collision system from its configuration
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            broad_phase: BroadPhase::new(config.merge_cutoff),
            config,
            candidate_counts: HashMap::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Broad-phase candidates per sphere owner from the last pass, self excluded
    pub fn candidate_counts(&self) -> &HashMap<Entity, usize> {
        &self.candidate_counts
    }

    /// Broad-phase candidate count of one entity from the last pass
    pub fn candidate_count(&self, entity: Entity) -> Option<usize> {
        self.candidate_counts.get(&entity).copied()
    }

    /// Run a full collision pass
    ///
    /// Flags are cleared once up front; every pass after that only sets them.
    pub fn update(&mut self, world: &mut World, listener: &mut dyn PickupListener) -> CollisionReport {
        reset_flags(world);

        let mut report = CollisionReport::default();
        self.bvh_pass(world, listener, &mut report);
        box_box_pass(world, &mut report);
        sphere_plane_pass(world, &mut report);
        box_plane_pass(world, &mut report);

        log::debug!(
            "Collision pass: {} proxies, {} contacts, {} box contacts, {} plane contacts, {} corrections",
            report.broad_phase.proxies,
            report.contacts.len(),
            report.box_contacts.len(),
            report.sphere_plane_contacts.len() + report.box_plane_contacts.len(),
            report.corrections
        );
        report
    }

    /// Broad phase over the sphere snapshot plus narrow phase and resolution
    ///
    /// Replaces the candidate-count map. Does not clear flags.
    pub fn bvh_pass(&mut self, world: &mut World, listener: &mut dyn PickupListener, report: &mut CollisionReport) {
        let proxies = snapshot(world);
        self.candidate_counts = HashMap::with_capacity(proxies.len());

        if proxies.is_empty() {
            log::trace!("No sphere colliders, skipping broad phase");
            return;
        }

        let result = self.broad_phase.run(&proxies);
        report.broad_phase = result.stats();

        for (index, proxy) in proxies.iter().enumerate() {
            self.candidate_counts.insert(proxy.owner, result.candidate_count(index));

            for other in result.partners(index) {
                self.handle_candidate(world, listener, proxy.owner, proxies[other].owner, report);
            }
        }
    }

    fn handle_candidate(
        &self,
        world: &mut World,
        listener: &mut dyn PickupListener,
        a: Entity,
        b: Entity,
        report: &mut CollisionReport,
    ) {
        let contact = match confirm_contact(world, a, b) {
            Some(contact) => contact,
            None => return,
        };

        log::trace!("Contact between {:?} and {:?}", a, b);
        for entity in [a, b] {
            if let Some(collider) = world.get_mut::<BoxColliderComponent>(entity) {
                collider.colliding = true;
            }
            if let Some(collider) = world.get_mut::<SphereColliderComponent>(entity) {
                collider.sphere_colliding = true;
            }
        }
        report.contacts.insert(CollisionPair::new(a, b));

        dispatch_pickup(world, listener, a, b, report);

        if contact.involves_trigger || !self.config.resolve_penetration {
            return;
        }

        if let Some(separation) = horizontal_separation(&contact.sphere_a, &contact.sphere_b, self.config.up_axis) {
            translate(world, a, separation.first);
            translate(world, b, separation.second);
            report.corrections += 1;
            log::trace!("Separated {:?} and {:?} by {:.3}", a, b, separation.depth);
        }
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

/// Clear every sphere and box collider flag
pub fn reset_flags(world: &mut World) {
    for (_, collider) in world.query_mut::<SphereColliderComponent>() {
        collider.clear_flags();
    }
    for (_, collider) in world.query_mut::<BoxColliderComponent>() {
        collider.colliding = false;
    }
}

/// World-space spheres of every entity with a transform and a sphere collider
pub fn snapshot(world: &World) -> Vec<Sphere> {
    world
        .query::<SphereColliderComponent>()
        .filter_map(|(entity, collider)| {
            let transform = world.get::<TransformComponent>(entity)?;
            Some(collider.world_sphere(transform.position, entity))
        })
        .collect()
}

/// Sphere-sphere then box-box test on current positions
///
/// `None` if the pair does not touch or either side lacks a component.
fn confirm_contact(world: &World, a: Entity, b: Entity) -> Option<Contact> {
    let position_a = world.get::<TransformComponent>(a)?.position;
    let position_b = world.get::<TransformComponent>(b)?.position;
    let collider_a = world.get::<SphereColliderComponent>(a)?;
    let collider_b = world.get::<SphereColliderComponent>(b)?;

    let sphere_a = collider_a.world_sphere(position_a, a);
    let sphere_b = collider_b.world_sphere(position_b, b);
    if !sphere_sphere(&sphere_a, &sphere_b) {
        return None;
    }

    let box_a = world.get::<BoxColliderComponent>(a)?.world_aabb(position_a);
    let box_b = world.get::<BoxColliderComponent>(b)?.world_aabb(position_b);
    if !aabb_aabb(&box_a, &box_b) {
        return None;
    }

    Some(Contact {
        sphere_a,
        sphere_b,
        involves_trigger: collider_a.is_trigger || collider_b.is_trigger,
    })
}

/// Hand an uncollected pickup touched by the player to the listener
fn dispatch_pickup(
    world: &mut World,
    listener: &mut dyn PickupListener,
    a: Entity,
    b: Entity,
    report: &mut CollisionReport,
) {
    let player = listener.player();
    if player.is_null() {
        return;
    }

    let pickup = if b == player && world.has::<PickupComponent>(a) {
        a
    } else if a == player && world.has::<PickupComponent>(b) {
        b
    } else {
        return;
    };

    let collected = world
        .get_mut::<PickupComponent>(pickup)
        .map_or(false, PickupComponent::consume);
    if collected {
        log::info!("Player {:?} collected pickup {:?}", player, pickup);
        listener.on_pickup_collected(pickup);
        report.pickups_collected.push(pickup);
    }
}

fn translate(world: &mut World, entity: Entity, delta: Vec3) {
    if let Some(transform) = world.get_mut::<TransformComponent>(entity) {
        transform.translate(delta);
    }
}

/// World-space boxes of every entity with a transform and a box collider
fn world_boxes(world: &World) -> Vec<(Entity, Aabb)> {
    world
        .query::<BoxColliderComponent>()
        .filter_map(|(entity, collider)| {
            let transform = world.get::<TransformComponent>(entity)?;
            Some((entity, collider.world_aabb(transform.position)))
        })
        .collect()
}

/// World-space planes; a plane entity without a transform sits at the origin
fn world_planes(world: &World) -> Vec<(Entity, Plane)> {
    world
        .query::<PlaneColliderComponent>()
        .map(|(entity, collider)| {
            let position = world.get::<TransformComponent>(entity).map(|t| t.position);
            (entity, collider.world_plane(position))
        })
        .collect()
}

/// Test every pair of box colliders and flag overlaps; never moves entities
pub fn box_box_pass(world: &mut World, report: &mut CollisionReport) {
    let boxes = world_boxes(world);

    for (i, (a, box_a)) in boxes.iter().enumerate() {
        for (b, box_b) in &boxes[i + 1..] {
            if !aabb_aabb(box_a, box_b) {
                continue;
            }
            for entity in [*a, *b] {
                if let Some(collider) = world.get_mut::<BoxColliderComponent>(entity) {
                    collider.colliding = true;
                }
            }
            report.box_contacts.insert(CollisionPair::new(*a, *b));
        }
    }
}

/// Test every sphere collider against every plane and set `plane_colliding`
pub fn sphere_plane_pass(world: &mut World, report: &mut CollisionReport) {
    let planes = world_planes(world);
    if planes.is_empty() {
        return;
    }

    for sphere in snapshot(world) {
        for (plane_entity, plane) in &planes {
            if !sphere_plane(&sphere, plane) {
                continue;
            }
            if let Some(collider) = world.get_mut::<SphereColliderComponent>(sphere.owner) {
                collider.plane_colliding = true;
            }
            report.sphere_plane_contacts.push(PlaneContact {
                entity: sphere.owner,
                plane: *plane_entity,
            });
        }
    }
}

/// Test every box collider against every plane and set `colliding`
pub fn box_plane_pass(world: &mut World, report: &mut CollisionReport) {
    let planes = world_planes(world);
    if planes.is_empty() {
        return;
    }

    for (entity, aabb) in world_boxes(world) {
        for (plane_entity, plane) in &planes {
            if !aabb_plane(&aabb, plane) {
                continue;
            }
            if let Some(collider) = world.get_mut::<BoxColliderComponent>(entity) {
                collider.colliding = true;
            }
            report.box_plane_contacts.push(PlaneContact {
                entity,
                plane: *plane_entity,
            });
        }
    }
}
