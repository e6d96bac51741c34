//! # Collision Engine
//!
//! Per-frame collision detection for small interactive scenes.
//!
//! ## Features
//!
//! - **Sphere BVH broad phase**: rebuilt bottom-up from scratch every frame
//! - **Narrow phase**: closed-form sphere, box and plane overlap tests
//! - **Resolution**: horizontal push-apart for physical colliders, flags only for triggers
//! - **Pickups**: call-scoped listener notified once per collected pickup
//! - **ECS**: generational entities with per-type component storage
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! let mut world = World::new();
//! let ground = world.spawn();
//! world.insert(ground, PlaneColliderComponent::new(Plane::ground(Vec3::zeros()))).unwrap();
//!
//! let ball = world.spawn();
//! world.insert(ball, TransformComponent::from_position(Vec3::zeros())).unwrap();
//! world.insert(ball, SphereColliderComponent::new(Vec3::zeros(), 1.0).unwrap()).unwrap();
//!
//! let mut collisions = CollisionSystem::new(CollisionConfig::default());
//! let report = collisions.update(&mut world, &mut NoPickups);
//!
//! assert_eq!(report.sphere_plane_contacts.len(), 1);
//! assert!(world.get::<SphereColliderComponent>(ball).unwrap().plane_colliding);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod physics;
pub mod events;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        ecs::{Component, Entity, World, WorldError},
        ecs::components::{
            BoxColliderComponent,
            MovementComponent,
            PickupComponent,
            PlaneColliderComponent,
            SphereColliderComponent,
            TransformComponent,
            WaypointComponent,
        },
        ecs::systems::{
            movement_system,
            waypoint_system,
            CollisionReport,
            CollisionSystem,
            NoPickups,
            PickupListener,
        },
        events::{Event, EventArg, EventHandler, EventSystem, EventType},
        foundation::math::{Axis, Vec3},
        physics::{
            collision::{aabb_from_sphere, bounding_sphere_from_points},
            Aabb,
            CollisionPair,
            GeometryError,
            Plane,
            Sphere,
        },
    };
}
