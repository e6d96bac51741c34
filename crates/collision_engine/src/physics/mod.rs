//! Physics module for collision detection and response
//!
//! Provides sphere-tree broad-phase detection, closed-form narrow-phase
//! tests for spheres, boxes and planes, and horizontal penetration
//! resolution.

pub mod collision;
pub mod bvh;
pub mod collision_system;
pub mod error;
pub mod resolution;

pub use collision::{Aabb, Plane, Sphere};
pub use bvh::{Bvh, BvhNode, NodeId};
pub use collision_system::{BroadPhase, BroadPhaseResult, BroadPhaseStats, CollisionPair};
pub use error::GeometryError;
pub use resolution::{horizontal_separation, Separation};
