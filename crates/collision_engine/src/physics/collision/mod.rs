//! Collision geometry and narrow-phase tests
//!
//! # Module Organization
//!
//! - [`primitives`] - Sphere, box and plane value types
//! - [`intersection`] - Closed-form overlap predicates between primitives
//! - [`bounding`] - Bounding volume derivation (spheres from points, boxes from spheres)
//!
//! Shapes attached to entities are stored in local coordinates by the
//! collider components and only moved into world space for a single test.

pub mod primitives;
pub mod intersection;
pub mod bounding;

// Re-export commonly used types
pub use primitives::{Aabb, Plane, Sphere};
pub use intersection::{aabb_aabb, aabb_plane, sphere_plane, sphere_sphere};
pub use bounding::{aabb_from_sphere, bounding_sphere_from_points, enclosing_sphere};
