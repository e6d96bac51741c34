//! Collision detection components for ECS
//!
//! Collider shapes are stored relative to the entity's
//! [`TransformComponent`](super::TransformComponent) position and moved into
//! world space only for the duration of a test. The `*_colliding` flags are
//! outputs of the collision pass: cleared at the start of every pass and set
//! only on a confirmed contact.

use crate::ecs::{Component, Entity};
use crate::foundation::math::Vec3;
use crate::physics::collision::{aabb_from_sphere, Aabb, Plane, Sphere};
use crate::physics::error::GeometryError;

fn check_extent(value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidExtent { value })
    }
}

/// Sphere collider, the entity's proxy in the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereColliderComponent {
    /// Sphere center relative to the entity position
    pub offset: Vec3,

    /// Sphere radius
    pub radius: f32,

    /// Is this a trigger volume (flags and pickups but no physical response)?
    pub is_trigger: bool,

    /// Set when a sphere-sphere contact was confirmed this pass
    pub sphere_colliding: bool,

    /// Set when the sphere touches a plane collider this pass
    pub plane_colliding: bool,
}

impl SphereColliderComponent {
    /// Create a physical sphere collider
    pub fn new(offset: Vec3, radius: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            offset,
            radius: check_extent(radius)?,
            is_trigger: false,
            sphere_colliding: false,
            plane_colliding: false,
        })
    }

    /// Create a collider from a sphere given in entity-local space
    pub fn from_local_sphere(sphere: &Sphere) -> Result<Self, GeometryError> {
        Self::new(sphere.center, sphere.radius)
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// World-space sphere for an entity at `position`, tagged with `owner`
    pub fn world_sphere(&self, position: Vec3, owner: Entity) -> Sphere {
        Sphere::new(position + self.offset, self.radius).with_owner(owner)
    }

    /// Clear both contact flags
    pub fn clear_flags(&mut self) {
        self.sphere_colliding = false;
        self.plane_colliding = false;
    }
}

impl Component for SphereColliderComponent {}

/// Axis-aligned box collider used to confirm broad-phase candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxColliderComponent {
    /// Box relative to the entity position
    pub local: Aabb,

    /// Is this a trigger volume?
    pub is_trigger: bool,

    /// Set on a confirmed box-box or box-plane contact this pass
    pub colliding: bool,
}

impl BoxColliderComponent {
    /// Create a box collider, rejecting negative or non-finite half-widths
    pub fn new(local: Aabb) -> Result<Self, GeometryError> {
        for value in local.half_widths.iter() {
            check_extent(*value)?;
        }
        Ok(Self {
            local,
            is_trigger: false,
            colliding: false,
        })
    }

    /// Conservative cube around a local sphere
    pub fn from_sphere(sphere: &Sphere) -> Result<Self, GeometryError> {
        Self::new(aabb_from_sphere(sphere))
    }

    /// Mark this as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// World-space box for an entity at `position`
    pub fn world_aabb(&self, position: Vec3) -> Aabb {
        self.local.translated(position)
    }
}

impl Component for BoxColliderComponent {}

/// Infinite plane collider, typically the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneColliderComponent {
    /// Plane relative to the entity position (or in world space without a transform)
    pub plane: Plane,
}

impl PlaneColliderComponent {
    /// Create a plane collider
    pub fn new(plane: Plane) -> Self {
        Self { plane }
    }

    /// World-space plane, offset by the owning entity's position when it has one
    pub fn world_plane(&self, position: Option<Vec3>) -> Plane {
        match position {
            Some(position) => self.plane.translated(position),
            None => self.plane,
        }
    }
}

impl Component for PlaneColliderComponent {}

/// Marks an entity as something the player can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickupComponent {
    /// Set once the pickup has been collected; never cleared
    pub consumed: bool,
}

impl PickupComponent {
    /// Create an uncollected pickup
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as consumed; returns `false` if it already was
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }
}

impl Component for PickupComponent {}
