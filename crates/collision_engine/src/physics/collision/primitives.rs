//! Primitive collision shapes
//!
//! Plain value types: a bounding sphere tagged with the entity that owns it,
//! an axis-aligned box stored as center plus half-widths, and an infinite
//! plane. The overlap tests live in [`super::intersection`].

use crate::ecs::Entity;
use crate::foundation::math::Vec3;
use crate::physics::error::GeometryError;

/// Normals shorter than this are rejected as degenerate
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
    /// The entity this sphere stands in for ([`Entity::null`] when unowned)
    pub owner: Entity,
}

impl Sphere {
    /// Creates an unowned sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            owner: Entity::null(),
        }
    }

    /// Tag this sphere with its owning entity
    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = owner;
        self
    }

    /// Same sphere moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            ..*self
        }
    }

    /// Distance between the two surfaces, floored at zero for overlapping spheres
    pub fn surface_distance(&self, other: &Sphere) -> f32 {
        let gap = (self.center - other.center).magnitude() - self.radius - other.radius;
        gap.max(0.0)
    }
}

/// Axis-aligned bounding box stored as center and half-widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Center of the box
    pub center: Vec3,
    /// Half extent along X, Y and Z
    pub half_widths: Vec3,
}

impl Aabb {
    /// Creates a box from its center and half-widths
    pub fn new(center: Vec3, half_widths: Vec3) -> Self {
        Self { center, half_widths }
    }

    /// Creates a cube with the same half-width on all three axes
    pub fn cube(center: Vec3, half_width: f32) -> Self {
        Self::new(center, Vec3::new(half_width, half_width, half_width))
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            half_widths: self.half_widths,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_widths
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_widths
    }
}

/// An infinite plane given by a point on it and a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Creates a plane, normalizing `normal`
    pub fn new(point: Vec3, normal: Vec3) -> Result<Self, GeometryError> {
        let length = normal.magnitude();
        if !length.is_finite() || length < MIN_NORMAL_LENGTH {
            return Err(GeometryError::DegenerateNormal { length });
        }
        Ok(Self {
            point,
            normal: normal / length,
        })
    }

    /// Horizontal ground plane through `point` with a +Y normal
    pub fn ground(point: Vec3) -> Self {
        Self {
            point,
            normal: Vec3::y(),
        }
    }

    /// Unit normal of the plane
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Same plane moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            point: self.point + offset,
            normal: self.normal,
        }
    }

    /// Signed distance from the plane to `point`, positive on the normal side
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&(point - self.point))
    }
}
