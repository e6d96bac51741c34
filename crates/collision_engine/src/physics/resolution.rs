//! Positional correction for overlapping physical colliders
//!
//! Resolution is horizontal only: the up axis is flattened out before the
//! penetration is measured, so entities are never pushed into or off the
//! ground. Both sides move by half the penetration depth, without regard to
//! mass.

use crate::foundation::math::{flatten, Axis, Vec3};
use crate::physics::collision::Sphere;

/// Equal and opposite position corrections for a pair of spheres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Offset to add to the first sphere's owner
    pub first: Vec3,
    /// Offset to add to the second sphere's owner
    pub second: Vec3,
    /// Horizontal penetration depth that was removed
    pub depth: f32,
}

/// Corrections that push `a` and `b` apart horizontally until they touch
///
/// Returns `None` when the horizontal distance is zero (no direction to push
/// along) or already at least the sum of the radii.
pub fn horizontal_separation(a: &Sphere, b: &Sphere, up: Axis) -> Option<Separation> {
    let offset = flatten(b.center - a.center, up);
    let distance = offset.magnitude();
    let radius_sum = a.radius + b.radius;

    if distance <= 0.0 || distance >= radius_sum {
        return None;
    }

    let depth = radius_sum - distance;
    let push = offset / distance * (depth * 0.5);

    Some(Separation {
        first: -push,
        second: push,
        depth,
    })
}
