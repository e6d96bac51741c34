//! Narrow-phase overlap predicates
//!
//! Closed-form, stateless tests between world-space primitives. All of them
//! treat touching shapes as overlapping (`<=`), and the symmetric ones
//! (sphere-sphere, box-box) give the same answer for either argument order.

use super::primitives::{Aabb, Plane, Sphere};

/// Sphere-sphere overlap: squared center distance against squared radius sum
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let distance_squared = (a.center - b.center).magnitude_squared();
    let radius_sum = a.radius + b.radius;
    distance_squared <= radius_sum * radius_sum
}

/// Box-box overlap: separating-axis test on the three principal axes
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|axis| {
        (a.center[axis] - b.center[axis]).abs() <= a.half_widths[axis] + b.half_widths[axis]
    })
}

/// Box-plane overlap
///
/// Projects the box onto the plane normal; the box straddles or touches the
/// plane when the center's distance is within that projected radius.
pub fn aabb_plane(aabb: &Aabb, plane: &Plane) -> bool {
    let normal = plane.normal();
    let projected_radius = aabb.half_widths.x * normal.x.abs()
        + aabb.half_widths.y * normal.y.abs()
        + aabb.half_widths.z * normal.z.abs();
    plane.signed_distance(aabb.center).abs() <= projected_radius
}

/// Sphere-plane overlap: center distance to the plane within the radius
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> bool {
    plane.signed_distance(sphere.center).abs() <= sphere.radius
}
