//! Bounding volume derivation
//!
//! Helpers that derive spheres and boxes from other geometry: a quick
//! bounding sphere for a small point set, a conservative cube around a
//! sphere, and the enclosing sphere of two spheres used by BVH parents.

use crate::ecs::Entity;
use crate::foundation::math::{midpoint, Vec3};
use crate::physics::error::GeometryError;
use super::primitives::{Aabb, Sphere};

/// Index of the minimum and maximum point along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extremes {
    min: usize,
    max: usize,
}

/// Per-axis extreme point indices; ties keep the earliest point
fn find_extremes(points: &[Vec3]) -> [Extremes; 3] {
    let mut extremes = [Extremes { min: 0, max: 0 }; 3];
    for (i, point) in points.iter().enumerate().skip(1) {
        for (axis, pair) in extremes.iter_mut().enumerate() {
            if point[axis] < points[pair.min][axis] {
                pair.min = i;
            }
            if point[axis] > points[pair.max][axis] {
                pair.max = i;
            }
        }
    }
    extremes
}

/// The extreme pair with the largest squared separation
///
/// X wins by default; Y and Z only take over when strictly greater than
/// both other axes.
fn most_distant_pair(extremes: &[Extremes; 3], points: &[Vec3]) -> Extremes {
    let spread = |pair: &Extremes| (points[pair.max] - points[pair.min]).magnitude_squared();
    let [x, y, z] = extremes.map(|pair| spread(&pair));

    let mut chosen = extremes[0];
    if y > x && y > z {
        chosen = extremes[1];
    }
    if z > x && z > y {
        chosen = extremes[2];
    }
    chosen
}

/// Approximate bounding sphere of a point set
///
/// Picks the axis whose extreme points lie farthest apart and returns the
/// sphere spanning that pair. This is the seed step of Ritter's algorithm,
/// not a minimal enclosing sphere: points off that axis may fall outside.
/// Meant for tiny point sets such as the two end points of a capsule.
pub fn bounding_sphere_from_points(points: &[Vec3], owner: Entity) -> Result<Sphere, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyPointSet);
    }

    let extremes = find_extremes(points);
    let pair = most_distant_pair(&extremes, points);

    let p1 = points[pair.min];
    let p2 = points[pair.max];
    let center = midpoint(p1, p2);
    let radius = (p2 - center).magnitude();

    Ok(Sphere::new(center, radius).with_owner(owner))
}

/// Cube around a sphere, all half-widths equal to the radius
///
/// Deliberately not a tight box; it is only used as a conservative proxy
/// for the box-box confirmation step.
pub fn aabb_from_sphere(sphere: &Sphere) -> Aabb {
    Aabb::cube(sphere.center, sphere.radius)
}

/// Relative slack added to parent radii so f32 rounding never leaves a
/// child poking out
const ENCLOSING_SLACK: f32 = 4.0 * f32::EPSILON;

/// Smallest sphere enclosing two spheres
///
/// Takes the two extreme points of the pair along the line through their
/// centers and centers the result at their midpoint. When one sphere already
/// contains the other the extremes both come from the larger one, so the
/// result is that sphere rather than the span of the two far sides.
///
/// The radius is the larger reach `|center - c| + r` of the two children,
/// padded by a few ulps so the rounded parent still holds both of them.
pub fn enclosing_sphere(a: &Sphere, b: &Sphere) -> Sphere {
    let offset = b.center - a.center;
    let distance = offset.magnitude();
    let direction = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec3::x()
    };

    // Extreme points as signed positions along `direction`, measured from a.center
    let low = (-a.radius).min(distance - b.radius);
    let high = a.radius.max(distance + b.radius);

    let near = a.center + direction * low;
    let far = a.center + direction * high;
    let center = midpoint(near, far);

    let reach = |child: &Sphere| (child.center - center).magnitude() + child.radius;
    let radius = reach(a).max(reach(b));
    let radius = radius + (radius + center.amax()) * ENCLOSING_SLACK;

    Sphere::new(center, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contains(outer: &Sphere, inner: &Sphere) -> bool {
        (outer.center - inner.center).magnitude() + inner.radius <= outer.radius + 1e-4
    }

    #[test]
    fn test_capsule_end_points() {
        // Standing character proxy: feet at the origin, head at 2.2
        let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 2.2, 0.0)];
        let sphere = bounding_sphere_from_points(&points, Entity::null()).unwrap();
        assert_relative_eq!(sphere.center, Vec3::new(0.0, 1.1, 0.0));
        assert_relative_eq!(sphere.radius, 1.1);
    }

    #[test]
    fn test_owner_is_tagged() {
        let mut world = crate::ecs::World::new();
        let owner = world.spawn();
        let sphere = bounding_sphere_from_points(&[Vec3::zeros(), Vec3::x()], owner).unwrap();
        assert_eq!(sphere.owner, owner);
    }

    #[test]
    fn test_largest_axis_selected() {
        let points = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        let sphere = bounding_sphere_from_points(&points, Entity::null()).unwrap();
        assert_relative_eq!(sphere.center, Vec3::zeros());
        assert_relative_eq!(sphere.radius, 3.0);
    }

    #[test]
    fn test_equal_extents_favor_x() {
        // X and Z spread equally, Y is smaller: X must win the tie
        let points = [
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.5, -2.0),
            Vec3::new(0.0, 0.5, 2.0),
        ];
        let extremes = find_extremes(&points);
        assert_eq!(most_distant_pair(&extremes, &points), extremes[0]);

        let sphere = bounding_sphere_from_points(&points, Entity::null()).unwrap();
        assert_relative_eq!(sphere.center, Vec3::zeros());
    }

    #[test]
    fn test_y_needs_strictly_greater_than_both() {
        // Y ties with Z and beats X: neither Y nor Z is strictly the largest, X stays
        let points = [
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(1.0, 0.0, 2.0),
        ];
        let extremes = find_extremes(&points);
        assert_eq!(most_distant_pair(&extremes, &points), extremes[0]);
    }

    #[test]
    fn test_single_point_gives_zero_radius() {
        let sphere = bounding_sphere_from_points(&[Vec3::new(1.0, 2.0, 3.0)], Entity::null()).unwrap();
        assert_eq!(sphere.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn test_empty_point_set_rejected() {
        assert_eq!(
            bounding_sphere_from_points(&[], Entity::null()),
            Err(GeometryError::EmptyPointSet)
        );
    }

    #[test]
    fn test_aabb_from_sphere_is_cube() {
        let aabb = aabb_from_sphere(&Sphere::new(Vec3::new(0.0, 1.1, 0.0), 1.1));
        assert_eq!(aabb.center, Vec3::new(0.0, 1.1, 0.0));
        assert_eq!(aabb.half_widths, Vec3::new(1.1, 1.1, 1.1));
    }

    #[test]
    fn test_enclosing_sphere_of_disjoint_pair() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0);
        let parent = enclosing_sphere(&a, &b);
        assert_relative_eq!(parent.center, Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(parent.radius, 3.0, epsilon = 1e-5);
        assert!(parent.owner.is_null());
    }

    #[test]
    fn test_enclosing_sphere_of_nested_pair() {
        let big = Sphere::new(Vec3::zeros(), 5.0);
        let small = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        for parent in [enclosing_sphere(&big, &small), enclosing_sphere(&small, &big)] {
            assert_relative_eq!(parent.center, Vec3::zeros(), epsilon = 1e-5);
            assert_relative_eq!(parent.radius, 5.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_enclosing_sphere_contains_both_children() {
        let spheres = [
            Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0),
            Sphere::new(Vec3::new(3.0, -1.0, 2.0), 0.5),
            Sphere::new(Vec3::new(0.2, 0.1, 0.0), 2.0),
            Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.25),
            Sphere::new(Vec3::new(-7.0, 4.0, 1.0), 3.0),
        ];
        for a in &spheres {
            for b in &spheres {
                let parent = enclosing_sphere(a, b);
                assert!(contains(&parent, a), "{parent:?} does not contain {a:?}");
                assert!(contains(&parent, b), "{parent:?} does not contain {b:?}");
            }
        }
    }

    #[test]
    fn test_enclosing_sphere_holds_touching_children_without_tolerance() {
        let mut state: u32 = 0x9e37_79b9;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 100_000) as f32 / 100_000.0
        };

        for _ in 0..5_000 {
            let center = Vec3::new(next() * 200.0 - 100.0, next() * 20.0, next() * 200.0 - 100.0);
            let a = Sphere::new(center, 0.1 + next() * 3.0);
            let offset = Vec3::new(next() - 0.5, next() - 0.5, next() - 0.5);
            let direction = if offset.magnitude() > 1e-3 { offset.normalize() } else { Vec3::x() };
            let b_radius = 0.1 + next() * 3.0;
            let b = Sphere::new(a.center + direction * (a.radius + b_radius), b_radius);

            let parent = enclosing_sphere(&a, &b);
            for child in [&a, &b] {
                let reach = (child.center - parent.center).magnitude() + child.radius;
                assert!(reach <= parent.radius, "{parent:?} does not hold {child:?}");
            }
        }
    }
}
