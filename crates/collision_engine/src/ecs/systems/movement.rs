//! Movement integration and waypoint steering
//!
//! Run [`waypoint_system`] before [`movement_system`] so velocities picked
//! this frame are applied in the same frame.

use crate::ecs::{Entity, World};
use crate::ecs::components::{
    MovementComponent, TransformComponent, WaypointComponent, WAYPOINT_REACHED_DISTANCE_SQ,
};
use crate::foundation::math::Vec3;

/// Add `velocity * delta_time` to every entity with a transform and movement
pub fn movement_system(world: &mut World, delta_time: f32) {
    for entity in world.entities_with::<MovementComponent>() {
        let delta = match world.get::<MovementComponent>(entity) {
            Some(movement) => movement.get_position_delta(delta_time),
            None => continue,
        };

        if let Some(transform) = world.get_mut::<TransformComponent>(entity) {
            transform.translate(delta);
        }
    }
}

/// Point every waypoint follower's velocity at its current waypoint
///
/// A follower within the reach distance of its waypoint moves on to the next
/// one (wrapping around) and stands still for this frame. An empty route
/// stops the entity.
pub fn waypoint_system(world: &mut World) {
    for entity in world.entities_with::<WaypointComponent>() {
        steer_towards_waypoint(world, entity);
    }
}

fn steer_towards_waypoint(world: &mut World, entity: Entity) {
    let position = match world.get::<TransformComponent>(entity) {
        Some(transform) => transform.position,
        None => return,
    };
    if !world.has::<MovementComponent>(entity) {
        log::warn!("{:?} has waypoints but no MovementComponent", entity);
        return;
    }

    let route = match world.get_mut::<WaypointComponent>(entity) {
        Some(route) => route,
        None => return,
    };

    let velocity = match route.target() {
        None => Vec3::zeros(),
        Some(target) => {
            let to_target = target - position;
            if to_target.magnitude_squared() < WAYPOINT_REACHED_DISTANCE_SQ {
                route.advance();
                log::trace!("{:?} reached waypoint, heading to #{}", entity, route.current);
                Vec3::zeros()
            } else {
                to_target.normalize() * route.speed
            }
        }
    };

    if let Some(movement) = world.get_mut::<MovementComponent>(entity) {
        movement.set_velocity(velocity);
    }
}
