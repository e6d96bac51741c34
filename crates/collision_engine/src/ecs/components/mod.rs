//! ECS Components module
//!
//! Plain data components read and written by the engine systems

pub mod transform;
pub mod movement;
pub mod collision;

pub use transform::TransformComponent;
pub use movement::{MovementComponent, WaypointComponent, WAYPOINT_REACHED_DISTANCE_SQ};
pub use collision::{
    BoxColliderComponent,
    PickupComponent,
    PlaneColliderComponent,
    SphereColliderComponent,
};
