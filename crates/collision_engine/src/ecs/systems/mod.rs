//! ECS Systems module

pub mod collision_system;
pub mod movement;

pub use collision_system::{
    CollisionReport,
    CollisionSystem,
    NoPickups,
    PickupListener,
    PlaneContact,
};
pub use movement::{movement_system, waypoint_system};
