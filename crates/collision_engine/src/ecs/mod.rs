//! Entity-Component-System implementation
//!
//! A small generational ECS: [`World`] owns the entities and one storage per
//! component type, components are plain data, and systems are free functions
//! or structs that borrow the world for one frame.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;
pub mod systems;

pub use world::{World, WorldError};
pub use entity::Entity;
pub use component::Component;
