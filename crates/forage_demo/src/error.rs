//! Demo error type

use collision_engine::config::ConfigError;
use collision_engine::ecs::WorldError;
use collision_engine::physics::GeometryError;

/// Anything that can stop the demo before the first frame
#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    /// Configuration could not be loaded or is out of range
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene geometry was rejected
    #[error("invalid scene geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// An entity disappeared during scene setup
    #[error("scene setup failed: {0}")]
    World(#[from] WorldError),
}
