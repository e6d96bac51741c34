//! Transform component for the ECS system
//!
//! Pure data component (no logic). The collision pass only reads and writes
//! the position; collider shapes are stored as offsets from it.

use crate::foundation::math::Vec3;
use crate::ecs::Component;

/// ECS Transform component
///
/// World space position of an entity (Y-up right-handed by default).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec3,
}

impl Component for TransformComponent {}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }

    /// Move by a world-space offset
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_origin() {
        assert_eq!(TransformComponent::identity().position, Vec3::zeros());
    }

    #[test]
    fn test_translate() {
        let mut transform = TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0));
        transform.translate(Vec3::new(-1.0, 0.5, 0.0));
        assert_eq!(transform.position, Vec3::new(0.0, 2.5, 3.0));
    }
}
