//! Movement components for entities that can move in 3D space
//!
//! Provides linear velocity and waypoint-following data for dynamic
//! objects. Integration happens in [`crate::ecs::systems::movement`].

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Component for entities that can move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementComponent {
    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Whether movement is enabled
    pub enabled: bool,
}

impl MovementComponent {
    /// Create a new, stationary movement component
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            enabled: true,
        }
    }

    /// Create a movement component with initial velocity
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            enabled: true,
        }
    }

    /// Set velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Enable or disable movement
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Get position delta for this frame
    pub fn get_position_delta(&self, delta_time: f32) -> Vec3 {
        if !self.enabled {
            return Vec3::zeros();
        }
        self.velocity * delta_time
    }

    /// Stop all movement
    pub fn stop(&mut self) {
        self.velocity = Vec3::zeros();
    }
}

impl Component for MovementComponent {}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Squared distance under which a waypoint counts as reached
pub const WAYPOINT_REACHED_DISTANCE_SQ: f32 = 0.1;

/// Cyclic patrol route for non-player characters
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointComponent {
    /// World-space points visited in order, wrapping around
    pub waypoints: Vec<Vec3>,

    /// Index of the waypoint currently being approached
    pub current: usize,

    /// Travel speed in units per second
    pub speed: f32,
}

impl Component for WaypointComponent {}

impl WaypointComponent {
    /// Create a route starting at the first waypoint
    pub fn new(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            current: 0,
            speed,
        }
    }

    /// The waypoint currently being approached
    pub fn target(&self) -> Option<Vec3> {
        self.waypoints.get(self.current).copied()
    }

    /// Move on to the next waypoint, wrapping at the end of the route
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.current = (self.current + 1) % self.waypoints.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_delta() {
        let mut movement = MovementComponent::new();
        movement.set_velocity(Vec3::new(2.0, 1.0, 0.5));

        let position_delta = movement.get_position_delta(0.5);

        assert_eq!(position_delta, Vec3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_disabled_movement_has_no_delta() {
        let mut movement = MovementComponent::with_velocity(Vec3::new(1.0, 0.0, 0.0));
        movement.set_enabled(false);
        assert_eq!(movement.get_position_delta(1.0), Vec3::zeros());
    }

    #[test]
    fn test_stop() {
        let mut movement = MovementComponent::with_velocity(Vec3::new(1.0, 2.0, 3.0));
        movement.stop();
        assert_eq!(movement.velocity, Vec3::zeros());
    }

    #[test]
    fn test_waypoints_wrap() {
        let mut route = WaypointComponent::new(
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            1.0,
        );
        assert_eq!(route.target(), Some(Vec3::new(1.0, 0.0, 0.0)));
        route.advance();
        assert_eq!(route.current, 1);
        route.advance();
        assert_eq!(route.current, 0);
    }

    #[test]
    fn test_empty_route_has_no_target() {
        let mut route = WaypointComponent::new(Vec::new(), 1.0);
        route.advance();
        assert_eq!(route.target(), None);
        assert_eq!(route.current, 0);
    }
}
