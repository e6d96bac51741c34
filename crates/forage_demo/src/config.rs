//! Demo configuration

use collision_engine::config::{CollisionConfig, Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Settings for one headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate
    pub frames: u32,

    /// Fixed time step per frame (seconds)
    pub time_step: f32,

    /// Collision pass settings
    pub collision: CollisionConfig,

    /// Player walking speed (units per second)
    pub player_speed: f32,

    /// Energy gained from one food pickup (kcal)
    pub food_calories: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            time_step: 1.0 / 60.0,
            collision: CollisionConfig::default(),
            player_speed: 2.0,
            food_calories: 50.0,
        }
    }
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Check that all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;

        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::Invalid {
                field: "time_step",
                reason: format!("expected a positive duration, got {}", self.time_step),
            });
        }
        if !(self.player_speed.is_finite() && self.player_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "player_speed",
                reason: format!("expected a non-negative speed, got {}", self.player_speed),
            });
        }
        Ok(())
    }
}
