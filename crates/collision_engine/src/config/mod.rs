//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Axis;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is outside its valid range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Human readable explanation
        reason: String,
    },
}

/// Default surface distance under which two nodes are merged in the
/// first BVH round (world units)
pub const DEFAULT_MERGE_CUTOFF: f32 = 3.0;

/// Tunables for the per-frame collision pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Maximum surface distance for pairing nodes in the first BVH round.
    /// Later rounds merge regardless of distance.
    pub merge_cutoff: f32,

    /// Height axis, zeroed out when computing horizontal push-apart
    pub up_axis: Axis,

    /// Apply positional correction to non-trigger contacts
    pub resolve_penetration: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            merge_cutoff: DEFAULT_MERGE_CUTOFF,
            up_axis: Axis::Y,
            resolve_penetration: true,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Check that all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.merge_cutoff.is_nan() || self.merge_cutoff < 0.0 {
            return Err(ConfigError::Invalid {
                field: "merge_cutoff",
                reason: format!("expected a non-negative distance, got {}", self.merge_cutoff),
            });
        }
        Ok(())
    }

    /// Builder-style override of the merge cutoff
    pub fn with_merge_cutoff(mut self, merge_cutoff: f32) -> Self {
        self.merge_cutoff = merge_cutoff;
        self
    }
}
