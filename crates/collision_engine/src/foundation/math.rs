//! Math utilities and types
//!
//! Provides the fundamental vector types used by the collision subsystem.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// One of the three principal axes
///
/// Used to pick the height axis that is ignored by horizontal
/// penetration resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Axis {
    /// The X axis
    X,
    /// The Y axis (up in the default Y-up right-handed convention)
    #[default]
    Y,
    /// The Z axis
    Z,
}

impl Axis {
    /// All three axes in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis in a `Vec3`
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Returns `v` with the component along `axis` set to zero
pub fn flatten(v: Vec3, axis: Axis) -> Vec3 {
    let mut flat = v;
    flat[axis.index()] = 0.0;
    flat
}

/// Midpoint between two points
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}
