//! Pose of a scene object across the two captured frames
//!
//! The absolute fields describe the first frame. The delta fields are the
//! second-frame offset, applied additively on top of the absolute pose; they
//! are never a second absolute pose.

use crate::foundation::math::{EulerRotation, Vec3};
use serde::{Deserialize, Serialize};

/// Absolute pose plus second-frame delta
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// World location
    pub location: Vec3,
    /// Absolute rotation
    pub rotation: EulerRotation,
    /// Second-frame translation offset
    pub delta_location: Vec3,
    /// Second-frame rotation offset in radians, same order as `rotation`
    pub delta_rotation: Vec3,
}

impl Pose {
    /// Pose without deltas
    pub fn new(location: Vec3, rotation: EulerRotation) -> Self {
        Self {
            location,
            rotation,
            delta_location: Vec3::zeros(),
            delta_rotation: Vec3::zeros(),
        }
    }

    /// Builder pattern: Set deltas
    pub fn with_delta(mut self, delta_location: Vec3, delta_rotation: Vec3) -> Self {
        self.delta_location = delta_location;
        self.delta_rotation = delta_rotation;
        self
    }

    /// Location in the second frame
    pub fn moved_location(&self) -> Vec3 {
        self.location + self.delta_location
    }

    /// Rotation in the second frame
    pub fn moved_rotation(&self) -> EulerRotation {
        EulerRotation::new(self.rotation.angles + self.delta_rotation, self.rotation.order)
    }

    /// Drop both deltas, keeping the absolute pose
    pub fn clear_delta(&mut self) {
        self.delta_location = Vec3::zeros();
        self.delta_rotation = Vec3::zeros();
    }
}
