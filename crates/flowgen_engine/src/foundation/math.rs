//! Math utilities and types
//!
//! Provides the vector and rotation types used by the placement engine, plus
//! Euler conversions that keep the rotation order explicit.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use nalgebra::{Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Convert a per-axis degree triple to radians
    pub fn deg_to_rad_vec(degrees: Vec3) -> Vec3 {
        degrees.map(deg_to_rad)
    }

    /// Build a vector from a plain array (config and manifest files store arrays)
    pub fn vec3(values: [f32; 3]) -> Vec3 {
        Vec3::new(values[0], values[1], values[2])
    }
}

/// Order in which the three elemental rotations of an Euler triple are applied.
///
/// `XYZ` applies X first, then Y, then Z about the fixed world axes, so the
/// resulting matrix is `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    /// X, then Y, then Z
    #[default]
    XYZ,
    /// X, then Z, then Y
    XZY,
    /// Y, then X, then Z
    YXZ,
    /// Y, then Z, then X
    YZX,
    /// Z, then X, then Y
    ZXY,
    /// Z, then Y, then X
    ZYX,
}

impl EulerOrder {
    /// All supported orders
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::XYZ,
        EulerOrder::XZY,
        EulerOrder::YXZ,
        EulerOrder::YZX,
        EulerOrder::ZXY,
        EulerOrder::ZYX,
    ];

    /// Axis indices in application order
    pub const fn axes(self) -> [usize; 3] {
        match self {
            EulerOrder::XYZ => [0, 1, 2],
            EulerOrder::XZY => [0, 2, 1],
            EulerOrder::YXZ => [1, 0, 2],
            EulerOrder::YZX => [1, 2, 0],
            EulerOrder::ZXY => [2, 0, 1],
            EulerOrder::ZYX => [2, 1, 0],
        }
    }

    /// Whether the axis sequence is a cyclic (even) permutation of XYZ
    const fn is_even(self) -> bool {
        matches!(self, EulerOrder::XYZ | EulerOrder::YZX | EulerOrder::ZXY)
    }

    /// Name as written into ground-truth records
    pub const fn as_str(self) -> &'static str {
        match self {
            EulerOrder::XYZ => "XYZ",
            EulerOrder::XZY => "XZY",
            EulerOrder::YXZ => "YXZ",
            EulerOrder::YZX => "YZX",
            EulerOrder::ZXY => "ZXY",
            EulerOrder::ZYX => "ZYX",
        }
    }
}

impl fmt::Display for EulerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Euler rotation in radians with its rotation order attached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerRotation {
    /// Angle about X, Y and Z in radians (indexed by axis, not by order)
    pub angles: Vec3,
    /// Application order of the three angles
    pub order: EulerOrder,
}

impl Default for EulerRotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl EulerRotation {
    /// Zero rotation in XYZ order
    pub fn identity() -> Self {
        Self {
            angles: Vec3::zeros(),
            order: EulerOrder::XYZ,
        }
    }

    /// Create from radians
    pub fn new(angles: Vec3, order: EulerOrder) -> Self {
        Self { angles, order }
    }

    /// Create from degrees
    pub fn from_degrees(degrees: Vec3, order: EulerOrder) -> Self {
        Self::new(utils::deg_to_rad_vec(degrees), order)
    }

    /// Build the quaternion for this rotation honoring its order
    pub fn to_quaternion(&self) -> Quat {
        self.order
            .axes()
            .iter()
            .fold(Quat::identity(), |acc, &axis| {
                Quat::from_axis_angle(&unit_axis(axis), self.angles[axis]) * acc
            })
    }

    /// Decompose a quaternion into angles for the requested order
    ///
    /// Near gimbal lock the last axis angle is pinned to zero and the first
    /// axis absorbs the remaining rotation.
    pub fn from_quaternion(rotation: &Quat, order: EulerOrder) -> Self {
        let m = rotation.to_rotation_matrix().into_inner();
        let [i, j, k] = order.axes();
        let s = if order.is_even() { 1.0 } else { -1.0 };

        let sin_b = (-s * m[(k, i)]).clamp(-1.0, 1.0);
        let b = sin_b.asin();

        let (a, c) = if sin_b.abs() < 0.999_999 {
            (
                (s * m[(k, j)]).atan2(m[(k, k)]),
                (s * m[(j, i)]).atan2(m[(i, i)]),
            )
        } else {
            ((-s * m[(j, k)]).atan2(m[(j, j)]), 0.0)
        };

        let mut angles = Vec3::zeros();
        angles[i] = a;
        angles[j] = b;
        angles[k] = c;
        Self { angles, order }
    }

    /// Angles in degrees, indexed by axis
    pub fn to_degrees(&self) -> Vec3 {
        self.angles.map(utils::rad_to_deg)
    }
}

fn unit_axis(axis: usize) -> Unit<Vec3> {
    match axis {
        0 => Vec3::x_axis(),
        1 => Vec3::y_axis(),
        _ => Vec3::z_axis(),
    }
}
