//! Bounded random rigid-body perturbation between the two frames
//!
//! Deltas are additive second-frame offsets written next to the absolute
//! pose; the absolute pose itself is never touched here. The one exception is
//! [`initial_orientation`], which produces an absolute rotation for freshly
//! placed targets.

use crate::config::{AxisConstraints, InitialOrientationConfig, MotionProfile};
use crate::foundation::math::{utils, EulerOrder, EulerRotation, Vec3};
use crate::foundation::random::SceneRng;
use crate::host::{HostError, ObjectHandle, SceneHost};

/// Second-frame offset of one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaPose {
    /// Translation offset
    pub location: Vec3,
    /// Rotation offset in radians
    pub rotation: Vec3,
}

impl DeltaPose {
    /// No motion
    pub fn zero() -> Self {
        Self {
            location: Vec3::zeros(),
            rotation: Vec3::zeros(),
        }
    }
}

impl Default for DeltaPose {
    fn default() -> Self {
        Self::zero()
    }
}

fn constrained_sample(rng: &mut SceneRng, coef: f32, constraints: &AxisConstraints) -> Vec3 {
    let factors = constraints.as_array();
    Vec3::new(
        rng.symmetric(coef) * factors[0],
        rng.symmetric(coef) * factors[1],
        rng.symmetric(coef) * factors[2],
    )
}

/// Draw a delta pose for `profile`
///
/// Six independent samples `U(-1, 1) · coef`: translation first, then rotation
/// in degrees converted to radians. Every sample is scaled by its axis
/// constraint, so a factor of 0 yields exactly zero on that axis.
pub fn perturb(rng: &mut SceneRng, profile: &MotionProfile) -> DeltaPose {
    let location = constrained_sample(rng, profile.translation_coef, &profile.constraints);
    let degrees = constrained_sample(rng, profile.rotation_coef_degrees, &profile.constraints);
    DeltaPose {
        location,
        rotation: utils::deg_to_rad_vec(degrees),
    }
}

fn write_delta(host: &mut dyn SceneHost, handle: ObjectHandle, delta: &DeltaPose) -> Result<(), HostError> {
    let mut pose = host.query_extents(handle)?.pose;
    // Deltas are expressed in XYZ; keep the absolute rotation consistent with them
    if pose.rotation.order != EulerOrder::XYZ {
        pose.rotation = EulerRotation::from_quaternion(&pose.rotation.to_quaternion(), EulerOrder::XYZ);
    }
    pose.delta_location = delta.location;
    pose.delta_rotation = delta.rotation;
    host.set_pose(handle, &pose)
}

/// Sample a delta for `profile` and write it to the object
pub fn apply_perturbation(
    host: &mut dyn SceneHost,
    handle: ObjectHandle,
    rng: &mut SceneRng,
    profile: &MotionProfile,
) -> Result<DeltaPose, HostError> {
    let delta = perturb(rng, profile);
    write_delta(host, handle, &delta)?;
    log::debug!(
        "Perturbed {:?}: delta location {:?}, delta rotation {:?}",
        handle,
        delta.location,
        delta.rotation
    );
    Ok(delta)
}

/// Zero both deltas of the object
pub fn reset_deltas(host: &mut dyn SceneHost, handle: ObjectHandle) -> Result<(), HostError> {
    write_delta(host, handle, &DeltaPose::zero())
}

/// Absolute XYZ rotation for a freshly placed target
///
/// `(90° + s_x·c·k_x, s_y·c·k_y, s_z·c·k_z)` with `s ~ U(-1, 1)`, `c` the
/// rotation coefficient and `k` the axis constraints.
pub fn initial_orientation(rng: &mut SceneRng, config: &InitialOrientationConfig) -> EulerRotation {
    let offset = constrained_sample(rng, config.rotation_coef_degrees, &config.constraints);
    EulerRotation::from_degrees(Vec3::new(90.0, 0.0, 0.0) + offset, EulerOrder::XYZ)
}
