//! # Camera View
//!
//! Placement only needs three things from a camera: where it is, how it is
//! oriented and how wide it sees. `CameraView` carries exactly that.
//!
//! # Coordinate System
//! Cameras look down their local -Z axis with local +Y up and local +X to the
//! right, so a camera rotated `(90°, 0, 0)` in XYZ order looks along world +Y
//! with world +Z up.

use crate::config::CameraConfig;
use crate::foundation::math::{utils, EulerOrder, EulerRotation, Quat, Vec3};

/// Camera pose and lens used by the placement sampler
#[derive(Debug, Clone, PartialEq)]
pub struct CameraView {
    /// Camera position in world space
    pub location: Vec3,

    /// Camera orientation
    pub orientation: Quat,

    /// Full horizontal field of view in radians
    pub fov_x: f32,

    /// Full vertical field of view in radians
    pub fov_y: f32,
}

impl CameraView {
    /// Create a camera view from radians
    pub fn new(location: Vec3, orientation: Quat, fov_x: f32, fov_y: f32) -> Self {
        Self {
            location,
            orientation,
            fov_x,
            fov_y,
        }
    }

    /// Build the view described by the camera configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let rotation = EulerRotation::from_degrees(utils::vec3(config.rotation_degrees), EulerOrder::XYZ);
        Self::new(
            utils::vec3(config.location),
            rotation.to_quaternion(),
            utils::deg_to_rad(config.fov_x_degrees),
            utils::deg_to_rad(config.fov_y_degrees),
        )
    }

    /// Same lens, different pose
    pub fn with_pose(&self, location: Vec3, rotation: &EulerRotation) -> Self {
        Self {
            location,
            orientation: rotation.to_quaternion(),
            ..self.clone()
        }
    }

    /// Camera's local +X in world space
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::x()
    }

    /// Camera's local +Y in world space
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::y()
    }

    /// Viewing direction (local -Z) in world space
    pub fn forward(&self) -> Vec3 {
        self.orientation * -Vec3::z()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_camera_faces_positive_y() {
        let camera = CameraView::from_config(&CameraConfig::default());

        assert_relative_eq!(camera.forward(), Vec3::y(), epsilon = EPSILON);
        assert_relative_eq!(camera.up(), Vec3::z(), epsilon = EPSILON);
        assert_relative_eq!(camera.right(), Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_axes_are_orthonormal() {
        let rotation = EulerRotation::from_degrees(Vec3::new(73.0, -12.0, 151.0), EulerOrder::XYZ);
        let camera = CameraView::new(Vec3::zeros(), rotation.to_quaternion(), 0.7, 0.4);

        assert_relative_eq!(camera.right().norm(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(camera.up().norm(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(camera.right().dot(&camera.up()), 0.0, epsilon = EPSILON);
        // Right-handed: right x up points backwards
        assert_relative_eq!(camera.right().cross(&camera.up()), -camera.forward(), epsilon = EPSILON);
    }

    #[test]
    fn test_with_pose_keeps_lens() {
        let camera = CameraView::from_config(&CameraConfig::default());
        let moved = camera.with_pose(Vec3::new(1.0, 2.0, 3.0), &EulerRotation::identity());

        assert_eq!(moved.fov_x, camera.fov_x);
        assert_eq!(moved.fov_y, camera.fov_y);
        assert_relative_eq!(moved.forward(), -Vec3::z(), epsilon = EPSILON);
    }
}
