//! Visible frustum of a camera at a target depth

use super::CameraView;
use crate::foundation::math::Vec3;

/// Cross-section of the camera frustum at `depth`
///
/// Derived fresh for every placement attempt; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Camera right axis (unit)
    pub right: Vec3,
    /// Camera up axis (unit)
    pub up: Vec3,
    /// Viewing direction (unit)
    pub forward: Vec3,
    /// Distance along `forward`
    pub depth: f32,
    /// Half extent along `right` at `depth`
    pub half_width: f32,
    /// Half extent along `up` at `depth`
    pub half_height: f32,
}

impl Frustum {
    /// Point of the cross-section at offset fractions `rx`, `ry` in `[-1, 1]`
    pub fn point_at(&self, origin: Vec3, rx: f32, ry: f32) -> Vec3 {
        origin + self.forward * self.depth - self.right * (self.half_width * rx) - self.up * (self.half_height * ry)
    }
}

/// Compute the frustum cross-section at `depth`
///
/// The effective half-angle of each axis is `fov / 2 * (1 - fov_coef)`:
/// negative coefficients widen the usable area, positive ones narrow it.
pub fn frustum_extents(camera: &CameraView, depth: f32, fov_coef: f32) -> Frustum {
    let narrowing = 1.0 - fov_coef;
    Frustum {
        right: camera.right(),
        up: camera.up(),
        forward: camera.forward(),
        depth,
        half_width: depth * (camera.fov_x * 0.5 * narrowing).tan(),
        half_height: depth * (camera.fov_y * 0.5 * narrowing).tan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::foundation::math::{EulerOrder, EulerRotation};
    use approx::assert_relative_eq;

    fn cameras() -> Vec<CameraView> {
        [
            Vec3::new(90.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(35.0, -20.0, 110.0),
            Vec3::new(-80.0, 45.0, 10.0),
        ]
        .into_iter()
        .map(|degrees| {
            let rotation = EulerRotation::from_degrees(degrees, EulerOrder::XYZ);
            CameraView::new(Vec3::new(1.0, -2.0, 0.5), rotation.to_quaternion(), 0.69, 0.4)
        })
        .collect()
    }

    #[test]
    fn test_half_extents_match_tangent_formula() {
        let camera = CameraView::from_config(&CameraConfig::default());
        let frustum = frustum_extents(&camera, 10.0, 0.0);

        assert_relative_eq!(frustum.half_width, 10.0 * (camera.fov_x / 2.0).tan(), epsilon = 1e-5);
        assert_relative_eq!(frustum.half_height, 10.0 * (camera.fov_y / 2.0).tan(), epsilon = 1e-5);
        assert!(frustum.half_width > frustum.half_height);
    }

    #[test]
    fn test_extents_scale_linearly_with_depth() {
        for camera in cameras() {
            for coef in [-0.2, 0.0, 0.2, 0.5] {
                let near = frustum_extents(&camera, 4.0, coef);
                let far = frustum_extents(&camera, 12.0, coef);
                assert_relative_eq!(far.half_width, near.half_width * 3.0, epsilon = 1e-4);
                assert_relative_eq!(far.half_height, near.half_height * 3.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_extents_decrease_as_coefficient_grows() {
        for camera in cameras() {
            let mut previous = frustum_extents(&camera, 10.0, -0.2);
            for step in 1..=7 {
                let coef = -0.2 + step as f32 * 0.1;
                let current = frustum_extents(&camera, 10.0, coef);
                assert!(current.half_width < previous.half_width);
                assert!(current.half_height < previous.half_height);
                previous = current;
            }
        }
    }

    #[test]
    fn test_point_at_center_lies_on_optical_axis() {
        let camera = CameraView::from_config(&CameraConfig::default());
        let frustum = frustum_extents(&camera, 10.0, 0.0);

        assert_relative_eq!(frustum.point_at(camera.location, 0.0, 0.0), Vec3::new(0.0, 10.0, 0.0), epsilon = 1e-4);
        // Full negative offsets land on the +right/+up corner
        let corner = frustum.point_at(camera.location, -1.0, -1.0);
        assert_relative_eq!(corner.x, frustum.half_width, epsilon = 1e-4);
        assert_relative_eq!(corner.z, frustum.half_height, epsilon = 1e-4);
    }
}
