//! Bounding volumes for cheap overlap tests
//!
//! Objects are approximated by the sphere circumscribing their axis-aligned
//! bounding box.

use crate::foundation::math::Vec3;
use crate::host::{HostError, ObjectHandle, SceneHost};
use crate::scene::Pose;

/// A bounding sphere for overlap testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere circumscribing a box of size `extents` centered at `center`
    pub fn from_extents(center: Vec3, extents: Vec3) -> Self {
        Self::new(center, 0.5 * extents.norm())
    }

    /// Gap between the two spheres after scaling both radii by `proximity_coef`
    ///
    /// Negative when the scaled spheres interpenetrate.
    pub fn scaled_gap(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32, proximity_coef: f32) -> f32 {
        (center_a - center_b).norm() - radius_a * proximity_coef - radius_b * proximity_coef
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        Self::scaled_gap(self.center, self.radius, other.center, other.radius, 1.0) < 0.0
    }
}

/// Bounding sphere and pose snapshot of a host object
///
/// Reads extents without touching any representation state of the object, so
/// the call has no observable side effect on the host.
pub fn extract_bounds(host: &dyn SceneHost, handle: ObjectHandle) -> Result<(BoundingSphere, Pose), HostError> {
    let extents = host.query_extents(handle)?;
    let sphere = BoundingSphere::from_extents(extents.pose.location, extents.size);
    log::trace!("Bounds of {:?}: radius {:.3}", handle, sphere.radius);
    Ok((sphere, extents.pose))
}
