//! # Placement Sampler
//!
//! Rejection sampling of seed poses inside the camera frustum.
//!
//! ```text
//! attempt:  depth ~ U(min, max) ──► frustum at depth ──► offsets rx, ry ~ U(-1, 1)
//!                                                              │
//!                                 candidate = cam + fwd·d - right·hw·rx - up·hh·ry
//!                                                              │
//!            every placed sphere clear (scaled by proximity) ? ─┴─► accept : retry
//! ```
//!
//! The search never relaxes its constraints. When the attempt budget runs out
//! the caller gets `None` and skips the object for this scene, which bounds
//! the number of targets a crowded frustum can hold.

use crate::config::PlacementConfig;
use crate::foundation::math::{EulerOrder, EulerRotation, Quat, Vec3};
use crate::foundation::random::SceneRng;
use crate::geometry::{frustum_extents, CameraView};
use crate::scene::{BoundingSphere, PlacedObject};

/// Default attempt budget per object
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Parameters of one seed-pose search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Closest allowed depth along the viewing direction
    pub min_distance: f32,
    /// Farthest allowed depth along the viewing direction
    pub max_distance: f32,
    /// Bounding-sphere radius of the object being placed
    pub candidate_radius: f32,
    /// Multiplier applied to both radii in the overlap test
    pub proximity_coef: f32,
    /// Field-of-view narrowing coefficient
    pub fov_coef: f32,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl PlacementRequest {
    /// Request for an object of radius `candidate_radius` under the placement settings
    pub fn from_config(config: &PlacementConfig, candidate_radius: f32) -> Self {
        Self {
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            candidate_radius,
            proximity_coef: config.proximity_coef,
            fov_coef: config.fov_coef,
            max_attempts: config.max_attempts,
        }
    }
}

/// Accepted candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPose {
    /// World location
    pub location: Vec3,
    /// Orientation, equal to the camera's at sampling time
    pub orientation: Quat,
    /// Sampled depth
    pub distance: f32,
    /// Attempts used, including the accepted one
    pub attempts: u32,
}

impl SeedPose {
    /// Orientation as Euler angles in `order`
    pub fn rotation(&self, order: EulerOrder) -> EulerRotation {
        EulerRotation::from_quaternion(&self.orientation, order)
    }
}

/// Whether a sphere at `location` keeps clear of every placed object
///
/// Rejects as soon as `|Δ| - r_c·k - r_i·k < 0` for some placed entry.
pub fn is_clear(location: Vec3, radius: f32, placed: &[PlacedObject], proximity_coef: f32) -> bool {
    placed.iter().all(|entry| {
        BoundingSphere::scaled_gap(location, radius, entry.location, entry.radius, proximity_coef) >= 0.0
    })
}

/// Search for a non-overlapping seed pose in front of `camera`
///
/// Returns `None` once `request.max_attempts` candidates have been rejected.
pub fn find_seed_pose(
    rng: &mut SceneRng,
    camera: &CameraView,
    request: &PlacementRequest,
    placed: &[PlacedObject],
) -> Option<SeedPose> {
    for attempt in 1..=request.max_attempts {
        let distance = rng.uniform(request.min_distance, request.max_distance);
        let candidate = seed_pose_at(rng, camera, distance, request.fov_coef, 1.0);

        if is_clear(candidate.location, request.candidate_radius, placed, request.proximity_coef) {
            log::trace!(
                "Seed pose accepted after {} attempt(s) at depth {:.2}: {:?}",
                attempt,
                distance,
                candidate.location
            );
            return Some(SeedPose { attempts: attempt, ..candidate });
        }
    }

    log::debug!(
        "No clear seed pose for radius {:.2} after {} attempts ({} placed objects)",
        request.candidate_radius,
        request.max_attempts,
        placed.len()
    );
    None
}

/// Draw one candidate at a fixed depth without any collision test
///
/// Offsets are drawn from `U(-twitch, twitch)` as fractions of the frustum
/// half extents.
pub fn seed_pose_at(rng: &mut SceneRng, camera: &CameraView, distance: f32, fov_coef: f32, twitch: f32) -> SeedPose {
    let frustum = frustum_extents(camera, distance, fov_coef);
    let rx = rng.symmetric(twitch);
    let ry = rng.symmetric(twitch);

    SeedPose {
        location: frustum.point_at(camera.location, rx, ry),
        orientation: camera.orientation,
        distance,
        attempts: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use approx::assert_relative_eq;

    fn default_camera() -> CameraView {
        CameraView::from_config(&CameraConfig::default())
    }

    fn request(min: f32, max: f32, radius: f32, proximity: f32) -> PlacementRequest {
        PlacementRequest {
            min_distance: min,
            max_distance: max,
            candidate_radius: radius,
            proximity_coef: proximity,
            fov_coef: 0.0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[test]
    fn test_degenerate_distance_accepts_first_attempt() {
        let camera = default_camera();
        let mut rng = SceneRng::seeded(11);

        let pose = find_seed_pose(&mut rng, &camera, &request(10.0, 10.0, 1.0, 1.0), &[]).unwrap();
        let frustum = frustum_extents(&camera, 10.0, 0.0);

        assert_eq!(pose.attempts, 1);
        assert_eq!(pose.distance, 10.0);
        assert_relative_eq!(pose.location.dot(&camera.forward()), 10.0, epsilon = 1e-4);
        assert!(pose.location.x.abs() <= frustum.half_width + 1e-4);
        assert!(pose.location.z.abs() <= frustum.half_height + 1e-4);
        assert!(pose.orientation.angle_to(&camera.orientation) < 1e-6);
    }

    #[test]
    fn test_zero_proximity_never_rejects() {
        let camera = default_camera();
        let mut rng = SceneRng::seeded(5);
        let placed = vec![PlacedObject::obstacle(camera.location, 1000.0); 20];

        for _ in 0..50 {
            let pose = find_seed_pose(&mut rng, &camera, &request(10.0, 26.0, 5.0, 0.0), &placed).unwrap();
            assert_eq!(pose.attempts, 1);
        }
    }

    #[test]
    fn test_crowded_frustum_gives_up() {
        let camera = default_camera();
        let mut rng = SceneRng::seeded(2);
        let placed: Vec<PlacedObject> = (0..10)
            .map(|i| PlacedObject::obstacle(Vec3::new(0.0, 5.0 * i as f32, 0.0), 100.0))
            .collect();

        assert!(find_seed_pose(&mut rng, &camera, &request(10.0, 26.0, 1.0, 1.0), &placed).is_none());
    }

    #[test]
    fn test_accepted_placements_never_overlap() {
        let camera = default_camera();
        for proximity in [1.0, 1.5, 2.0] {
            let mut rng = SceneRng::seeded(99);
            let mut placed = vec![PlacedObject::obstacle(camera.location, 2.0)];

            for _ in 0..8 {
                if let Some(pose) = find_seed_pose(&mut rng, &camera, &request(10.0, 26.0, 1.5, proximity), &placed) {
                    placed.push(PlacedObject::obstacle(pose.location, 1.5));
                }
            }

            assert!(placed.len() > 2);
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    assert!((a.location - b.location).norm() >= a.radius + b.radius - 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_second_target_of_radius_two_keeps_distance() {
        let camera = default_camera();
        for seed in 0..20 {
            let mut rng = SceneRng::seeded(seed);
            let req = request(10.0, 26.0, 2.0, 1.0);

            let first = find_seed_pose(&mut rng, &camera, &req, &[]).unwrap();
            let placed = [PlacedObject::obstacle(first.location, 2.0)];
            let second = find_seed_pose(&mut rng, &camera, &req, &placed).unwrap();

            assert!(second.attempts <= DEFAULT_MAX_ATTEMPTS);
            assert!((second.location - first.location).norm() >= 4.0);
        }
    }

    #[test]
    fn test_is_clear_threshold() {
        let placed = [PlacedObject::obstacle(Vec3::zeros(), 2.0)];
        assert!(!is_clear(Vec3::new(3.9, 0.0, 0.0), 2.0, &placed, 1.0));
        assert!(is_clear(Vec3::new(4.1, 0.0, 0.0), 2.0, &placed, 1.0));
        assert!(is_clear(Vec3::new(0.5, 0.0, 0.0), 2.0, &placed, 0.0));
    }

    #[test]
    fn test_twitch_limits_offsets() {
        let camera = default_camera();
        let mut rng = SceneRng::seeded(8);
        let frustum = frustum_extents(&camera, 30.0, 0.2);

        for _ in 0..200 {
            let pose = seed_pose_at(&mut rng, &camera, 30.0, 0.2, 0.05);
            assert_relative_eq!(pose.location.y, 30.0, epsilon = 1e-3);
            assert!(pose.location.x.abs() <= frustum.half_width * 0.05 + 1e-4);
            assert!(pose.location.z.abs() <= frustum.half_height * 0.05 + 1e-4);
        }
    }
}
