//! Placement of targets and background inside the camera frustum

pub mod sampler;

pub use sampler::{find_seed_pose, is_clear, seed_pose_at, PlacementRequest, SeedPose, DEFAULT_MAX_ATTEMPTS};
