//! Camera geometry
//!
//! The camera view used for placement and the frustum it spans at a given depth.

pub mod camera;
pub mod frustum;

pub use camera::CameraView;
pub use frustum::{frustum_extents, Frustum};
