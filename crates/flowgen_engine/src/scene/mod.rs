//! # Scene
//!
//! Per-object pose data, bounding volumes and the placement working set of
//! the scene being composed.

pub mod bounds;
pub mod pose;
pub mod state;

pub use bounds::{extract_bounds, BoundingSphere};
pub use pose::Pose;
pub use state::{PlacedObject, SceneState, UniqueIdRegistry, ID_BASE};
