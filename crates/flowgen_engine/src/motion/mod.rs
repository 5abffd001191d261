//! # Perturbation Engine
//!
//! Inter-frame motion for targets, camera and background, each class with its
//! own [`MotionProfile`](crate::config::MotionProfile), plus the one-time
//! initial reorientation of targets.

pub mod perturbation;

pub use perturbation::{apply_perturbation, initial_orientation, perturb, reset_deltas, DeltaPose};
