//! Scene generation pipeline
//!
//! [`SceneGenerator`] ties the placement, perturbation and ground-truth
//! subsystems together on top of a [`SceneHost`](crate::host::SceneHost).

pub mod generator;


pub use generator::{BatchReport, SceneGenerator, SceneObjects, SceneReport, TargetInstance};
