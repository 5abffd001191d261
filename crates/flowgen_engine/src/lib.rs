//! # Flowgen Engine
//!
//! Procedural composition of two-frame synthetic scenes with exact
//! ground-truth motion, for training optical-flow models.
//!
//! ## Features
//!
//! - **Frustum placement**: rejection sampling of non-overlapping targets inside the camera view
//! - **Rigid-body perturbation**: bounded per-axis motion for targets, camera and background
//! - **Ground truth**: fixed-precision records of absolute pose, delta pose and camera-relative locations
//! - **Host abstraction**: mesh import and rendering sit behind [`host::SceneHost`]
//! - **Reproducible runs**: a single seedable random source per generator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgen_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manifest = AssetManifest::load_from_file("assets/manifest.ron")?;
//!     let config = GeneratorConfig::default().with_seed(42).with_iterations(10);
//!     ground_truth::prepare_output_dir(&config.output_dir())?;
//!
//!     let mut generator = SceneGenerator::new(InMemoryHost::from_manifest(&manifest), config)?;
//!     let report = generator.run_batch()?;
//!     println!("{} scenes written", report.completed.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod geometry;
pub mod scene;
pub mod assets;
pub mod host;
pub mod placement;
pub mod motion;
pub mod ground_truth;
pub mod pipeline;

mod error;

pub use error::{AssetKind, GeneratorError, GeneratorResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AssetKind, GeneratorError, GeneratorResult,
        config::{Config, ConfigError, GeneratorConfig, MotionProfile, AxisConstraints},
        foundation::{
            math::{Vec3, Quat, EulerOrder, EulerRotation},
            random::SceneRng,
        },
        geometry::{CameraView, Frustum, frustum_extents},
        scene::{Pose, BoundingSphere, PlacedObject, SceneState},
        host::{SceneHost, ObjectHandle, HostError, InMemoryHost, AssetManifest},
        placement::{find_seed_pose, PlacementRequest, SeedPose},
        motion::{perturb, apply_perturbation, reset_deltas, initial_orientation, DeltaPose},
        ground_truth::{self, serialize_frame, serialize_scene_config, write_record, prepare_output_dir, FrameSnapshot},
        pipeline::{SceneGenerator, SceneReport, BatchReport},
    };
}
