//! # Host Interface
//!
//! The authoring application that owns meshes, renders images and stores object
//! poses is an external collaborator. The engine talks to it only through
//! [`SceneHost`] and refers to host objects by opaque [`ObjectHandle`]s issued
//! at creation time.
//!
//! [`InMemoryHost`] is a complete implementation backed by a slot map. It is
//! used for dry runs and tests: imports resolve against a registered asset
//! manifest and renders are recorded instead of rasterized.

pub mod memory;

pub use memory::{AssetManifest, HostObject, HostObjectKind, InMemoryHost, ManifestEntry, RenderRequest};

use crate::assets::AssetFilter;
use crate::foundation::math::{EulerRotation, Vec3};
use crate::scene::Pose;
use std::path::{Path, PathBuf};
use thiserror::Error;

slotmap::new_key_type! {
    /// Opaque, strongly typed reference to an object living in the host scene
    pub struct ObjectHandle;
}

/// Axis-aligned size and pose of a host object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectExtents {
    /// Width, height and depth of the object's bounding box
    pub size: Vec3,
    /// Current pose
    pub pose: Pose,
}

/// Kinds of light the environment setup creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Omnidirectional point lamp
    Point,
    /// Directional sun lamp
    Sun,
}

/// Host call failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The handle does not refer to a live object
    #[error("object handle {0:?} not found")]
    HandleNotFound(ObjectHandle),

    /// The host could not import the file
    #[error("failed to import {path}: {reason}")]
    ImportFailed {
        /// File that was imported
        path: PathBuf,
        /// Host-provided reason
        reason: String,
    },

    /// The host could not list a directory
    #[error("failed to list {path}: {reason}")]
    ListingFailed {
        /// Directory that was listed
        path: PathBuf,
        /// Host-provided reason
        reason: String,
    },

    /// The render could not be produced
    #[error("render to {path} failed: {reason}")]
    RenderFailed {
        /// Requested output path
        path: PathBuf,
        /// Host-provided reason
        reason: String,
    },
}

/// Operations the engine needs from the authoring application
///
/// Every call runs to completion on the calling thread.
pub trait SceneHost {
    /// Files under `directory` (recursively) accepted by `filter`, in a stable order
    fn list_asset_files(&self, directory: &Path, filter: &dyn AssetFilter) -> Result<Vec<PathBuf>, HostError>;

    /// Import a mesh or image plane, join it into one object with its origin at
    /// the geometry center, and give it `name`
    fn import_and_name(&mut self, path: &Path, name: &str) -> Result<ObjectHandle, HostError>;

    /// Create the scene camera and make it the active one
    fn add_camera(&mut self, name: &str, pose: &Pose) -> ObjectHandle;

    /// Create a light
    fn add_light(&mut self, name: &str, kind: LightKind, location: Vec3, rotation: EulerRotation) -> ObjectHandle;

    /// Read the axis-aligned size and pose of an object without modifying it
    fn query_extents(&self, handle: ObjectHandle) -> Result<ObjectExtents, HostError>;

    /// Overwrite absolute pose and deltas
    fn set_pose(&mut self, handle: ObjectHandle, pose: &Pose) -> Result<(), HostError>;

    /// Scale the object so its bounding box has `size`
    fn set_dimensions(&mut self, handle: ObjectHandle, size: Vec3) -> Result<(), HostError>;

    /// Render the current scene to `output_path`
    fn trigger_render(&mut self, output_path: &Path) -> Result<(), HostError>;

    /// Remove an object from the scene graph
    fn delete_object(&mut self, handle: ObjectHandle) -> Result<(), HostError>;
}
