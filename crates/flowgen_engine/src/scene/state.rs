//! # Scene State Tracker
//!
//! Working set of the scene being composed: the objects already placed (for
//! collision queries), the unique-ID sequence used to tell apart several
//! instances of the same asset, and the number of targets placed so far.
//!
//! The state is a plain value owned by the generator and lent to the sampler;
//! only the generation thread ever touches it.

use crate::foundation::math::Vec3;
use crate::host::ObjectHandle;
use crate::scene::BoundingSphere;

/// First value handed out is `ID_BASE + 1`
pub const ID_BASE: u64 = 10_000_000;

/// Snapshot of an object occupying space in the current scene
///
/// Entries are never mutated after insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    /// Host object the snapshot was taken from; `None` for pure obstacles
    pub handle: Option<ObjectHandle>,
    /// Location at insertion time
    pub location: Vec3,
    /// Bounding-sphere radius at insertion time
    pub radius: f32,
}

impl PlacedObject {
    /// Snapshot a placed host object
    pub fn new(handle: ObjectHandle, location: Vec3, radius: f32) -> Self {
        Self {
            handle: Some(handle),
            location,
            radius,
        }
    }

    /// Obstacle that is not backed by a placed target
    pub fn obstacle(location: Vec3, radius: f32) -> Self {
        Self {
            handle: None,
            location,
            radius,
        }
    }

    /// Snapshot from an object's bounding sphere
    pub fn from_sphere(handle: ObjectHandle, sphere: &BoundingSphere) -> Self {
        Self::new(handle, sphere.center, sphere.radius)
    }
}

/// Strictly increasing ID sequence
#[derive(Debug, Clone)]
pub struct UniqueIdRegistry {
    last: u64,
}

impl Default for UniqueIdRegistry {
    fn default() -> Self {
        Self { last: ID_BASE }
    }
}

impl UniqueIdRegistry {
    /// Create a registry starting after [`ID_BASE`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ID
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// Placement working set of one scene
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    placed: Vec<PlacedObject>,
    ids: UniqueIdRegistry,
    placed_targets: u32,
}

impl SceneState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new scene
    ///
    /// Clears the placed objects and the target count. The ID sequence keeps
    /// counting so IDs stay unique for the whole process run.
    pub fn reset(&mut self) {
        log::debug!(
            "Scene state reset ({} placed objects, {} targets)",
            self.placed.len(),
            self.placed_targets
        );
        self.placed.clear();
        self.placed_targets = 0;
    }

    /// Issue a unique ID
    pub fn next_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    /// Add an object to the working set
    pub fn register_placed(&mut self, object: PlacedObject) {
        self.placed.push(object);
    }

    /// Objects placed so far
    pub fn placed(&self) -> &[PlacedObject] {
        &self.placed
    }

    /// Count one successfully placed target
    pub fn record_target_placed(&mut self) {
        self.placed_targets += 1;
    }

    /// Targets placed in the current scene
    pub fn placed_targets(&self) -> u32 {
        self.placed_targets
    }
}
