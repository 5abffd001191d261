//! Slot-map backed host used for dry runs and tests

use super::{HostError, LightKind, ObjectExtents, ObjectHandle, SceneHost};
use crate::assets::AssetFilter;
use crate::config::Config;
use crate::foundation::math::{utils, EulerRotation, Vec3};
use crate::scene::Pose;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One importable file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File path as the host would see it on disk
    pub path: PathBuf,
    /// Bounding-box size after import
    pub size: [f32; 3],
}

/// Files the in-memory host can import
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Importable files
    pub entries: Vec<ManifestEntry>,
}

impl AssetManifest {
    /// Builder pattern: Add an entry
    pub fn with_entry(mut self, path: impl Into<PathBuf>, size: [f32; 3]) -> Self {
        self.entries.push(ManifestEntry {
            path: path.into(),
            size,
        });
        self
    }
}

impl Config for AssetManifest {}

/// What a host object is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostObjectKind {
    /// Imported mesh or image plane
    Mesh,
    /// Scene camera
    Camera,
    /// Lamp
    Light(LightKind),
}

/// Object stored by [`InMemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct HostObject {
    /// Object name
    pub name: String,
    /// Object kind
    pub kind: HostObjectKind,
    /// Bounding-box size
    pub size: Vec3,
    /// Pose and deltas
    pub pose: Pose,
    /// Imported file, if any
    pub source: Option<PathBuf>,
}

/// A render the host was asked to produce
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Requested output path
    pub output_path: PathBuf,
    /// Names of the objects present at render time
    pub objects: Vec<String>,
}

/// Host that keeps the scene graph in memory
#[derive(Debug, Default)]
pub struct InMemoryHost {
    objects: SlotMap<ObjectHandle, HostObject>,
    assets: BTreeMap<PathBuf, Vec3>,
    renders: Vec<RenderRequest>,
}

impl InMemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host that can import every manifest entry
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut host = Self::new();
        for entry in &manifest.entries {
            host.register_asset(&entry.path, utils::vec3(entry.size));
        }
        host
    }

    /// Make `path` importable with the given bounding-box size
    pub fn register_asset(&mut self, path: impl AsRef<Path>, size: Vec3) {
        self.assets.insert(path.as_ref().to_path_buf(), size);
    }

    /// Builder pattern: Register an asset
    pub fn with_asset(mut self, path: impl AsRef<Path>, size: Vec3) -> Self {
        self.register_asset(path, size);
        self
    }

    /// Look up a live object
    pub fn object(&self, handle: ObjectHandle) -> Option<&HostObject> {
        self.objects.get(handle)
    }

    /// Find the first live object with `name`
    pub fn find_by_name(&self, name: &str) -> Option<(ObjectHandle, &HostObject)> {
        self.objects.iter().find(|(_, object)| object.name == name)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Renders requested so far, oldest first
    pub fn renders(&self) -> &[RenderRequest] {
        &self.renders
    }

    fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut HostObject, HostError> {
        self.objects.get_mut(handle).ok_or(HostError::HandleNotFound(handle))
    }
}

impl SceneHost for InMemoryHost {
    fn list_asset_files(&self, directory: &Path, filter: &dyn AssetFilter) -> Result<Vec<PathBuf>, HostError> {
        Ok(self
            .assets
            .keys()
            .filter(|path| path.starts_with(directory) && filter.matches(path))
            .cloned()
            .collect())
    }

    fn import_and_name(&mut self, path: &Path, name: &str) -> Result<ObjectHandle, HostError> {
        let size = *self.assets.get(path).ok_or_else(|| HostError::ImportFailed {
            path: path.to_path_buf(),
            reason: "file is not in the asset manifest".to_string(),
        })?;

        log::trace!("Imported {} as {}", path.display(), name);
        Ok(self.objects.insert(HostObject {
            name: name.to_string(),
            kind: HostObjectKind::Mesh,
            size,
            pose: Pose::default(),
            source: Some(path.to_path_buf()),
        }))
    }

    fn add_camera(&mut self, name: &str, pose: &Pose) -> ObjectHandle {
        self.objects.insert(HostObject {
            name: name.to_string(),
            kind: HostObjectKind::Camera,
            size: Vec3::zeros(),
            pose: *pose,
            source: None,
        })
    }

    fn add_light(&mut self, name: &str, kind: LightKind, location: Vec3, rotation: EulerRotation) -> ObjectHandle {
        self.objects.insert(HostObject {
            name: name.to_string(),
            kind: HostObjectKind::Light(kind),
            size: Vec3::zeros(),
            pose: Pose::new(location, rotation),
            source: None,
        })
    }

    fn query_extents(&self, handle: ObjectHandle) -> Result<ObjectExtents, HostError> {
        let object = self.objects.get(handle).ok_or(HostError::HandleNotFound(handle))?;
        Ok(ObjectExtents {
            size: object.size,
            pose: object.pose,
        })
    }

    fn set_pose(&mut self, handle: ObjectHandle, pose: &Pose) -> Result<(), HostError> {
        self.object_mut(handle)?.pose = *pose;
        Ok(())
    }

    fn set_dimensions(&mut self, handle: ObjectHandle, size: Vec3) -> Result<(), HostError> {
        self.object_mut(handle)?.size = size;
        Ok(())
    }

    fn trigger_render(&mut self, output_path: &Path) -> Result<(), HostError> {
        let objects = self.objects.values().map(|object| object.name.clone()).collect();
        self.renders.push(RenderRequest {
            output_path: output_path.to_path_buf(),
            objects,
        });
        Ok(())
    }

    fn delete_object(&mut self, handle: ObjectHandle) -> Result<(), HostError> {
        self.objects
            .remove(handle)
            .map(|_| ())
            .ok_or(HostError::HandleNotFound(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptAll;

    impl AssetFilter for AcceptAll {
        fn matches(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_import_requires_registered_asset() {
        let mut host = InMemoryHost::new().with_asset("models/cup_BOX.obj", Vec3::new(1.0, 2.0, 3.0));

        let handle = host.import_and_name(Path::new("models/cup_BOX.obj"), "target.BOX.1").unwrap();
        let extents = host.query_extents(handle).unwrap();
        assert_eq!(extents.size, Vec3::new(1.0, 2.0, 3.0));

        let (found, object) = host.find_by_name("target.BOX.1").unwrap();
        assert_eq!(found, handle);
        assert_eq!(object.kind, HostObjectKind::Mesh);
        assert_eq!(object.source.as_deref(), Some(Path::new("models/cup_BOX.obj")));

        let missing = host.import_and_name(Path::new("models/nope.obj"), "x");
        assert!(matches!(missing, Err(HostError::ImportFailed { .. })));
    }

    #[test]
    fn test_listing_is_scoped_to_directory() {
        let host = InMemoryHost::new()
            .with_asset("models/a_BOX.obj", Vec3::repeat(1.0))
            .with_asset("models/nested/b_SPH.obj", Vec3::repeat(1.0))
            .with_asset("backgrounds/sky.png", Vec3::repeat(1.0));

        let listed = host.list_asset_files(Path::new("models"), &AcceptAll).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|path| path.starts_with("models")));
    }

    #[test]
    fn test_delete_reports_stale_handles() {
        let mut host = InMemoryHost::new();
        let camera = host.add_camera("camera", &Pose::default());

        assert_eq!(host.object(camera).map(|object| object.kind), Some(HostObjectKind::Camera));
        assert!(host.delete_object(camera).is_ok());
        assert!(host.object(camera).is_none());
        assert!(host.find_by_name("camera").is_none());
        assert_eq!(host.delete_object(camera), Err(HostError::HandleNotFound(camera)));
        assert!(matches!(host.query_extents(camera), Err(HostError::HandleNotFound(_))));
        assert_eq!(host.object_count(), 0);
    }

    #[test]
    fn test_render_records_scene_contents() {
        let mut host = InMemoryHost::new();
        host.add_camera("camera", &Pose::default());
        host.add_light("lamp", LightKind::Point, Vec3::zeros(), EulerRotation::identity());
        host.trigger_render(Path::new("out/img_0.1.png")).unwrap();

        assert_eq!(host.renders().len(), 1);
        assert_eq!(host.renders()[0].objects.len(), 2);
    }

    #[test]
    fn test_manifest_registers_every_entry() {
        let manifest = AssetManifest::default()
            .with_entry("models/a_BOX.obj", [1.0, 1.0, 1.0])
            .with_entry("backgrounds/field.png", [1.78, 1.0, 0.0]);
        let host = InMemoryHost::from_manifest(&manifest);

        let listed = host.list_asset_files(Path::new("backgrounds"), &AcceptAll).unwrap();
        assert_eq!(listed, vec![PathBuf::from("backgrounds/field.png")]);
    }
}
