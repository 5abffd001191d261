//! Asset filters and selection
//!
//! Model files carry their bounding shape as a tag in the file name
//! (`mug_BOX.obj`, `ball_SPH.stl`). Filters decide which files of a host
//! listing are eligible; [`AssetSelection`] decides which eligible file a
//! scene uses.

use crate::config::AssetFilterConfig;
use crate::foundation::random::SceneRng;
use std::fmt;
use std::path::{Path, PathBuf};

/// Predicate applied by the host when listing asset files
pub trait AssetFilter {
    /// Whether `path` is eligible
    fn matches(&self, path: &Path) -> bool;
}

bitflags::bitflags! {
    /// Enabled model file formats
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModelFormats: u8 {
        /// Wavefront `.obj`
        const OBJ = 1 << 0;
        /// Stereolithography `.stl`
        const STL = 1 << 1;
        /// Polygon file `.ply`
        const PLY = 1 << 2;
        /// Autodesk `.3ds`
        const THREE_DS = 1 << 3;
    }
}

impl ModelFormats {
    /// Formats enabled in the filter configuration
    pub fn from_config(config: &AssetFilterConfig) -> Self {
        let mut formats = Self::empty();
        formats.set(Self::OBJ, config.format_obj);
        formats.set(Self::STL, config.format_stl);
        formats.set(Self::PLY, config.format_ply);
        formats.set(Self::THREE_DS, config.format_3ds);
        formats
    }

    /// Format of a file judged by its extension
    pub fn of_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "obj" => Some(Self::OBJ),
            "stl" => Some(Self::STL),
            "ply" => Some(Self::PLY),
            "3ds" => Some(Self::THREE_DS),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Enabled bounding shapes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BoundingShapes: u8 {
        /// Box-bounded models
        const BOX = 1 << 0;
        /// Sphere-bounded models
        const SPHERE = 1 << 1;
    }
}

impl BoundingShapes {
    /// Shapes enabled in the filter configuration
    pub fn from_config(config: &AssetFilterConfig) -> Self {
        let mut shapes = Self::empty();
        shapes.set(Self::BOX, config.shape_box);
        shapes.set(Self::SPHERE, config.shape_sphere);
        shapes
    }

    /// Whether `shape` is enabled
    pub fn allows(self, shape: BoundingShape) -> bool {
        self.contains(shape.flag())
    }
}

/// Bounding shape a model is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundingShape {
    /// `BOX` tag
    Box,
    /// `SPH` tag
    Sphere,
}

impl BoundingShape {
    /// Both shapes
    pub const ALL: [BoundingShape; 2] = [BoundingShape::Box, BoundingShape::Sphere];

    /// Tag as it appears in file and object names
    pub const fn tag(self) -> &'static str {
        match self {
            BoundingShape::Box => "BOX",
            BoundingShape::Sphere => "SPH",
        }
    }

    const fn flag(self) -> BoundingShapes {
        match self {
            BoundingShape::Box => BoundingShapes::BOX,
            BoundingShape::Sphere => BoundingShapes::SPHERE,
        }
    }

    /// Shape tagged in a file name; untagged files count as boxes
    pub fn from_file_name(path: &Path) -> Self {
        match file_name(path) {
            Some(name) if name.contains(BoundingShape::Sphere.tag()) => BoundingShape::Sphere,
            _ => BoundingShape::Box,
        }
    }

    fn tagged_in(self, path: &Path) -> bool {
        file_name(path).is_some_and(|name| name.contains(self.tag()))
    }
}

impl fmt::Display for BoundingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

fn contains_tag(path: &Path, tag: &str) -> bool {
    tag.is_empty() || file_name(path).is_some_and(|name| name.contains(tag))
}

/// Target model filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFilter {
    /// Accepted formats
    pub formats: ModelFormats,
    /// Accepted bounding shapes
    pub shapes: BoundingShapes,
    /// Required file-name substring; empty accepts every name
    pub name_tag: String,
}

impl ModelFilter {
    /// Filter described by the configuration
    pub fn from_config(config: &AssetFilterConfig) -> Self {
        Self {
            formats: ModelFormats::from_config(config),
            shapes: BoundingShapes::from_config(config),
            name_tag: config.model_name_tag.clone(),
        }
    }
}

impl AssetFilter for ModelFilter {
    fn matches(&self, path: &Path) -> bool {
        let format_ok = ModelFormats::of_path(path).is_some_and(|format| self.formats.contains(format));
        let shape_ok = BoundingShape::ALL
            .iter()
            .any(|&shape| self.shapes.allows(shape) && shape.tagged_in(path));
        format_ok && shape_ok && contains_tag(path, &self.name_tag)
    }
}

/// Background image filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundFilter {
    /// Required file-name substring; empty accepts every name
    pub name_tag: String,
}

impl AssetFilter for BackgroundFilter {
    fn matches(&self, path: &Path) -> bool {
        contains_tag(path, &self.name_tag)
    }
}

/// Bounding-shape overlay model filter: `.obj` files tagged with `shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsFilter {
    /// Required shape
    pub shape: BoundingShape,
}

impl AssetFilter for BoundsFilter {
    fn matches(&self, path: &Path) -> bool {
        ModelFormats::of_path(path) == Some(ModelFormats::OBJ) && self.shape.tagged_in(path)
    }
}

/// How a scene picks one file out of the eligible list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSelection {
    /// Uniformly at random
    Random,
    /// Cycle through the list by a caller-supplied index
    Iterative,
}

impl AssetSelection {
    /// Policy for a `randomize` switch
    pub const fn from_flag(randomize: bool) -> Self {
        if randomize {
            AssetSelection::Random
        } else {
            AssetSelection::Iterative
        }
    }

    /// Pick a file; `None` only for an empty list
    pub fn select<'a>(self, files: &'a [PathBuf], index: usize, rng: &mut SceneRng) -> Option<&'a PathBuf> {
        if files.is_empty() {
            return None;
        }
        let chosen = match self {
            AssetSelection::Random => rng.index(files.len()),
            AssetSelection::Iterative => index % files.len(),
        };
        files.get(chosen)
    }
}
