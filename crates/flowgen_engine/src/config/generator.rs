//! # Generator Configuration
//!
//! Every tunable of a generation run, grouped by subsystem. Defaults match the
//! values the data sets have historically been produced with, so an empty
//! config file reproduces the reference setup.
//!
//! ## Configuration Categories
//!
//! - **Paths**: output directory and the model / bounds / background databases
//! - **Asset filters**: model formats, bounding shapes, name tags, selection policy
//! - **Placement**: object count, camera distances, field-of-view and proximity coefficients
//! - **Camera**: initial pose and lens angles
//! - **Motion**: per entity class inter-frame perturbation, plus initial target orientation
//! - **Run**: iteration count, naming, seed, log level

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output and asset database locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory the renders and ground-truth records are written to
    pub output: PathBuf,
    /// Model database
    pub models: PathBuf,
    /// Bounding-shape models used for overlay renders
    pub bounds: PathBuf,
    /// Background image database
    pub backgrounds: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output"),
            models: PathBuf::from("assets/models"),
            bounds: PathBuf::from("assets/bounds"),
            backgrounds: PathBuf::from("assets/backgrounds"),
        }
    }
}

/// Which assets are eligible and how they are picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetFilterConfig {
    /// Accept `.obj` models
    pub format_obj: bool,
    /// Accept `.stl` models
    pub format_stl: bool,
    /// Accept `.ply` models
    pub format_ply: bool,
    /// Accept `.3ds` models
    pub format_3ds: bool,
    /// Accept models tagged `BOX`
    pub shape_box: bool,
    /// Accept models tagged `SPH`
    pub shape_sphere: bool,
    /// Model file names must contain this substring (empty accepts all)
    pub model_name_tag: String,
    /// Background file names must contain this substring (empty accepts all)
    pub background_name_tag: String,
    /// Pick models at random instead of iterating through them
    pub randomize_models: bool,
    /// Pick backgrounds at random instead of iterating through them
    pub randomize_backgrounds: bool,
}

impl Default for AssetFilterConfig {
    fn default() -> Self {
        Self {
            format_obj: true,
            format_stl: false,
            format_ply: false,
            format_3ds: false,
            shape_box: true,
            shape_sphere: true,
            model_name_tag: String::new(),
            background_name_tag: String::new(),
            randomize_models: true,
            randomize_backgrounds: true,
        }
    }
}

/// Target placement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Number of targets requested per scene (an upper bound when random)
    pub max_number_of_models: u32,
    /// Draw the requested count uniformly from `1..=max_number_of_models`
    pub random_number_of_models: bool,
    /// Closest allowed distance from the camera
    pub min_distance: f32,
    /// Farthest allowed distance from the camera
    pub max_distance: f32,
    /// Field-of-view coefficient: `c < 0` widens, `c > 0` narrows the usable frustum
    pub fov_coef: f32,
    /// Bounding-sphere multiplier for overlap tests: `>= 1` forbids overlap, `0` allows all
    pub proximity_coef: f32,
    /// Attempts per target before it is skipped
    pub max_attempts: u32,
    /// Radius of the obstacle registered at the camera location
    pub camera_clearance_radius: f32,
    /// Depth of the background plane
    pub background_distance: f32,
    /// Offset amplitude of the background inside the frustum
    pub background_twitch: f32,
    /// Background size multiplier per unit of depth
    pub background_scale_factor: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_number_of_models: 5,
            random_number_of_models: true,
            min_distance: 10.0,
            max_distance: 26.0,
            fov_coef: 0.2,
            proximity_coef: 1.0,
            max_attempts: 100,
            camera_clearance_radius: 2.0,
            background_distance: 30.0,
            background_twitch: 0.05,
            background_scale_factor: 0.9,
        }
    }
}

/// Camera pose and lens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World location
    pub location: [f32; 3],
    /// XYZ Euler rotation in degrees; `[90, 0, 0]` looks along +Y
    pub rotation_degrees: [f32; 3],
    /// Full horizontal field of view in degrees
    pub fov_x_degrees: f32,
    /// Full vertical field of view in degrees
    pub fov_y_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: [0.0, 0.0, 0.0],
            rotation_degrees: [90.0, 0.0, 0.0],
            // 50mm lens on a 36mm sensor at 16:9
            fov_x_degrees: 39.6,
            fov_y_degrees: 22.9,
        }
    }
}

/// Per-axis scale factors in `[0, 1]`
///
/// `0` removes all motion on that axis, `1` keeps the full sampled range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConstraints {
    /// X factor
    pub x: f32,
    /// Y factor
    pub y: f32,
    /// Z factor
    pub z: f32,
}

impl AxisConstraints {
    /// No restriction on any axis
    pub const FREE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    /// Every axis locked
    pub const LOCKED: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create new constraints
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Factors as an array indexed by axis
    pub const fn as_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn validate(&self, what: &str) -> Result<(), ConfigError> {
        for (axis, value) in ["x", "y", "z"].iter().zip(self.as_array()) {
            check_range(&format!("{what}.{axis}"), value, 0.0, 1.0)?;
        }
        Ok(())
    }
}

impl Default for AxisConstraints {
    fn default() -> Self {
        Self::FREE
    }
}

/// Inter-frame motion of one entity class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    /// Whether this class moves between the two frames
    pub enabled: bool,
    /// Maximum translation per axis
    pub translation_coef: f32,
    /// Maximum rotation per axis in degrees
    pub rotation_coef_degrees: f32,
    /// Per-axis scale factors
    pub constraints: AxisConstraints,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::still()
    }
}

impl MotionProfile {
    /// Profile producing zero deltas
    pub const fn still() -> Self {
        Self {
            enabled: false,
            translation_coef: 0.0,
            rotation_coef_degrees: 0.0,
            constraints: AxisConstraints::FREE,
        }
    }

    /// Enabled profile with unconstrained axes
    pub const fn moving(translation_coef: f32, rotation_coef_degrees: f32) -> Self {
        Self {
            enabled: true,
            translation_coef,
            rotation_coef_degrees,
            constraints: AxisConstraints::FREE,
        }
    }

    /// Builder pattern: Set enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder pattern: Set constraints
    pub fn with_constraints(mut self, constraints: AxisConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    fn validate(&self, what: &str, max_translation: f32) -> Result<(), ConfigError> {
        check_range(&format!("{what}.translation_coef"), self.translation_coef, 0.0, max_translation)?;
        check_range(&format!("{what}.rotation_coef_degrees"), self.rotation_coef_degrees, 0.0, 10.0)?;
        self.constraints.validate(&format!("{what}.constraints"))
    }
}

/// One-time absolute reorientation of freshly placed targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialOrientationConfig {
    /// Whether targets are reoriented after placement
    pub enabled: bool,
    /// Maximum offset per axis in degrees
    pub rotation_coef_degrees: f32,
    /// Per-axis scale factors
    pub constraints: AxisConstraints,
}

impl Default for InitialOrientationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotation_coef_degrees: 120.0,
            constraints: AxisConstraints::new(0.2, 0.2, 1.0),
        }
    }
}

/// Inter-frame motion settings per entity class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Initial target orientation
    pub initial_orientation: InitialOrientationConfig,
    /// Target motion
    pub target: MotionProfile,
    /// Background motion
    pub background: MotionProfile,
    /// Camera motion
    pub camera: MotionProfile,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            initial_orientation: InitialOrientationConfig::default(),
            target: MotionProfile::moving(0.5, 9.0),
            background: MotionProfile::moving(2.0, 4.0).with_enabled(false),
            camera: MotionProfile::moving(1.0, 0.5).with_enabled(false),
        }
    }
}

/// Batch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of scenes generated by a batch
    pub iterations: u32,
    /// Scene name prefix; scene `n` is named `<base_name>_<n>`
    pub base_name: String,
    /// Sub-directory of the output directory the batch writes into
    pub subfolder: String,
    /// Name prefix of target objects
    pub target_prefix: String,
    /// Random seed; runs are non-reproducible when absent
    pub seed: Option<u64>,
    /// Default log level for the command-line runner
    pub log_level: String,
    /// Empty the output directory before a batch
    pub clean_output: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            base_name: "img".to_string(),
            subfolder: "data".to_string(),
            target_prefix: "target".to_string(),
            seed: None,
            log_level: "info".to_string(),
            clean_output: true,
        }
    }
}

/// # Complete Generator Configuration
///
/// Top-level configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratorConfig {
    /// File-system locations
    pub paths: PathConfig,
    /// Asset filters and selection policy
    pub assets: AssetFilterConfig,
    /// Placement settings
    pub placement: PlacementConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Motion settings
    pub motion: MotionConfig,
    /// Batch settings
    pub run: RunConfig,
}

impl GeneratorConfig {
    /// Builder pattern: Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.run.seed = Some(seed);
        self
    }

    /// Builder pattern: Set output directory
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.paths.output = output.into();
        self
    }

    /// Builder pattern: Set iteration count
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.run.iterations = iterations;
        self
    }

    /// Directory a batch writes into
    pub fn output_dir(&self) -> PathBuf {
        if self.run.subfolder.is_empty() {
            self.paths.output.clone()
        } else {
            self.paths.output.join(&self.run.subfolder)
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let assets = &self.assets;
        if !(assets.format_obj || assets.format_stl || assets.format_ply || assets.format_3ds) {
            return Err(ConfigError::Invalid("at least one model format must be enabled".into()));
        }
        if !(assets.shape_box || assets.shape_sphere) {
            return Err(ConfigError::Invalid("at least one bounding shape must be enabled".into()));
        }

        let placement = &self.placement;
        if !(1..=15).contains(&placement.max_number_of_models) {
            return Err(ConfigError::Invalid(format!(
                "placement.max_number_of_models must be in 1..=15, got {}",
                placement.max_number_of_models
            )));
        }
        if placement.min_distance <= 0.0 || placement.min_distance > placement.max_distance {
            return Err(ConfigError::Invalid(format!(
                "placement distances must satisfy 0 < min <= max, got {}..{}",
                placement.min_distance, placement.max_distance
            )));
        }
        check_range("placement.fov_coef", placement.fov_coef, -0.2, 0.5)?;
        check_range("placement.proximity_coef", placement.proximity_coef, 0.0, 3.0)?;
        if placement.max_attempts == 0 {
            return Err(ConfigError::Invalid("placement.max_attempts must be at least 1".into()));
        }
        check_range("placement.camera_clearance_radius", placement.camera_clearance_radius, 0.0, f32::MAX)?;
        check_range("placement.background_distance", placement.background_distance, f32::EPSILON, f32::MAX)?;
        check_range("placement.background_twitch", placement.background_twitch, 0.0, 1.0)?;

        let camera = &self.camera;
        check_range("camera.fov_x_degrees", camera.fov_x_degrees, f32::EPSILON, 179.0)?;
        check_range("camera.fov_y_degrees", camera.fov_y_degrees, f32::EPSILON, 179.0)?;

        let motion = &self.motion;
        check_range(
            "motion.initial_orientation.rotation_coef_degrees",
            motion.initial_orientation.rotation_coef_degrees,
            0.0,
            270.0,
        )?;
        motion.initial_orientation.constraints.validate("motion.initial_orientation.constraints")?;
        motion.target.validate("motion.target", 3.0)?;
        motion.background.validate("motion.background", 4.0)?;
        motion.camera.validate("motion.camera", 2.0)?;

        if !(1..=100).contains(&self.run.iterations) {
            return Err(ConfigError::Invalid(format!(
                "run.iterations must be in 1..=100, got {}",
                self.run.iterations
            )));
        }
        if self.run.base_name.is_empty() || self.run.target_prefix.is_empty() {
            return Err(ConfigError::Invalid("run.base_name and run.target_prefix cannot be empty".into()));
        }
        Ok(())
    }
}

impl Config for GeneratorConfig {}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be in [{min}, {max}], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        config.validate().expect("default config must validate");
        assert_eq!(config.placement.max_attempts, 100);
        assert!(config.motion.target.enabled);
        assert!(!config.motion.camera.enabled);
        assert!(!config.motion.background.enabled);
        assert!(config.run.clean_output);
    }

    #[test]
    fn test_distance_order_is_checked() {
        let mut config = GeneratorConfig::default();
        config.placement.min_distance = 20.0;
        config.placement.max_distance = 12.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_coefficient_ranges_are_checked() {
        let mut config = GeneratorConfig::default();
        config.placement.fov_coef = 0.8;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.motion.camera.constraints.y = 1.5;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.assets.shape_box = false;
        config.assets.shape_sphere = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_and_ron_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::default().with_seed(99).with_iterations(3);

        let toml_path = dir.path().join("flowgen.toml");
        config.save_to_file(&toml_path).unwrap();
        assert_eq!(GeneratorConfig::load_from_file(&toml_path).unwrap(), config);

        let ron_path = dir.path().join("flowgen.ron");
        config.save_to_file(&ron_path).unwrap();
        assert_eq!(GeneratorConfig::load_from_file(&ron_path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[placement]\nproximity_coef = 1.5\n").unwrap();

        let config = GeneratorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.placement.proximity_coef, 1.5);
        assert_eq!(config.placement.max_number_of_models, 5);
        assert!(config.run.clean_output);

        std::fs::write(&path, "[run]\nclean_output = false\n").unwrap();
        assert!(!GeneratorConfig::load_from_file(&path).unwrap().run.clean_output);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = GeneratorConfig::default().save_to_file("flowgen.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_output_dir_joins_subfolder() {
        let config = GeneratorConfig::default().with_output("out");
        assert_eq!(config.output_dir(), PathBuf::from("out").join("data"));
    }
}
