//! # Scene Generator
//!
//! Drives one scene iteration end to end and runs batches of them.
//!
//! ```text
//! reset state ─► camera + lights ─► background ─► targets
//!      ─► frame 1 (render, overlay render, record)
//!      ─► perturb targets / camera / background
//!      ─► frame 2 (render, overlay render, record)
//!      ─► scene config record ─► teardown
//! ```
//!
//! Every host object created during an iteration is tracked by role in
//! [`SceneObjects`] and deleted before the iteration returns, whether it
//! succeeded or not.

use crate::assets::{AssetFilter, AssetSelection, BackgroundFilter, BoundingShape, BoundsFilter, ModelFilter};
use crate::config::{GeneratorConfig, MotionProfile};
use crate::error::{AssetKind, GeneratorError, GeneratorResult};
use crate::foundation::math::{utils, EulerOrder, EulerRotation, Vec3};
use crate::foundation::random::SceneRng;
use crate::geometry::CameraView;
use crate::ground_truth::{
    serialize_frame, serialize_scene_config, write_record, BackgroundSnapshot, FrameSnapshot, TargetSnapshot,
};
use crate::host::{HostError, LightKind, ObjectHandle, SceneHost};
use crate::motion::{apply_perturbation, initial_orientation, reset_deltas};
use crate::placement::{find_seed_pose, seed_pose_at, PlacementRequest};
use crate::scene::{extract_bounds, BoundingSphere, PlacedObject, Pose, SceneState};
use std::path::{Path, PathBuf};

/// Overlay scale relative to the target size
const OVERLAY_MARGIN: f32 = 1.01;

/// Offsets of the point and sun lamps from the camera
const POINT_LIGHT_OFFSET: [f32; 3] = [3.0, -6.0, 7.0];
const SUN_LIGHT_OFFSET: [f32; 3] = [-3.0, -6.0, 7.0];

/// A placed target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInstance {
    /// Host object
    pub handle: ObjectHandle,
    /// Unique name, `<prefix>.<SHAPE>.<id>`
    pub id_label: String,
    /// Bounding shape tagged in the source file name
    pub shape: BoundingShape,
    /// Bounding sphere at placement time
    pub bounds: BoundingSphere,
}

/// Host objects of the current iteration, by role
#[derive(Debug, Default)]
pub struct SceneObjects {
    /// Scene camera
    pub camera: Option<ObjectHandle>,
    /// Background plane and the file it was imported from
    pub background: Option<(ObjectHandle, PathBuf)>,
    /// Lamps
    pub lights: Vec<ObjectHandle>,
    /// Placed targets in placement order
    pub targets: Vec<TargetInstance>,
    /// Bounding overlays alive during an overlay render
    pub overlays: Vec<ObjectHandle>,
}

impl SceneObjects {
    fn drain(&mut self) -> Vec<ObjectHandle> {
        let mut handles: Vec<ObjectHandle> = self.overlays.drain(..).collect();
        handles.extend(self.targets.drain(..).map(|target| target.handle));
        handles.extend(self.background.take().map(|(handle, _)| handle));
        handles.extend(self.lights.drain(..));
        handles.extend(self.camera.take());
        handles
    }
}

/// Outcome of one scene iteration
#[derive(Debug, Clone, PartialEq)]
pub struct SceneReport {
    /// Iteration index
    pub iteration: u32,
    /// Scene name, `<base_name>_<iteration>`
    pub name: String,
    /// Targets the scene asked for
    pub requested_targets: u32,
    /// Targets actually placed
    pub placed_targets: u32,
    /// Background image used
    pub background: PathBuf,
    /// Requested render outputs
    pub renders: Vec<PathBuf>,
    /// Written ground-truth records
    pub records: Vec<PathBuf>,
}

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Iterations that completed
    pub completed: Vec<SceneReport>,
    /// Iterations that were aborted, with the reason
    pub failures: Vec<(u32, GeneratorError)>,
}

impl BatchReport {
    /// Total targets placed over the batch
    pub fn placed_targets(&self) -> u32 {
        self.completed.iter().map(|scene| scene.placed_targets).sum()
    }
}

/// Composes scenes on a [`SceneHost`]
pub struct SceneGenerator<H: SceneHost> {
    host: H,
    config: GeneratorConfig,
    state: SceneState,
    rng: SceneRng,
    camera_view: CameraView,
    model_cursor: usize,
}

impl<H: SceneHost> SceneGenerator<H> {
    /// Create a generator; fails on an invalid configuration
    pub fn new(host: H, config: GeneratorConfig) -> GeneratorResult<Self> {
        config.validate()?;
        let rng = SceneRng::from_optional_seed(config.run.seed);
        match rng.seed() {
            Some(seed) => log::info!("Scene generator seeded with {seed}"),
            None => log::info!("Scene generator seeded from entropy"),
        }
        let camera_view = CameraView::from_config(&config.camera);

        Ok(Self {
            host,
            config,
            state: SceneState::new(),
            rng,
            camera_view,
            model_cursor: 0,
        })
    }

    /// Host the scenes are composed on
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// Active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Placement working set of the last scene
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Run `config.run.iterations` scenes
    ///
    /// Iterations failing on I/O or host calls are recorded in the report and
    /// the batch moves on. Configuration-level failures stop the batch.
    pub fn run_batch(&mut self) -> GeneratorResult<BatchReport> {
        let iterations = self.config.run.iterations;
        log::info!("Generating {} scene(s) into {}", iterations, self.config.output_dir().display());

        let mut report = BatchReport::default();
        for iteration in 0..iterations {
            match self.run_once(iteration) {
                Ok(scene) => report.completed.push(scene),
                Err(error) if error.halts_batch() => {
                    log::error!("Batch stopped at scene {iteration}: {error}");
                    return Err(error);
                }
                Err(error) => {
                    log::error!("Scene {iteration} aborted: {error}");
                    report.failures.push((iteration, error));
                }
            }
        }

        log::info!(
            "Batch finished: {} completed, {} failed, {} targets placed",
            report.completed.len(),
            report.failures.len(),
            report.placed_targets()
        );
        Ok(report)
    }

    /// Compose, capture and tear down one scene
    pub fn run_once(&mut self, iteration: u32) -> GeneratorResult<SceneReport> {
        self.state.reset();
        let name = format!("{}_{}", self.config.run.base_name, iteration);
        log::info!("Scene {name}");

        let mut objects = SceneObjects::default();
        let result = self.compose_and_capture(iteration, &name, &mut objects);
        self.teardown(&mut objects);
        result
    }

    fn compose_and_capture(
        &mut self,
        iteration: u32,
        name: &str,
        objects: &mut SceneObjects,
    ) -> GeneratorResult<SceneReport> {
        let paths = self.config.paths.clone();
        let models = self.list_assets(AssetKind::Model, &paths.models, &ModelFilter::from_config(&self.config.assets))?;
        let background_filter = BackgroundFilter {
            name_tag: self.config.assets.background_name_tag.clone(),
        };
        let backgrounds = self.list_assets(AssetKind::Background, &paths.backgrounds, &background_filter)?;
        let output = self.config.output_dir();

        self.setup_environment(objects);
        let background = self.place_background(iteration, &backgrounds, objects)?;

        let requested = if self.config.placement.random_number_of_models {
            self.rng.int_inclusive(1, self.config.placement.max_number_of_models)
        } else {
            self.config.placement.max_number_of_models
        };
        for _ in 0..requested {
            if let Some(target) = self.place_target(&models) {
                objects.targets.push(target);
            }
        }
        log::info!("Placed {}/{} targets", self.state.placed_targets(), requested);

        let mut renders = Vec::new();
        let mut records = Vec::new();

        for handle in reference_handles(objects) {
            reset_deltas(&mut self.host, handle)?;
        }
        self.capture_frame(&output, &format!("{name}.1"), objects, &mut renders, &mut records)?;

        self.perturb_scene(objects)?;
        self.capture_frame(&output, &format!("{name}.2"), objects, &mut renders, &mut records)?;

        let config_text = serialize_scene_config(&self.config, self.state.placed_targets());
        records.push(write_record(&output, &format!("{name}.c"), &config_text)?);

        Ok(SceneReport {
            iteration,
            name: name.to_string(),
            requested_targets: requested,
            placed_targets: self.state.placed_targets(),
            background,
            renders,
            records,
        })
    }

    fn list_assets(&self, kind: AssetKind, directory: &Path, filter: &dyn AssetFilter) -> GeneratorResult<Vec<PathBuf>> {
        let files = self.host.list_asset_files(directory, filter)?;
        if files.is_empty() {
            return Err(GeneratorError::AssetNotFound {
                kind,
                directory: directory.to_path_buf(),
            });
        }
        log::debug!("{} {} file(s) available in {}", files.len(), kind, directory.display());
        Ok(files)
    }

    fn setup_environment(&mut self, objects: &mut SceneObjects) {
        let location = self.camera_view.location;
        let rotation = EulerRotation::from_degrees(utils::vec3(self.config.camera.rotation_degrees), EulerOrder::XYZ);
        let camera = self.host.add_camera("camera", &Pose::new(location, rotation));
        objects.camera = Some(camera);
        self.state.register_placed(PlacedObject::new(
            camera,
            location,
            self.config.placement.camera_clearance_radius,
        ));

        let lights = [
            ("light.point", LightKind::Point, POINT_LIGHT_OFFSET, 90.0),
            ("light.sun", LightKind::Sun, SUN_LIGHT_OFFSET, 60.0),
        ];
        for (name, kind, offset, pitch) in lights {
            let handle = self.host.add_light(
                name,
                kind,
                location + utils::vec3(offset),
                EulerRotation::from_degrees(Vec3::new(pitch, 0.0, 0.0), EulerOrder::XYZ),
            );
            objects.lights.push(handle);
        }
    }

    fn place_background(
        &mut self,
        iteration: u32,
        files: &[PathBuf],
        objects: &mut SceneObjects,
    ) -> GeneratorResult<PathBuf> {
        let selection = AssetSelection::from_flag(self.config.assets.randomize_backgrounds);
        let file = selection
            .select(files, iteration as usize, &mut self.rng)
            .cloned()
            .ok_or_else(|| GeneratorError::AssetNotFound {
                kind: AssetKind::Background,
                directory: self.config.paths.backgrounds.clone(),
            })?;

        let handle = self.host.import_and_name(&file, "background")?;
        objects.background = Some((handle, file.clone()));

        let placement = &self.config.placement;
        let scale = placement.background_distance * placement.background_scale_factor;
        let size = self.host.query_extents(handle)?.size;
        self.host.set_dimensions(handle, size * scale)?;

        let seed = seed_pose_at(
            &mut self.rng,
            &self.camera_view,
            placement.background_distance,
            placement.fov_coef,
            placement.background_twitch,
        );
        self.host.set_pose(handle, &Pose::new(seed.location, seed.rotation(EulerOrder::XYZ)))?;
        log::debug!("Background {} at {:?}", file.display(), seed.location);
        Ok(file)
    }

    /// Import, size up and place one target; `None` when it was skipped
    fn place_target(&mut self, models: &[PathBuf]) -> Option<TargetInstance> {
        let selection = AssetSelection::from_flag(self.config.assets.randomize_models);
        let file = selection.select(models, self.model_cursor, &mut self.rng)?.clone();
        self.model_cursor += 1;

        let shape = BoundingShape::from_file_name(&file);
        let id_label = format!("{}.{}.{}", self.config.run.target_prefix, shape, self.state.next_id());
        let handle = match self.host.import_and_name(&file, &id_label) {
            Ok(handle) => handle,
            Err(error) => {
                log::warn!("Skipping target {id_label}: {error}");
                return None;
            }
        };

        match self.position_target(handle, &id_label, shape) {
            Ok(Some(target)) => Some(target),
            Ok(None) => {
                self.discard(handle);
                None
            }
            Err(error) => {
                log::warn!("Skipping target {id_label}: {error}");
                self.discard(handle);
                None
            }
        }
    }

    fn position_target(
        &mut self,
        handle: ObjectHandle,
        id_label: &str,
        shape: BoundingShape,
    ) -> Result<Option<TargetInstance>, HostError> {
        let (bounds, _) = extract_bounds(&self.host, handle)?;
        let request = PlacementRequest::from_config(&self.config.placement, bounds.radius);

        let Some(seed) = find_seed_pose(&mut self.rng, &self.camera_view, &request, self.state.placed()) else {
            let exhausted = GeneratorError::PlacementExhausted {
                attempts: request.max_attempts,
            };
            log::warn!("Skipping target {id_label} (radius {:.2}): {exhausted}", bounds.radius);
            return Ok(None);
        };

        let initial = self.config.motion.initial_orientation;
        let rotation = if initial.enabled {
            initial_orientation(&mut self.rng, &initial)
        } else {
            seed.rotation(EulerOrder::XYZ)
        };
        self.host.set_pose(handle, &Pose::new(seed.location, rotation))?;

        let bounds = BoundingSphere::new(seed.location, bounds.radius);
        self.state.register_placed(PlacedObject::from_sphere(handle, &bounds));
        self.state.record_target_placed();
        log::debug!("Placed {id_label} at {:?} after {} attempt(s)", seed.location, seed.attempts);

        Ok(Some(TargetInstance {
            handle,
            id_label: id_label.to_string(),
            shape,
            bounds,
        }))
    }

    fn perturb_scene(&mut self, objects: &SceneObjects) -> GeneratorResult<()> {
        let motion = self.config.motion.clone();
        if motion.target.enabled {
            for target in &objects.targets {
                self.perturb_object(target.handle, &motion.target)?;
            }
        }
        if motion.camera.enabled {
            if let Some(camera) = objects.camera {
                self.perturb_object(camera, &motion.camera)?;
            }
        }
        if motion.background.enabled {
            if let Some((background, _)) = &objects.background {
                self.perturb_object(*background, &motion.background)?;
            }
        }
        Ok(())
    }

    fn perturb_object(&mut self, handle: ObjectHandle, profile: &MotionProfile) -> GeneratorResult<()> {
        apply_perturbation(&mut self.host, handle, &mut self.rng, profile)?;
        Ok(())
    }

    fn capture_frame(
        &mut self,
        output: &Path,
        stem: &str,
        objects: &mut SceneObjects,
        renders: &mut Vec<PathBuf>,
        records: &mut Vec<PathBuf>,
    ) -> GeneratorResult<()> {
        let frame_path = output.join(format!("{stem}.png"));
        self.host.trigger_render(&frame_path)?;
        renders.push(frame_path);

        let overlay_stem = format!("{stem}b");
        let overlay_path = output.join(format!("{overlay_stem}.png"));
        self.render_overlays(&overlay_path, objects)?;
        renders.push(overlay_path);

        let snapshot = self.snapshot(objects)?;
        records.push(write_record(output, &overlay_stem, &serialize_frame(&snapshot))?);
        Ok(())
    }

    /// Render with a bounding-shape model laid over every target
    fn render_overlays(&mut self, output_path: &Path, objects: &mut SceneObjects) -> GeneratorResult<()> {
        let mut bound_models: Vec<(BoundingShape, Option<PathBuf>)> = Vec::new();

        for target in &objects.targets {
            let cached = bound_models
                .iter()
                .find(|(shape, _)| *shape == target.shape)
                .map(|(_, file)| file.clone());
            let file = match cached {
                Some(file) => file,
                None => {
                    let file = self.bound_model(target.shape)?;
                    bound_models.push((target.shape, file.clone()));
                    file
                }
            };
            let Some(file) = file else {
                continue;
            };

            let overlay = self.host.import_and_name(&file, &format!("bounds.{}", target.id_label))?;
            objects.overlays.push(overlay);
            let extents = self.host.query_extents(target.handle)?;
            self.host.set_pose(overlay, &extents.pose)?;
            self.host.set_dimensions(overlay, extents.size * OVERLAY_MARGIN)?;
        }

        self.host.trigger_render(output_path)?;

        for overlay in objects.overlays.drain(..) {
            if let Err(error) = self.host.delete_object(overlay) {
                log::warn!("Overlay cleanup: {error}");
            }
        }
        Ok(())
    }

    /// First bounding model tagged with `shape`, if any
    fn bound_model(&self, shape: BoundingShape) -> GeneratorResult<Option<PathBuf>> {
        let directory = &self.config.paths.bounds;
        let files = self.host.list_asset_files(directory, &BoundsFilter { shape })?;
        if files.is_empty() {
            let missing = GeneratorError::AssetNotFound {
                kind: AssetKind::Bounds,
                directory: directory.clone(),
            };
            log::warn!("No {shape} overlay: {missing}");
        }
        Ok(files.into_iter().next())
    }

    fn snapshot(&self, objects: &SceneObjects) -> Result<FrameSnapshot, HostError> {
        let camera = match objects.camera {
            Some(handle) => self.host.query_extents(handle)?.pose,
            None => Pose::default(),
        };
        let background = match &objects.background {
            Some((handle, file)) => BackgroundSnapshot {
                pose: self.host.query_extents(*handle)?.pose,
                file: file.to_string_lossy().into_owned(),
            },
            None => BackgroundSnapshot {
                pose: Pose::default(),
                file: String::new(),
            },
        };
        let targets = objects
            .targets
            .iter()
            .map(|target| -> Result<TargetSnapshot, HostError> {
                Ok(TargetSnapshot {
                    id: target.id_label.clone(),
                    pose: self.host.query_extents(target.handle)?.pose,
                })
            })
            .collect::<Result<Vec<_>, HostError>>()?;

        Ok(FrameSnapshot {
            camera,
            background,
            targets,
        })
    }

    fn discard(&mut self, handle: ObjectHandle) {
        if let Err(error) = self.host.delete_object(handle) {
            log::warn!("Discarding {handle:?}: {error}");
        }
    }

    fn teardown(&mut self, objects: &mut SceneObjects) {
        let handles = objects.drain();
        log::debug!("Tearing down {} object(s)", handles.len());
        for handle in handles {
            self.discard(handle);
        }
    }
}

/// Camera, background and targets
fn reference_handles(objects: &SceneObjects) -> Vec<ObjectHandle> {
    objects
        .camera
        .iter()
        .copied()
        .chain(objects.background.iter().map(|(handle, _)| *handle))
        .chain(objects.targets.iter().map(|target| target.handle))
        .collect()
}
