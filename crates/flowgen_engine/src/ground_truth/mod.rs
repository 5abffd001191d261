//! # Ground-Truth Serializer
//!
//! Text records written next to every render pair:
//!
//! - a per-frame record with absolute pose, delta pose and camera-relative
//!   locations of the background, the camera and every target
//! - a per-scene record of the full configuration and the achieved target count
//!
//! All scalars use fixed two-decimal formatting.

pub mod format;
pub mod frame;
pub mod scene_config;

pub use frame::{serialize_frame, BackgroundSnapshot, FrameSnapshot, TargetSnapshot};
pub use scene_config::serialize_scene_config;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Record output failures
#[derive(Error, Debug)]
pub enum GroundTruthError {
    /// A file operation in the output directory failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Make `directory` an empty output directory
///
/// Creates it when missing and removes the files it holds. Sub-directories
/// are left alone. Returns the number of files removed.
pub fn prepare_output_dir(directory: &Path) -> Result<usize, GroundTruthError> {
    std::fs::create_dir_all(directory).map_err(io_error(directory))?;

    let mut removed = 0;
    for entry in std::fs::read_dir(directory).map_err(io_error(directory))? {
        let path = entry.map_err(io_error(directory))?.path();
        if path.is_file() {
            std::fs::remove_file(&path).map_err(io_error(&path))?;
            removed += 1;
        }
    }

    if removed > 0 {
        log::info!("Removed {removed} stale file(s) from {}", directory.display());
    }
    Ok(removed)
}

/// Write `<directory>/<file_stem>.txt`
///
/// The directory must already exist; it is never created here.
pub fn write_record(directory: &Path, file_stem: &str, text: &str) -> Result<PathBuf, GroundTruthError> {
    let path = directory.join(format!("{file_stem}.txt"));
    std::fs::write(&path, text).map_err(io_error(&path))?;
    log::debug!("Wrote ground truth {}", path.display());
    Ok(path)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GroundTruthError {
    let path = path.to_path_buf();
    move |source| GroundTruthError::Io { path, source }
}
