//! Generator-level errors

use crate::config::ConfigError;
use crate::ground_truth::GroundTruthError;
use crate::host::HostError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Asset database an asset lookup ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Target models
    Model,
    /// Background images
    Background,
    /// Bounding-shape overlay models
    Bounds,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Model => "model",
            AssetKind::Background => "background",
            AssetKind::Bounds => "bounding-shape model",
        })
    }
}

/// Scene generation errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// No file in the directory passes the active filters
    #[error("no {kind} matches the active filters in {directory}")]
    AssetNotFound {
        /// Database that was searched
        kind: AssetKind,
        /// Directory that was listed
        directory: PathBuf,
    },

    /// The sampler used its whole attempt budget
    #[error("no free placement found in {attempts} attempts")]
    PlacementExhausted {
        /// Attempts used
        attempts: u32,
    },

    /// Ground-truth output failed
    #[error("Ground truth error: {0}")]
    GroundTruth(#[from] GroundTruthError),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A host call failed
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

impl GeneratorError {
    /// Whether the error stops the whole batch rather than one iteration
    ///
    /// Missing target models or backgrounds make every further iteration fail
    /// the same way, as does an invalid configuration.
    pub fn halts_batch(&self) -> bool {
        match self {
            GeneratorError::AssetNotFound { kind, .. } => *kind != AssetKind::Bounds,
            GeneratorError::Config(_) => true,
            GeneratorError::PlacementExhausted { .. } | GeneratorError::GroundTruth(_) | GeneratorError::Host(_) => false,
        }
    }
}

/// Result alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_level_errors_halt() {
        let no_models = GeneratorError::AssetNotFound {
            kind: AssetKind::Model,
            directory: PathBuf::from("assets/models"),
        };
        assert!(no_models.halts_batch());
        assert_eq!(no_models.to_string(), "no model matches the active filters in assets/models");

        let no_bounds = GeneratorError::AssetNotFound {
            kind: AssetKind::Bounds,
            directory: PathBuf::from("assets/bounds"),
        };
        assert!(!no_bounds.halts_batch());

        assert!(GeneratorError::from(ConfigError::Invalid("bad".into())).halts_batch());
        assert!(!GeneratorError::PlacementExhausted { attempts: 100 }.halts_batch());

        let io = GroundTruthError::Io {
            path: PathBuf::from("out/img_0.c.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!GeneratorError::from(io).halts_batch());
    }
}
