//! Asset management system
//!
//! Directory scanning belongs to the host; this module decides which of the
//! listed files are eligible and which one a scene uses.

pub mod catalog;

pub use catalog::{
    AssetFilter, AssetSelection, BackgroundFilter, BoundingShape, BoundingShapes, BoundsFilter,
    ModelFilter, ModelFormats,
};
