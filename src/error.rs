//! Error types.
//!
//! The render pipeline itself never fails; these errors come from the edges
//! (geometry import, color parsing, writing output) and from opt-in
//! validation of scene geometry.

use thiserror::Error;

use crate::surface::SurfaceId;

#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse a Wavefront OBJ source
    #[error("OBJ load failed: {0}")]
    ObjLoad(#[from] tobj::LoadError),

    /// Unrecognized color string
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A surface contains a non-finite coordinate
    #[error("surface {surface} has a non-finite coordinate at point {index}")]
    MalformedGeometry { surface: SurfaceId, index: usize },

    /// Failed to encode or write a raster image
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;
