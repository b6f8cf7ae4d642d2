//! Cameras and viewports.
//!
//! Going from world space to the screen takes three steps:
//!
//! 1. The camera transform moves world space (surface points after all
//!    their model transforms) into camera space.
//! 2. The [`Projection`] adds perspective.
//! 3. The [`Viewport`] rescales to the output size.
//!
//! The viewport prescale runs before the projection so that shapes whose
//! coordinates match screen pixels in the z = 0 plane come out the same size
//! on screen.

use crate::math::Matrix;
use crate::projection::Projection;
use crate::transform::Transformable;

/// The camera transform plus its projection.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    transform: Matrix,
    pub projection: Projection,
}

impl Camera {
    pub fn new(projection: Projection) -> Self {
        Self {
            transform: Matrix::new(),
            projection,
        }
    }
}

impl Transformable for Camera {
    fn transform(&self) -> &Matrix {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Matrix {
        &mut self.transform
    }
}

/// A prescale applied before projection and a postscale applied after the
/// perspective divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub prescale: Matrix,
    pub postscale: Matrix,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::center(500.0, 500.0, 0.0, 0.0)
    }
}

impl Viewport {
    /// The scene origin lands in the middle of a `width` x `height` view
    /// whose top-left corner is at `(x, y)`.
    pub fn center(width: f32, height: f32, x: f32, y: f32) -> Self {
        let mut prescale = Matrix::new();
        prescale
            .translate(-x, -y, -height)
            .scale(1.0 / width, 1.0 / height, 1.0 / height);

        let mut postscale = Matrix::new();
        postscale
            .scale(width, -height, height)
            .translate(x + width / 2.0, y + height / 2.0, height);

        Self {
            prescale,
            postscale,
        }
    }

    /// The scene origin lands on `(x, y)`, the view's top-left corner.
    pub fn origin(width: f32, height: f32, x: f32, y: f32) -> Self {
        let mut prescale = Matrix::new();
        prescale
            .translate(-x, -y, -1.0)
            .scale(1.0 / width, 1.0 / height, 1.0 / height);

        let mut postscale = Matrix::new();
        postscale
            .scale(width, -height, height)
            .translate(x, y, 0.0);

        Self {
            prescale,
            postscale,
        }
    }
}
