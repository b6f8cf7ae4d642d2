//! Homogeneous points, 4x4 matrices and bounding boxes.

pub mod bounds;
pub mod mat4;
pub mod point;

pub use bounds::Bounds;
pub use mat4::{Matrices, Matrix, IDENTITY};
pub use point::Point;
