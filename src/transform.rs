//! Transform component for scene-graph objects.
//!
//! Shapes, models, lights and cameras each embed a [`Matrix`] and expose it
//! through [`Transformable`]. The trait provides a fluent API where mutating
//! methods return `&mut Self` for chaining:
//!
//! ```ignore
//! shape
//!     .scale_uniform(50.0)
//!     .rotate_y(0.1)
//!     .translate(0.0, 20.0, 0.0);
//! ```
//!
//! Operations compose in call order (see [`Matrix`]). Resetting is useful for
//! animation: instead of accumulating per-frame deltas, `reset()` and apply
//! the absolute value for the current time step.

use crate::math::{Matrix, Point};

pub trait Transformable {
    /// The local transform.
    fn transform(&self) -> &Matrix;

    /// Mutable access to the local transform.
    fn transform_mut(&mut self) -> &mut Matrix;

    // ============ Rotation ============

    /// Rotate around the X axis (radians).
    fn rotate_x(&mut self, theta: f32) -> &mut Self {
        self.transform_mut().rotate_x(theta);
        self
    }

    /// Rotate around the Y axis (radians).
    fn rotate_y(&mut self, theta: f32) -> &mut Self {
        self.transform_mut().rotate_y(theta);
        self
    }

    /// Rotate around the Z axis (radians).
    fn rotate_z(&mut self, theta: f32) -> &mut Self {
        self.transform_mut().rotate_z(theta);
        self
    }

    /// Rotate around an arbitrary axis (radians).
    fn rotate_axis(&mut self, axis: Point, theta: f32) -> &mut Self {
        self.transform_mut().rotate_axis(axis, theta);
        self
    }

    // ============ Translation / Scale ============

    fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.transform_mut().translate(x, y, z);
        self
    }

    fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.transform_mut().scale(sx, sy, sz);
        self
    }

    fn scale_uniform(&mut self, s: f32) -> &mut Self {
        self.transform_mut().scale_uniform(s);
        self
    }

    /// Compose an arbitrary matrix onto the local transform.
    fn apply(&mut self, m: &Matrix) -> &mut Self {
        self.transform_mut().multiply(m);
        self
    }

    // ============ Reset ============

    /// Return to the baked transform (identity unless baked).
    fn reset(&mut self) -> &mut Self {
        self.transform_mut().reset();
        self
    }

    /// Make the current transform the reset target.
    fn bake(&mut self) -> &mut Self {
        self.transform_mut().bake();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Node {
        m: Matrix,
    }

    impl Transformable for Node {
        fn transform(&self) -> &Matrix {
            &self.m
        }

        fn transform_mut(&mut self) -> &mut Matrix {
            &mut self.m
        }
    }

    #[test]
    fn fluent_api_composes_in_order() {
        let mut node = Node::default();
        node.scale_uniform(2.0).translate(1.0, 2.0, 3.0);

        let p = Point::new(1.0, 1.0, 1.0).transformed(node.transform());
        assert_relative_eq!(p, Point::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn bake_then_reset() {
        let mut node = Node::default();
        node.translate(5.0, 0.0, 0.0).bake().rotate_y(1.0).reset();
        assert_eq!(node.transform().get(0, 3), 5.0);
        assert_eq!(node.transform().get(0, 0), 1.0);
    }

    #[test]
    fn default_is_identity() {
        let node = Node::default();
        assert_eq!(*node.transform(), Matrix::new());
    }
}
