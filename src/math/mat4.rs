//! 4x4 transformation matrix stored as 16 row-major values.
//!
//! # Convention
//! - Points are column vectors on the right: `M · p`
//! - Translation lives in values `3`, `7` and `11`
//! - Every composing operation (`rotate_*`, `translate`, `scale`, `multiply`)
//!   pre-multiplies: `self = op · self`. Calls therefore apply in the order
//!   they are written:
//!
//! ```ignore
//! let mut m = Matrix::new();
//! m.scale(2.0, 2.0, 2.0).translate(1.0, 0.0, 0.0); // scale first, then move
//! ```
//!
//! `reset()` returns to the baked snapshot (identity unless `bake()` was
//! called). Composition computes into a stack-local array, so nothing is
//! shared between matrices.

use approx::{AbsDiffEq, RelativeEq};

use super::point::Point;

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    m: [f32; 16],
    baked: [f32; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Matrix {
    /// The identity matrix.
    pub const fn new() -> Self {
        Self::from_values(IDENTITY)
    }

    /// A matrix with the given row-major values. The reset target is identity.
    pub const fn from_values(m: [f32; 16]) -> Self {
        Self { m, baked: IDENTITY }
    }

    #[inline]
    pub fn values(&self) -> &[f32; 16] {
        &self.m
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    /// Pre-multiply by the raw row-major `values`: `self = values · self`.
    pub fn matrix(&mut self, values: &[f32; 16]) -> &mut Self {
        let mut c = [0.0f32; 16];
        for j in 0..4 {
            for i in (0..16).step_by(4) {
                c[i + j] = values[i] * self.m[j]
                    + values[i + 1] * self.m[4 + j]
                    + values[i + 2] * self.m[8 + j]
                    + values[i + 3] * self.m[12 + j];
            }
        }
        self.m = c;
        self
    }

    /// Pre-multiply by `other`: `self = other · self`.
    pub fn multiply(&mut self, other: &Matrix) -> &mut Self {
        self.matrix(&other.m)
    }

    /// Restore the baked snapshot.
    pub fn reset(&mut self) -> &mut Self {
        self.m = self.baked;
        self
    }

    /// Make the current state the reset target.
    pub fn bake(&mut self) -> &mut Self {
        self.baked = self.m;
        self
    }

    /// Make `values` the reset target without changing the current state.
    pub fn bake_from(&mut self, values: [f32; 16]) -> &mut Self {
        self.baked = values;
        self
    }

    pub fn transpose(&mut self) -> &mut Self {
        let m = self.m;
        for row in 0..4 {
            for col in 0..4 {
                self.m[row * 4 + col] = m[col * 4 + row];
            }
        }
        self
    }

    /// Rotate about the X axis by `theta` radians.
    pub fn rotate_x(&mut self, theta: f32) -> &mut Self {
        let (st, ct) = theta.sin_cos();
        self.matrix(&[
            1.0, 0.0, 0.0, 0.0, //
            0.0, ct, -st, 0.0, //
            0.0, st, ct, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotate about the Y axis by `theta` radians.
    pub fn rotate_y(&mut self, theta: f32) -> &mut Self {
        let (st, ct) = theta.sin_cos();
        self.matrix(&[
            ct, 0.0, st, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -st, 0.0, ct, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotate about the Z axis by `theta` radians.
    pub fn rotate_z(&mut self, theta: f32) -> &mut Self {
        let (st, ct) = theta.sin_cos();
        self.matrix(&[
            ct, -st, 0.0, 0.0, //
            st, ct, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotate by `theta` radians about `axis` (need not be normalized).
    pub fn rotate_axis(&mut self, axis: Point, theta: f32) -> &mut Self {
        let a = axis.normalized();
        let (s, c) = theta.sin_cos();
        let t = 1.0 - c;
        self.matrix(&[
            t * a.x * a.x + c,
            t * a.x * a.y - s * a.z,
            t * a.x * a.z + s * a.y,
            0.0,
            t * a.x * a.y + s * a.z,
            t * a.y * a.y + c,
            t * a.y * a.z - s * a.x,
            0.0,
            t * a.x * a.z - s * a.y,
            t * a.y * a.z + s * a.x,
            t * a.z * a.z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix(&[
            1.0, 0.0, 0.0, x, //
            0.0, 1.0, 0.0, y, //
            0.0, 0.0, 1.0, z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.matrix(&[
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale(s, s, s)
    }
}

/// A few useful matrices.
pub struct Matrices;

impl Matrices {
    pub fn identity() -> Matrix {
        Matrix::new()
    }

    pub fn flip_x() -> Matrix {
        *Matrix::new().scale(-1.0, 1.0, 1.0)
    }

    pub fn flip_y() -> Matrix {
        *Matrix::new().scale(1.0, -1.0, 1.0)
    }

    pub fn flip_z() -> Matrix {
        *Matrix::new().scale(1.0, 1.0, -1.0)
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
