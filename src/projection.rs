//! Projection parameters.
//!
//! A [`Projection`] stores the frustum it was built from and generates the
//! 3D to 2D projection [`Matrix`]. Every projection assumes the camera sits
//! at the origin looking down the negative z axis.

use crate::math::Matrix;

/// Bounds of a viewing frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    fn extents(&self) -> (f32, f32, f32) {
        (
            self.right - self.left,
            self.top - self.bottom,
            self.far - self.near,
        )
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective(Frustum),
    Orthographic(Frustum),
    /// A caller-supplied matrix.
    Custom(Matrix),
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective(Frustum::default())
    }
}

impl Projection {
    /// A perspective projection with the given frustum.
    pub fn perspective(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Projection::Perspective(Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        })
    }

    /// A symmetric perspective projection from a vertical field of view.
    ///
    /// # Arguments
    /// * `fovy_degrees` - Vertical field of view in degrees
    /// * `front` - Near plane distance; the far plane sits at `2 * front`
    pub fn perspective_fov(fovy_degrees: f32, front: f32) -> Self {
        let tan = front * (fovy_degrees.to_radians() / 2.0).tan();
        Self::perspective(-tan, tan, -tan, tan, front, 2.0 * front)
    }

    /// An orthographic projection with the given frustum.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Projection::Orthographic(Frustum {
            left,
            right,
            bottom,
            top,
            near,
            far,
        })
    }

    /// The frustum, unless this is a custom matrix.
    pub fn frustum(&self) -> Option<&Frustum> {
        match self {
            Projection::Perspective(f) | Projection::Orthographic(f) => Some(f),
            Projection::Custom(_) => None,
        }
    }

    /// Generates the projection matrix.
    pub fn matrix(&self) -> Matrix {
        match self {
            Projection::Perspective(f) => {
                let (dx, dy, dz) = f.extents();
                let near2 = 2.0 * f.near;
                #[rustfmt::skip]
                let m = [
                    near2 / dx, 0.0,        (f.right + f.left) / dx, 0.0,
                    0.0,        near2 / dy, (f.top + f.bottom) / dy, 0.0,
                    0.0,        0.0,        -(f.far + f.near) / dz,  -(f.far * near2) / dz,
                    0.0,        0.0,        -1.0,                    0.0,
                ];
                Matrix::from_values(m)
            }
            Projection::Orthographic(f) => {
                let (dx, dy, dz) = f.extents();
                #[rustfmt::skip]
                let m = [
                    2.0 / dx, 0.0,      0.0,       (f.right + f.left) / dx,
                    0.0,      2.0 / dy, 0.0,       -(f.top + f.bottom) / dy,
                    0.0,      0.0,      -2.0 / dz, -(f.far + f.near) / dz,
                    0.0,      0.0,      0.0,       1.0,
                ];
                Matrix::from_values(m)
            }
            Projection::Custom(m) => *m,
        }
    }
}
