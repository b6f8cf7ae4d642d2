//! Homogeneous 4-component points.
//!
//! [`Point`] stores `(x, y, z, w)`. The vector-style operations (add,
//! subtract, translate, scale, normalize, dot, cross) work on `x`, `y`, `z`
//! only and leave `w` untouched. Only [`Point::transform`] reads and writes
//! `w`.
//!
//! The in-place methods mutate `self` and return `&mut Self` for chaining.
//! `Point` is `Copy`, so branching state is just a copy:
//!
//! ```ignore
//! let a = Point::new(1.0, 2.0, 3.0);
//! let mut n = a;
//! n.subtract(Point::ZERO).normalize();
//! ```

use std::ops::{AddAssign, Mul, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq};

use super::mat4::Matrix;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Point {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a point with `w = 1`.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Copy every component, including `w`, from `p`.
    pub fn set(&mut self, p: Point) -> &mut Self {
        *self = p;
        self
    }

    pub fn add(&mut self, q: Point) -> &mut Self {
        self.x += q.x;
        self.y += q.y;
        self.z += q.z;
        self
    }

    pub fn subtract(&mut self, q: Point) -> &mut Self {
        self.x -= q.x;
        self.y -= q.y;
        self.z -= q.z;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.x += x;
        self.y += y;
        self.z += z;
        self
    }

    /// Scale `x`, `y`, `z` by `n`.
    pub fn multiply(&mut self, n: f32) -> &mut Self {
        self.x *= n;
        self.y *= n;
        self.z *= n;
        self
    }

    pub fn divide(&mut self, n: f32) -> &mut Self {
        self.x /= n;
        self.y /= n;
        self.z /= n;
        self
    }

    /// Round `x`, `y`, `z` to the nearest integer.
    pub fn round(&mut self) -> &mut Self {
        self.x = self.x.round();
        self.y = self.y.round();
        self.z = self.z.round();
        self
    }

    /// Divide by the magnitude. The zero vector becomes [`Point::Z`].
    pub fn normalize(&mut self) -> &mut Self {
        let n = self.magnitude();
        if n == 0.0 {
            self.set(Point::Z)
        } else {
            self.divide(n)
        }
    }

    /// Replace `self` with `self × q`. `w` is kept.
    pub fn cross(&mut self, q: Point) -> &mut Self {
        let (x, y, z) = (
            self.y * q.z - self.z * q.y,
            self.z * q.x - self.x * q.z,
            self.x * q.y - self.y * q.x,
        );
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Apply `matrix` to all four components: `self = M · self`.
    pub fn transform(&mut self, matrix: &Matrix) -> &mut Self {
        let m = matrix.values();
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.x = x * m[0] + y * m[1] + z * m[2] + w * m[3];
        self.y = x * m[4] + y * m[5] + z * m[6] + w * m[7];
        self.z = x * m[8] + y * m[9] + z * m[10] + w * m[11];
        self.w = x * m[12] + y * m[13] + z * m[14] + w * m[15];
        self
    }

    pub fn dot(&self, q: Point) -> f32 {
        self.x * q.x + self.y * q.y + self.z * q.z
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.dot(*self)
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector orthogonal to `self`.
    ///
    /// Crosses with the Z axis, falling back to the X axis when `self` is
    /// parallel to Z.
    pub fn perpendicular(&self) -> Point {
        let mut n = *self;
        n.cross(Point::Z);
        let mag = n.magnitude();
        if mag != 0.0 {
            n.divide(mag);
            return n;
        }
        let mut n = *self;
        n.cross(Point::X).normalize();
        n
    }

    /// Value form of [`Point::transform`].
    pub fn transformed(mut self, matrix: &Matrix) -> Point {
        self.transform(matrix);
        self
    }

    /// Value form of [`Point::normalize`].
    pub fn normalized(mut self) -> Point {
        self.normalize();
        self
    }

    /// True when `x`, `y`, `z` and `w` are all finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.add(rhs);
    }
}

impl SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.subtract(rhs);
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(mut self, rhs: Point) -> Self::Output {
        self.subtract(rhs);
        self
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(mut self, rhs: f32) -> Self::Output {
        self.multiply(rhs);
        self
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Self::Output {
        Point::with_w(-self.x, -self.y, -self.z, self.w)
    }
}

impl AbsDiffEq for Point {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.w.abs_diff_eq(&other.w, epsilon)
    }
}

impl RelativeEq for Point {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
            && self.w.relative_eq(&other.w, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn vector_ops_leave_w_alone() {
        let mut p = Point::with_w(1.0, 2.0, 3.0, 7.0);
        p.add(Point::with_w(1.0, 1.0, 1.0, 5.0))
            .subtract(Point::new(0.5, 0.5, 0.5))
            .translate(1.0, 0.0, 0.0)
            .multiply(2.0);
        assert_eq!(p, Point::with_w(5.0, 5.0, 7.0, 7.0));
    }

    #[test]
    fn normalize_has_unit_length() {
        for p in [
            Point::new(3.0, 4.0, 0.0),
            Point::new(-1.0, 2.0, -7.5),
            Point::new(0.001, 0.0, 0.0),
        ] {
            assert_relative_eq!(p.normalized().magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn normalize_zero_is_z_axis() {
        let mut p = Point::ZERO;
        p.normalize();
        assert_eq!(p, Point::Z);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let mut x = Point::X;
        x.cross(Point::Y);
        assert_eq!(x, Point::Z);
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        let p = Point::new(1.0, 2.0, 3.0);
        let n = p.perpendicular();
        assert_abs_diff_eq!(n.dot(p), 0.0, epsilon = 1e-5);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perpendicular_of_z_falls_back_to_x() {
        let n = Point::new(0.0, 0.0, 2.0).perpendicular();
        assert_abs_diff_eq!(n.dot(Point::Z), 0.0);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn transform_uses_w() {
        let mut m = Matrix::new();
        m.translate(1.0, 2.0, 3.0);
        let p = Point::new(1.0, 1.0, 1.0).transformed(&m);
        assert_eq!(p, Point::new(2.0, 3.0, 4.0));

        let direction = Point::with_w(1.0, 1.0, 1.0, 0.0).transformed(&m);
        assert_eq!(direction, Point::with_w(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn round_rounds_xyz() {
        let mut p = Point::with_w(1.4, 1.6, -0.6, 0.5);
        p.round();
        assert_eq!(p, Point::with_w(1.0, 2.0, -1.0, 0.5));
    }
}
