//! Per-surface render data.
//!
//! A [`RenderModel`] holds the transformed and projected points of one
//! [`Surface`] plus everything needed to shade and paint it. Buffers are
//! reused between frames, and each update compares the incoming transform,
//! projection and viewport against the cached ones so an unchanged surface
//! costs three array comparisons.
//!
//! To force a recomputation, mark the surface dirty.

use crate::color::Color;
use crate::math::{Bounds, Matrix, Point};
use crate::surface::{Surface, SurfaceId, SurfaceStyle};

use super::painter::Painter;

/// Normal used when a surface has too few points to define one.
const DEFAULT_NORMAL: Point = Point::Z;

/// Camera-space z at or below which a surface is treated as outside the
/// frustum (behind the near plane of the default projection).
const NEAR_PLANE_Z: f32 = -2.0;

/// Derived geometry for one coordinate space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderData {
    pub points: Vec<Point>,
    pub bounds: Bounds,
    /// Mean of the points.
    pub barycenter: Point,
    /// Unit face normal from the first two edges out of point 0.
    pub normal: Point,
}

impl RenderData {
    /// Recompute from `points` under `transform`, optionally dividing each
    /// point by its own `w`.
    fn compute<'a>(
        &mut self,
        points: impl IntoIterator<Item = &'a Point>,
        transform: &Matrix,
        perspective_divide: bool,
    ) {
        self.points.clear();
        self.points.extend(points.into_iter().map(|p| {
            let mut q = p.transformed(transform);
            if perspective_divide {
                q.divide(q.w);
            }
            q
        }));

        let mut barycenter = Point::ZERO;
        for p in &self.points {
            barycenter.add(*p);
        }
        if !self.points.is_empty() {
            barycenter.divide(self.points.len() as f32);
        }
        self.barycenter = barycenter;

        self.bounds = Bounds::points(&self.points);

        self.normal = match self.points.as_slice() {
            [first, second, .., last] => {
                let mut v0 = *second - *first;
                v0.cross(*last - *first).normalize();
                v0
            }
            _ => DEFAULT_NORMAL,
        };
    }
}

#[derive(Debug, Clone)]
pub struct RenderModel {
    surface_id: SurfaceId,
    /// After the accumulated model transform (world space). Shading uses
    /// this space.
    pub transformed: RenderData,
    /// After projection, perspective divide and viewport (screen space).
    pub projected: RenderData,
    in_frustum: bool,
    /// Shaded fill, or `None` when the surface has no fill material.
    pub fill: Option<Color>,
    /// Shaded stroke, or `None` when the surface has no stroke material.
    pub stroke: Option<Color>,
    pub painter: Painter,
    pub style: SurfaceStyle,
    pub text: Option<String>,
    transform: [f32; 16],
    projection: [f32; 16],
    viewport: [f32; 16],
    camera_space: Vec<Point>,
    computations: u64,
}

impl RenderModel {
    /// Build and compute the render model for `surface`. Clears the
    /// surface's dirty flag.
    pub fn new(
        surface: &mut Surface,
        transform: &Matrix,
        projection: &Matrix,
        viewport: &Matrix,
    ) -> Self {
        let mut model = Self {
            surface_id: surface.id(),
            transformed: RenderData::default(),
            projected: RenderData::default(),
            in_frustum: true,
            fill: None,
            stroke: None,
            painter: surface.painter,
            style: surface.style.clone(),
            text: surface.text.clone(),
            transform: *transform.values(),
            projection: *projection.values(),
            viewport: *viewport.values(),
            camera_space: Vec::with_capacity(surface.points().len()),
            computations: 0,
        };
        model.recompute(surface);
        model
    }

    /// Bring the model up to date. Skips all geometry work when the surface
    /// is clean and the three matrices equal the cached ones. Returns whether
    /// the geometry was recomputed.
    pub fn update(
        &mut self,
        surface: &mut Surface,
        transform: &Matrix,
        projection: &Matrix,
        viewport: &Matrix,
    ) -> bool {
        self.sync_paint_info(surface);

        if !surface.is_dirty()
            && transform.values() == &self.transform
            && projection.values() == &self.projection
            && viewport.values() == &self.viewport
        {
            return false;
        }

        self.transform = *transform.values();
        self.projection = *projection.values();
        self.viewport = *viewport.values();
        self.recompute(surface);
        true
    }

    fn recompute(&mut self, surface: &mut Surface) {
        let transform = Matrix::from_values(self.transform);
        let projection = Matrix::from_values(self.projection);
        let viewport = Matrix::from_values(self.viewport);

        self.transformed.compute(surface.points(), &transform, false);

        self.camera_space.clear();
        self.camera_space.extend(
            self.transformed
                .points
                .iter()
                .map(|p| p.transformed(&projection)),
        );
        self.in_frustum = self.camera_space.iter().all(|p| p.z > NEAR_PLANE_Z);

        self.projected.compute(&self.camera_space, &viewport, true);

        surface.clear_dirty();
        self.computations += 1;
    }

    fn sync_paint_info(&mut self, surface: &Surface) {
        self.painter = surface.painter;
        if self.style != surface.style {
            self.style = surface.style.clone();
        }
        if self.text != surface.text {
            self.text = surface.text.clone();
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// False when any camera-space point lies behind the near plane.
    pub fn in_frustum(&self) -> bool {
        self.in_frustum
    }

    /// How many times the geometry has been computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Round projected points to whole pixels.
    pub fn round_projected(&mut self) {
        for p in &mut self.projected.points {
            p.round();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: f32) -> Surface {
        Surface::new(vec![
            Point::new(0.0, 0.0, z),
            Point::new(2.0, 0.0, z),
            Point::new(2.0, 2.0, z),
            Point::new(0.0, 2.0, z),
        ])
    }

    fn identity_model(surface: &mut Surface) -> RenderModel {
        let id = Matrix::new();
        RenderModel::new(surface, &id, &id, &id)
    }

    #[test]
    fn computes_barycenter_bounds_and_normal() {
        let mut s = square(1.0);
        let model = identity_model(&mut s);
        assert_relative_eq!(model.transformed.barycenter, Point::new(1.0, 1.0, 1.0));
        assert_relative_eq!(model.transformed.normal, Point::Z, epsilon = 1e-6);
        assert!(model.transformed.bounds.contains(Point::new(2.0, 2.0, 1.0)));
        assert!(model.in_frustum());
        assert!(!s.is_dirty());
    }

    #[test]
    fn degenerate_surface_uses_default_normal() {
        let mut s = Surface::new(vec![Point::new(3.0, 4.0, 5.0)]);
        let model = identity_model(&mut s);
        assert_eq!(model.transformed.normal, Point::Z);
        assert_eq!(model.projected.normal, Point::Z);
    }

    #[test]
    fn update_is_idempotent() {
        let mut s = square(0.0);
        let m = Matrix::new();
        let mut model = RenderModel::new(&mut s, &m, &m, &m);
        assert_eq!(model.computations(), 1);

        assert!(!model.update(&mut s, &m, &m, &m));
        assert!(!model.update(&mut s, &m, &m, &m));
        assert_eq!(model.computations(), 1);
    }

    #[test]
    fn update_recomputes_on_change_or_dirty() {
        let mut s = square(0.0);
        let m = Matrix::new();
        let mut model = RenderModel::new(&mut s, &m, &m, &m);

        let mut moved = Matrix::new();
        moved.translate(1.0, 0.0, 0.0);
        assert!(model.update(&mut s, &moved, &m, &m));
        assert_relative_eq!(model.transformed.barycenter.x, 2.0);

        s.mark_dirty();
        assert!(model.update(&mut s, &moved, &m, &m));
        assert_eq!(model.computations(), 3);
    }

    #[test]
    fn baked_state_does_not_force_recompute() {
        let mut s = square(0.0);
        let m = Matrix::new();
        let mut model = RenderModel::new(&mut s, &m, &m, &m);
        let mut same = Matrix::new();
        same.bake_from(*Matrix::from_values([2.0; 16]).values());
        assert!(!model.update(&mut s, &same, &m, &m));
    }

    #[test]
    fn behind_near_plane_is_out_of_frustum() {
        let mut s = square(-2.0);
        let model = identity_model(&mut s);
        assert!(!model.in_frustum());

        let mut s = square(-1.5);
        assert!(identity_model(&mut s).in_frustum());
    }

    #[test]
    fn projected_points_are_divided_by_w() {
        let mut s = Surface::new(vec![Point::with_w(4.0, 2.0, 6.0, 2.0)]);
        let model = identity_model(&mut s);
        assert_eq!(model.projected.points[0], Point::with_w(2.0, 1.0, 3.0, 2.0));
    }

    #[test]
    fn round_projected_snaps_to_pixels() {
        let mut s = Surface::new(vec![Point::new(0.4, 1.6, 0.0)]);
        let mut model = identity_model(&mut s);
        model.round_projected();
        assert_eq!(model.projected.points[0].x, 0.0);
        assert_eq!(model.projected.points[0].y, 2.0);
    }
}
