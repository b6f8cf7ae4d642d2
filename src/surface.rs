//! Surfaces and shapes.
//!
//! A [`Surface`] is a planar polygon in 3D space. It does not need to be
//! convex but should be non-degenerate; holes are not supported. A [`Shape`]
//! groups surfaces under one local transform.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::math::{Matrix, Point};
use crate::model::NodeId;
use crate::render::Painter;
use crate::transform::Transformable;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a surface. Keys the scene's render model cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Paint attributes that are not colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceStyle {
    /// Stroke width; painters use 1 when unset.
    pub stroke_width: Option<f32>,
    /// CSS font for text surfaces.
    pub font: Option<String>,
    /// `start`, `middle` or `end`; painters use `middle` when unset.
    pub text_anchor: Option<String>,
}

#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    points: Vec<Point>,
    /// When false, this surface is drawn even when facing away from the
    /// camera (useful for transparent materials).
    pub cull_backfaces: bool,
    pub fill_material: Option<Material>,
    pub stroke_material: Option<Material>,
    pub painter: Painter,
    pub style: SurfaceStyle,
    /// Text drawn by [`Painter::Text`].
    pub text: Option<String>,
    dirty: bool,
}

impl Clone for Surface {
    /// The clone is a distinct surface with its own identity.
    fn clone(&self) -> Self {
        Self {
            id: SurfaceId::next(),
            points: self.points.clone(),
            cull_backfaces: self.cull_backfaces,
            fill_material: self.fill_material,
            stroke_material: self.stroke_material,
            painter: self.painter,
            style: self.style.clone(),
            text: self.text.clone(),
            dirty: true,
        }
    }
}

impl Surface {
    /// A path surface with a gray fill and no stroke.
    pub fn new(points: Vec<Point>) -> Self {
        Self::with_painter(points, Painter::Path)
    }

    pub fn with_painter(points: Vec<Point>, painter: Painter) -> Self {
        Self {
            id: SurfaceId::next(),
            points,
            cull_backfaces: true,
            fill_material: Some(Material::default()),
            stroke_material: None,
            painter,
            style: SurfaceStyle::default(),
            text: None,
            dirty: true,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access to the points. Marks the surface dirty.
    pub fn points_mut(&mut self) -> &mut Vec<Point> {
        self.dirty = true;
        &mut self.points
    }

    /// Force the next render to recompute this surface's geometry.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn fill(&mut self, fill: impl Into<Material>) -> &mut Self {
        self.fill_material = Some(fill.into());
        self
    }

    pub fn stroke(&mut self, stroke: impl Into<Material>) -> &mut Self {
        self.stroke_material = Some(stroke.into());
        self
    }

    pub fn no_fill(&mut self) -> &mut Self {
        self.fill_material = None;
        self
    }

    pub fn no_stroke(&mut self) -> &mut Self {
        self.stroke_material = None;
        self
    }

    /// Report the first non-finite coordinate, if any.
    ///
    /// Surfaces with fewer than three points are accepted (they shade with a
    /// default normal) but logged.
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(Error::MalformedGeometry {
                surface: self.id,
                index,
            });
        }
        if self.points.len() < 3 {
            warn!(surface = %self.id, points = self.points.len(), "degenerate surface");
        }
        Ok(())
    }
}

/// A named collection of surfaces sharing a local transform.
///
/// Shapes may be closed solids (a cube) or open (a patch).
#[derive(Debug, Clone)]
pub struct Shape {
    id: NodeId,
    name: String,
    surfaces: Vec<Surface>,
    transform: Matrix,
}

impl Shape {
    pub fn new(name: impl Into<String>, surfaces: Vec<Surface>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            surfaces,
            transform: Matrix::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut [Surface] {
        &mut self.surfaces
    }

    pub fn add_surface(&mut self, surface: Surface) -> &mut Self {
        self.surfaces.push(surface);
        self
    }

    pub fn each_surface(&mut self, mut f: impl FnMut(&mut Surface)) -> &mut Self {
        for surface in &mut self.surfaces {
            f(surface);
        }
        self
    }

    /// Apply `fill` to every surface.
    pub fn fill(&mut self, fill: impl Into<Material>) -> &mut Self {
        let fill = fill.into();
        self.each_surface(|s| {
            s.fill(fill);
        })
    }

    /// Apply `stroke` to every surface.
    pub fn stroke(&mut self, stroke: impl Into<Material>) -> &mut Self {
        let stroke = stroke.into();
        self.each_surface(|s| {
            s.stroke(stroke);
        })
    }

    /// Give each surface its own hue, starting at `start_hue` and advancing
    /// by `drift` per surface.
    pub fn fill_hue_drift(&mut self, start_hue: f32, drift: f32) -> &mut Self {
        let mut hue = start_hue;
        self.each_surface(|s| {
            s.fill(Color::hsl(hue.rem_euclid(1.0), 0.5, 0.4));
            hue += drift;
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.surfaces.iter().try_for_each(Surface::validate)
    }
}

impl Transformable for Shape {
    fn transform(&self) -> &Matrix {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Matrix {
        &mut self.transform
    }
}
