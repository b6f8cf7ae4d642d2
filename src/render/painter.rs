//! Surface painters.
//!
//! A painter turns a shaded [`RenderModel`] into drawing primitives on a
//! [`PaintSurface`]. Output targets (SVG documents, raster images) implement
//! [`PaintSurface`]; painters decide which primitives a surface becomes.
//!
//! Available painters:
//! - [`PathPainter`]: a closed, filled and/or stroked polygon
//! - [`TextPainter`]: text under an affine estimate of the projection

use crate::color::Color;
use crate::math::Point;

use super::model::RenderModel;

/// Stroke width used when a surface does not set one.
pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;

/// Text anchor used when a surface does not set one.
pub const DEFAULT_TEXT_ANCHOR: &str = "middle";

/// Fill and stroke of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub fill: Option<Color>,
    pub font: Option<&'a str>,
    pub anchor: &'a str,
}

/// A drawing target. Receives one `reset`, any number of draw calls and one
/// `cleanup` per layer per frame.
pub trait PaintSurface {
    /// Prepare for a new frame.
    fn reset(&mut self) {}

    /// Draw a closed polygon through `points` (screen space).
    fn draw_polygon(&mut self, points: &[Point], style: &PathStyle);

    /// Draw `text` at the origin of `transform`.
    fn draw_text(&mut self, transform: &Affine, text: &str, style: &TextStyle<'_>);

    /// Fill a `width` x `height` rectangle at the origin.
    fn draw_rect(&mut self, width: f32, height: f32, fill: Color);

    /// Finish the frame.
    fn cleanup(&mut self) {}
}

/// A 2D affine transform `[a, b, c, d, e, f]`:
///
/// ```text
/// x' = a*x + b*y + c
/// y' = d*x + e*y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m: [f32; 6],
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Length of the basis vectors returned by [`Affine::orthonormal_basis`].
    pub const BASIS_SIZE: f32 = 20.0;

    /// The origin and the tips of the x and y basis vectors. Text surfaces
    /// carry these as their points so projection reveals the transform.
    pub fn orthonormal_basis() -> [Point; 3] {
        [
            Point::ZERO,
            Point::new(Self::BASIS_SIZE, 0.0, 0.0),
            Point::new(0.0, Self::BASIS_SIZE, 0.0),
        ]
    }

    /// Solve for the affine transform mapping the orthonormal basis onto
    /// `projected`, the same three points after projection. Returns `None`
    /// with fewer than three points.
    pub fn solve_for_basis(projected: &[Point]) -> Option<Self> {
        let [p0, p1, p2] = match projected {
            [p0, p1, p2, ..] => [*p0, *p1, *p2],
            _ => return None,
        };
        let s = Self::BASIS_SIZE;
        Some(Self {
            m: [
                (p1.x - p0.x) / s,
                (p2.x - p0.x) / s,
                p0.x,
                (p1.y - p0.y) / s,
                (p2.y - p0.y) / s,
                p0.y,
            ],
        })
    }

    /// The CSS/SVG `matrix(a, b, c, d, e, f)` arguments for drawing text.
    ///
    /// Text is laid out with y growing downward while the basis has y up, so
    /// the y column is negated.
    pub fn text_matrix(&self) -> [f32; 6] {
        let [a, b, c, d, e, f] = self.m;
        [a, d, -b, -e, c, f]
    }

    /// Apply to a 2D point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.m;
        (a * x + b * y + c, d * x + e * y + f)
    }
}

/// Trait for painting one render model.
pub trait Paint {
    fn paint(&self, model: &RenderModel, target: &mut dyn PaintSurface);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PathPainter;

impl Paint for PathPainter {
    fn paint(&self, model: &RenderModel, target: &mut dyn PaintSurface) {
        if model.fill.is_none() && model.stroke.is_none() {
            return;
        }
        target.draw_polygon(
            &model.projected.points,
            &PathStyle {
                fill: model.fill,
                stroke: model.stroke,
                stroke_width: model.style.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
            },
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextPainter;

impl Paint for TextPainter {
    fn paint(&self, model: &RenderModel, target: &mut dyn PaintSurface) {
        let Some(text) = model.text.as_deref() else {
            return;
        };
        let Some(transform) = Affine::solve_for_basis(&model.projected.points) else {
            return;
        };
        target.draw_text(
            &transform,
            text,
            &TextStyle {
                fill: model.fill,
                font: model.style.font.as_deref(),
                anchor: model
                    .style
                    .text_anchor
                    .as_deref()
                    .unwrap_or(DEFAULT_TEXT_ANCHOR),
            },
        );
    }
}

/// Available painters. Each surface names the one that draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Painter {
    #[default]
    Path,
    Text,
}

impl std::fmt::Display for Painter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Painter::Path => write!(f, "Path"),
            Painter::Text => write!(f, "Text"),
        }
    }
}

impl Paint for Painter {
    #[inline]
    fn paint(&self, model: &RenderModel, target: &mut dyn PaintSurface) {
        match self {
            Painter::Path => PathPainter.paint(model, target),
            Painter::Text => TextPainter.paint(model, target),
        }
    }
}
