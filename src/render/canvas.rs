//! Raster output.
//!
//! [`RasterCanvas`] paints into an [`image::RgbaImage`]. Polygons are filled
//! with an even-odd scanline fill sampled at pixel centers and blended with
//! the fill's alpha; strokes are Bresenham lines, clipped to the canvas
//! first. Text is not rasterized.

use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::color::Color;
use crate::error::Result;
use crate::math::Point;

use super::painter::{Affine, PaintSurface, PathStyle, TextStyle};

pub struct RasterCanvas {
    image: RgbaImage,
    clear_color: Color,
}

impl RasterCanvas {
    /// A transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            clear_color: Color::rgba(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Color the canvas is cleared to on reset.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the canvas to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    pub fn clear(&mut self, color: Color) {
        let px = Rgba(color.to_rgba8());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    /// Source-over blend of `color` onto one pixel. Out-of-bounds writes are
    /// ignored.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let alpha = color.opacity();
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let [dr, dg, db, da] = dst.0;
        let da = f32::from(da) / 255.0;
        let out_a = alpha + da * (1.0 - alpha);
        let mix = |s: f32, d: u8| {
            if out_a <= 0.0 {
                return 0;
            }
            let v = (s * alpha + f32::from(d) * da * (1.0 - alpha)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        dst.0 = [
            mix(color.r, dr),
            mix(color.g, dg),
            mix(color.b, db),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ];
    }

    /// Fill the pixels whose centers lie inside the polygon, even-odd rule.
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y_start = (min_y.floor() as i32).max(0);
        let y_end = (max_y.ceil() as i32).min(self.height() as i32);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_start..y_end {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = &points[(i + 1) % points.len()];
                // Half-open so shared vertices count once.
                if (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                // Pixels whose centers fall in [span[0], span[1]).
                let x_start = (span[0] - 0.5).ceil() as i32;
                let x_end = (span[1] - 0.5).ceil() as i32;
                for x in x_start.max(0)..x_end.min(self.width() as i32) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// Tracks an error term for the distance between the ideal line and the
    /// current pixel, stepping along the minor axis when it crosses the
    /// threshold.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, width: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let x_step = if x0 < x1 { 1 } else { -1 };
        let y_step = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        let half = (width - 1) / 2;

        loop {
            for oy in -half..width - half {
                for ox in -half..width - half {
                    self.blend_pixel(x + ox, y + oy, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_step;
            }
            if e2 < dx {
                err += dx;
                y += y_step;
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, width: f32) {
        let width = width.round().max(1.0) as i32;
        // A brush width of slack keeps wide strokes along the edges.
        let margin = f64::from(width);
        let min = (-margin, -margin);
        let max = (
            f64::from(self.width()) + margin,
            f64::from(self.height()) + margin,
        );
        for (i, a) in points.iter().enumerate() {
            let b = &points[(i + 1) % points.len()];
            let a = (f64::from(a.x), f64::from(a.y));
            let b = (f64::from(b.x), f64::from(b.y));
            let Some(((x0, y0), (x1, y1))) = clip_segment(a, b, min, max) else {
                continue;
            };
            self.draw_line(
                x0.round() as i32,
                y0.round() as i32,
                x1.round() as i32,
                y1.round() as i32,
                color,
                width,
            );
        }
    }
}

/// Liang-Barsky clipping of the segment `a`-`b` to the rectangle `min`-`max`.
///
/// Runs in f64 so that endpoints far off screen keep their precision.
/// Returns `None` when the segment misses the rectangle or has a non-finite
/// coordinate.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

impl PaintSurface for RasterCanvas {
    fn reset(&mut self) {
        self.clear(self.clear_color);
    }

    fn draw_polygon(&mut self, points: &[Point], style: &PathStyle) {
        if let Some(fill) = style.fill {
            self.fill_polygon(points, fill);
        }
        if let Some(stroke) = style.stroke {
            self.stroke_polygon(points, stroke, style.stroke_width);
        }
    }

    fn draw_text(&mut self, _transform: &Affine, text: &str, _style: &TextStyle<'_>) {
        debug!(text, "raster canvas does not draw text, skipping");
    }

    fn draw_rect(&mut self, width: f32, height: f32, fill: Color) {
        let w = (width.round() as i32).min(self.width() as i32);
        let h = (height.round() as i32).min(self.height() as i32);
        for y in 0..h {
            for x in 0..w {
                self.blend_pixel(x, y, fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn px(canvas: &RasterCanvas, x: u32, y: u32) -> [u8; 4] {
        canvas.image().get_pixel(x, y).0
    }

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0, 0.0),
            Point::new(x1, y0, 0.0),
            Point::new(x1, y1, 0.0),
            Point::new(x0, y1, 0.0),
        ]
    }

    fn fill_only(color: Color) -> PathStyle {
        PathStyle {
            fill: Some(color),
            stroke: None,
            stroke_width: 1.0,
        }
    }

    #[test]
    fn fills_pixel_centers_inside_polygon() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.draw_polygon(&square(2.0, 2.0, 5.0, 5.0), &fill_only(Color::WHITE));
        assert_eq!(px(&canvas, 2, 2), [255, 255, 255, 255]);
        assert_eq!(px(&canvas, 4, 4), [255, 255, 255, 255]);
        assert_eq!(px(&canvas, 5, 5), [0, 0, 0, 0]);
        assert_eq!(px(&canvas, 1, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn even_odd_leaves_hole_in_self_overlap() {
        // Outer square, then an inner square entered through the corner.
        let mut canvas = RasterCanvas::new(20, 20);
        let mut pts = square(0.0, 0.0, 20.0, 20.0);
        pts.push(Point::new(0.0, 0.0, 0.0));
        pts.extend(square(5.0, 5.0, 15.0, 15.0));
        pts.push(Point::new(5.0, 5.0, 0.0));
        canvas.draw_polygon(&pts, &fill_only(Color::WHITE));
        assert_eq!(px(&canvas, 2, 10)[3], 255);
        assert_eq!(px(&canvas, 10, 10)[3], 0);
    }

    #[test]
    fn half_transparent_fill_blends() {
        let mut canvas = RasterCanvas::new(4, 4).with_clear_color(Color::WHITE);
        canvas.reset();
        canvas.draw_polygon(
            &square(0.0, 0.0, 4.0, 4.0),
            &fill_only(Color::rgba(0.0, 0.0, 0.0, 127.5)),
        );
        let [r, g, b, a] = px(&canvas, 1, 1);
        assert_eq!(a, 255);
        assert!((127..=128).contains(&r));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn stroke_draws_outline() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.draw_polygon(
            &square(1.0, 1.0, 8.0, 8.0),
            &PathStyle {
                fill: None,
                stroke: Some(Color::rgb(255.0, 0.0, 0.0)),
                stroke_width: 1.0,
            },
        );
        assert_eq!(px(&canvas, 1, 1), [255, 0, 0, 255]);
        assert_eq!(px(&canvas, 5, 8), [255, 0, 0, 255]);
        assert_eq!(px(&canvas, 4, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn rect_and_text() {
        let mut canvas = RasterCanvas::new(6, 6);
        canvas.draw_rect(3.0, 2.0, Color::rgb(238.0, 238.0, 238.0));
        assert_eq!(px(&canvas, 2, 1), [238, 238, 238, 255]);
        assert_eq!(px(&canvas, 3, 1), [0, 0, 0, 0]);

        let before = canvas.image().clone();
        canvas.draw_text(
            &Affine::IDENTITY,
            "skipped",
            &TextStyle {
                fill: None,
                font: None,
                anchor: "middle",
            },
        );
        assert_eq!(canvas.image(), &before);
    }

    #[test]
    fn offscreen_geometry_is_clipped() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.draw_polygon(&square(-10.0, -10.0, 2.0, 2.0), &fill_only(Color::WHITE));
        assert_eq!(px(&canvas, 0, 0)[3], 255);
        assert_eq!(px(&canvas, 3, 3)[3], 0);
    }

    #[test]
    fn huge_stroke_coordinates_are_clipped_to_canvas() {
        let mut canvas = RasterCanvas::new(10, 10);
        let triangle = [
            Point::new(-3e9, 5.0, 0.0),
            Point::new(3e9, 5.0, 0.0),
            Point::new(0.0, 8.0, 0.0),
        ];
        canvas.draw_polygon(
            &triangle,
            &PathStyle {
                fill: None,
                stroke: Some(Color::BLACK),
                stroke_width: 1.0,
            },
        );
        // The horizontal edge crosses the whole canvas.
        assert!((0..10).all(|x| px(&canvas, x, 5) == [0, 0, 0, 255]));
        assert_eq!(px(&canvas, 5, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn segments_missing_the_canvas_draw_nothing() {
        let mut canvas = RasterCanvas::new(10, 10);
        canvas.draw_polygon(
            &[
                Point::new(-50.0, -50.0, 0.0),
                Point::new(-20.0, -50.0, 0.0),
                Point::new(f32::INFINITY, 3.0, 0.0),
            ],
            &PathStyle {
                fill: None,
                stroke: Some(Color::BLACK),
                stroke_width: 3.0,
            },
        );
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn clip_segment_trims_to_rectangle() {
        let rect = ((0.0, 0.0), (10.0, 10.0));
        let ((x0, y0), (x1, y1)) =
            clip_segment((-10.0, 5.0), (20.0, 5.0), rect.0, rect.1).unwrap();
        assert_relative_eq!(x0, 0.0, epsilon = 1e-9);
        assert_relative_eq!(x1, 10.0, epsilon = 1e-9);
        assert_eq!((y0, y1), (5.0, 5.0));

        assert_eq!(clip_segment((-10.0, -1.0), (20.0, -1.0), rect.0, rect.1), None);
        assert_eq!(
            clip_segment((2.0, 3.0), (4.0, 6.0), rect.0, rect.1),
            Some(((2.0, 3.0), (4.0, 6.0)))
        );
    }
}
