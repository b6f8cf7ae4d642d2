//! SVG output.
//!
//! [`SvgSurface`] collects each frame's primitives into an SVG document
//! string. The document of the last completed frame is available from
//! [`SvgSurface::document`] and can be written with [`SvgSurface::save`].

use std::fmt::Write as _;
use std::path::Path;

use crate::color::Color;
use crate::error::Result;
use crate::math::Point;

use super::painter::{Affine, PaintSurface, PathStyle, TextStyle};

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    body: String,
    document: String,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            document: String::new(),
        }
    }

    /// The SVG document of the last completed frame. Empty before the first.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.document)?;
        Ok(())
    }
}

/// Format a coordinate with at most two decimals, trailing zeros trimmed.
fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // Avoid "-0".
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{} {}", num(p.x), num(p.y));
    }
    d.push('Z');
    d
}

impl PaintSurface for SvgSurface {
    fn reset(&mut self) {
        self.body.clear();
    }

    fn draw_polygon(&mut self, points: &[Point], style: &PathStyle) {
        if points.is_empty() {
            return;
        }
        let _ = write!(self.body, "<path d=\"{}\"", path_data(points));
        match style.fill {
            Some(fill) => {
                let _ = write!(self.body, " fill=\"{}\"", fill.hex_string());
                if fill.opacity() < 1.0 {
                    let _ = write!(self.body, " fill-opacity=\"{}\"", num(fill.opacity()));
                }
            }
            None => self.body.push_str(" fill=\"none\""),
        }
        if let Some(stroke) = style.stroke {
            let _ = write!(
                self.body,
                " stroke=\"{}\" stroke-width=\"{}\"",
                stroke.hex_string(),
                num(style.stroke_width)
            );
        }
        self.body.push_str("/>\n");
    }

    fn draw_text(&mut self, transform: &Affine, text: &str, style: &TextStyle<'_>) {
        let m = transform.text_matrix();
        let fill = style
            .fill
            .map(|c| c.hex_string())
            .unwrap_or_else(|| "none".to_string());
        let _ = write!(
            self.body,
            "<text transform=\"matrix({} {} {} {} {} {})\" fill=\"{}\" text-anchor=\"{}\"",
            num(m[0]),
            num(m[1]),
            num(m[2]),
            num(m[3]),
            num(m[4]),
            num(m[5]),
            fill,
            escape(style.anchor)
        );
        if let Some(font) = style.font {
            let _ = write!(self.body, " style=\"font: {}\"", escape(font));
        }
        let _ = writeln!(self.body, ">{}</text>", escape(text));
    }

    fn draw_rect(&mut self, width: f32, height: f32, fill: Color) {
        let _ = writeln!(
            self.body,
            "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            num(width),
            num(height),
            fill.hex_string()
        );
    }

    fn cleanup(&mut self) {
        self.document = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{}</svg>\n",
            self.body,
            w = self.width,
            h = self.height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(10.0, 10.0, 0.0),
            Point::new(20.5, 10.0, 0.0),
            Point::new(10.0, 20.25, 0.0),
        ]
    }

    #[test]
    fn polygon_becomes_closed_path() {
        let mut svg = SvgSurface::new(100, 100);
        svg.reset();
        svg.draw_polygon(
            &triangle(),
            &PathStyle {
                fill: Some(Color::rgba(255.0, 0.0, 0.0, 127.5)),
                stroke: Some(Color::BLACK),
                stroke_width: 2.0,
            },
        );
        svg.cleanup();
        let doc = svg.document();
        assert!(doc.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\""));
        assert!(doc.contains("d=\"M10 10L20.5 10L10 20.25Z\""));
        assert!(doc.contains("fill=\"#ff0000\" fill-opacity=\"0.5\""));
        assert!(doc.contains("stroke=\"#000000\" stroke-width=\"2\""));
    }

    #[test]
    fn opaque_fill_has_no_opacity_attribute() {
        let mut svg = SvgSurface::new(10, 10);
        svg.draw_polygon(
            &triangle(),
            &PathStyle {
                fill: Some(Color::WHITE),
                stroke: None,
                stroke_width: 1.0,
            },
        );
        svg.cleanup();
        assert!(!svg.document().contains("fill-opacity"));
        assert!(!svg.document().contains("stroke="));
    }

    #[test]
    fn text_is_escaped_and_transformed() {
        let mut svg = SvgSurface::new(10, 10);
        let affine = Affine {
            m: [1.0, 0.0, 5.0, 0.0, 1.0, 6.0],
        };
        svg.draw_text(
            &affine,
            "a<b & c",
            &TextStyle {
                fill: Some(Color::BLACK),
                font: Some("12px serif"),
                anchor: "middle",
            },
        );
        svg.cleanup();
        let doc = svg.document();
        assert!(doc.contains("transform=\"matrix(1 0 0 -1 5 6)\""));
        assert!(doc.contains(">a&lt;b &amp; c</text>"));
        assert!(doc.contains("text-anchor=\"middle\""));
        assert!(doc.contains("style=\"font: 12px serif\""));
    }

    #[test]
    fn reset_starts_a_new_frame() {
        let mut svg = SvgSurface::new(10, 10);
        svg.draw_rect(10.0, 10.0, Color::WHITE);
        svg.cleanup();
        assert!(svg.document().contains("<rect"));
        svg.reset();
        svg.cleanup();
        assert!(!svg.document().contains("<rect"));
    }
}
