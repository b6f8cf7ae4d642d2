//! RGBA colors with channels in `[0, 255]`.
//!
//! Channels are `f32` so shading can accumulate light contributions past the
//! displayable range before clamping.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);
    pub const GRAY: Self = Self::rgb(136.0, 136.0, 136.0);

    /// Opaque color from red, green and blue in `[0, 255]`.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 255.0)
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `"#RRGGBB"` (the `#` is optional).
    pub fn hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(f32::from)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Color from hue, saturation and lightness, each in `[0, 1]`.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        if s == 0.0 {
            // Achromatic.
            return Self::rgba(l * 255.0, l * 255.0, l * 255.0, a * 255.0);
        }

        fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
            if t < 0.0 {
                t += 1.0;
            } else if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgba(
            hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_rgb(p, q, h) * 255.0,
            hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
            a * 255.0,
        )
    }

    /// Lenient parse: anything unrecognized becomes black.
    pub fn parse_or_black(s: &str) -> Self {
        s.parse().unwrap_or(Self::BLACK)
    }

    // ============ Channel arithmetic (rgb only) ============

    pub fn scale(&mut self, n: f32) -> &mut Self {
        self.r *= n;
        self.g *= n;
        self.b *= n;
        self
    }

    pub fn offset(&mut self, n: f32) -> &mut Self {
        self.r += n;
        self.g += n;
        self.b += n;
        self
    }

    pub fn clamp(&mut self, min: f32, max: f32) -> &mut Self {
        self.r = self.r.clamp(min, max);
        self.g = self.g.clamp(min, max);
        self.b = self.b.clamp(min, max);
        self
    }

    pub fn min_channels(&mut self, c: Color) -> &mut Self {
        self.r = self.r.min(c.r);
        self.g = self.g.min(c.g);
        self.b = self.b.min(c.b);
        self
    }

    pub fn add_channels(&mut self, c: Color) -> &mut Self {
        self.r += c.r;
        self.g += c.g;
        self.b += c.b;
        self
    }

    pub fn multiply_channels(&mut self, c: Color) -> &mut Self {
        self.r *= c.r;
        self.g *= c.g;
        self.b *= c.b;
        self
    }

    /// Value form of [`Color::scale`].
    pub fn scaled(mut self, n: f32) -> Self {
        self.scale(n);
        self
    }

    // ============ Output ============

    /// Channel rounded and clamped to a byte.
    fn byte(v: f32) -> u8 {
        v.round().clamp(0.0, 255.0) as u8
    }

    /// `"#rrggbb"`.
    pub fn hex_string(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            Self::byte(self.r),
            Self::byte(self.g),
            Self::byte(self.b)
        )
    }

    /// CSS `rgba(r,g,b,a)` with alpha in `[0, 1]`.
    pub fn style(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            Self::byte(self.r),
            Self::byte(self.g),
            Self::byte(self.b),
            self.opacity()
        )
    }

    /// Alpha scaled to `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        (self.a / 255.0).clamp(0.0, 1.0)
    }

    /// Packed `0xAARRGGBB`.
    pub fn to_argb(&self) -> u32 {
        (u32::from(Self::byte(self.a)) << 24)
            | (u32::from(Self::byte(self.r)) << 16)
            | (u32::from(Self::byte(self.g)) << 8)
            | u32::from(Self::byte(self.b))
    }

    /// `[r, g, b, a]` bytes.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            Self::byte(self.r),
            Self::byte(self.g),
            Self::byte(self.b),
            Self::byte(self.a),
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.style())
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `"#RRGGBB"`, `"rgb(r,g,b)"` and `"rgba(r,g,b,a)"` where `a` is
    /// a CSS opacity in `[0, 1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::hex(s);
        }

        let invalid = || Error::InvalidColor(s.to_string());
        let args = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, (a * 255.0).round())),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parse_hex_matches_hex() {
        let a = Color::hex("#FF00FF").unwrap();
        let b: Color = "#FF00FF".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Color::rgb(255.0, 0.0, 255.0));
    }

    #[test]
    fn parse_rgb_and_rgba() {
        let rgb: Color = "rgb(255,0,255)".parse().unwrap();
        assert_eq!(rgb, Color::rgb(255.0, 0.0, 255.0));

        let rgba: Color = "rgba(255, 0, 255, 0.5)".parse().unwrap();
        assert_eq!(rgba, Color::rgba(255.0, 0.0, 255.0, 128.0));
    }

    #[test]
    fn unparseable_is_error_or_black() {
        assert!("jabba the babba".parse::<Color>().is_err());
        assert!(Color::hex("#12345").is_err());
        assert_eq!(Color::parse_or_black("jabba the babba"), Color::BLACK);
    }

    #[test]
    fn hex_string_round_trips_gray() {
        assert_eq!(Color::GRAY.hex_string(), "#888888");
        assert_eq!(Color::hex("#888888").unwrap(), Color::GRAY);
    }

    #[test]
    fn hsl_primaries_and_gray() {
        let red = Color::hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 255.0, epsilon = 1e-3);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-3);
        assert_relative_eq!(red.b, 0.0, epsilon = 1e-3);

        let gray = Color::hsl(0.3, 0.0, 0.5);
        assert_eq!(gray, Color::rgb(127.5, 127.5, 127.5));
    }

    #[test]
    fn clamp_and_pack() {
        let mut c = Color::rgba(300.0, -5.0, 16.0, 255.0);
        c.clamp(0.0, 255.0);
        assert_eq!(c.to_argb(), 0xFFFF0010);
        assert_eq!(c.style(), "rgba(255,0,16,1)");
    }
}
