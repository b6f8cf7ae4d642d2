//! Light sources.
//!
//! A [`Light`] lives in a [`Model`](crate::model::Model) and is affected by
//! the accumulated transform of that model. The light itself is never
//! mutated by rendering: each frame produces a [`LightModel`] holding the
//! transformed position/direction.

use crate::color::Color;
use crate::math::{Matrix, Point};
use crate::model::NodeId;
use crate::transform::Transformable;

/// What kind of light, with the geometry relevant to that kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Emits in all directions from `point`.
    Point { point: Point },
    /// Parallel rays. `normal` points from the surface toward the light.
    Directional { normal: Point },
    /// Constant light everywhere. Transforms have no effect.
    Ambient,
}

#[derive(Debug, Clone)]
pub struct Light {
    id: NodeId,
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub enabled: bool,
    transform: Matrix,
}

impl Light {
    /// Default intensity. Colors are in `[0, 255]`, so a white light at this
    /// intensity contributes about 2.5 per channel.
    pub const DEFAULT_INTENSITY: f32 = 0.01;

    pub fn new(kind: LightKind) -> Self {
        Self {
            id: NodeId::next(),
            kind,
            color: Color::WHITE,
            intensity: Self::DEFAULT_INTENSITY,
            enabled: true,
            transform: Matrix::new(),
        }
    }

    /// A point light at the origin.
    pub fn point() -> Self {
        Self::new(LightKind::Point { point: Point::ZERO })
    }

    /// A directional light with normal `(1, -1, -1)`.
    pub fn directional() -> Self {
        Self::new(LightKind::Directional {
            normal: Point::new(1.0, -1.0, -1.0).normalized(),
        })
    }

    pub fn ambient() -> Self {
        Self::new(LightKind::Ambient)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the position. Ignored unless this is a point light.
    pub fn with_point(mut self, p: Point) -> Self {
        if let LightKind::Point { point } = &mut self.kind {
            *point = p;
        }
        self
    }

    /// Set the direction (normalized here). Ignored unless directional.
    pub fn with_normal(mut self, n: Point) -> Self {
        if let LightKind::Directional { normal } = &mut self.kind {
            *normal = n.normalized();
        }
        self
    }
}

impl Transformable for Light {
    fn transform(&self) -> &Matrix {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Matrix {
        &mut self.transform
    }
}

/// Per-frame light data, precomputed for shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightModel {
    /// Transformed geometry.
    pub kind: LightKind,
    /// `color * intensity`.
    pub color_intensity: Color,
    pub intensity: f32,
}

impl LightModel {
    /// Build the light data for `light` under the accumulated `transform`.
    pub fn new(light: &Light, transform: &Matrix) -> Self {
        let kind = match light.kind {
            LightKind::Point { point } => LightKind::Point {
                point: point.transformed(transform),
            },
            LightKind::Directional { normal } => {
                let origin = Point::ZERO.transformed(transform);
                let mut n = normal.transformed(transform);
                n.subtract(origin).normalize();
                LightKind::Directional { normal: n }
            }
            LightKind::Ambient => LightKind::Ambient,
        };

        Self {
            kind,
            color_intensity: light.color.scaled(light.intensity),
            intensity: light.intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults() {
        let light = Light::directional();
        assert!(light.enabled);
        assert_eq!(light.color, Color::WHITE);
        assert_eq!(light.intensity, 0.01);
        match light.kind {
            LightKind::Directional { normal } => {
                assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-6);
                assert!(normal.x > 0.0 && normal.y < 0.0 && normal.z < 0.0);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn point_light_moves_with_transform() {
        let light = Light::point().with_point(Point::new(1.0, 0.0, 0.0));
        let mut m = Matrix::new();
        m.translate(0.0, 5.0, 0.0);
        let model = LightModel::new(&light, &m);
        assert_eq!(
            model.kind,
            LightKind::Point {
                point: Point::new(1.0, 5.0, 0.0)
            }
        );
    }

    #[test]
    fn directional_light_ignores_translation() {
        let light = Light::directional().with_normal(Point::new(0.0, 0.0, 1.0));
        let mut m = Matrix::new();
        m.translate(10.0, -3.0, 2.0);
        let model = LightModel::new(&light, &m);
        match model.kind {
            LightKind::Directional { normal } => {
                assert_relative_eq!(normal, Point::Z, epsilon = 1e-5)
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn directional_light_rotates() {
        let light = Light::directional().with_normal(Point::X);
        let mut m = Matrix::new();
        m.rotate_z(std::f32::consts::FRAC_PI_2);
        match LightModel::new(&light, &m).kind {
            LightKind::Directional { normal } => {
                assert_relative_eq!(normal, Point::Y, epsilon = 1e-5)
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn color_intensity_is_premultiplied() {
        let light = Light::ambient()
            .with_color(Color::rgb(100.0, 200.0, 50.0))
            .with_intensity(0.5);
        let model = LightModel::new(&light, &Matrix::new());
        assert_eq!(model.color_intensity, Color::rgb(50.0, 100.0, 25.0));
    }
}
