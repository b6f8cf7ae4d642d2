//! Surface shading models.
//!
//! A [`Shader`] turns the lights affecting a surface, the surface's
//! transformed geometry and its [`Material`] into a final color. Shading
//! runs on the transformed (pre-projection) geometry so light directions
//! stay physically meaningful.
//!
//! Available models:
//! - [`Phong`]: ambient + diffuse + specular
//! - [`DiffusePhong`]: ambient + diffuse
//! - [`Ambient`]: ambient lights only
//! - [`Flat`]: the material color, no lighting
//!
//! See <https://en.wikipedia.org/wiki/Phong_reflection_model>.

use crate::color::Color;
use crate::light::{LightKind, LightModel};
use crate::material::Material;
use crate::math::Point;
use crate::render::RenderData;

/// The eye looks down the Z axis.
const EYE_NORMAL: Point = Point::Z;

/// Trait for surface shading computations.
pub trait Shader {
    /// Compute the color of a surface.
    ///
    /// # Arguments
    /// * `lights` - Lights affecting the surface, already transformed
    /// * `data` - The surface's transformed geometry (barycenter, normal)
    /// * `material` - Base color and specular finish
    fn shade(&self, lights: &[LightModel], data: &RenderData, material: &Material) -> Color;
}

/// Direction from the surface toward a light, or `None` for ambient lights.
fn light_normal(kind: &LightKind, data: &RenderData) -> Option<Point> {
    match kind {
        LightKind::Point { point } => Some((*point - data.barycenter).normalized()),
        LightKind::Directional { normal } => Some(*normal),
        LightKind::Ambient => None,
    }
}

fn apply_diffuse(c: &mut Color, light: &LightModel, light_normal: Point, surface_normal: Point) {
    let dot = light_normal.dot(surface_normal);
    if dot > 0.0 {
        c.add_channels(light.color_intensity.scaled(dot));
    }
}

fn apply_diffuse_and_specular(
    c: &mut Color,
    light: &LightModel,
    light_normal: Point,
    surface_normal: Point,
    material: &Material,
) {
    let dot = light_normal.dot(surface_normal);
    if dot > 0.0 {
        c.add_channels(light.color_intensity.scaled(dot));
    }

    // Reflect the light about the surface normal and compare with the eye.
    let reflection = surface_normal * (2.0 * dot) - light_normal;
    let base = 0.5 + reflection.dot(EYE_NORMAL);
    let exponent = material.specular_exponent;
    // Integer exponents keep the sign of a negative base (odd powers darken);
    // fractional powers of a negative base would be NaN.
    let specular_intensity = if exponent.fract() == 0.0 {
        base.powf(exponent)
    } else {
        base.max(0.0).powf(exponent)
    };
    c.add_channels(
        material
            .specular_color
            .scaled(specular_intensity * light.intensity / 255.0),
    );
}

fn apply_ambient(c: &mut Color, light: &LightModel) {
    c.add_channels(light.color_intensity);
}

/// Ambient, diffuse and specular terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phong;

impl Shader for Phong {
    fn shade(&self, lights: &[LightModel], data: &RenderData, material: &Material) -> Color {
        let mut c = Color::BLACK;
        for light in lights {
            match light_normal(&light.kind, data) {
                Some(n) => apply_diffuse_and_specular(&mut c, light, n, data.normal, material),
                None => apply_ambient(&mut c, light),
            }
        }

        c.multiply_channels(material.color);
        if material.metallic {
            c.min_channels(material.specular_color);
        }
        c.clamp(0.0, 255.0);
        c
    }
}

/// Ambient and diffuse terms, no specular highlight.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffusePhong;

impl Shader for DiffusePhong {
    fn shade(&self, lights: &[LightModel], data: &RenderData, material: &Material) -> Color {
        let mut c = Color::BLACK;
        for light in lights {
            match light_normal(&light.kind, data) {
                Some(n) => apply_diffuse(&mut c, light, n, data.normal),
                None => apply_ambient(&mut c, light),
            }
        }

        c.multiply_channels(material.color).clamp(0.0, 255.0);
        c
    }
}

/// Only ambient lights contribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ambient;

impl Shader for Ambient {
    fn shade(&self, lights: &[LightModel], _data: &RenderData, material: &Material) -> Color {
        let mut c = Color::BLACK;
        for light in lights {
            if let LightKind::Ambient = light.kind {
                apply_ambient(&mut c, light);
            }
        }

        c.multiply_channels(material.color).clamp(0.0, 255.0);
        c
    }
}

/// The material color, regardless of lights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

impl Shader for Flat {
    #[inline]
    fn shade(&self, _lights: &[LightModel], _data: &RenderData, material: &Material) -> Color {
        material.color
    }
}

/// Available shading models.
///
/// Used by [`Scene`](crate::scene::Scene) and as the per-material override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderType {
    #[default]
    Phong,
    DiffusePhong,
    Ambient,
    Flat,
}

impl std::fmt::Display for ShaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderType::Phong => write!(f, "Phong"),
            ShaderType::DiffusePhong => write!(f, "DiffusePhong"),
            ShaderType::Ambient => write!(f, "Ambient"),
            ShaderType::Flat => write!(f, "Flat"),
        }
    }
}

impl Shader for ShaderType {
    #[inline]
    fn shade(&self, lights: &[LightModel], data: &RenderData, material: &Material) -> Color {
        match self {
            ShaderType::Phong => Phong.shade(lights, data, material),
            ShaderType::DiffusePhong => DiffusePhong.shade(lights, data, material),
            ShaderType::Ambient => Ambient.shade(lights, data, material),
            ShaderType::Flat => Flat.shade(lights, data, material),
        }
    }
}
