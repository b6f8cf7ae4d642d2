//! Surface materials.

use crate::color::Color;
use crate::light::LightModel;
use crate::render::RenderData;
use crate::shader::{Shader, ShaderType};

/// The color and finish of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color. Its alpha becomes the alpha of every shaded result.
    pub color: Color,
    /// When true, specular highlights are capped by `specular_color` instead
    /// of taking the color of the light.
    pub metallic: bool,
    pub specular_color: Color,
    /// Low values give a broad, dim highlight; high values a tight one.
    ///
    /// With an odd integer exponent a light behind the surface subtracts a
    /// little specular light. Fractional exponents never go below zero.
    pub specular_exponent: f32,
    /// Overrides the scene's shader for this material.
    pub shader: Option<ShaderType>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::GRAY)
    }
}

impl From<Color> for Material {
    fn from(color: Color) -> Self {
        Self::new(color)
    }
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            metallic: false,
            specular_color: Color::WHITE,
            specular_exponent: 15.0,
            shader: None,
        }
    }

    pub fn with_metallic(mut self, metallic: bool) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_specular(mut self, color: Color, exponent: f32) -> Self {
        self.specular_color = color;
        self.specular_exponent = exponent;
        self
    }

    pub fn with_shader(mut self, shader: ShaderType) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Shade this material with its own shader, or `shader` if it has none.
    pub fn render(&self, lights: &[LightModel], shader: ShaderType, data: &RenderData) -> Color {
        let shader = self.shader.unwrap_or(shader);
        let mut color = shader.shade(lights, data, self);
        color.a = self.color.a;
        color
    }
}
