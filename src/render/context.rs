//! Layered render contexts.
//!
//! A [`RenderContext`] paints an ordered stack of [`RenderLayer`]s into one
//! [`PaintSurface`]. Layers paint in insertion order, so a background
//! [`FillLayer`] goes first and one or more [`SceneLayer`]s follow.

use crate::color::Color;
use crate::scene::Scene;

use super::painter::{Paint, PaintSurface};

/// Something that paints into a surface once per frame.
pub trait RenderLayer {
    fn render(&mut self, target: &mut dyn PaintSurface);

    /// The scene behind this layer, if it has one.
    fn scene_mut(&mut self) -> Option<&mut Scene> {
        None
    }
}

/// Renders a scene and paints every visible surface, farthest first.
#[derive(Debug)]
pub struct SceneLayer {
    pub scene: Scene,
}

impl SceneLayer {
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }
}

impl RenderLayer for SceneLayer {
    fn render(&mut self, target: &mut dyn PaintSurface) {
        for model in self.scene.render() {
            model.painter.paint(model, target);
        }
    }

    fn scene_mut(&mut self) -> Option<&mut Scene> {
        Some(&mut self.scene)
    }
}

/// A solid background rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillLayer {
    pub width: f32,
    pub height: f32,
    pub fill: Color,
}

impl Default for FillLayer {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            fill: Color::rgb(238.0, 238.0, 238.0),
        }
    }
}

impl RenderLayer for FillLayer {
    fn render(&mut self, target: &mut dyn PaintSurface) {
        target.draw_rect(self.width, self.height, self.fill);
    }
}

pub struct RenderContext<S: PaintSurface> {
    surface: S,
    layers: Vec<Box<dyn RenderLayer>>,
}

impl<S: PaintSurface> RenderContext<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            layers: Vec::new(),
        }
    }

    /// Add a layer on top of the existing ones.
    pub fn layer(&mut self, layer: impl RenderLayer + 'static) -> &mut Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Add a [`SceneLayer`] for `scene`.
    pub fn scene_layer(&mut self, scene: Scene) -> &mut Self {
        self.layer(SceneLayer::new(scene))
    }

    /// Paint one frame: reset the surface, paint every layer, clean up.
    pub fn render(&mut self) -> &mut Self {
        self.surface.reset();
        for layer in &mut self.layers {
            layer.render(&mut self.surface);
        }
        self.surface.cleanup();
        self
    }

    /// The first scene among the layers.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.layers.iter_mut().find_map(|layer| layer.scene_mut())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
