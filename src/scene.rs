//! The scene: a model tree seen through a camera.
//!
//! [`Scene::render`] runs the whole pipeline for one frame:
//!
//! 1. Combine the camera transform, viewport prescale and projection into
//!    one projection matrix; the viewport postscale maps to the screen.
//! 2. Walk the model tree, fetching or creating each surface's cached
//!    [`RenderModel`] and bringing it up to date.
//! 3. Drop surfaces outside the frustum and back faces, then shade the rest
//!    against their lights using the transformed geometry.
//! 4. Sort by projected depth, farthest first (painter's algorithm).
//!
//! # Cache
//!
//! Render models are cached by surface id and never evicted on their own.
//! After removing shapes from the model, call [`Scene::flush_cache`] or the
//! cache keeps their entries.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::camera::{Camera, Viewport};
use crate::error::Result;
use crate::light::LightModel;
use crate::model::Model;
use crate::render::RenderModel;
use crate::shader::ShaderType;
use crate::surface::SurfaceId;
use crate::transform::Transformable;

/// Scene-wide render toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    /// Drop surfaces whose projected normal faces away from the camera.
    /// Surfaces can opt out individually.
    pub cull_backfaces: bool,
    /// Keep sub-pixel screen coordinates. When false, projected points are
    /// rounded, which shrinks vector output at the cost of smooth motion.
    pub fractional_points: bool,
    /// Reuse render models between frames.
    pub cache: bool,
    /// Shader for materials without their own.
    pub shader: ShaderType,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            cull_backfaces: true,
            fractional_points: false,
            cache: true,
            shader: ShaderType::Phong,
        }
    }
}

/// Per-frame counts, logged at trace level.
#[derive(Debug, Default, Clone, Copy)]
struct FrameStats {
    candidates: usize,
    recomputed: usize,
    culled: usize,
    out_of_frustum: usize,
}

#[derive(Debug, Default)]
pub struct Scene {
    pub model: Model,
    pub camera: Camera,
    pub viewport: Viewport,
    pub options: SceneOptions,
    cache: HashMap<SurfaceId, RenderModel>,
}

impl Scene {
    pub fn new(model: Model) -> Self {
        Self::with_options(model, SceneOptions::default())
    }

    pub fn with_options(model: Model, options: SceneOptions) -> Self {
        Self {
            model,
            options,
            ..Self::default()
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Render one frame. Returns the visible surfaces' render models,
    /// farthest first.
    pub fn render(&mut self) -> Vec<&RenderModel> {
        let mut projection = *self.camera.transform();
        projection
            .multiply(&self.viewport.prescale)
            .multiply(&self.camera.projection.matrix());
        let viewport = self.viewport.postscale;

        if !self.options.cache {
            self.cache.clear();
        }

        let options = self.options;
        let cache = &mut self.cache;
        let mut stats = FrameStats::default();
        let mut accepted: Vec<(SurfaceId, f32)> = Vec::new();

        self.model.each_renderable(
            |light, transform| LightModel::new(light, transform),
            |shape, lights, transform| {
                for surface in shape.surfaces_mut() {
                    stats.candidates += 1;
                    let model = match cache.entry(surface.id()) {
                        Entry::Occupied(entry) => {
                            let model = entry.into_mut();
                            if model.update(surface, transform, &projection, &viewport) {
                                stats.recomputed += 1;
                            }
                            model
                        }
                        Entry::Vacant(entry) => {
                            stats.recomputed += 1;
                            entry.insert(RenderModel::new(
                                surface,
                                transform,
                                &projection,
                                &viewport,
                            ))
                        }
                    };

                    if !model.in_frustum() {
                        stats.out_of_frustum += 1;
                        continue;
                    }
                    let visible = !options.cull_backfaces
                        || !surface.cull_backfaces
                        || model.projected.normal.z < 0.0;
                    if !visible {
                        stats.culled += 1;
                        continue;
                    }

                    model.fill = surface
                        .fill_material
                        .map(|m| m.render(lights, options.shader, &model.transformed));
                    model.stroke = surface
                        .stroke_material
                        .map(|m| m.render(lights, options.shader, &model.transformed));

                    if !options.fractional_points {
                        model.round_projected();
                    }
                    accepted.push((surface.id(), model.projected.barycenter.z));
                }
            },
        );

        // Stable, so equal depths keep traversal order.
        accepted.sort_by(|a, b| b.1.total_cmp(&a.1));

        trace!(
            candidates = stats.candidates,
            accepted = accepted.len(),
            culled = stats.culled,
            out_of_frustum = stats.out_of_frustum,
            recomputed = stats.recomputed,
            "rendered frame"
        );

        accepted
            .iter()
            .filter_map(|(id, _)| self.cache.get(id))
            .collect()
    }

    /// Drop every cached render model.
    pub fn flush_cache(&mut self) -> &mut Self {
        debug!(entries = self.cache.len(), "flushing render model cache");
        self.cache.clear();
        self
    }

    /// Number of cached render models.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Report the first surface in the model with a non-finite coordinate.
    pub fn validate(&self) -> Result<()> {
        let mut result = Ok(());
        self.model.each_shape(|shape| {
            if result.is_ok() {
                result = shape.validate();
            }
        });
        result
    }
}
