//! A small 3D scene-graph renderer with painter's-algorithm output.
//!
//! Shapes made of flat polygonal surfaces and lights live in a tree of
//! [`Model`]s. A [`Scene`] projects that tree through a [`Camera`] and
//! [`Viewport`], culls back faces and surfaces outside the frustum, shades
//! what remains and returns it sorted far to near. Painting happens through
//! the [`PaintSurface`] trait, with an SVG writer and an RGBA raster canvas
//! included.
//!
//! # Quick Start
//!
//! ```ignore
//! use scenepaint::prelude::*;
//!
//! let mut model = Model::hollywood();
//! let mut cube = shapes::cube();
//! cube.scale_uniform(40.0).rotate_y(0.4);
//! model.add(cube);
//!
//! let mut ctx = RenderContext::new(SvgSurface::new(500, 500));
//! ctx.layer(FillLayer::default()).scene_layer(Scene::new(model));
//! ctx.render();
//! ctx.surface().save("cube.svg")?;
//! ```

// Public API - exposed to library consumers
pub mod animator;
pub mod camera;
pub mod color;
pub mod error;
pub mod light;
pub mod material;
pub mod math;
pub mod model;
pub mod obj;
pub mod projection;
pub mod render;
pub mod scene;
pub mod shader;
pub mod shapes;
pub mod surface;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use animator::{Animator, RenderAnimator};
pub use camera::{Camera, Viewport};
pub use color::Color;
pub use error::{Error, Result};
pub use light::{Light, LightKind};
pub use material::Material;
pub use model::{Model, NodeId};
pub use projection::{Frustum, Projection};
pub use scene::{Scene, SceneOptions};
pub use shader::ShaderType;
pub use surface::{Shape, Surface, SurfaceId};
pub use transform::Transformable;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use scenepaint::prelude::*;
/// ```
pub mod prelude {
    // Scene graph
    pub use crate::light::{Light, LightKind};
    pub use crate::material::Material;
    pub use crate::model::Model;
    pub use crate::shapes;
    pub use crate::surface::{Shape, Surface};

    // Camera
    pub use crate::camera::{Camera, Viewport};
    pub use crate::projection::Projection;

    // Transform
    pub use crate::transform::Transformable;

    // Math
    pub use crate::color::Color;
    pub use crate::math::{Bounds, Matrix, Point};

    // Rendering
    pub use crate::render::{
        FillLayer, PaintSurface, RasterCanvas, RenderContext, SceneLayer, SvgSurface,
    };
    pub use crate::scene::{Scene, SceneOptions};
    pub use crate::shader::ShaderType;

    // Animation
    pub use crate::animator::{Animator, RenderAnimator};
}
