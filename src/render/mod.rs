//! Turning scene surfaces into paint.
//!
//! - [`model`]: per-surface cached geometry ([`RenderModel`])
//! - [`painter`]: the [`PaintSurface`] boundary and the painters that draw
//!   a render model into it
//! - [`context`]: layered frame rendering
//! - [`svg`], [`canvas`]: output surfaces

pub mod canvas;
pub mod context;
pub mod model;
pub mod painter;
pub mod svg;

pub use canvas::RasterCanvas;
pub use context::{FillLayer, RenderContext, RenderLayer, SceneLayer};
pub use model::{RenderData, RenderModel};
pub use painter::{Affine, Paint, PaintSurface, Painter, PathStyle, TextStyle};
pub use svg::SvgSurface;
