//! Demo: spins a few shapes and writes the last frame as SVG and PNG.
//!
//! ```text
//! scenepaint [OUTPUT_DIR] [FRAMES]
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use scenepaint::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 500;
const HEIGHT: u32 = 500;
const DEFAULT_FRAMES: usize = 60;

fn build_model() -> Model {
    let mut model = Model::hollywood();

    let mut cube = shapes::cube();
    cube.scale_uniform(60.0)
        .translate(-110.0, 0.0, 0.0)
        .stroke(Color::rgba(0.0, 0.0, 0.0, 64.0));
    model.add(cube);

    let mut sphere = shapes::sphere(2);
    sphere.scale_uniform(70.0).fill_hue_drift(0.55, 0.01);
    model.add(sphere);

    let mut pyramid = shapes::pyramid();
    pyramid
        .scale_uniform(60.0)
        .translate(110.0, -30.0, 0.0)
        .fill(Material::new(Color::hex("#cc6633").unwrap_or(Color::GRAY)).with_metallic(true));
    model.add(pyramid);

    let mut label = shapes::text("scenepaint");
    label.scale_uniform(2.0).translate(0.0, -140.0, 0.0);
    model.add(label);

    model
}

/// Rotate every shape of the context's scene to the angle for `t` ms.
fn spin<S: PaintSurface>(ctx: &mut RenderContext<S>, t: f64) {
    let angle = (t * 0.001) as f32;
    if let Some(scene) = ctx.scene_mut() {
        scene.model.reset().rotate_y(angle).rotate_x(0.3);
    }
}

fn context<S: PaintSurface>(surface: S) -> RenderContext<S> {
    let mut ctx = RenderContext::new(surface);
    ctx.layer(FillLayer::default())
        .scene_layer(Scene::new(build_model()));
    ctx
}

fn run(out_dir: PathBuf, frames: usize) -> scenepaint::Result<()> {
    std::fs::create_dir_all(&out_dir)?;

    let mut animator = context(SvgSurface::new(WIDTH, HEIGHT)).animate();
    animator.on_before(|ctx, t, _| spin(ctx, t));
    animator.start();
    let ran = animator.run_frames(frames);
    animator.stop();
    info!(
        frames = ran,
        bytes = animator.context().surface().document().len(),
        "animation finished"
    );

    let svg_path = out_dir.join("scenepaint.svg");
    animator.context().surface().save(&svg_path)?;
    info!(path = %svg_path.display(), "wrote svg");

    // The raster canvas renders the final pose once.
    let pose = animator
        .context_mut()
        .scene_mut()
        .map(|scene| *scene.model.transform());
    let mut raster = context(RasterCanvas::new(WIDTH, HEIGHT));
    if let (Some(pose), Some(scene)) = (pose, raster.scene_mut()) {
        *scene.model.transform_mut() = pose;
    }
    raster.render();
    let png_path = out_dir.join("scenepaint.png");
    raster.surface().save(&png_path)?;
    info!(path = %png_path.display(), "wrote png");

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let frames = match args.next().map(|s| s.parse::<usize>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            error!(error = %e, "frame count must be a non-negative integer");
            return ExitCode::FAILURE;
        }
    };

    match run(out_dir, frames) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}
