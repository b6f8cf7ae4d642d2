use scenepaint::prelude::*;

fn cube_scene(options: SceneOptions) -> Scene {
    let mut model = Model::hollywood();
    model.add(shapes::cube());
    Scene::with_options(model, options)
}

#[test]
fn identity_cube_renders_every_face_sorted_by_depth() {
    let mut scene = cube_scene(SceneOptions {
        cull_backfaces: false,
        ..SceneOptions::default()
    });

    let rendered = scene.render();
    assert_eq!(rendered.len(), 6);
    assert!(rendered.iter().all(|m| m.in_frustum()));

    let depths: Vec<f32> = rendered.iter().map(|m| m.projected.barycenter.z).collect();
    assert!(
        depths.windows(2).all(|w| w[0] >= w[1]),
        "not sorted far to near: {depths:?}"
    );

    // Every accepted face is shaded.
    assert!(rendered.iter().all(|m| m.fill.is_some()));
}

#[test]
fn culling_keeps_only_camera_facing_faces() {
    let mut scene = cube_scene(SceneOptions::default());
    let rendered = scene.render();
    assert!(!rendered.is_empty());
    assert!(rendered.len() < 6);
    assert!(rendered.iter().all(|m| m.projected.normal.z < 0.0));
}

#[test]
fn geometry_behind_the_camera_is_rejected() {
    let mut scene = cube_scene(SceneOptions {
        cull_backfaces: false,
        ..SceneOptions::default()
    });
    scene.model.translate(0.0, 0.0, 2000.0);
    assert!(scene.render().is_empty());
    // The entries stay cached even though nothing is drawn.
    assert_eq!(scene.cache_len(), 6);
}

#[test]
fn moving_a_shape_only_recomputes_that_shape() {
    let mut model = Model::hollywood();
    let mut left = shapes::cube();
    left.scale_uniform(40.0).translate(-100.0, 0.0, 0.0);
    let mut right = shapes::cube();
    right.scale_uniform(40.0).translate(100.0, 0.0, 0.0);
    let right_id = right.id();
    model.add(left).add(right);

    let mut scene = Scene::with_options(
        model,
        SceneOptions {
            cull_backfaces: false,
            ..SceneOptions::default()
        },
    );
    scene.render();

    if let Some(shape) = scene.model.find_shape_mut(right_id) {
        shape.rotate_y(0.5);
    }
    let counts: Vec<u64> = scene.render().iter().map(|m| m.computations()).collect();
    assert_eq!(counts.len(), 12);
    assert_eq!(counts.iter().filter(|&&c| c == 2).count(), 6);
    assert_eq!(counts.iter().filter(|&&c| c == 1).count(), 6);
}

#[test]
fn nested_models_accumulate_transforms() {
    let mut root = Model::hollywood();
    let mut cube = shapes::unit_cube();
    cube.scale_uniform(20.0);
    root.append().translate(150.0, 0.0, 0.0).add(cube);

    let mut scene = Scene::with_options(
        root,
        SceneOptions {
            cull_backfaces: false,
            fractional_points: true,
            ..SceneOptions::default()
        },
    );
    let rendered = scene.render();
    assert_eq!(rendered.len(), 6);
    // Shifted right of the 250px view center.
    assert!(rendered
        .iter()
        .flat_map(|m| m.projected.points.iter())
        .all(|p| p.x > 250.0));
}
