//! Hierarchical scene models.
//!
//! A [`Model`] owns [`Shape`]s, [`Light`]s and other models, plus a local
//! transform. Nesting models isolates the transformation of groups of shapes
//! and lets transforms chain, e.g. for articulated skeletons. Children are
//! owned values, so a model can never contain itself.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Color;
use crate::light::{Light, LightModel};
use crate::math::{Matrix, Point};
use crate::surface::Shape;
use crate::transform::Transformable;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a shape, model or light within a model tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A renderable child of a model.
#[derive(Debug, Clone)]
pub enum Child {
    Shape(Shape),
    Model(Model),
}

impl Child {
    pub fn id(&self) -> NodeId {
        match self {
            Child::Shape(s) => s.id(),
            Child::Model(m) => m.id(),
        }
    }
}

/// Anything that can be added to a model.
#[derive(Debug, Clone)]
pub enum Node {
    Shape(Shape),
    Model(Model),
    Light(Light),
}

impl From<Shape> for Node {
    fn from(shape: Shape) -> Self {
        Node::Shape(shape)
    }
}

impl From<Model> for Node {
    fn from(model: Model) -> Self {
        Node::Model(model)
    }
}

impl From<Light> for Node {
    fn from(light: Light) -> Self {
        Node::Light(light)
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    id: NodeId,
    children: Vec<Child>,
    lights: Vec<Light>,
    transform: Matrix,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            children: Vec::new(),
            lights: Vec::new(),
            transform: Matrix::new(),
        }
    }

    /// A model with standard Hollywood-style three-part lighting: a warm key
    /// light, a back light and an ambient fill.
    pub fn hollywood() -> Self {
        let mut model = Self::new();
        model
            .add(
                Light::directional()
                    .with_normal(Point::new(-1.0, 1.0, 1.0))
                    .with_color(Color::hsl(0.1, 0.3, 0.7))
                    .with_intensity(0.004),
            )
            .add(
                Light::directional()
                    .with_normal(Point::new(1.0, 1.0, -1.0))
                    .with_intensity(0.003),
            )
            .add(Light::ambient().with_intensity(0.0015));
        model
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    /// Add a shape, model or light.
    pub fn add(&mut self, node: impl Into<Node>) -> &mut Self {
        match node.into() {
            Node::Shape(shape) => self.children.push(Child::Shape(shape)),
            Node::Model(model) => self.children.push(Child::Model(model)),
            Node::Light(light) => self.lights.push(light),
        }
        self
    }

    /// Remove every direct child or light with the given id. Returns how many
    /// were removed.
    ///
    /// The scene may still hold cached render models for removed shapes until
    /// its cache is flushed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let before = self.children.len() + self.lights.len();
        self.children.retain(|c| c.id() != id);
        self.lights.retain(|l| l.id() != id);
        before - self.children.len() - self.lights.len()
    }

    /// Create an empty child model and return it.
    pub fn append(&mut self) -> &mut Model {
        self.children.push(Child::Model(Model::new()));
        match self.children.last_mut() {
            Some(Child::Model(model)) => model,
            _ => unreachable!("a model was just pushed"),
        }
    }

    /// Visit every shape in this model and all nested models, depth first.
    pub fn each_shape(&self, mut f: impl FnMut(&Shape)) {
        self.visit_shapes(&mut f);
    }

    fn visit_shapes<F: FnMut(&Shape)>(&self, f: &mut F) {
        for child in &self.children {
            match child {
                Child::Shape(shape) => f(shape),
                Child::Model(model) => model.visit_shapes(f),
            }
        }
    }

    /// Mutable variant of [`Model::each_shape`].
    pub fn each_shape_mut(&mut self, mut f: impl FnMut(&mut Shape)) {
        self.visit_shapes_mut(&mut f);
    }

    fn visit_shapes_mut<F: FnMut(&mut Shape)>(&mut self, f: &mut F) {
        for child in &mut self.children {
            match child {
                Child::Shape(shape) => f(shape),
                Child::Model(model) => model.visit_shapes_mut(f),
            }
        }
    }

    /// Find a shape anywhere in the tree.
    pub fn find_shape_mut(&mut self, id: NodeId) -> Option<&mut Shape> {
        self.children.iter_mut().find_map(|child| match child {
            Child::Shape(shape) if shape.id() == id => Some(shape),
            Child::Shape(_) => None,
            Child::Model(model) => model.find_shape_mut(id),
        })
    }

    /// Find a nested model anywhere in the tree.
    pub fn find_model_mut(&mut self, id: NodeId) -> Option<&mut Model> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Child::Model(model) => model.find_model_mut(id),
            Child::Shape(_) => None,
        })
    }

    /// Visit each light and shape, accumulating transforms along the way.
    ///
    /// `light_fn` is called with each enabled light and its accumulated
    /// transform and returns the light's per-frame data. `shape_fn` is called
    /// with each shape, the light data of every enabled light in its model or
    /// any ancestor, and the shape's accumulated transform. Lights added in a
    /// nested model never leak to its siblings or ancestors.
    pub fn each_renderable<L, S>(&mut self, mut light_fn: L, mut shape_fn: S)
    where
        L: FnMut(&Light, &Matrix) -> LightModel,
        S: FnMut(&mut Shape, &[LightModel], &Matrix),
    {
        let transform = self.transform;
        self.visit_renderables(&mut light_fn, &mut shape_fn, &[], &transform);
    }

    fn visit_renderables<L, S>(
        &mut self,
        light_fn: &mut L,
        shape_fn: &mut S,
        inherited: &[LightModel],
        transform: &Matrix,
    ) where
        L: FnMut(&Light, &Matrix) -> LightModel,
        S: FnMut(&mut Shape, &[LightModel], &Matrix),
    {
        let own: Vec<LightModel>;
        let lights = if self.lights.is_empty() {
            inherited
        } else {
            let mut models = inherited.to_vec();
            models.extend(
                self.lights
                    .iter()
                    .filter(|light| light.enabled)
                    .map(|light| light_fn(light, &accumulate(light.transform(), transform))),
            );
            own = models;
            &own
        };

        for child in &mut self.children {
            match child {
                Child::Shape(shape) => {
                    let accumulated = accumulate(shape.transform(), transform);
                    shape_fn(shape, lights, &accumulated);
                }
                Child::Model(model) => {
                    let accumulated = accumulate(model.transform(), transform);
                    model.visit_renderables(light_fn, shape_fn, lights, &accumulated);
                }
            }
        }
    }
}

/// `parent · child`: the child's transform applies first.
fn accumulate(child: &Matrix, parent: &Matrix) -> Matrix {
    let mut m = *child;
    m.multiply(parent);
    m
}

impl Transformable for Model {
    fn transform(&self) -> &Matrix {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Matrix {
        &mut self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightKind;
    use crate::shapes;
    use approx::assert_relative_eq;

    fn collect(model: &mut Model) -> Vec<(String, usize, Matrix)> {
        let mut out = Vec::new();
        model.each_renderable(
            |light, m| LightModel::new(light, m),
            |shape, lights, m| out.push((shape.name().to_string(), lights.len(), *m)),
        );
        out
    }

    #[test]
    fn add_sorts_lights_from_children() {
        let mut model = Model::new();
        model
            .add(shapes::cube())
            .add(Light::ambient())
            .add(Model::new());
        assert_eq!(model.children().len(), 2);
        assert_eq!(model.lights().len(), 1);
    }

    #[test]
    fn remove_by_id() {
        let mut model = Model::new();
        let cube = shapes::cube();
        let id = cube.id();
        let light = Light::ambient();
        let light_id = light.id();
        model.add(cube).add(shapes::pyramid()).add(light);

        assert_eq!(model.remove(id), 1);
        assert_eq!(model.children().len(), 1);
        assert_eq!(model.remove(light_id), 1);
        assert!(model.lights().is_empty());
        assert_eq!(model.remove(id), 0);
    }

    #[test]
    fn append_returns_nested_model() {
        let mut root = Model::new();
        root.append().add(shapes::cube());
        root.add(shapes::tetrahedron());

        let mut names = Vec::new();
        root.each_shape(|s| names.push(s.name().to_string()));
        assert_eq!(names, ["cube", "tetrahedron"]);
    }

    #[test]
    fn find_shape_in_nested_model() {
        let mut root = Model::new();
        let cube = shapes::cube();
        let id = cube.id();
        root.append().append().add(cube);
        assert!(root.find_shape_mut(id).is_some());
        assert!(root.find_shape_mut(NodeId::next()).is_none());
    }

    #[test]
    fn transforms_accumulate_parent_first() {
        let mut root = Model::new();
        root.translate(10.0, 0.0, 0.0);
        let mut cube = shapes::cube();
        cube.scale_uniform(2.0);
        root.add(cube);

        let out = collect(&mut root);
        // Scale first, then translate: (1, 0, 0) -> (2, 0, 0) -> (12, 0, 0).
        let p = Point::X.transformed(&out[0].2);
        assert_relative_eq!(p, Point::new(12.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn lights_inherit_downward_only() {
        let mut root = Model::new();
        root.add(Light::ambient());
        root.add(shapes::cube());
        {
            let child = root.append();
            child.add(Light::directional()).add(shapes::pyramid());
        }
        root.add(shapes::tetrahedron());

        let out = collect(&mut root);
        let lights: Vec<_> = out.iter().map(|(n, l, _)| (n.as_str(), *l)).collect();
        assert_eq!(lights, [("cube", 1), ("pyramid", 2), ("tetrahedron", 1)]);
    }

    #[test]
    fn disabled_lights_are_skipped() {
        let mut root = Model::new();
        root.add(Light::ambient().with_enabled(false))
            .add(Light::ambient())
            .add(shapes::cube());
        assert_eq!(collect(&mut root)[0].1, 1);
    }

    #[test]
    fn lights_follow_model_transform() {
        let mut root = Model::new();
        root.translate(0.0, 0.0, 5.0);
        root.add(Light::point()).add(shapes::cube());

        let mut seen = Vec::new();
        root.each_renderable(
            |light, m| LightModel::new(light, m),
            |_, lights, _| seen.extend_from_slice(lights),
        );
        assert_eq!(
            seen[0].kind,
            LightKind::Point {
                point: Point::new(0.0, 0.0, 5.0)
            }
        );
    }

    #[test]
    fn hollywood_lighting() {
        let model = Model::hollywood();
        assert_eq!(model.lights().len(), 3);
        assert!(model.children().is_empty());
        assert_eq!(model.lights()[0].intensity, 0.004);
        assert_eq!(model.lights()[1].intensity, 0.003);
        assert_eq!(model.lights()[2].kind, LightKind::Ambient);
        assert_eq!(model.lights()[2].intensity, 0.0015);
    }
}
