//! Shape primitives and shape-making helpers.
//!
//! Every builder returns a fresh [`Shape`] whose surfaces own copies of their
//! points, so shapes built from the same builder never share geometry.

use std::f32::consts::PI;

use tracing::warn;

use crate::math::{Matrix, Point};
use crate::render::{Affine, Painter};
use crate::surface::{Shape, Surface};

// ============ Coordinate maps ============

const TETRAHEDRON_MAP: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [3, 2, 0], [1, 2, 3]];

/// Left, right, bottom, top, front, back.
const CUBE_MAP: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [5, 4, 6, 7],
    [1, 0, 4, 5],
    [2, 3, 7, 6],
    [3, 1, 5, 7],
    [0, 2, 6, 4],
];

const PYRAMID_BOTTOM: [usize; 4] = [1, 0, 2, 3];
const PYRAMID_SIDES: [[usize; 3]; 4] = [[0, 1, 4], [2, 0, 4], [3, 2, 4], [1, 3, 4]];

const EQUILATERAL_TRIANGLE_ALTITUDE: f32 = 0.866_025_4;

const ICOS_X: f32 = 0.525_731_1;
const ICOS_Z: f32 = 0.850_650_8;

const ICOSAHEDRON_POINTS: [Point; 12] = [
    Point::new(-ICOS_X, 0.0, -ICOS_Z),
    Point::new(ICOS_X, 0.0, -ICOS_Z),
    Point::new(-ICOS_X, 0.0, ICOS_Z),
    Point::new(ICOS_X, 0.0, ICOS_Z),
    Point::new(0.0, ICOS_Z, -ICOS_X),
    Point::new(0.0, ICOS_Z, ICOS_X),
    Point::new(0.0, -ICOS_Z, -ICOS_X),
    Point::new(0.0, -ICOS_Z, ICOS_X),
    Point::new(ICOS_Z, ICOS_X, 0.0),
    Point::new(-ICOS_Z, ICOS_X, 0.0),
    Point::new(ICOS_Z, -ICOS_X, 0.0),
    Point::new(-ICOS_Z, -ICOS_X, 0.0),
];

const ICOSAHEDRON_MAP: [[usize; 3]; 20] = [
    [0, 4, 1],
    [0, 9, 4],
    [9, 5, 4],
    [4, 5, 8],
    [4, 8, 1],
    [8, 10, 1],
    [8, 3, 10],
    [5, 3, 8],
    [5, 2, 3],
    [2, 7, 3],
    [7, 10, 3],
    [7, 6, 10],
    [7, 11, 6],
    [11, 0, 6],
    [0, 1, 6],
    [6, 1, 10],
    [9, 0, 11],
    [9, 11, 2],
    [9, 2, 5],
    [7, 2, 11],
];

/// Join `points` into surfaces following `map`, one surface per index list.
///
/// An index list that refers past the end of `points` is skipped.
pub fn map_points_to_surfaces<M: AsRef<[usize]>>(points: &[Point], map: &[M]) -> Vec<Surface> {
    map.iter()
        .filter_map(|coords| {
            let coords = coords.as_ref();
            match coords
                .iter()
                .map(|&c| points.get(c).copied())
                .collect::<Option<Vec<_>>>()
            {
                Some(surface_points) => Some(Surface::new(surface_points)),
                None => {
                    warn!(
                        ?coords,
                        points = points.len(),
                        "skipping surface with out-of-range index"
                    );
                    None
                }
            }
        })
        .collect()
}

fn box_points(min: Point, max: Point) -> [Point; 8] {
    [
        Point::new(min.x, min.y, min.z),
        Point::new(min.x, min.y, max.z),
        Point::new(min.x, max.y, min.z),
        Point::new(min.x, max.y, max.z),
        Point::new(max.x, min.y, min.z),
        Point::new(max.x, min.y, max.z),
        Point::new(max.x, max.y, min.z),
        Point::new(max.x, max.y, max.z),
    ]
}

// ============ Solids ============

/// A 2x2x2 cube centered on the origin.
pub fn cube() -> Shape {
    let points = box_points(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
    Shape::new("cube", map_points_to_surfaces(&points, &CUBE_MAP))
}

/// A 1x1x1 cube from the origin to `(1, 1, 1)`.
pub fn unit_cube() -> Shape {
    let points = box_points(Point::ZERO, Point::new(1.0, 1.0, 1.0));
    Shape::new("unitcube", map_points_to_surfaces(&points, &CUBE_MAP))
}

/// An axis-aligned box with opposite corners `a` and `b`.
pub fn rectangle(a: Point, b: Point) -> Shape {
    let min = Point::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
    let max = Point::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
    Shape::new("rect", map_points_to_surfaces(&box_points(min, max), &CUBE_MAP))
}

/// A square pyramid inside the unit cube, apex at `(0.5, 1, 0.5)`.
pub fn pyramid() -> Shape {
    let points = [
        Point::new(0.0, 0.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 1.0),
        Point::new(0.5, 1.0, 0.5),
    ];
    let mut surfaces = map_points_to_surfaces(&points, &[PYRAMID_BOTTOM]);
    surfaces.extend(map_points_to_surfaces(&points, &PYRAMID_SIDES));
    Shape::new("pyramid", surfaces)
}

/// A tetrahedron that fits inside a 2x2x2 cube.
pub fn tetrahedron() -> Shape {
    let points = [
        Point::new(1.0, 1.0, 1.0),
        Point::new(-1.0, -1.0, 1.0),
        Point::new(-1.0, 1.0, -1.0),
        Point::new(1.0, -1.0, -1.0),
    ];
    Shape::new("tetrahedron", map_points_to_surfaces(&points, &TETRAHEDRON_MAP))
}

/// An icosahedron inscribed in the unit sphere.
pub fn icosahedron() -> Shape {
    Shape::new(
        "icosahedron",
        map_points_to_surfaces(&ICOSAHEDRON_POINTS, &ICOSAHEDRON_MAP),
    )
}

/// A subdivided icosahedron approximating the unit sphere with
/// `20 * 4^subdivisions` equal-ish triangles.
pub fn sphere(subdivisions: u32) -> Shape {
    let mut triangles: Vec<[Point; 3]> = ICOSAHEDRON_MAP
        .iter()
        .map(|&[a, b, c]| [ICOSAHEDRON_POINTS[a], ICOSAHEDRON_POINTS[b], ICOSAHEDRON_POINTS[c]])
        .collect();
    for _ in 0..subdivisions {
        triangles = subdivide_triangles(&triangles);
    }
    Shape::new(
        "sphere",
        triangles.iter().map(|t| Surface::new(t.to_vec())).collect(),
    )
}

/// Split each triangle into four, pushing the new midpoints onto the unit
/// sphere.
fn subdivide_triangles(triangles: &[[Point; 3]]) -> Vec<[Point; 3]> {
    let midpoint = |a: Point, b: Point| {
        let mut m = a;
        m.add(b).normalize();
        m
    };

    let mut out = Vec::with_capacity(triangles.len() * 4);
    for &[p0, p1, p2] in triangles {
        let v01 = midpoint(p0, p1);
        let v12 = midpoint(p1, p2);
        let v20 = midpoint(p2, p0);
        out.push([p0, v01, v20]);
        out.push([p1, v12, v01]);
        out.push([p2, v20, v12]);
        out.push([v01, v12, v20]);
    }
    out
}

// ============ Extrusions ============

/// Extrude the polygon `points` along `offset`.
///
/// The result has one quad per polygon edge plus the front face and the back
/// face (wound in reverse so both face outward).
pub fn extrude(points: &[Point], offset: Point) -> Shape {
    let front: Vec<Point> = points.to_vec();
    let mut back: Vec<Point> = points
        .iter()
        .map(|&p| {
            let mut q = p;
            q.add(offset);
            q
        })
        .collect();

    let n = points.len();
    let side = |a: usize, b: usize| Surface::new(vec![front[a], back[a], back[b], front[b]]);
    let mut surfaces: Vec<Surface> = (1..n).map(|i| side(i - 1, i)).collect();
    if n > 1 {
        surfaces.push(side(n - 1, 0));
    }

    back.reverse();
    surfaces.push(Surface::new(front));
    surfaces.push(Surface::new(back));
    Shape::new("extrusion", surfaces)
}

/// An extruded block arrow pointing down the negative x axis, tip at the
/// origin.
pub fn arrow(
    thickness: f32,
    tail_length: f32,
    tail_width: f32,
    head_length: f32,
    head_pointiness: f32,
) -> Shape {
    let htw = tail_width / 2.0;
    let points = [
        Point::new(0.0, 0.0, 0.0),
        Point::new(head_length + head_pointiness, 1.0, 0.0),
        Point::new(head_length, htw, 0.0),
        Point::new(head_length + tail_length, htw, 0.0),
        Point::new(head_length + tail_length, -htw, 0.0),
        Point::new(head_length, -htw, 0.0),
        Point::new(head_length + head_pointiness, -1.0, 0.0),
    ];
    extrude(&points, Point::new(0.0, 0.0, thickness))
}

/// A prism approximating a cylinder of `radius` from `a` to `b`, with
/// `segments` sides.
pub fn pipe(a: Point, b: Point, radius: f32, segments: usize) -> Shape {
    let axis = b - a;
    let mut perp = axis.perpendicular() * radius;
    let theta = -2.0 * PI / segments as f32;
    let mut rotation = Matrix::new();
    rotation.rotate_axis(axis.normalized(), theta);

    let points: Vec<Point> = (0..segments)
        .map(|_| {
            let mut p = a;
            p.add(perp);
            perp.transform(&rotation);
            p
        })
        .collect();
    extrude(&points, axis)
}

// ============ Planar ============

/// A planar patch of `2 * nx * ny` near-equilateral triangles in the z = 0
/// plane.
pub fn patch(nx: usize, ny: usize) -> Shape {
    let mut surfaces = Vec::with_capacity(2 * nx * ny);
    for x in 0..nx {
        let xf = x as f32;
        let shift = if x % 2 == 0 { 0.5 } else { 0.0 };
        let mut column: Vec<Vec<Point>> = Vec::with_capacity(2 * ny);
        for y in 0..ny {
            let yf = y as f32;
            let tris = [
                [
                    Point::new(xf, yf, 0.0),
                    Point::new(xf + 1.0, yf - 0.5, 0.0),
                    Point::new(xf + 1.0, yf + 0.5, 0.0),
                ],
                [
                    Point::new(xf, yf, 0.0),
                    Point::new(xf + 1.0, yf + 0.5, 0.0),
                    Point::new(xf, yf + 1.0, 0.0),
                ],
            ];
            for tri in tris {
                column.push(
                    tri.iter()
                        .map(|p| {
                            Point::new(p.x * EQUILATERAL_TRIANGLE_ALTITUDE, p.y + shift, p.z)
                        })
                        .collect(),
                );
            }
        }

        // Odd columns wrap their first triangle to the far end.
        if x % 2 != 0 && !column.is_empty() {
            let mut first = column.remove(0);
            for p in &mut first {
                p.y += ny as f32;
            }
            column.push(first);
        }
        surfaces.extend(column.into_iter().map(Surface::new));
    }
    Shape::new("patch", surfaces)
}

/// A single surface through `points`.
pub fn path(points: Vec<Point>) -> Shape {
    Shape::new("path", vec![Surface::new(points)])
}

/// One surface per point list.
pub fn custom(surfaces: Vec<Vec<Point>>) -> Shape {
    Shape::new("custom", surfaces.into_iter().map(Surface::new).collect())
}

/// A text surface. The text is drawn with an affine estimate of the
/// projection of the orthonormal basis it carries as its points.
pub fn text(text: impl Into<String>) -> Shape {
    let mut surface = Surface::with_painter(Affine::orthonormal_basis().to_vec(), Painter::Text);
    surface.text = Some(text.into());
    Shape::new("text", vec![surface])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn out_of_range_map_entries_are_skipped() {
        let points = [Point::ZERO, Point::X, Point::Y];
        let surfaces = map_points_to_surfaces(&points, &[[0usize, 1, 2], [0, 1, 7], [2, 1, 0]]);
        assert_eq!(surfaces.len(), 2);
        assert_eq!(surfaces[1].points(), &[Point::Y, Point::X, Point::ZERO]);
    }

    #[test]
    fn cube_has_six_quads() {
        let cube = cube();
        assert_eq!(cube.name(), "cube");
        assert_eq!(cube.surfaces().len(), 6);
        assert!(cube.surfaces().iter().all(|s| s.points().len() == 4));
        // Front face at z = +1.
        assert!(cube.surfaces()[4].points().iter().all(|p| p.z == 1.0));
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = cube();
        for s in cube.surfaces() {
            let pts = s.points();
            let mut u = pts[1] - pts[0];
            u.cross(pts[pts.len() - 1] - pts[0]).normalize();
            let mut center = Point::ZERO;
            for p in pts {
                center.add(*p);
            }
            center.divide(pts.len() as f32);
            assert!(u.dot(center) > 0.0, "face normal points inward");
        }
    }

    #[test]
    fn rectangle_orders_corners() {
        let r = rectangle(Point::new(2.0, 0.0, 3.0), Point::new(0.0, 1.0, 0.0));
        let first = r.surfaces()[0].points()[0];
        assert_eq!(first, Point::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn solid_face_counts() {
        assert_eq!(pyramid().surfaces().len(), 5);
        assert_eq!(tetrahedron().surfaces().len(), 4);
        assert_eq!(icosahedron().surfaces().len(), 20);
        assert_eq!(sphere(0).surfaces().len(), 20);
        assert_eq!(sphere(2).surfaces().len(), 320);
    }

    #[test]
    fn sphere_points_lie_on_unit_sphere() {
        for s in sphere(1).surfaces() {
            for p in s.points() {
                assert_relative_eq!(p.magnitude(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn extrude_adds_sides_and_caps() {
        let square = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let shape = extrude(&square, Point::new(0.0, 0.0, 2.0));
        assert_eq!(shape.surfaces().len(), 6);
        let back = shape.surfaces()[5].points();
        assert_eq!(back[0], Point::new(0.0, 1.0, 2.0));
        // Closing side joins the last point back to the first.
        let closing = shape.surfaces()[3].points();
        assert_eq!(closing[0], square[3]);
        assert_eq!(closing[3], square[0]);
    }

    #[test]
    fn arrow_is_seven_sided_prism() {
        assert_eq!(arrow(1.0, 1.0, 1.0, 1.0, 0.0).surfaces().len(), 9);
    }

    #[test]
    fn pipe_sweeps_radius_around_axis() {
        let shape = pipe(Point::ZERO, Point::new(0.0, 0.0, 4.0), 2.0, 8);
        assert_eq!(shape.surfaces().len(), 10);
        let front = shape.surfaces()[8].points();
        assert_eq!(front.len(), 8);
        for p in front {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn patch_triangle_count() {
        let shape = patch(3, 4);
        assert_eq!(shape.surfaces().len(), 24);
        assert!(shape.surfaces().iter().all(|s| s.points().len() == 3));
    }

    #[test]
    fn text_uses_text_painter() {
        let shape = text("hello");
        let s = &shape.surfaces()[0];
        assert_eq!(s.painter, Painter::Text);
        assert_eq!(s.text.as_deref(), Some("hello"));
        assert_eq!(s.points().len(), 3);
    }

    #[test]
    fn builders_do_not_share_points() {
        let mut a = cube();
        let b = cube();
        a.surfaces_mut()[0].points_mut()[0].x = 42.0;
        assert_eq!(b.surfaces()[0].points()[0].x, -1.0);
    }
}
