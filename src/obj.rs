//! Wavefront OBJ import.
//!
//! Only geometry is read: every face of every object in the file becomes one
//! [`Surface`] of a single [`Shape`]. Materials, normals and texture
//! coordinates are ignored.
//!
//! Bad input is not fatal. Vertex lines that do not parse, faces that
//! reference missing vertices and faces with fewer than 3 vertices are logged
//! and skipped, and the rest of the file still loads.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::math::Point;
use crate::surface::{Shape, Surface};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file into a shape named after the file stem.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Shape> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "obj".to_string());
    import(name, &mut reader)
}

/// Parse OBJ data from a reader. `mtllib` references are ignored.
pub fn read_obj(reader: &mut impl BufRead) -> Result<Shape> {
    import("obj", reader)
}

/// Parse OBJ source text.
pub fn parse_obj(source: &str) -> Result<Shape> {
    read_obj(&mut source.as_bytes())
}

fn import(name: impl Into<String>, reader: &mut impl BufRead) -> Result<Shape> {
    let geometry = sanitize(reader)?;
    let (models, _materials) = tobj::load_obj_buf(
        &mut geometry.as_bytes(),
        &load_options(),
        |_| Ok(Default::default()),
    )?;
    Ok(shape_from_models(name, &models))
}

/// Rewrite OBJ source down to the records the importer uses: vertex
/// positions, faces with absolute position indices, and object/group names.
/// Lines that would make the whole load fail are dropped with a warning.
fn sanitize(reader: &mut impl BufRead) -> Result<String> {
    let mut out = String::new();
    let mut vertices = 0usize;
    let mut skipped = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("v") => match parse_position(words) {
                Some([x, y, z]) => {
                    vertices += 1;
                    out.push_str(&format!("v {x} {y} {z}\n"));
                }
                None => {
                    skipped += 1;
                    warn!(line = line_number, "skipping malformed vertex");
                }
            },
            Some("f") => match parse_face(words, vertices) {
                Ok(indices) => {
                    out.push('f');
                    for i in indices {
                        out.push_str(&format!(" {i}"));
                    }
                    out.push('\n');
                }
                Err(reason) => {
                    skipped += 1;
                    warn!(line = line_number, reason, "skipping face");
                }
            },
            Some(kind @ ("o" | "g")) => {
                out.push_str(kind);
                for word in words {
                    out.push(' ');
                    out.push_str(word);
                }
                out.push('\n');
            }
            _ => {}
        }
    }

    if skipped > 0 {
        debug!(skipped, "dropped OBJ records");
    }
    Ok(out)
}

/// The first three coordinates of a `v` record. Extra values (w or vertex
/// colors) are ignored.
fn parse_position<'a>(mut words: impl Iterator<Item = &'a str>) -> Option<[f32; 3]> {
    let mut p = [0.0; 3];
    for coord in &mut p {
        *coord = words.next()?.parse::<f32>().ok().filter(|v| v.is_finite())?;
    }
    Some(p)
}

/// Resolve the position index of every vertex of an `f` record against the
/// `vertices` read so far. Negative indices count back from the last vertex.
fn parse_face<'a>(
    words: impl Iterator<Item = &'a str>,
    vertices: usize,
) -> std::result::Result<Vec<usize>, &'static str> {
    let mut indices = Vec::new();
    for word in words {
        let position = word.split('/').next().unwrap_or_default();
        let index: i64 = position.parse().map_err(|_| "unparsable vertex reference")?;
        let count = vertices as i64;
        let absolute = match index {
            i if i > 0 && i <= count => i,
            i if i < 0 && -i <= count => count + 1 + i,
            _ => return Err("vertex reference out of range"),
        };
        indices.push(absolute as usize);
    }
    if indices.len() < 3 {
        return Err("fewer than 3 vertices");
    }
    Ok(indices)
}

fn shape_from_models(name: impl Into<String>, models: &[tobj::Model]) -> Shape {
    let mut surfaces = Vec::new();
    for model in models {
        let mesh = &model.mesh;
        let vertex = |index: u32| -> Option<Point> {
            let i = index as usize;
            let p = mesh.positions.get(3 * i..3 * i + 3)?;
            Some(Point::new(p[0], p[1], p[2]))
        };

        // An empty arity list means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut start = 0;
        for arity in arities {
            let end = start + arity;
            let Some(face) = mesh.indices.get(start..end) else {
                warn!(model = %model.name, "face runs past the index buffer, skipping");
                break;
            };
            start = end;
            match face.iter().map(|&i| vertex(i)).collect::<Option<Vec<_>>>() {
                Some(points) => surfaces.push(Surface::new(points)),
                None => warn!(model = %model.name, "face references a missing vertex, skipping"),
            }
        }
    }

    debug!(
        models = models.len(),
        surfaces = surfaces.len(),
        "imported OBJ geometry"
    );
    Shape::new(name, surfaces)
}
