//! Wavefront OBJ parser
//!
//! Reads vertex positions, vertex normals and polygon faces. Polygons are
//! fan-triangulated; faces without normals are shaded with the flat face
//! normal. Everything else in the format (texture coordinates, groups,
//! materials, smoothing) is skipped.

use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, i64 as index, space0, space1},
    combinator::{map, opt, rest, verify},
    multi::{many0, separated_list1},
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Mesh, Triangle, Vertex};

#[derive(Debug, PartialEq)]
enum Statement {
    Position(Point3<f32>),
    Normal(Vector3<f32>),
    Face(Vec<FaceVertex>),
    Skip,
}

/// One `v/vt/vn` reference inside a face, 1-based or negative-relative
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceVertex {
    position: i64,
    normal: Option<i64>,
}

/// Parse OBJ text into a triangle mesh
pub fn parse_obj(input: &str) -> Result<Mesh, LoadError> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut mesh = Mesh::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }

        let statement = match parse_statement(text) {
            Ok((remaining, statement)) if remaining.trim().is_empty() => statement,
            _ => {
                return Err(LoadError::Parse {
                    line,
                    message: format!("malformed statement `{text}`"),
                })
            }
        };

        match statement {
            Statement::Position(p) => positions.push(p),
            Statement::Normal(n) => normals.push(n),
            Statement::Face(refs) => {
                if refs.len() < 3 {
                    return Err(LoadError::Parse {
                        line,
                        message: format!("face has {} vertices, need at least 3", refs.len()),
                    });
                }
                add_face(&mut mesh, &refs, &positions, &normals, line)?;
            }
            Statement::Skip => {}
        }
    }

    Ok(mesh)
}

/// Parse OBJ bytes, rejecting invalid UTF-8
pub fn parse_obj_bytes(data: &[u8]) -> Result<Mesh, LoadError> {
    parse_obj(std::str::from_utf8(data)?)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

fn add_face(
    mesh: &mut Mesh,
    refs: &[FaceVertex],
    positions: &[Point3<f32>],
    normals: &[Vector3<f32>],
    line: usize,
) -> Result<(), LoadError> {
    let mut resolved = Vec::with_capacity(refs.len());
    for r in refs {
        let position = positions[resolve_index(r.position, positions.len(), "vertex", line)?];
        let normal = match r.normal {
            Some(n) => Some(normals[resolve_index(n, normals.len(), "normal", line)?]),
            None => None,
        };
        resolved.push((position, normal));
    }

    for i in 1..resolved.len() - 1 {
        let corners = [resolved[0], resolved[i], resolved[i + 1]];
        let flat = (corners[1].0 - corners[0].0)
            .cross(&(corners[2].0 - corners[0].0))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let [a, b, c] = corners.map(|(p, n)| Vertex::new(p, n.unwrap_or(flat)));
        mesh.add_triangle(Triangle::new(a, b, c));
    }

    Ok(())
}

/// Map a 1-based or negative-relative OBJ index to a 0-based slot
fn resolve_index(raw: i64, len: usize, kind: &str, line: usize) -> Result<usize, LoadError> {
    let resolved = match raw {
        i if i > 0 => Some(i as usize - 1),
        i if i < 0 => len.checked_sub(i.unsigned_abs() as usize),
        _ => None,
    };
    resolved.filter(|&i| i < len).ok_or_else(|| LoadError::Parse {
        line,
        message: format!("{kind} index {raw} out of range (have {len})"),
    })
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    alt((
        map(parse_position, Statement::Position),
        map(parse_normal, Statement::Normal),
        map(parse_face, Statement::Face),
        map(parse_unsupported, |_| Statement::Skip),
    ))(input)
}

fn keyword<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(name), space1)
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((float, preceded(space1, float), preceded(space1, float)))(input)
}

fn parse_position(input: &str) -> IResult<&str, Point3<f32>> {
    // Optional w and per-vertex color components are ignored
    let (input, (x, y, z)) = preceded(keyword("v"), parse_vector3)(input)?;
    let (input, _) = many0(preceded(space1, float))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_normal(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (x, y, z)) = preceded(keyword("vn"), parse_vector3)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, Vec<FaceVertex>> {
    terminated(
        preceded(keyword("f"), separated_list1(space1, parse_face_vertex)),
        space0,
    )(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, position) = index(input)?;
    let (input, _texture) = opt(preceded(char('/'), opt(index)))(input)?;
    let (input, normal) = opt(preceded(char('/'), index))(input)?;
    Ok((input, FaceVertex { position, normal }))
}

fn parse_unsupported(input: &str) -> IResult<&str, &str> {
    let (input, _) = verify(take_till1(|c: char| c.is_whitespace()), |k: &str| {
        !matches!(k, "v" | "vn" | "f")
    })(input)?;
    rest(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad in the XY plane
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
usemtl default
s off
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.triangles.len(), 2);
        let second = &mesh.triangles[1];
        assert_eq!(second.vertices[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(second.vertices[1].position, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(second.vertices[2].position, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(second.vertices[2].normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_face_without_normals_uses_flat_normal() {
        let mesh = parse_obj("v 0 0 0\nv 0 0 1\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.triangles[0].vertices[0].normal, Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_face_vertex_forms() {
        let vertex = |position, normal| Ok(("", FaceVertex { position, normal }));
        assert_eq!(parse_face_vertex("7"), vertex(7, None));
        assert_eq!(parse_face_vertex("7/2"), vertex(7, None));
        assert_eq!(parse_face_vertex("7//3"), vertex(7, Some(3)));
        assert_eq!(parse_face_vertex("-1/2/-3"), vertex(-1, Some(-3)));
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.triangles[0].vertices[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\n\nf 1 2 9\n").unwrap_err();
        match err {
            LoadError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("vertex index 9"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_position_is_an_error() {
        assert!(matches!(
            parse_obj("v 1 2\n"),
            Err(LoadError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_two_vertex_face_is_an_error() {
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }

    #[test]
    fn test_trailing_comment_and_extra_components() {
        let mesh = parse_obj("v 0 0 0 1.0 # w\nv 1 0 0 0.5 0.5 0.5\nv 0 1 0\nf 1 2 3 # tri\n").unwrap();
        assert_eq!(mesh.triangles.len(), 1);
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(parse_obj_bytes(&[0x76, 0x20, 0xff]), Err(LoadError::Utf8(_))));
    }
}
